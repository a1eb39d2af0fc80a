//! Console implementations of the engine's collaborator traits.
//!
//! The prompt is line-based: buttons are printed once and the answer read
//! from stdin, either as a number or as a button-name prefix. The reporter
//! redraws a single stderr line, throttled.

use std::io::{self, BufRead, Write};
use std::time::Duration;

use duofm_ops::{Choice, ProgressReporter, Throttle, UserPrompt};

/// Blocking line prompt on stdin/stderr.
pub struct ConsolePrompt;

impl ConsolePrompt {
    pub fn new() -> Self {
        Self
    }
}

impl UserPrompt for ConsolePrompt {
    fn ask(&mut self, title: &str, buttons: &[&str], _input: Option<&str>, danger: bool) -> Choice {
        let mut err = io::stderr();
        let _ = writeln!(err);
        for line in title.lines() {
            let _ = writeln!(err, "{}{line}", if danger { "! " } else { "  " });
        }
        let numbered: Vec<String> = buttons
            .iter()
            .enumerate()
            .map(|(i, b)| format!("{}) {b}", i + 1))
            .collect();
        let _ = write!(err, "  {} > ", numbered.join("  "));
        let _ = err.flush();

        let stdin = io::stdin();
        let mut line = String::new();
        loop {
            line.clear();
            match stdin.lock().read_line(&mut line) {
                Ok(0) | Err(_) => return Choice::Cancelled,
                Ok(_) => {}
            }
            let answer = line.trim();
            if answer.is_empty() {
                return Choice::Cancelled;
            }
            if let Ok(n) = answer.parse::<usize>() {
                if (1..=buttons.len()).contains(&n) {
                    return Choice::Button(n);
                }
            }
            let lower = answer.to_lowercase();
            if let Some(pos) = buttons
                .iter()
                .position(|b| b.to_lowercase().starts_with(&lower))
            {
                return Choice::Button(pos + 1);
            }
            let _ = write!(err, "  ? > ");
            let _ = err.flush();
        }
    }
}

/// Single-line progress display on stderr.
pub struct ConsoleReporter {
    throttle: Throttle,
    active: bool,
}

impl ConsoleReporter {
    pub fn new(interval: Duration) -> Self {
        Self {
            throttle: Throttle::new(interval),
            active: false,
        }
    }
}

impl ProgressReporter for ConsoleReporter {
    fn update(
        &mut self,
        status: Option<&str>,
        item_percent: u8,
        overall_percent: u8,
        info: Option<&str>,
    ) {
        let mut err = io::stderr();
        if status.is_none() && info.is_none() && item_percent == 0 && overall_percent == 0 {
            // The reset call: finish the line and forget the redraw timer.
            if self.active {
                let _ = writeln!(err);
            }
            self.throttle.reset();
            self.active = false;
            return;
        }
        if !self.throttle.ready() {
            return;
        }

        let mut line = String::new();
        if let Some(status) = status {
            line.push_str(&status.replace('\n', " "));
        }
        if let Some(info) = info {
            if !line.is_empty() {
                line.push_str("  ");
            }
            line.push_str(&info.replace('\n', ", "));
        }
        let _ = write!(
            err,
            "\r\x1b[2K{line}  [{item_percent:>3}% | {overall_percent:>3}%]"
        );
        let _ = err.flush();
        self.active = true;
    }
}
