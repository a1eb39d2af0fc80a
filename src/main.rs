//! duofm - a dual-panel terminal file manager core.
//!
//! Usage:
//!   dfm list [PATH]        Print a directory the way a panel lists it
//!   dfm size PATH...       Count items and total size
//!   dfm copy SRC... DEST   Copy with interactive conflict resolution
//!   dfm move SRC... DEST   Move (rename) with confirmation
//!   dfm delete PATH...     Delete with confirmation
//!   dfm --help             Show help

mod ui;

use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use clap::{Parser, Subcommand, ValueEnum};
use color_eyre::eyre::{Context, Result, bail, eyre};

use duofm_core::{EntryKind, OpConfig, Panel, SortKey, SortOrder, is_directory};
use duofm_ops::{
    CopyOp, CountStats, DeleteOp, MoveOp, OperationContext, ProgressReporter, Verdict,
    run_mass_action,
};
use ui::{ConsolePrompt, ConsoleReporter};

#[derive(Parser)]
#[command(
    name = "duofm",
    version,
    about = "A dual-panel terminal file manager core",
    long_about = "duofm applies the panel file operations (copy, move, delete, count)\n\
                  to explicit paths, with the same interactive conflict handling the\n\
                  panels use."
)]
struct Cli {
    /// Minimum milliseconds between progress redraws
    #[arg(long, default_value = "100")]
    throttle: u64,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print a directory the way a panel would list it
    List {
        /// Directory to list
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Sort field
        #[arg(short, long, default_value = "name")]
        sort: SortField,

        /// Reverse the sort order
        #[arg(short, long)]
        reverse: bool,

        /// Do not group directories first
        #[arg(long)]
        no_dirs_first: bool,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },

    /// Count items and total size under the given paths
    Size {
        /// Paths to count
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },

    /// Copy entries to a destination
    Copy {
        /// Sources, with the destination as the last argument
        #[arg(required = true, num_args = 2..)]
        paths: Vec<PathBuf>,

        /// Copy buffer size in bytes
        #[arg(long, default_value = "16384")]
        chunk_size: usize,
    },

    /// Move entries to a destination
    #[command(name = "move")]
    MoveTo {
        /// Sources, with the destination as the last argument
        #[arg(required = true, num_args = 2..)]
        paths: Vec<PathBuf>,
    },

    /// Delete entries after confirmation
    Delete {
        /// Paths to delete
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum, Default)]
enum SortField {
    #[default]
    Name,
    Size,
    Mtime,
}

#[derive(Debug, Clone, Copy, ValueEnum, Default)]
enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Which mass action a command runs.
enum MassOp {
    Copy,
    Move,
    Delete,
}

fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();

    match cli.command {
        Command::List {
            path,
            sort,
            reverse,
            no_dirs_first,
            format,
        } => run_list(&path, sort, reverse, no_dirs_first, format),
        Command::Size { paths } => run_size(&paths, cli.throttle),
        Command::Copy {
            mut paths,
            chunk_size,
        } => {
            let dest = paths.pop().expect("clap enforces two paths");
            let config = OpConfig::builder()
                .chunk_size(chunk_size)
                .throttle_ms(cli.throttle)
                .build()
                .map_err(|e| eyre!("Invalid configuration: {e}"))?;
            run_mass(MassOp::Copy, &paths, Some(&dest), &config)
        }
        Command::MoveTo { mut paths } => {
            let dest = paths.pop().expect("clap enforces two paths");
            let config = OpConfig::builder()
                .throttle_ms(cli.throttle)
                .build()
                .map_err(|e| eyre!("Invalid configuration: {e}"))?;
            run_mass(MassOp::Move, &paths, Some(&dest), &config)
        }
        Command::Delete { paths } => {
            let config = OpConfig::builder()
                .throttle_ms(cli.throttle)
                .build()
                .map_err(|e| eyre!("Invalid configuration: {e}"))?;
            run_mass(MassOp::Delete, &paths, None, &config)
        }
    }
}

/// Print a panel listing.
fn run_list(
    path: &Path,
    sort: SortField,
    reverse: bool,
    no_dirs_first: bool,
    format: OutputFormat,
) -> Result<()> {
    let mut panel = Panel::read_dir(path).context("Cannot read directory")?;
    panel.sort(&SortOrder {
        key: match sort {
            SortField::Name => SortKey::Name,
            SortField::Size => SortKey::Size,
            SortField::Mtime => SortKey::Modified,
        },
        ascending: !reverse,
        dirs_first: !no_dirs_first,
    });

    match format {
        OutputFormat::Text => {
            for entry in &panel.entries {
                let marker = match &entry.kind {
                    EntryKind::Directory => "/",
                    EntryKind::Symlink { .. } => "@",
                    EntryKind::File { executable: true } => "*",
                    _ => "",
                };
                println!(
                    "{:>10}  {}  {}{}",
                    format_size(entry.size),
                    format_mtime(entry.modified),
                    entry.name,
                    marker
                );
            }
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&panel)?);
        }
    }
    Ok(())
}

/// Count items and bytes under the given paths.
fn run_size(paths: &[PathBuf], throttle_ms: u64) -> Result<()> {
    let (dir, names) = split_sources(paths)?;
    let mut panel = select_in_panel(&dir, &names)?;

    let mut reporter = ConsoleReporter::new(Duration::from_millis(throttle_ms));
    let mut cx = OperationContext::new();
    {
        let mut count = CountStats::new(&mut reporter);
        run_mass_action(&mut count, &mut panel, &dir, &mut cx);
    }
    reporter.reset();

    println!(
        "{} items, {} ({} bytes)",
        cx.total_items,
        format_size(cx.total_size),
        cx.total_size
    );
    Ok(())
}

/// Count pass, then the requested operation, over one panel selection.
fn run_mass(op: MassOp, sources: &[PathBuf], dest: Option<&Path>, config: &OpConfig) -> Result<()> {
    let (dir, names) = split_sources(sources)?;
    let mut panel = select_in_panel(&dir, &names)?;

    let target_spec = match dest {
        // Delete ignores the destination.
        None => dir.clone(),
        Some(dest) => {
            if is_directory(dest) {
                // "Into that directory", wherever the panel lives.
                fs::canonicalize(dest).context("Cannot resolve destination")?
            } else if names.len() > 1 {
                bail!("Destination is not a directory: {}", dest.display());
            } else {
                dest.to_path_buf()
            }
        }
    };

    let mut reporter = ConsoleReporter::new(Duration::from_millis(config.throttle_ms));
    let mut cx = OperationContext::new();
    {
        let mut count = CountStats::new(&mut reporter);
        run_mass_action(&mut count, &mut panel, &target_spec, &mut cx);
    }
    cx.start_pass();

    let mut prompt = ConsolePrompt::new();
    let verdict = match op {
        MassOp::Copy => {
            let mut copy =
                CopyOp::new(&mut prompt, &mut reporter).with_chunk_size(config.chunk_size);
            run_mass_action(&mut copy, &mut panel, &target_spec, &mut cx)
        }
        MassOp::Move => {
            let mut mv = MoveOp::new(&mut prompt, &mut reporter);
            run_mass_action(&mut mv, &mut panel, &target_spec, &mut cx)
        }
        MassOp::Delete => {
            let mut del = DeleteOp::new(&mut prompt, &mut reporter);
            run_mass_action(&mut del, &mut panel, &target_spec, &mut cx)
        }
    };
    reporter.reset();

    match verdict {
        Verdict::Abort => eprintln!(
            "Aborted after {} of {} items",
            cx.current_items.min(cx.total_items),
            cx.total_items
        ),
        _ => eprintln!(
            "Done: {} items, {}",
            cx.total_items,
            format_size(cx.total_size)
        ),
    }
    Ok(())
}

/// Split explicit source paths into their shared parent directory and the
/// entry names within it.
fn split_sources(paths: &[PathBuf]) -> Result<(PathBuf, Vec<String>)> {
    let mut dir: Option<PathBuf> = None;
    let mut names = Vec::new();
    for path in paths {
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .map(str::to_string)
            .ok_or_else(|| eyre!("Not an operable entry: {}", path.display()))?;
        let parent = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        match &dir {
            None => dir = Some(parent),
            Some(existing) if *existing == parent => {}
            Some(existing) => bail!(
                "Sources must share one directory ({} vs {})",
                existing.display(),
                parent.display()
            ),
        }
        names.push(name);
    }
    Ok((dir.expect("at least one source"), names))
}

/// Read the panel and mark the named entries: a single name goes under the
/// cursor, several become the selection set.
fn select_in_panel(dir: &Path, names: &[String]) -> Result<Panel> {
    let mut panel = Panel::read_dir(dir).context("Cannot read source directory")?;
    if let [name] = names {
        if !panel.set_cursor(name) {
            bail!("No such entry: {}", name);
        }
    } else {
        for name in names {
            if !panel.select(name) {
                bail!("No such entry: {}", name);
            }
        }
    }
    Ok(panel)
}

/// Format size in human-readable form.
fn format_size(bytes: u64) -> String {
    humansize::format_size(bytes, humansize::BINARY)
}

/// Format a modification time for the listing.
fn format_mtime(time: SystemTime) -> String {
    let local: chrono::DateTime<chrono::Local> = time.into();
    local.format("%Y-%m-%d %H:%M").to_string()
}
