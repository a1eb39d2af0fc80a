//! User-confirmation collaborator.
//!
//! The engine suspends on a modal prompt: nothing else happens until the
//! user picks a button. Button order is the contract; every operation
//! branches on the returned index.

use crate::context::OperationContext;
use crate::operation::Verdict;

/// Outcome of a modal prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Choice {
    /// 1-based index of the chosen button.
    Button(usize),
    /// The dialog was dismissed (Escape / F10).
    Cancelled,
}

impl Choice {
    /// Button index, with the cancel sentinel mapped to 0.
    pub fn index(self) -> usize {
        match self {
            Choice::Button(i) => i,
            Choice::Cancelled => 0,
        }
    }
}

/// Blocking modal prompt presented to the user.
pub trait UserPrompt {
    /// Present `title` with the given buttons and return the user's choice.
    ///
    /// `input` requests an editable text field preloaded with the given
    /// value; `danger` marks prompts about destructive actions.
    fn ask(
        &mut self,
        title: &str,
        buttons: &[&str],
        input: Option<&str>,
        danger: bool,
    ) -> Choice;
}

/// Buttons for recoverable per-item errors.
pub const ERROR_BUTTONS: &[&str] = &["Skip", "Skip all", "Retry", "Abort"];

/// Buttons for overwrite / recursive-delete confirmation.
pub const CONFIRM_BUTTONS: &[&str] = &["Yes", "No", "All", "None", "Abort"];

/// Decoded answer to an [`ERROR_BUTTONS`] prompt. Cancel counts as Skip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorChoice {
    Skip,
    SkipAll,
    Retry,
    Abort,
}

impl ErrorChoice {
    /// Decode a raw choice by button position.
    pub fn from_choice(choice: Choice) -> Self {
        match choice.index() {
            2 => Self::SkipAll,
            3 => Self::Retry,
            4 => Self::Abort,
            _ => Self::Skip,
        }
    }
}

/// Decoded answer to a [`CONFIRM_BUTTONS`] prompt. Cancel counts as No.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmChoice {
    Yes,
    No,
    All,
    None,
    Abort,
}

impl ConfirmChoice {
    /// Decode a raw choice by button position.
    pub fn from_choice(choice: Choice) -> Self {
        match choice.index() {
            1 => Self::Yes,
            3 => Self::All,
            4 => Self::None,
            5 => Self::Abort,
            _ => Self::No,
        }
    }
}

/// What a resolved per-item error means for the current invocation.
pub(crate) enum ErrorResolution {
    /// Hand this verdict to the walker.
    Resolved(Verdict),
    /// Re-run the whole invocation.
    Retry,
}

/// Resolve a recoverable per-item error: auto-skip under `skip_all`,
/// otherwise ask the user.
///
/// An interactive Skip / Skip all keeps the item's selection mark; the
/// `skip_all` auto-skip leaves `keep_item_selected` alone.
pub(crate) fn resolve_error(
    prompt: &mut dyn UserPrompt,
    cx: &mut OperationContext,
    title: &str,
) -> ErrorResolution {
    if cx.skip_all {
        return ErrorResolution::Resolved(Verdict::Skip);
    }
    match ErrorChoice::from_choice(prompt.ask(title, ERROR_BUTTONS, None, true)) {
        ErrorChoice::Skip => {
            cx.keep_item_selected = true;
            ErrorResolution::Resolved(Verdict::Skip)
        }
        ErrorChoice::SkipAll => {
            cx.keep_item_selected = true;
            cx.skip_all = true;
            ErrorResolution::Resolved(Verdict::Skip)
        }
        ErrorChoice::Retry => ErrorResolution::Retry,
        ErrorChoice::Abort => {
            cx.request_abort();
            ErrorResolution::Resolved(Verdict::Abort)
        }
    }
}
