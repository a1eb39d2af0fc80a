//! Recursive file-operation engine for duofm.
//!
//! One mass action drives a [`PathOperation`] (count, copy, delete, or move)
//! over the panel's cursor item or its selection set through the recursive
//! [`walk`]er. Conflicts surface through the blocking [`UserPrompt`]
//! collaborator, progress through [`ProgressReporter`]; both are capability
//! traits the front end implements. Everything is synchronous: the engine
//! holds no threads, channels, or event loop.

mod context;
mod copy;
mod count;
mod delete;
mod mass_action;
mod move_op;
mod operation;
mod progress;
mod prompt;
mod walker;

pub use context::OperationContext;
pub use copy::CopyOp;
pub use count::CountStats;
pub use delete::DeleteOp;
pub use mass_action::run_mass_action;
pub use move_op::MoveOp;
pub use operation::{PathOperation, Verdict};
pub use progress::{ProgressReporter, SilentReporter, Throttle};
pub use prompt::{CONFIRM_BUTTONS, Choice, ConfirmChoice, ERROR_BUTTONS, ErrorChoice, UserPrompt};
pub use walker::walk;

/// Buffer size for the copy variant's bounded chunks.
pub const COPY_CHUNK_SIZE: usize = 16 * 1024;
