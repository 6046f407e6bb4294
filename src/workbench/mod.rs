//! Orchestration of a preview session: actions and host events in, effects out.

mod action;
mod effect;
mod frame;
mod reducer;

pub use action::Action;
pub use effect::{Effect, Notice, NoticeLevel};
pub use frame::{frame_key, FrameView};
pub use reducer::{Workbench, WorkbenchError};
