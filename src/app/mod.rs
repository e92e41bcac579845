//! Application state and logic

mod event;
mod handlers;
mod state;

pub use event::{Background, Event, Handler};
pub use handlers::Actions;
pub use state::{App, ConfirmAction, Mode, StepState, SyncProgress};
