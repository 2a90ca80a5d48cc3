mod action;
mod menu;
mod message;
mod runtime;
mod state;

pub use action::Action;
pub use menu::MenuState;
pub use runtime::Runtime;
pub use state::{AppMode, AppState, ScanSession, Settings};
