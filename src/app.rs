//! Application logic for filet.
//!
//! - [state]: [AppState], the controller that turns keys into transitions.
//! - [nav]: path, selection and viewport bookkeeping.
//! - [keymap]: the fixed key to [keymap::Action] table.

pub mod keymap;
pub mod nav;
pub mod state;

pub use nav::{Motion, NavState};
pub use state::{AppState, KeypressResult};
