use crossterm::event::KeyEvent;

use crate::http::{FetchError, RequestResult};

/// Everything the event loop reacts to. Each variant is handled by exactly
/// one branch of [`crate::app::App::update`].
#[derive(Debug)]
pub enum Msg {
    Resize { width: u16, height: u16 },
    Key(KeyEvent),
    RequestSucceeded(RequestResult),
    RequestFailed(FetchError),
}

/// Deferred work requested by an update. `Fetch` produces a future `Msg`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Quit,
    Suspend,
    Fetch(String),
}
