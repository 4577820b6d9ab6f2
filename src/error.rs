use std::io;

use thiserror::Error;

/// Fatal before the loop starts: there is nothing to draw into.
#[derive(Debug, Error)]
pub enum SurfaceError {
    #[error("stdout is not a terminal; parasys needs an interactive terminal to draw into")]
    NotATerminal,
    #[error("could not take control of the terminal: {0}")]
    Unavailable(#[source] io::Error),
}
