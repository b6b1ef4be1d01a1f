use thiserror::Error;

pub type Result<T> = std::result::Result<T, TermError>;

/// Faults coming out of the terminal layer. They are fatal to a session.
#[derive(Error, Debug)]
pub enum TermError {
    #[error("terminal I/O failed")]
    Io(#[from] std::io::Error),
    #[error("stdout is not an interactive terminal")]
    NotInteractive,
    #[error("terminal is {actual:?} but the game needs at least {needed:?}")]
    TooSmall { needed: (u16, u16), actual: (u16, u16) },
}
