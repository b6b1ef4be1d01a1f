//! Snake in the terminal.
//!
//! The simulation ([`snake`], [`game`]) only talks to the screen and keyboard
//! through the [`term::Terminal`] trait; [`term::CrosstermTerminal`] is the
//! real backend.

pub mod config;
pub mod direction;
pub mod error;
pub mod game;
pub mod geometry;
pub mod glyph;
pub mod logging;
pub mod snake;
pub mod term;
