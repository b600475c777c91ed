//! A VT/xterm-compatible terminal emulator core.
//!
//! This crate owns the byte-stream state machine, screen/cursor/scroll-region
//! grid, selection engine, keyboard/mouse input encoders and the handful of
//! reply/query handlers a terminal emulator needs — the parts that are the
//! same whether the bytes came from a local PTY, a remote SSH session, or a
//! test fixture. Rendering, the PTY itself, and persistence are all left to
//! the embedder; see [`Emulator`] for the single entry point this crate
//! exposes.

pub mod attribute;
pub mod cell;
pub mod charset;
pub mod cursor;
pub mod decode;
pub mod driver;
pub mod error;
pub mod escape;
pub mod input;
pub mod mode;
pub mod options;
pub mod osc;
pub mod position;
pub mod reply;
pub mod screen;
pub mod selection;

pub use attribute::{Attr, Color};
pub use cell::Cell;
pub use cursor::Cursor;
pub use driver::{ClipboardTarget, DriverEvent, Emulator, FeedOutput};
pub use error::{EmulatorError, EngineResult};
pub use mode::{Mode, ModeRegister};
pub use options::Options;
pub use position::Position;
pub use screen::Screen;
pub use selection::{Selection, SelectionKind, SelectionMode};
