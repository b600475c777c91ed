use thiserror::Error;

/// Errors that can occur constructing or driving an [`crate::Emulator`].
///
/// The hot dispatch path (escape/CSI/OSC handling) never returns this type —
/// per the design notes, unknown or malformed sequences are logged and
/// dropped, not propagated as errors. This enum only covers the handful of
/// genuinely fallible boundary operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EmulatorError {
    #[error("screen dimensions must be non-zero (got {cols}x{rows})")]
    InvalidSize { cols: i32, rows: i32 },

    #[error("scroll region out of range: top={top} bot={bot} rows={rows}")]
    InvalidScrollRegion { top: i32, bot: i32, rows: i32 },

    #[error("invalid base64 payload in OSC 52 sequence")]
    InvalidBase64,

    #[error("{0}")]
    Other(String),
}

pub type EngineResult<T> = Result<T, EmulatorError>;
