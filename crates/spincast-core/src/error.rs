// Error types shared by the spin engine and its collaborators.

use thiserror::Error;

/// Reasons a spin or pool operation was rejected.
///
/// Every variant describes a strict no-op: the engine state is unchanged
/// when one of these is returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SpinError {
    #[error("the pool is empty")]
    EmptyPool,

    #[error("a spin is already in progress")]
    AlreadySpinning,

    #[error("index {index} is out of range for a pool of {len} items")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("invalid revolution range {min}..={max}: need 1 <= min <= max")]
    InvalidRevolutions { min: u32, max: u32 },
}

/// Failures reported by a speech backend.
///
/// These are logged and otherwise ignored; a spin's effects never depend on
/// whether its announcement was heard.
#[derive(Debug, Error)]
pub enum SpeechError {
    #[error("no speech synthesizer available")]
    BackendUnavailable,

    #[error("failed to start `{command}`: {source}")]
    SpawnFailed {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("i/o error talking to `{command}`: {source}")]
    Io {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("`{command}` exited unsuccessfully: {stderr}")]
    ProcessFailed { command: String, stderr: String },
}
