use thiserror::Error;

/// Why a file name could not be decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ParseError {
    /// A season batch: the season has concluded and no per-episode file exists.
    #[error("batch release, the season has concluded")]
    BatchRelease,

    /// The release group's naming convention is not supported.
    #[error("unrecognized file name format")]
    UnrecognizedFormat,
}
