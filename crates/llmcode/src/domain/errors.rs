//! Domain-specific errors.

use std::io;

use thiserror::Error;

/// Failures surfaced by the context collector.
///
/// Only these two cases abort a collection run; anything that goes wrong with
/// an individual file during directory traversal is absorbed there.
#[derive(Debug, Error)]
pub enum CollectError {
    /// The supplied path could not be resolved to an existing filesystem
    /// object.
    #[error("cannot resolve '{path}': {source}")]
    PathResolution {
        path: String,
        #[source]
        source: io::Error,
    },

    /// A directly targeted file could not be opened or decoded as UTF-8.
    /// Other layers match on this exact message; keep it verbatim.
    #[error("Cannot read file: binary or unreadable")]
    UnreadableFile,
}
