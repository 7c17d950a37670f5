/// Crate-level error types for blogport diagnostics.
use std::path::PathBuf;

/// All errors in blogport carry enough context to produce a useful diagnostic
/// without a debugger. Each variant names the file, command, or reason for failure.
#[allow(clippy::error_impl_error, reason = "crate-internal error type in binary")]
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// An external collaborator command ran but did not succeed.
    #[error("`{command}` failed: {reason}")]
    CommandFailed {
        /// Program name of the external command.
        command: String,
        /// Exit status and stderr, or the spawn error.
        reason: String,
    },

    /// An external collaborator command did not finish in time.
    #[error("`{command}` timed out after {timeout_secs}s")]
    CommandTimedOut {
        /// Program name of the external command.
        command: String,
        /// Configured timeout in seconds.
        timeout_secs: u64,
    },

    /// Diagram rendering is disabled in the configuration.
    #[error("diagram rendering is disabled")]
    DiagramUnavailable,

    /// An input markdown file does not exist on disk.
    #[error("file not found: {}", path.display())]
    FileNotFound {
        /// Path to the missing file.
        path: PathBuf,
    },

    /// Underlying I/O error from the filesystem.
    #[error("io: {0}")]
    Io(
        /// The wrapped I/O error.
        #[from]
        std::io::Error,
    ),

    /// JSON (de)serialization failed.
    #[error("json: {0}")]
    Json(
        /// The wrapped JSON error.
        #[from]
        serde_json::Error,
    ),

    /// SVG rasterization is disabled in the configuration.
    #[error("rasterizer is disabled")]
    RasterizerUnavailable,

    /// Deep-analysis suggestions could not be read as JSON.
    #[error("suggestions unreadable: {reason}")]
    SuggestionsUnreadable {
        /// Why no JSON could be extracted.
        reason: String,
    },

    /// TOML deserialization failed.
    #[error("toml deserialize: {0}")]
    TomlDe(
        /// The wrapped TOML deserialization error.
        #[from]
        toml::de::Error,
    ),

    /// The filesystem watcher could not be set up.
    #[error("watcher failed: {reason}")]
    WatcherFailed {
        /// Description of the watcher failure.
        reason: String,
    },
}
