use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, Error>;

/// Failures that abort an extraction run before any layout happens.
///
/// Per-file problems are not represented here: unreadable or malformed source files are skipped
/// by the scanner and only logged.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Directory '{}' does not exist", path.display())]
    RootNotFound { path: PathBuf },

    #[error("'{}' is not a directory", path.display())]
    RootNotDirectory { path: PathBuf },

    #[error("Directory '{}' is not readable: {source}", path.display())]
    RootUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("'{}' is not a project root (missing `{marker}`)", path.display())]
    NotAProject { path: PathBuf, marker: String },
}
