use std::path::PathBuf;

/// Convenience result type used across versereel.
pub type ReelResult<T> = Result<T, ReelError>;

/// Top-level error taxonomy used by engine APIs.
#[derive(thiserror::Error, Debug)]
pub enum ReelError {
    /// Structurally invalid caller input (count mismatches, empty text, empty clip lists).
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A referenced file does not exist or cannot be read.
    #[error("{what} not found: '{}'", path.display())]
    ResourceNotFound {
        /// What the file was expected to be, e.g. `audio for stanza 2`.
        what: String,
        /// The path that failed to resolve.
        path: PathBuf,
    },

    /// Every font candidate failed to load.
    ///
    /// Caption rendering absorbs this and falls back to the built-in glyph renderer.
    #[error("font resolution exhausted: {0}")]
    FontResolutionExhausted(String),

    /// The encoding sink rejected the timeline or failed while writing it.
    #[error("encoding failed: {0}")]
    EncodingFailed(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ReelError {
    /// Build a [`ReelError::InvalidInput`] value.
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Build a [`ReelError::ResourceNotFound`] value.
    pub fn resource_not_found(what: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self::ResourceNotFound {
            what: what.into(),
            path: path.into(),
        }
    }

    /// Build a [`ReelError::FontResolutionExhausted`] value.
    pub fn font_exhausted(msg: impl Into<String>) -> Self {
        Self::FontResolutionExhausted(msg.into())
    }

    /// Build a [`ReelError::EncodingFailed`] value.
    pub fn encoding(msg: impl Into<String>) -> Self {
        Self::EncodingFailed(msg.into())
    }

    /// Re-tag any non-input failure raised while talking to a sink as [`ReelError::EncodingFailed`].
    pub(crate) fn into_encoding(self) -> Self {
        match self {
            Self::InvalidInput(_) | Self::EncodingFailed(_) => self,
            other => Self::EncodingFailed(other.to_string()),
        }
    }

    /// Attach a 1-based stanza number to the error's message, keeping its kind.
    pub(crate) fn for_stanza(self, number: usize) -> Self {
        match self {
            Self::InvalidInput(msg) => Self::InvalidInput(format!("stanza {number}: {msg}")),
            Self::EncodingFailed(msg) => Self::EncodingFailed(format!("stanza {number}: {msg}")),
            Self::Other(e) => Self::Other(e.context(format!("stanza {number}"))),
            other => other,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
