//! Error types for playdeck-caps.

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while brokering capability requests.
///
/// A denied capability is never an error; denial is an ordinary outcome
/// carried by [`Capability::granted`](crate::Capability).
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A request operation was called with an empty name sequence.
    #[error("capability request requires at least one capability name")]
    EmptyRequest,

    /// The platform reported an outcome for a capability with no pending
    /// request. The broker's and platform's views of in-flight prompts have
    /// desynchronized; no recovery is attempted.
    #[error("platform reported a result for untracked capability: {name}")]
    UnexpectedResult { name: String },

    /// A completion callback's parallel name and grant arrays differ in
    /// length, so the pairs cannot be trusted.
    #[error("mismatched completion batch: {names} names, {grants} grants")]
    MismatchedCompletion { names: usize, grants: usize },

    /// A pending capability channel closed without ever publishing a value.
    #[error("prompt abandoned for capability: {name}")]
    PromptAbandoned { name: String },
}

impl Error {
    /// Create an unexpected result error.
    pub fn unexpected_result(name: impl Into<String>) -> Self {
        Self::UnexpectedResult { name: name.into() }
    }

    /// Create a prompt abandoned error.
    pub fn prompt_abandoned(name: impl Into<String>) -> Self {
        Self::PromptAbandoned { name: name.into() }
    }
}
