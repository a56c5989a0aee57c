use thiserror::Error;

/// Fatal per-request failures. Order-not-found is deliberately absent: it
/// degrades to a fixed reply instead of an error, and formatter-level field
/// gaps are absorbed by the optional-field order model.
#[derive(Debug, Error)]
pub enum HandlerError {
    /// The request body carried no usable message.
    #[error("{0}")]
    Input(String),
    /// A collaborator call failed. Single attempt, never retried here;
    /// the collaborator's own detail is propagated for the error response.
    #[error("{collaborator} request failed: {source}")]
    Collaborator {
        collaborator: &'static str,
        #[source]
        source: anyhow::Error,
    },
}

impl HandlerError {
    pub fn input(detail: impl Into<String>) -> Self {
        Self::Input(detail.into())
    }

    pub fn collaborator(collaborator: &'static str, source: anyhow::Error) -> Self {
        Self::Collaborator { collaborator, source }
    }
}
