use thiserror::Error;

/// Everything that can go wrong inside the wizard core.
///
/// Each variant maps to one user-facing outcome: decode failures tell
/// the user to restart from the panel, transition and submission
/// failures name the local problem, and `EncodingOverflow` is a fatal
/// startup configuration error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WizardError {
    /// The token prefix is missing, the segment arity is wrong, or a
    /// recorded answer no longer matches the current step table.
    #[error("malformed wizard token: {0}")]
    MalformedToken(String),

    /// The token implies a step index past the end of the table.
    #[error("wizard token points at unknown step index {0}")]
    UnknownStep(usize),

    /// The chosen value is not an option of the current step, or the
    /// wizard already sits at the terminal step.
    #[error("invalid wizard transition: {0}")]
    InvalidTransition(String),

    /// A submission arrived for a wizard that never reached the
    /// terminal step; treated as a forged or stale token.
    #[error("wizard is not at the terminal step")]
    IncompleteWizard,

    /// A required form field was absent or blank.
    #[error("required form field `{0}` is missing or empty")]
    MissingField(String),

    /// The step table cannot be encoded within the token ceiling.
    /// Startup-only: the process must refuse to start.
    #[error("step table encodes to {worst} bytes, over the {limit}-byte token ceiling")]
    EncodingOverflow { worst: usize, limit: usize },

    /// The step table itself is inconsistent (duplicate values,
    /// delimiter in an id, bad `depends_on`, wrong step kinds).
    #[error("invalid step table: {0}")]
    InvalidTable(String),
}
