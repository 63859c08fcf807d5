//! Common result aliases and cross-layer event types.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// The crate-wide error type.
pub type Err = anyhow::Error;
/// The crate-wide result type.
pub type Res<T> = Result<T, Err>;
/// A result carrying no value on success.
pub type Void = Res<()>;

/// Identity of the staff member driving a wizard interaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitterIdentity {
    /// Platform user id (e.g., the Discord snowflake as a string).
    pub id: String,
    /// Human-readable tag (e.g., `user#1234` or the handle).
    pub tag: String,
    /// Role ids held by the user, used for the allow-list check.
    pub role_ids: Vec<String>,
}

/// A menu choice arriving from the presentation layer.
#[derive(Debug, Clone)]
pub struct SelectionEvent {
    /// Opaque wizard token carried by the interaction component.
    pub token: String,
    /// The option value the user picked.
    pub chosen_value: String,
    /// Identity of the user who made the selection.
    pub submitter: SubmitterIdentity,
}

/// A completed free-text form arriving from the presentation layer.
#[derive(Debug, Clone)]
pub struct FormSubmissionEvent {
    /// Opaque wizard token carried by the form's custom id.
    pub token: String,
    /// Field id to submitted text, as entered by the user.
    pub field_values: HashMap<String, String>,
    /// Identity of the user who submitted the form.
    pub submitter: SubmitterIdentity,
}
