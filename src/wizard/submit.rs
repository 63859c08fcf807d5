//! Assembly of the final outbound record.
//!
//! Once the terminal form comes back, the accumulated wizard answers
//! and the form's text fields are flattened into a single string map
//! and handed to the delivery collaborator. The record is built once
//! and never retained after the delivery attempt.

use std::collections::{BTreeMap, HashMap};

use serde::Serialize;

use crate::base::types::SubmitterIdentity;

use super::{
    codec::WizardState,
    error::WizardError,
    step::{OTHER_VALUE, StepTable, other_field_id},
};

/// Sentinel recorded for optional form fields the user left blank.
pub const OPTIONAL_FIELD_SENTINEL: &str = "None";

/// Fixed tag recorded under `submitted_via`.
pub const SUBMISSION_METHOD: &str = "wizard";

/// The flattened submission: one entry per wizard answer (keyed by
/// step id), one per form field, plus submitter and timestamp
/// metadata. Serializes to a flat JSON object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct SubmissionRecord {
    fields: BTreeMap<String, String>,
}

impl SubmissionRecord {
    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields.get(key).map(String::as_str)
    }

    pub fn fields(&self) -> &BTreeMap<String, String> {
        &self.fields
    }
}

/// Merge the wizard answers with the submitted form fields.
///
/// The state must sit exactly at the terminal step; anything else is a
/// forged or stale token. Required fields must be present and
/// non-blank. An `OTHER` answer is replaced by the user-supplied
/// description from its injected form field.
pub fn assemble(
    table: &StepTable,
    state: &WizardState,
    form_values: &HashMap<String, String>,
    submitter: &SubmitterIdentity,
) -> Result<SubmissionRecord, WizardError> {
    if state.current_step_index() != table.terminal_index() {
        return Err(WizardError::IncompleteWizard);
    }

    let mut fields = BTreeMap::new();

    for answer in &state.answers {
        let value = if answer.value == OTHER_VALUE {
            let field = other_field_id(&answer.step_id);
            required_value(form_values, &field)?
        } else {
            answer.value.clone()
        };
        fields.insert(answer.step_id.clone(), value);
    }

    for field in &table.terminal_step().fields {
        let value = if field.required {
            required_value(form_values, &field.id)?
        } else {
            match form_values.get(&field.id).map(|v| v.trim()) {
                Some(v) if !v.is_empty() => v.to_string(),
                _ => OPTIONAL_FIELD_SENTINEL.to_string(),
            }
        };
        fields.insert(field.id.clone(), value);
    }

    fields.insert("staff".to_string(), submitter.id.clone());
    fields.insert("staff_tag".to_string(), submitter.tag.clone());
    fields.insert("submitted_at".to_string(), chrono::Utc::now().to_rfc3339());
    fields.insert("submitted_via".to_string(), SUBMISSION_METHOD.to_string());

    Ok(SubmissionRecord { fields })
}

fn required_value(form_values: &HashMap<String, String>, field: &str) -> Result<String, WizardError> {
    match form_values.get(field).map(|v| v.trim()) {
        Some(v) if !v.is_empty() => Ok(v.to_string()),
        _ => Err(WizardError::MissingField(field.to_string())),
    }
}
