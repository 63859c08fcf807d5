//! The step table: the static shape of the wizard.
//!
//! Loaded once from configuration at startup, validated, and shared
//! read-only by every concurrent wizard walk.

use serde::{Deserialize, Serialize};

use super::{
    codec::{DELIMITER, TOKEN_CEILING, TOKEN_PREFIX},
    error::WizardError,
};

/// Reserved option value: the user wants to describe the step in their
/// own words on the terminal form.
pub const OTHER_VALUE: &str = "OTHER";

/// Id of the extra form field injected when `OTHER` was chosen for a
/// step (e.g. `other_task_description`).
pub fn other_field_id(step_id: &str) -> String {
    format!("other_{step_id}_description")
}

/// What the user does at a step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepKind {
    /// Pick one value from a menu.
    Select,
    /// Fill in the terminal free-text form.
    FreeTextForm,
}

/// One choice in a select step's menu.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepOption {
    /// Stable value recorded in the wizard state and final record.
    pub value: String,
    /// Label shown in the menu.
    pub label: String,
    #[serde(default)]
    pub emoji: Option<String>,
    /// Display-tailoring only: when set, the option is offered only if
    /// the answer to the step's first `depends_on` step equals this
    /// value. Validation always uses the step's full option set.
    #[serde(default)]
    pub group: Option<String>,
}

/// Rendering style for a free-text field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldStyle {
    #[default]
    Short,
    Paragraph,
}

fn default_required() -> bool {
    true
}

/// One text input on the terminal form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormField {
    pub id: String,
    pub label: String,
    #[serde(default)]
    pub placeholder: Option<String>,
    /// Optional fields default to the `"None"` sentinel when absent.
    #[serde(default = "default_required")]
    pub required: bool,
    #[serde(default)]
    pub style: FieldStyle,
}

impl FormField {
    pub fn required(id: &str, label: &str, style: FieldStyle) -> Self {
        Self { id: id.to_string(), label: label.to_string(), placeholder: None, required: true, style }
    }

    pub fn optional(id: &str, label: &str, style: FieldStyle) -> Self {
        Self { required: false, ..Self::required(id, label, style) }
    }

    pub fn with_placeholder(mut self, placeholder: &str) -> Self {
        self.placeholder = Some(placeholder.to_string());
        self
    }
}

/// One step of the wizard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepDefinition {
    /// Stable identifier; doubles as the record key for the answer.
    pub id: String,
    pub kind: StepKind,
    /// Heading shown above the menu or as the form title.
    #[serde(default)]
    pub title: String,
    /// Menu placeholder text.
    #[serde(default)]
    pub placeholder: Option<String>,
    /// Choices (select steps only).
    #[serde(default)]
    pub options: Vec<StepOption>,
    /// Text inputs (the terminal form only).
    #[serde(default)]
    pub fields: Vec<FormField>,
    /// Earlier steps whose answers tailor this step's display.
    #[serde(default)]
    pub depends_on: Vec<String>,
}

impl StepDefinition {
    /// Whether `value` is one of this step's declared option values.
    pub fn has_option(&self, value: &str) -> bool {
        self.options.iter().any(|o| o.value == value)
    }
}

/// The validated, immutable ordered list of wizard steps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepTable {
    steps: Vec<StepDefinition>,
}

impl StepTable {
    /// Validate and freeze a step table. Any error here is fatal at
    /// startup: the process must refuse to start rather than hand out
    /// tokens it cannot decode later.
    pub fn new(steps: Vec<StepDefinition>) -> Result<Self, WizardError> {
        if steps.is_empty() {
            return Err(WizardError::InvalidTable("step table is empty".into()));
        }

        let terminal = steps.len() - 1;
        for (i, step) in steps.iter().enumerate() {
            if step.id.is_empty() {
                return Err(WizardError::InvalidTable(format!("step {i} has an empty id")));
            }
            if step.id.contains(DELIMITER) {
                return Err(WizardError::InvalidTable(format!(
                    "step id `{}` contains the token delimiter `{DELIMITER}`",
                    step.id
                )));
            }
            if steps[..i].iter().any(|prior| prior.id == step.id) {
                return Err(WizardError::InvalidTable(format!("duplicate step id `{}`", step.id)));
            }

            match step.kind {
                StepKind::Select => {
                    if i == terminal {
                        return Err(WizardError::InvalidTable(
                            "last step must be a free-text form".into(),
                        ));
                    }
                    if step.options.is_empty() {
                        return Err(WizardError::InvalidTable(format!(
                            "select step `{}` has no options",
                            step.id
                        )));
                    }
                    for (j, opt) in step.options.iter().enumerate() {
                        if opt.value.is_empty() || opt.value.contains(DELIMITER) {
                            return Err(WizardError::InvalidTable(format!(
                                "option value `{}` of step `{}` is empty or contains `{DELIMITER}`",
                                opt.value, step.id
                            )));
                        }
                        if step.options[..j].iter().any(|o| o.value == opt.value) {
                            return Err(WizardError::InvalidTable(format!(
                                "duplicate option value `{}` in step `{}`",
                                opt.value, step.id
                            )));
                        }
                    }
                }
                StepKind::FreeTextForm => {
                    if i != terminal {
                        return Err(WizardError::InvalidTable(format!(
                            "free-text form step `{}` must be the last step",
                            step.id
                        )));
                    }
                    for (j, field) in step.fields.iter().enumerate() {
                        if field.id.is_empty() {
                            return Err(WizardError::InvalidTable(format!(
                                "form step `{}` has a field with an empty id",
                                step.id
                            )));
                        }
                        if step.fields[..j].iter().any(|f| f.id == field.id) {
                            return Err(WizardError::InvalidTable(format!(
                                "duplicate field id `{}` in step `{}`",
                                field.id, step.id
                            )));
                        }
                    }
                }
            }

            for dep in &step.depends_on {
                if !steps[..i].iter().any(|prior| prior.id == *dep) {
                    return Err(WizardError::InvalidTable(format!(
                        "step `{}` depends on `{dep}`, which is not an earlier step",
                        step.id
                    )));
                }
            }
        }

        let table = Self { steps };
        table.check_token_ceiling()?;
        Ok(table)
    }

    /// Worst-case token for this table: every select step answered with
    /// its longest option value. Tokens beyond the ceiling would be
    /// truncated by the transport, so refuse the configuration.
    fn check_token_ceiling(&self) -> Result<(), WizardError> {
        let mut worst = TOKEN_PREFIX.len();
        for step in self.select_steps() {
            let longest = step.options.iter().map(|o| o.value.len()).max().unwrap_or(0);
            worst += 1 + step.id.len() + 1 + longest;
        }
        if worst > TOKEN_CEILING {
            return Err(WizardError::EncodingOverflow { worst, limit: TOKEN_CEILING });
        }
        Ok(())
    }

    pub fn steps(&self) -> &[StepDefinition] {
        &self.steps
    }

    pub fn step(&self, index: usize) -> Option<&StepDefinition> {
        self.steps.get(index)
    }

    pub fn step_by_id(&self, id: &str) -> Option<&StepDefinition> {
        self.steps.iter().find(|s| s.id == id)
    }

    /// Index of the terminal free-text form step.
    pub fn terminal_index(&self) -> usize {
        self.steps.len() - 1
    }

    pub fn terminal_step(&self) -> &StepDefinition {
        &self.steps[self.terminal_index()]
    }

    pub fn select_steps(&self) -> impl Iterator<Item = &StepDefinition> {
        self.steps.iter().filter(|s| s.kind == StepKind::Select)
    }
}
