//! The transition function: pure, no I/O.
//!
//! Progression is strictly linear; the next step is always the one
//! after the current index, with no branching on answer content.

use super::{
    codec::{self, WizardState},
    error::WizardError,
    step::{FormField, StepDefinition, StepKind, StepTable, OTHER_VALUE, other_field_id},
};

/// What the presentation layer should do after a validated choice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NextAction {
    /// The wizard continues: render the next menu, carrying `token`.
    ShowSelectStep {
        step: StepDefinition,
        state: WizardState,
        token: String,
    },
    /// The terminal step was reached: render the free-text form.
    /// `fields` already includes the extra description inputs injected
    /// for any `OTHER` answers.
    ShowFreeTextForm {
        step: StepDefinition,
        fields: Vec<FormField>,
        state: WizardState,
        token: String,
    },
}

/// Validate `chosen` against the current step and advance one step.
pub fn advance(
    table: &StepTable,
    state: &WizardState,
    chosen: &str,
) -> Result<NextAction, WizardError> {
    let index = state.current_step_index();
    if index >= table.terminal_index() {
        return Err(WizardError::InvalidTransition("the wizard is already complete".into()));
    }

    let current = table.step(index).expect("index below terminal");
    if !current.has_option(chosen) {
        return Err(WizardError::InvalidTransition(format!(
            "`{chosen}` is not an option of step `{}`",
            current.id
        )));
    }

    let state = state.extended(&current.id, chosen);
    let token = codec::encode(&state)?;

    let next = table.step(index + 1).expect("terminal step exists").clone();
    match next.kind {
        StepKind::Select => Ok(NextAction::ShowSelectStep { step: next, state, token }),
        StepKind::FreeTextForm => {
            let fields = form_fields(table, &state, &next);
            Ok(NextAction::ShowFreeTextForm { step: next, fields, state, token })
        }
    }
}

/// The terminal form's fields for a given walk: one extra required
/// description input per `OTHER` answer (in step order), then the
/// form's declared fields.
pub fn form_fields(table: &StepTable, state: &WizardState, form: &StepDefinition) -> Vec<FormField> {
    let mut fields = Vec::new();

    for answer in &state.answers {
        if answer.value != OTHER_VALUE {
            continue;
        }
        let title = table
            .step_by_id(&answer.step_id)
            .map(|s| s.title.as_str())
            .unwrap_or(answer.step_id.as_str());
        fields.push(
            FormField::required(
                &other_field_id(&answer.step_id),
                &format!("Describe the custom {}", title.to_lowercase()),
                super::step::FieldStyle::Short,
            )
            .with_placeholder("e.g., Coordinated with a partner server"),
        );
    }

    fields.extend(form.fields.iter().cloned());
    fields
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::base::defaults;

    fn table() -> StepTable {
        StepTable::new(defaults::default_steps()).unwrap()
    }

    #[test]
    fn advance_only_ever_moves_one_step_forward() {
        let table = table();
        let start = WizardState::start();

        let action = advance(&table, &start, "MOD").unwrap();
        let NextAction::ShowSelectStep { step, state, .. } = action else {
            panic!("expected a select step");
        };
        assert_eq!(step.id, "task");
        assert_eq!(state.current_step_index(), 1);

        let action = advance(&table, &state, "USER_WARN").unwrap();
        let NextAction::ShowFreeTextForm { state, .. } = action else {
            panic!("expected the terminal form");
        };
        assert_eq!(state.current_step_index(), 2);
    }

    /// `advance` succeeds iff the value is in the current step's
    /// declared option set.
    #[test]
    fn option_containment() {
        let table = table();
        let start = WizardState::start();

        for step in table.select_steps() {
            let mut state = WizardState::start();
            for prior in table.steps() {
                if prior.id == step.id {
                    break;
                }
                state = state.extended(&prior.id, &prior.options[0].value);
            }

            for opt in &step.options {
                assert!(advance(&table, &state, &opt.value).is_ok());
            }
            assert!(matches!(
                advance(&table, &state, "NOT_AN_OPTION"),
                Err(WizardError::InvalidTransition(_))
            ));
        }

        // A task value is not valid while the department step is current.
        assert!(advance(&table, &start, "USER_WARN").is_err());
    }

    #[test]
    fn rejects_advancing_a_complete_wizard() {
        let table = table();
        let done = WizardState::start().extended("department", "MOD").extended("task", "USER_WARN");
        assert!(matches!(
            advance(&table, &done, "anything"),
            Err(WizardError::InvalidTransition(_))
        ));
    }

    #[test]
    fn token_of_next_menu_carries_the_extended_state() {
        let table = table();
        let action = advance(&table, &WizardState::start(), "AUTO").unwrap();
        let NextAction::ShowSelectStep { token, state, .. } = action else {
            panic!("expected a select step");
        };
        assert_eq!(token, "wiz.department.AUTO");
        assert_eq!(crate::wizard::codec::decode(&table, &token).unwrap(), state);
    }

    #[test]
    fn other_answer_injects_a_description_field() {
        let table = table();
        let mid = WizardState::start().extended("department", "MOD");
        let action = advance(&table, &mid, "OTHER").unwrap();
        let NextAction::ShowFreeTextForm { fields, .. } = action else {
            panic!("expected the terminal form");
        };

        assert_eq!(fields[0].id, "other_task_description");
        assert!(fields[0].required);
        assert!(fields.iter().any(|f| f.id == "summary"));
    }

    #[test]
    fn plain_answers_inject_nothing() {
        let table = table();
        let mid = WizardState::start().extended("department", "MOD");
        let action = advance(&table, &mid, "USER_BAN").unwrap();
        let NextAction::ShowFreeTextForm { fields, .. } = action else {
            panic!("expected the terminal form");
        };
        assert_eq!(fields.len(), table.terminal_step().fields.len());
    }
}
