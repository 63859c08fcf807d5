//! Token codec: the wizard's only "storage".
//!
//! The platform gives the bot no session store, so the accumulated
//! answers are serialized into the interaction component's custom id
//! and decoded back on the next event. The format is an explicit
//! contract, not ad hoc string splitting: a fixed prefix, then each
//! `(step_id, value)` pair in step order, all joined with [`DELIMITER`].
//! Decode re-validates every recorded answer against the *current*
//! step table; the configuration may have changed between token
//! issuance and redemption across a restart.

use super::{
    error::WizardError,
    step::{StepKind, StepTable},
};

/// Namespace prefix distinguishing wizard tokens from other components.
pub const TOKEN_PREFIX: &str = "wiz";

/// Joins the prefix and the `(step_id, value)` pairs. Must not appear
/// in any step id or option value; the step table enforces that at
/// startup.
pub const DELIMITER: char = '.';

/// Design ceiling on encoded tokens, in bytes. Discord caps component
/// custom ids at 100 bytes; staying at 100 here leaves no silent
/// truncation path because the table is rejected at startup otherwise.
pub const TOKEN_CEILING: usize = 100;

/// One completed step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Answer {
    pub step_id: String,
    pub value: String,
}

/// A user's in-progress wizard walk, reconstructed fresh on every
/// event. `answers` is in step order; the current step index is always
/// `answers.len()`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WizardState {
    pub answers: Vec<Answer>,
}

impl WizardState {
    /// The empty walk: the user is at the first step.
    pub fn start() -> Self {
        Self::default()
    }

    pub fn current_step_index(&self) -> usize {
        self.answers.len()
    }

    /// The recorded answer for a step, if that step was completed.
    pub fn answer(&self, step_id: &str) -> Option<&str> {
        self.answers.iter().find(|a| a.step_id == step_id).map(|a| a.value.as_str())
    }

    /// A copy of this state with one more completed step.
    pub fn extended(&self, step_id: &str, value: &str) -> Self {
        let mut answers = self.answers.clone();
        answers.push(Answer { step_id: step_id.to_string(), value: value.to_string() });
        Self { answers }
    }
}

/// Serialize a state into its opaque token.
pub fn encode(state: &WizardState) -> Result<String, WizardError> {
    let mut token = String::from(TOKEN_PREFIX);
    for answer in &state.answers {
        token.push(DELIMITER);
        token.push_str(&answer.step_id);
        token.push(DELIMITER);
        token.push_str(&answer.value);
    }

    if token.len() > TOKEN_CEILING {
        return Err(WizardError::EncodingOverflow { worst: token.len(), limit: TOKEN_CEILING });
    }

    Ok(token)
}

/// Parse and validate a received token against the current step table.
pub fn decode(table: &StepTable, token: &str) -> Result<WizardState, WizardError> {
    let mut segments = token.split(DELIMITER);

    if segments.next() != Some(TOKEN_PREFIX) {
        return Err(WizardError::MalformedToken("missing namespace prefix".into()));
    }

    let rest: Vec<&str> = segments.collect();
    if rest.len() % 2 != 0 {
        return Err(WizardError::MalformedToken(format!(
            "expected (step, value) pairs, got {} segments",
            rest.len()
        )));
    }

    let implied_index = rest.len() / 2;
    if implied_index > table.terminal_index() {
        return Err(WizardError::UnknownStep(implied_index));
    }

    let mut state = WizardState::start();
    for (i, pair) in rest.chunks(2).enumerate() {
        let (step_id, value) = (pair[0], pair[1]);
        let step = table.step(i).expect("index bounded by terminal check");

        if step.id != step_id {
            return Err(WizardError::MalformedToken(format!(
                "position {i} names step `{step_id}`, expected `{}`",
                step.id
            )));
        }
        if step.kind != StepKind::Select {
            return Err(WizardError::MalformedToken(format!(
                "step `{step_id}` does not take a recorded answer"
            )));
        }
        if !step.has_option(value) {
            return Err(WizardError::MalformedToken(format!(
                "`{value}` is not an option of step `{step_id}`"
            )));
        }

        state = state.extended(step_id, value);
    }

    Ok(state)
}
