use tracing::{info, instrument, warn};

use crate::{
    base::types::SelectionEvent,
    service::auth::AuthClient,
    wizard::{
        codec,
        engine::{self, NextAction},
        error::WizardError,
        step::StepTable,
    },
};

use super::{RESTART_MESSAGE, WizardReply};

/// Handle one menu choice: authorize, decode, advance, and describe
/// the next screen.
#[instrument(skip_all, fields(chosen = %event.chosen_value))]
pub async fn handle_selection(table: &StepTable, auth: &AuthClient, event: SelectionEvent) -> WizardReply {
    // The allow-list gate happens before any decode work.
    if let Err(reply) = super::authorize(auth, &event.submitter).await {
        warn!("Unauthorized selection from {}", event.submitter.id);
        return reply;
    }

    let state = match codec::decode(table, &event.token) {
        Ok(state) => state,
        Err(err) => {
            warn!("Undecodable selection token: {err}");
            return WizardReply::Rejected { message: RESTART_MESSAGE.to_string() };
        }
    };

    match engine::advance(table, &state, &event.chosen_value) {
        Ok(NextAction::ShowSelectStep { step, state, token }) => {
            info!("Advanced to select step `{}`", step.id);
            WizardReply::SelectMenu { step, state, token }
        }
        Ok(NextAction::ShowFreeTextForm { step, fields, token, .. }) => {
            info!("Reached the terminal form");
            WizardReply::Form { step, fields, token }
        }
        Err(WizardError::InvalidTransition(reason)) => {
            warn!("Invalid transition: {reason}");
            WizardReply::Rejected { message: "That is not a valid choice here. Please restart from the panel.".to_string() }
        }
        Err(err) => {
            warn!("Selection failed: {err}");
            WizardReply::Rejected { message: RESTART_MESSAGE.to_string() }
        }
    }
}
