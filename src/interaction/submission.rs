use tracing::{error, info, instrument, warn};

use crate::{
    base::types::FormSubmissionEvent,
    service::{auth::AuthClient, delivery::DeliveryClient},
    wizard::{codec, error::WizardError, step::StepTable, submit},
};

use super::{RESTART_MESSAGE, WizardReply};

/// Handle the terminal form coming back: authorize, decode, assemble
/// the record, and make the single delivery attempt.
#[instrument(skip_all)]
pub async fn handle_submission(
    table: &StepTable,
    auth: &AuthClient,
    delivery: &DeliveryClient,
    event: FormSubmissionEvent,
) -> WizardReply {
    if let Err(reply) = super::authorize(auth, &event.submitter).await {
        warn!("Unauthorized submission from {}", event.submitter.id);
        return reply;
    }

    let state = match codec::decode(table, &event.token) {
        Ok(state) => state,
        Err(err) => {
            warn!("Undecodable submission token: {err}");
            return WizardReply::Rejected { message: RESTART_MESSAGE.to_string() };
        }
    };

    let record = match submit::assemble(table, &state, &event.field_values, &event.submitter) {
        Ok(record) => record,
        Err(WizardError::MissingField(field)) => {
            warn!("Submission missing field `{field}`");
            return WizardReply::Rejected { message: format!("The field `{field}` is required.") };
        }
        Err(err) => {
            // IncompleteWizard here means a forged or stale token; no
            // partial record is sent.
            warn!("Submission rejected: {err}");
            return WizardReply::Rejected { message: RESTART_MESSAGE.to_string() };
        }
    };

    match delivery.deliver(&record).await {
        Ok(()) => {
            info!("Submission delivered for {}", event.submitter.id);
            WizardReply::Submitted { record }
        }
        Err(err) => {
            error!("Delivery failed: {err}");
            WizardReply::SubmissionFailed {
                message: "Your log could not be submitted. Please contact an admin.".to_string(),
            }
        }
    }
}
