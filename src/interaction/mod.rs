//! Event handling for wizard interactions.
//!
//! Each inbound event is processed independently: authorize, decode
//! the token, advance or assemble, and hand a [`WizardReply`] back to
//! the presentation layer. The handlers own the error-to-user-message
//! mapping; no wizard error ever crashes the process.

pub mod selection;
pub mod submission;

use crate::{
    base::types::SubmitterIdentity,
    service::auth::AuthClient,
    wizard::{
        codec::WizardState,
        step::{FormField, StepDefinition},
        submit::SubmissionRecord,
    },
};

/// What the presentation layer should render after an event. Visual
/// representation (embeds, colors, ephemerality) is entirely the
/// renderer's business; this only carries the data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WizardReply {
    /// Render the next menu; its component carries `token`.
    SelectMenu {
        step: StepDefinition,
        /// Answers so far, for display tailoring (e.g. filtering the
        /// task menu to the chosen department).
        state: WizardState,
        token: String,
    },
    /// Render the terminal free-text form; its custom id carries `token`.
    Form {
        step: StepDefinition,
        fields: Vec<FormField>,
        token: String,
    },
    /// The event was rejected; show `message` to the user and change
    /// nothing.
    Rejected { message: String },
    /// The submission was delivered.
    Submitted { record: SubmissionRecord },
    /// Assembly succeeded but delivery failed; nothing was retried.
    SubmissionFailed { message: String },
}

/// Generic "please restart" wording for undecodable tokens; stale and
/// tampered tokens get the same answer on purpose.
pub(crate) const RESTART_MESSAGE: &str =
    "This menu has expired or is invalid. Please restart from the panel.";

pub(crate) const UNAUTHORIZED_MESSAGE: &str = "You do not have permission to use this.";

/// The allow-list gate shared by every interaction path, including the
/// panel buttons. Runs before any decode or panel work; a `false` from
/// the auth client rejects the whole event.
pub async fn authorize(auth: &AuthClient, submitter: &SubmitterIdentity) -> Result<(), WizardReply> {
    if auth.is_authorized(submitter).await {
        Ok(())
    } else {
        Err(WizardReply::Rejected { message: UNAUTHORIZED_MESSAGE.to_string() })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;

    use super::*;
    use crate::service::auth::GenericAuthClient;

    struct Fixed(bool);

    #[async_trait]
    impl GenericAuthClient for Fixed {
        async fn is_authorized(&self, _submitter: &SubmitterIdentity) -> bool {
            self.0
        }
    }

    fn submitter() -> SubmitterIdentity {
        SubmitterIdentity {
            id: "1".to_string(),
            tag: "user#0001".to_string(),
            role_ids: vec![],
        }
    }

    #[tokio::test]
    async fn gate_passes_an_authorized_user() {
        let auth = AuthClient::new(Arc::new(Fixed(true)));
        assert!(authorize(&auth, &submitter()).await.is_ok());
    }

    /// The gate is what stands between an unauthorized user and every
    /// wizard path, the panel refresh button included.
    #[tokio::test]
    async fn gate_rejects_an_unauthorized_user() {
        let auth = AuthClient::new(Arc::new(Fixed(false)));
        let Err(WizardReply::Rejected { message }) = authorize(&auth, &submitter()).await else {
            panic!("expected a rejection");
        };
        assert_eq!(message, UNAUTHORIZED_MESSAGE);
    }
}
