#![cfg(test)]

use std::sync::Arc;

use async_trait::async_trait;
use mockall::mock;
use opslog_bot::{
    base::{
        config::{Config, ConfigInner},
        defaults,
        types::{FormSubmissionEvent, SelectionEvent, SubmitterIdentity},
    },
    interaction::{selection, submission, WizardReply},
    runtime::Runtime,
    service::{
        auth::{AuthClient, GenericAuthClient},
        delivery::{DeliveryClient, DeliveryError, GenericDeliveryClient},
    },
    wizard::{step::StepTable, submit::SubmissionRecord},
};

// Mocks.

mock! {
    pub Auth {}

    #[async_trait]
    impl GenericAuthClient for Auth {
        async fn is_authorized(&self, submitter: &SubmitterIdentity) -> bool;
    }
}

mock! {
    pub Delivery {}

    #[async_trait]
    impl GenericDeliveryClient for Delivery {
        async fn deliver(&self, record: &SubmissionRecord) -> Result<(), DeliveryError>;
    }
}

fn allow_all() -> AuthClient {
    let mut mock = MockAuth::new();
    mock.expect_is_authorized().returning(|_| true);
    AuthClient::new(Arc::new(mock))
}

// Helpers.

fn table() -> StepTable {
    StepTable::new(defaults::default_steps()).expect("default table is valid")
}

fn staffer() -> SubmitterIdentity {
    SubmitterIdentity {
        id: "555000111".to_string(),
        tag: "staffer#0001".to_string(),
        role_ids: vec!["42".to_string()],
    }
}

fn select_event(token: &str, chosen: &str) -> SelectionEvent {
    SelectionEvent { token: token.to_string(), chosen_value: chosen.to_string(), submitter: staffer() }
}

fn form_submission(token: &str, values: &[(&str, &str)]) -> FormSubmissionEvent {
    FormSubmissionEvent {
        token: token.to_string(),
        field_values: values.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect(),
        submitter: staffer(),
    }
}

// Tests.

/// Walk the full wizard: department, task, then the details form, and
/// check the delivered record field by field.
#[tokio::test]
async fn test_full_wizard_walk_integration() {
    let table = table();
    let auth = allow_all();

    // Step 1: department.
    let reply = selection::handle_selection(&table, &auth, select_event("wiz", "MOD")).await;
    let WizardReply::SelectMenu { step, token, .. } = reply else {
        panic!("expected the task menu, got {reply:?}");
    };
    assert_eq!(step.id, "task");
    assert_eq!(token, "wiz.department.MOD");

    // Step 2: task; the terminal form comes back with the full token.
    let reply = selection::handle_selection(&table, &auth, select_event(&token, "USER_WARN")).await;
    let WizardReply::Form { fields, token, .. } = reply else {
        panic!("expected the details form, got {reply:?}");
    };
    assert_eq!(token, "wiz.department.MOD.task.USER_WARN");
    assert!(fields.iter().any(|f| f.id == "summary"));

    // Step 3: the form submission is delivered with the merged record.
    let mut mock = MockDelivery::new();
    mock.expect_deliver()
        .withf(|record| {
            record.get("department") == Some("MOD")
                && record.get("task") == Some("USER_WARN")
                && record.get("summary") == Some("spammed links")
                && record.get("impact_level") == Some("High")
                && record.get("reference_link") == Some("None")
                && record.get("staff") == Some("555000111")
                && record.get("submitted_at").is_some()
        })
        .times(1)
        .returning(|_| Ok(()));
    let delivery = DeliveryClient::new(Arc::new(mock));

    let reply = submission::handle_submission(
        &table,
        &auth,
        &delivery,
        form_submission(&token, &[("summary", "spammed links"), ("impact_level", "High")]),
    )
    .await;

    assert!(matches!(reply, WizardReply::Submitted { .. }));
}

/// Choosing `OTHER` for the task injects a description field, and the
/// submitted description replaces `OTHER` in the final record.
#[tokio::test]
async fn test_other_task_path_integration() {
    let table = table();
    let auth = allow_all();

    let reply = selection::handle_selection(&table, &auth, select_event("wiz.department.MOD", "OTHER")).await;
    let WizardReply::Form { fields, token, .. } = reply else {
        panic!("expected the details form, got {reply:?}");
    };
    assert_eq!(fields[0].id, "other_task_description");

    let mut mock = MockDelivery::new();
    mock.expect_deliver()
        .withf(|record| record.get("task") == Some("Coordinated with partner server"))
        .times(1)
        .returning(|_| Ok(()));
    let delivery = DeliveryClient::new(Arc::new(mock));

    let reply = submission::handle_submission(
        &table,
        &auth,
        &delivery,
        form_submission(
            &token,
            &[
                ("other_task_description", "Coordinated with partner server"),
                ("summary", "helped out"),
                ("impact_level", "Low"),
            ],
        ),
    )
    .await;

    assert!(matches!(reply, WizardReply::Submitted { .. }));
}

/// An unauthorized user gets a single rejection and nothing else
/// happens; in particular the delivery client is never touched.
#[tokio::test]
async fn test_unauthorized_user_integration() {
    let table = table();

    let mut auth_mock = MockAuth::new();
    auth_mock.expect_is_authorized().times(2).returning(|_| false);
    let auth = AuthClient::new(Arc::new(auth_mock));

    let mut delivery_mock = MockDelivery::new();
    delivery_mock.expect_deliver().times(0);
    let delivery = DeliveryClient::new(Arc::new(delivery_mock));

    let reply = selection::handle_selection(&table, &auth, select_event("wiz", "MOD")).await;
    assert!(matches!(reply, WizardReply::Rejected { .. }));

    let reply = submission::handle_submission(
        &table,
        &auth,
        &delivery,
        form_submission("wiz.department.MOD.task.USER_WARN", &[("summary", "s"), ("impact_level", "Low")]),
    )
    .await;
    assert!(matches!(reply, WizardReply::Rejected { .. }));
}

/// A webhook failure surfaces as a submission failure and the record
/// is not retried.
#[tokio::test]
async fn test_delivery_failure_integration() {
    let table = table();
    let auth = allow_all();

    let mut mock = MockDelivery::new();
    mock.expect_deliver().times(1).returning(|_| {
        Err(DeliveryError { status: Some(500), detail: "internal error".to_string() })
    });
    let delivery = DeliveryClient::new(Arc::new(mock));

    let reply = submission::handle_submission(
        &table,
        &auth,
        &delivery,
        form_submission("wiz.department.MOD.task.USER_WARN", &[("summary", "s"), ("impact_level", "Low")]),
    )
    .await;

    assert!(matches!(reply, WizardReply::SubmissionFailed { .. }));
}

/// A token that decodes but does not sit at the terminal step cannot
/// submit anything.
#[tokio::test]
async fn test_stale_token_cannot_submit_integration() {
    let table = table();
    let auth = allow_all();

    let mut mock = MockDelivery::new();
    mock.expect_deliver().times(0);
    let delivery = DeliveryClient::new(Arc::new(mock));

    let reply = submission::handle_submission(
        &table,
        &auth,
        &delivery,
        form_submission("wiz.department.MOD", &[("summary", "s"), ("impact_level", "Low")]),
    )
    .await;

    assert!(matches!(reply, WizardReply::Rejected { .. }));
}

/// The runtime wires up from configuration, and refuses a step table
/// whose tokens would overflow the ceiling.
#[tokio::test]
async fn test_runtime_construction_integration() {
    let config = Config {
        inner: Arc::new(ConfigInner {
            discord_bot_token: "test-token".to_string(),
            webhook_url: "https://example.invalid/webhook".to_string(),
            panel_channel_id: "123456789".to_string(),
            allowed_role_ids: vec!["42".to_string()],
            steps: defaults::default_steps(),
        }),
    };

    let runtime = Runtime::new(config).expect("runtime should build from valid config");
    assert_eq!(runtime.table.terminal_index(), 2);

    // Same config, but with a step table that cannot stay under the
    // token ceiling.
    let mut steps = defaults::default_steps();
    steps[0].id = "x".repeat(120);
    let config = Config {
        inner: Arc::new(ConfigInner {
            discord_bot_token: "test-token".to_string(),
            webhook_url: "https://example.invalid/webhook".to_string(),
            panel_channel_id: "123456789".to_string(),
            allowed_role_ids: vec!["42".to_string()],
            steps,
        }),
    };

    assert!(Runtime::new(config).is_err());
}

/// A zero panel channel id passes the numeric parse but is not a valid
/// snowflake; the runtime must refuse it at startup instead of
/// panicking later.
#[tokio::test]
async fn test_zero_panel_channel_rejected_integration() {
    let config = Config {
        inner: Arc::new(ConfigInner {
            discord_bot_token: "test-token".to_string(),
            webhook_url: "https://example.invalid/webhook".to_string(),
            panel_channel_id: "0".to_string(),
            allowed_role_ids: vec!["42".to_string()],
            steps: defaults::default_steps(),
        }),
    };

    assert!(Runtime::new(config).is_err());
}
