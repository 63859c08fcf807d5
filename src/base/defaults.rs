//! Built-in step table: the stock department → task → details wizard.
//!
//! Deployments override this wholesale via the `steps` configuration
//! key; the defaults here reproduce the staff logging flow the bot
//! ships with. Option `group` tags tie each task to its department so
//! the task menu can be tailored to the chosen department.

use crate::wizard::step::{
    FieldStyle, FormField, StepDefinition, StepKind, StepOption,
};

fn opt(value: &str, label: &str, emoji: Option<&str>, group: Option<&str>) -> StepOption {
    StepOption {
        value: value.to_string(),
        label: label.to_string(),
        emoji: emoji.map(str::to_string),
        group: group.map(str::to_string),
    }
}

/// The default three-step wizard.
pub fn default_steps() -> Vec<StepDefinition> {
    let departments = StepDefinition {
        id: "department".to_string(),
        kind: StepKind::Select,
        title: "Department".to_string(),
        placeholder: Some("🏢 Select your department to begin...".to_string()),
        options: vec![
            opt("MOD", "Moderation", Some("🛡️"), None),
            opt("CREA", "Creatives", Some("🎨"), None),
            opt("AUTO", "Automations", Some("⚙️"), None),
            opt("CS", "Customer Service", Some("🎧"), None),
            opt("GEN", "General", Some("📋"), None),
        ],
        fields: vec![],
        depends_on: vec![],
    };

    let tasks = StepDefinition {
        id: "task".to_string(),
        kind: StepKind::Select,
        title: "Task".to_string(),
        placeholder: Some("👇 Select the task you performed...".to_string()),
        options: vec![
            opt("USER_WARN", "Warn a User", None, Some("MOD")),
            opt("USER_MUTE", "Mute/Timeout a User", None, Some("MOD")),
            opt("USER_KICK", "Kick a User", None, Some("MOD")),
            opt("USER_BAN", "Ban a User", None, Some("MOD")),
            opt("REPORTS_REVIEW", "Review User Reports", None, Some("MOD")),
            opt("DISPUTE_RESOLVE", "Resolve Dispute", None, Some("MOD")),
            opt("GRAPHIC_CREATE", "Create Graphic/Image", None, Some("CREA")),
            opt("VIDEO_EDIT", "Edit Video", None, Some("CREA")),
            opt("COPY_WRITE", "Write Announcement/Copy", None, Some("CREA")),
            opt("CONTENT_PLAN", "Plan Content Schedule", None, Some("CREA")),
            opt("BUG_FIX", "Fix Bot/Workflow Bug", None, Some("AUTO")),
            opt("FEATURE_DEPLOY", "Deploy New Feature", None, Some("AUTO")),
            opt("WORKFLOW_CREATE", "Create New Workflow", None, Some("AUTO")),
            opt("SYS_MAINTENANCE", "Perform System Maintenance", None, Some("AUTO")),
            opt("TICKET_ANSWER", "Answer Support Ticket", None, Some("CS")),
            opt("ISSUE_RESOLVE", "Resolve Member Issue", None, Some("CS")),
            opt("KB_UPDATE", "Update Knowledge Base", None, Some("CS")),
            opt("MEMBER_GUIDE", "Guide New Member", None, Some("CS")),
            opt("MEETING_ATTEND", "Team Meeting", None, Some("GEN")),
            opt("REPORT_SUBMIT", "Weekly Report", None, Some("GEN")),
            opt("ADMIN_TASK", "Administrative Task", None, Some("GEN")),
            opt("OTHER", "Other (Specify in Form)", Some("✍️"), None),
        ],
        fields: vec![],
        depends_on: vec!["department".to_string()],
    };

    let details = StepDefinition {
        id: "details".to_string(),
        kind: StepKind::FreeTextForm,
        title: "Log Task Details".to_string(),
        placeholder: None,
        options: vec![],
        fields: vec![
            FormField::required("summary", "Summary of Action", FieldStyle::Paragraph)
                .with_placeholder("e.g., Banned user XYZ#1234 for spamming links in #general."),
            FormField::required("impact_level", "Impact Level", FieldStyle::Short)
                .with_placeholder("Low, Medium, High, or Critical"),
            FormField::optional("reference_link", "Reference Link (Optional)", FieldStyle::Short)
                .with_placeholder("Link to ticket, user profile, Google Doc, etc."),
        ],
        depends_on: vec!["department".to_string(), "task".to_string()],
    };

    vec![departments, tasks, details]
}
