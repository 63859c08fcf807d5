//! Discord implementation of the chat client.
//!
//! Posts the wizard panel in the configured channel and translates
//! Discord interactions into the core's events: select menus become
//! [`SelectionEvent`]s, modal submissions become
//! [`FormSubmissionEvent`]s. Every reply to a wizard interaction is
//! ephemeral to the interacting user.

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use serenity::all::*;
use tracing::{error, info, instrument, warn};

use crate::{
    base::{
        config::Config,
        types::{FormSubmissionEvent, Res, SelectionEvent, SubmitterIdentity, Void},
    },
    interaction::{self, WizardReply},
    service::{auth::AuthClient, delivery::DeliveryClient},
    wizard::{
        codec::{self, TOKEN_PREFIX, WizardState},
        step::{FieldStyle, FormField, StepDefinition, StepTable},
        submit::SubmissionRecord,
    },
};

use super::{ChatClient, GenericChatClient};

const PANEL_TITLE: &str = "📋 Staff Task Log";
const REFRESH_BUTTON_ID: &str = "panel.refresh";

// Extra methods on `ChatClient` applied by the Discord implementation.

impl ChatClient {
    /// Creates a new Discord chat client.
    pub fn discord(config: &Config, table: Arc<StepTable>, auth: AuthClient, delivery: DeliveryClient) -> Res<Self> {
        let client = DiscordChatClient::new(config, table, auth, delivery)?;
        Ok(Self { inner: Arc::new(client) })
    }
}

// Structs.

/// Discord client implementation.
struct DiscordChatClient {
    bot_token: String,
    panel_channel: ChannelId,
    table: Arc<StepTable>,
    auth: AuthClient,
    delivery: DeliveryClient,
}

impl DiscordChatClient {
    fn new(config: &Config, table: Arc<StepTable>, auth: AuthClient, delivery: DeliveryClient) -> Res<Self> {
        let channel_id: u64 = config
            .panel_channel_id
            .parse()
            .map_err(|_| anyhow::anyhow!("Panel channel id `{}` is not a Discord snowflake.", config.panel_channel_id))?;

        // `ChannelId::new` panics on zero.
        if channel_id == 0 {
            return Err(anyhow::anyhow!("Panel channel id must not be zero."));
        }

        Ok(Self {
            bot_token: config.discord_bot_token.clone(),
            panel_channel: ChannelId::new(channel_id),
            table,
            auth,
            delivery,
        })
    }
}

#[async_trait]
impl GenericChatClient for DiscordChatClient {
    async fn start(&self) -> Void {
        let handler = Handler {
            panel_channel: self.panel_channel,
            table: self.table.clone(),
            auth: self.auth.clone(),
            delivery: self.delivery.clone(),
        };

        let intents = GatewayIntents::GUILDS | GatewayIntents::GUILD_MESSAGES;
        let mut client = Client::builder(&self.bot_token, intents).event_handler(handler).await?;

        client.start().await?;

        Ok(())
    }
}

/// Gateway event handler holding the shared wizard services.
struct Handler {
    panel_channel: ChannelId,
    table: Arc<StepTable>,
    auth: AuthClient,
    delivery: DeliveryClient,
}

#[async_trait]
impl EventHandler for Handler {
    async fn ready(&self, ctx: Context, ready: Ready) {
        info!("Connected to Discord as {}.", ready.user.name);

        if let Err(err) = self.post_panel(&ctx, ready.user.id).await {
            error!("Failed to post the wizard panel: {err}");
        }
    }

    async fn interaction_create(&self, ctx: Context, interaction: Interaction) {
        let result = match interaction {
            Interaction::Component(component) => self.handle_component(&ctx, component).await,
            Interaction::Modal(modal) => self.handle_modal(&ctx, modal).await,
            _ => Ok(()),
        };

        if let Err(err) = result {
            error!("Error while handling interaction: {err}");
        }
    }
}

impl Handler {
    /// Post (or re-post) the panel message, deleting the previous one
    /// if it still sits in the recent channel history.
    #[instrument(skip_all)]
    async fn post_panel(&self, ctx: &Context, bot_id: UserId) -> Void {
        match self.panel_channel.messages(&ctx.http, GetMessages::new().limit(20)).await {
            Ok(messages) => {
                for message in messages {
                    let is_panel = message.author.id == bot_id
                        && message.embeds.iter().any(|e| e.title.as_deref() == Some(PANEL_TITLE));
                    if is_panel {
                        if let Err(err) = message.delete(&ctx.http).await {
                            warn!("Could not delete the old panel, skipping: {err}");
                        }
                    }
                }
            }
            Err(err) => warn!("Could not fetch recent messages, skipping panel cleanup: {err}"),
        }

        let first_step = self
            .table
            .step(0)
            .ok_or_else(|| anyhow::anyhow!("step table has no first step"))?;
        let start = WizardState::start();
        let menu = select_menu_row(first_step, &start, &codec::encode(&start)?);

        let embed = CreateEmbed::new()
            .colour(0x9b59b6)
            .title(PANEL_TITLE)
            .description(
                "**Welcome to the operations log.**\n\n\
                 Select your department from the dropdown to log your tasks.",
            )
            .timestamp(Timestamp::now());

        let buttons = CreateActionRow::Buttons(vec![
            CreateButton::new(REFRESH_BUTTON_ID)
                .label("Refresh")
                .style(ButtonStyle::Success)
                .emoji(ReactionType::Unicode("🔄".to_string())),
        ]);

        self.panel_channel
            .send_message(&ctx.http, CreateMessage::new().embed(embed).components(vec![menu, buttons]))
            .await?;

        info!("Posted the wizard panel.");

        Ok(())
    }

    async fn handle_component(&self, ctx: &Context, component: ComponentInteraction) -> Void {
        let custom_id = component.data.custom_id.clone();
        let submitter = submitter_identity(&component.user, component.member.as_ref());

        // Gate every component, the panel buttons included, before any
        // panel or wizard work happens.
        if let Err(WizardReply::Rejected { message }) = interaction::authorize(&self.auth, &submitter).await {
            warn!("Unauthorized component interaction from {}", submitter.id);
            return ephemeral_text(ctx, &component, &message).await;
        }

        if custom_id == REFRESH_BUTTON_ID {
            component.create_response(&ctx.http, CreateInteractionResponse::Acknowledge).await?;
            let bot_id = ctx.http.get_current_user().await?.id;
            return self.post_panel(ctx, bot_id).await;
        }

        if !custom_id.starts_with(TOKEN_PREFIX) {
            return Ok(());
        }

        let ComponentInteractionDataKind::StringSelect { values } = &component.data.kind else {
            return Ok(());
        };
        let chosen = values.first().cloned().unwrap_or_default();

        let event = SelectionEvent {
            token: custom_id,
            chosen_value: chosen,
            submitter,
        };

        let reply = interaction::selection::handle_selection(&self.table, &self.auth, event).await;

        match reply {
            WizardReply::SelectMenu { step, state, token } => {
                let embed = CreateEmbed::new()
                    .colour(0x3498db)
                    .title(step.title.clone())
                    .description("Please select the specific option that applies.");
                let row = select_menu_row(&step, &state, &token);

                component
                    .create_response(
                        &ctx.http,
                        CreateInteractionResponse::Message(
                            CreateInteractionResponseMessage::new().ephemeral(true).embed(embed).components(vec![row]),
                        ),
                    )
                    .await?;
            }
            WizardReply::Form { step, fields, token } => {
                let rows = fields.iter().map(input_row).collect::<Vec<_>>();
                let modal = CreateModal::new(token, step.title.clone()).components(rows);

                component.create_response(&ctx.http, CreateInteractionResponse::Modal(modal)).await?;
            }
            WizardReply::Rejected { message } => {
                ephemeral_text(ctx, &component, &message).await?;
            }
            // Submissions never come back through a component.
            WizardReply::Submitted { .. } | WizardReply::SubmissionFailed { .. } => {}
        }

        Ok(())
    }

    async fn handle_modal(&self, ctx: &Context, modal: ModalInteraction) -> Void {
        let token = modal.data.custom_id.clone();
        if !token.starts_with(TOKEN_PREFIX) {
            return Ok(());
        }

        // Acknowledge first; the delivery call may take a while.
        modal
            .create_response(
                &ctx.http,
                CreateInteractionResponse::Defer(CreateInteractionResponseMessage::new().ephemeral(true)),
            )
            .await?;

        let mut field_values = HashMap::new();
        for row in &modal.data.components {
            for entry in &row.components {
                if let ActionRowComponent::InputText(input) = entry {
                    field_values.insert(input.custom_id.clone(), input.value.clone().unwrap_or_default());
                }
            }
        }

        let event = FormSubmissionEvent {
            token,
            field_values,
            submitter: submitter_identity(&modal.user, modal.member.as_ref()),
        };

        let reply = interaction::submission::handle_submission(&self.table, &self.auth, &self.delivery, event).await;

        let response = match reply {
            WizardReply::Submitted { record } => EditInteractionResponse::new().embed(success_embed(&record)),
            WizardReply::SubmissionFailed { message } | WizardReply::Rejected { message } => {
                EditInteractionResponse::new().content(message)
            }
            // Menus and forms never follow a modal submission.
            WizardReply::SelectMenu { .. } | WizardReply::Form { .. } => return Ok(()),
        };

        modal.edit_response(&ctx.http, response).await?;

        Ok(())
    }
}

// Rendering helpers.

/// Build the action row for a select step, filtering grouped options
/// by the answer to the step's first dependency.
fn select_menu_row(step: &StepDefinition, state: &WizardState, token: &str) -> CreateActionRow {
    let dependency_answer = step.depends_on.first().and_then(|dep| state.answer(dep));

    let options = step
        .options
        .iter()
        .filter(|option| match (&option.group, dependency_answer) {
            (Some(group), Some(answer)) => group == answer,
            (Some(_), None) => false,
            (None, _) => true,
        })
        .map(|option| {
            let mut built = CreateSelectMenuOption::new(option.label.clone(), option.value.clone());
            if let Some(emoji) = &option.emoji {
                built = built.emoji(ReactionType::Unicode(emoji.clone()));
            }
            built
        })
        .collect();

    let mut menu = CreateSelectMenu::new(token.to_string(), CreateSelectMenuKind::String { options });
    if let Some(placeholder) = &step.placeholder {
        menu = menu.placeholder(placeholder.clone());
    }

    CreateActionRow::SelectMenu(menu)
}

fn input_row(field: &FormField) -> CreateActionRow {
    let style = match field.style {
        FieldStyle::Short => InputTextStyle::Short,
        FieldStyle::Paragraph => InputTextStyle::Paragraph,
    };

    let mut input = CreateInputText::new(style, field.label.clone(), field.id.clone()).required(field.required);
    if let Some(placeholder) = &field.placeholder {
        input = input.placeholder(placeholder.clone());
    }

    CreateActionRow::InputText(input)
}

/// Discord caps embed field values at 1024 characters; a paragraph
/// modal input can be up to 4000. Clip so the confirmation embed never
/// fails to send after a successful delivery.
const EMBED_FIELD_LIMIT: usize = 1000;

fn clip(value: &str) -> String {
    value.chars().take(EMBED_FIELD_LIMIT).collect()
}

fn success_embed(record: &SubmissionRecord) -> CreateEmbed {
    let mut embed = CreateEmbed::new().colour(0x00ff00).title("✅ Log Submitted Successfully").timestamp(Timestamp::now());

    for (name, key, inline) in [
        ("🏢 Department", "department", true),
        ("📝 Task", "task", true),
        ("📈 Impact", "impact_level", true),
        ("📋 Summary", "summary", false),
    ] {
        if let Some(value) = record.get(key) {
            embed = embed.field(name, clip(value), inline);
        }
    }

    embed
}

async fn ephemeral_text(ctx: &Context, component: &ComponentInteraction, message: &str) -> Void {
    component
        .create_response(
            &ctx.http,
            CreateInteractionResponse::Message(CreateInteractionResponseMessage::new().ephemeral(true).content(message)),
        )
        .await?;
    Ok(())
}

fn submitter_identity(user: &User, member: Option<&Member>) -> SubmitterIdentity {
    SubmitterIdentity {
        id: user.id.get().to_string(),
        tag: user.tag(),
        role_ids: member
            .map(|m| m.roles.iter().map(|role| role.get().to_string()).collect())
            .unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::base::defaults;
    use crate::wizard::submit;

    fn long_summary_record() -> SubmissionRecord {
        let table = StepTable::new(defaults::default_steps()).unwrap();
        let state = WizardState::start().extended("department", "MOD").extended("task", "USER_WARN");
        let values: HashMap<String, String> = [
            ("summary".to_string(), "x".repeat(4000)),
            ("impact_level".to_string(), "High".to_string()),
        ]
        .into_iter()
        .collect();
        let submitter = SubmitterIdentity {
            id: "1".to_string(),
            tag: "user#0001".to_string(),
            role_ids: vec![],
        };
        submit::assemble(&table, &state, &values, &submitter).unwrap()
    }

    /// A maximum-length paragraph input must still fit in the
    /// confirmation embed, or the edit after a successful delivery
    /// fails and the user never sees a confirmation.
    #[test]
    fn confirmation_embed_clips_long_field_values() {
        let embed = success_embed(&long_summary_record());
        let json = serde_json::to_value(&embed).unwrap();

        let fields = json["fields"].as_array().expect("embed has fields");
        let summary = fields
            .iter()
            .find(|f| f["name"].as_str() == Some("📋 Summary"))
            .expect("summary field present");

        assert_eq!(summary["value"].as_str().unwrap().chars().count(), EMBED_FIELD_LIMIT);
    }

    #[test]
    fn clip_leaves_short_values_alone() {
        assert_eq!(clip("banned a spammer"), "banned a spammer");
    }
}
