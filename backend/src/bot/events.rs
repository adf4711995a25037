use std::panic::AssertUnwindSafe;

use bridgette_common::{ChatEvent, EventType, Message};
use futures_util::FutureExt;

use super::Bot;
use crate::chat::format;
use crate::error::{BotError, Result};
use crate::models::user::{UserField, UserRef};

/// The user that triggered `event`, if the event names one.
fn acting_user(event: &ChatEvent) -> Result<UserRef> {
    event
        .user
        .as_ref()
        .filter(|u| !u.name.is_empty())
        .map(UserRef::from)
        .ok_or(BotError::MissingUser)
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

impl Bot {
    /// Handle one inbound event.
    ///
    /// Never fails: handler errors and panics are logged and answered with
    /// a generic error text. `None` means the platform expects no reply.
    pub async fn handle_event(&self, event: &ChatEvent) -> Option<Message> {
        let outcome = AssertUnwindSafe(self.dispatch(event)).catch_unwind().await;

        let error = match outcome {
            Ok(Ok(reply)) => return reply,
            Ok(Err(e)) => e,
            Err(payload) => BotError::Panic(panic_message(payload.as_ref())),
        };

        tracing::error!(
            error = %error.chain(),
            "Error handling {} event",
            event.event_type
        );
        Some(format::text(format::GENERIC_ERROR))
    }

    async fn dispatch(&self, event: &ChatEvent) -> Result<Option<Message>> {
        match event.event_type {
            EventType::Message => match event.slash_command() {
                Some(command) => {
                    let user = acting_user(event)?;
                    let reply = self
                        .handle_slash_command(&command.command_id, event.argument_text(), &user)
                        .await?;
                    Ok(Some(reply))
                }
                None => Ok(Some(format::text(format::UNDER_DEVELOPMENT))),
            },
            EventType::CardClicked => Ok(Some(self.on_card_click(event).await?)),
            EventType::AddedToSpace => Ok(Some(self.on_added_to_space(event).await?)),
            EventType::RemovedFromSpace => {
                let space = event.space.as_ref().map(|s| s.name.as_str()).unwrap_or("");
                tracing::info!("Bot removed from space: {}", space);
                Ok(None)
            }
            EventType::Unknown => Ok(Some(format::text(format::STILL_UNDER_DEVELOPMENT))),
        }
    }

    /// Register the user on first contact and ask for consent.
    async fn on_added_to_space(&self, event: &ChatEvent) -> Result<Message> {
        let user = acting_user(event)?;

        if let Err(e) = self.registry.get_or_create(&user).await {
            tracing::warn!("Could not register {} on join: {}", user.id, e);
        }

        Ok(format::consent_card())
    }

    /// Card button handler; only `give_consent` is recognized.
    async fn on_card_click(&self, event: &ChatEvent) -> Result<Message> {
        let action = event.invoked_function().unwrap_or("");
        if action != format::GIVE_CONSENT_ACTION {
            tracing::info!("Unrecognized card action: {:?}", action);
            return Ok(format::text(format::NOT_UNDERSTOOD));
        }

        let record = match acting_user(event) {
            Ok(user) => self.registry.get_or_create(&user).await.ok(),
            Err(_) => None,
        };

        let Some(record) = record else {
            tracing::warn!("Consent click from an unresolvable user");
            return Ok(format::text(format::NOT_UNDERSTOOD));
        };

        self.registry
            .update_field(record.row, UserField::IsEnabled, true)
            .await?;

        tracing::info!("Consent given by {}", record.user_id);
        Ok(format::consent_acknowledgement())
    }
}
