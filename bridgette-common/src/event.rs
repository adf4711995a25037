//! Inbound Google Chat event payloads.
//!
//! Only the fields the bot reads are modelled; everything else in the
//! event JSON is ignored during deserialization.

use serde::{Deserialize, Deserializer, Serialize};

/// Kind of an inbound event (`type` field).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventType {
    Message,
    CardClicked,
    AddedToSpace,
    RemovedFromSpace,
    /// Any event type the bot does not handle explicitly.
    #[default]
    #[serde(other)]
    Unknown,
}

impl std::fmt::Display for EventType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EventType::Message => write!(f, "MESSAGE"),
            EventType::CardClicked => write!(f, "CARD_CLICKED"),
            EventType::AddedToSpace => write!(f, "ADDED_TO_SPACE"),
            EventType::RemovedFromSpace => write!(f, "REMOVED_FROM_SPACE"),
            EventType::Unknown => write!(f, "UNKNOWN"),
        }
    }
}

/// Event envelope as posted by Google Chat to the bot endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChatEvent {
    #[serde(rename = "type", default)]
    pub event_type: EventType,
    #[serde(default)]
    pub message: Option<EventMessage>,
    #[serde(default)]
    pub user: Option<EventUser>,
    #[serde(default)]
    pub space: Option<Space>,
    #[serde(default)]
    pub common: Option<EventCommon>,
}

impl ChatEvent {
    /// The slash command carried by a message event, if any.
    pub fn slash_command(&self) -> Option<&SlashCommand> {
        self.message.as_ref()?.slash_command.as_ref()
    }

    /// Text following the slash command, trimmed. Empty when absent.
    pub fn argument_text(&self) -> &str {
        self.message
            .as_ref()
            .and_then(|m| m.argument_text.as_deref())
            .map(str::trim)
            .unwrap_or("")
    }

    /// Function name attached to a clicked card button.
    pub fn invoked_function(&self) -> Option<&str> {
        self.common.as_ref()?.invoked_function.as_deref()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventMessage {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub argument_text: Option<String>,
    #[serde(default)]
    pub slash_command: Option<SlashCommand>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlashCommand {
    /// Google Chat sends the id as an int64 string, but some tooling posts a number.
    #[serde(deserialize_with = "string_or_number")]
    pub command_id: String,
}

/// The user who triggered the event.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventUser {
    /// Stable resource name, e.g. `users/1234567890`.
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Space {
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type", default)]
    pub space_type: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventCommon {
    #[serde(default)]
    pub invoked_function: Option<String>,
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => Ok(s),
        serde_json::Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "expected string or number for commandId, got {}",
            other
        ))),
    }
}
