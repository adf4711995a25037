//! Outbound Google Chat message payloads.
//!
//! A [`Message`] is either plain text, a set of `cardsV2`, or an
//! `actionResponse` that updates the message a card was clicked on.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cards_v2: Option<Vec<CardWithId>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action_response: Option<ActionResponse>,
}

impl Message {
    /// Plain text message.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Default::default()
        }
    }

    /// Message made of one or more cards.
    pub fn cards(cards: Vec<CardWithId>) -> Self {
        Self {
            cards_v2: Some(cards),
            ..Default::default()
        }
    }

    /// Replace the cards of the message that triggered a card click.
    pub fn update_cards(cards: Vec<CardWithId>) -> Self {
        Self {
            action_response: Some(ActionResponse {
                response_type: ActionResponseType::UpdateMessage,
                cards_v2: cards,
            }),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionResponse {
    #[serde(rename = "type")]
    pub response_type: ActionResponseType,
    #[serde(rename = "cardsV2", default)]
    pub cards_v2: Vec<CardWithId>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActionResponseType {
    NewMessage,
    UpdateMessage,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardWithId {
    pub card_id: String,
    pub card: Card,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Card {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub header: Option<CardHeader>,
    #[serde(default)]
    pub sections: Vec<Section>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardHeader {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Section {
    #[serde(default)]
    pub widgets: Vec<Widget>,
}

/// Card widget, serialized as `{"textParagraph": {...}}` / `{"buttonList": {...}}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Widget {
    TextParagraph(TextParagraph),
    ButtonList(ButtonList),
}

impl Widget {
    pub fn text_paragraph(text: impl Into<String>) -> Self {
        Widget::TextParagraph(TextParagraph { text: text.into() })
    }

    /// Text of a paragraph widget, `None` for other widget kinds.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Widget::TextParagraph(p) => Some(&p.text),
            Widget::ButtonList(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextParagraph {
    pub text: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ButtonList {
    pub buttons: Vec<Button>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Button {
    pub text: String,
    pub on_click: OnClick,
}

impl Button {
    /// Button that invokes `function` on the bot when clicked.
    pub fn action(text: impl Into<String>, function: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            on_click: OnClick {
                action: Action {
                    function: function.into(),
                },
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OnClick {
    pub action: Action,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Action {
    pub function: String,
}
