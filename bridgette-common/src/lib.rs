//! Bridgette Common Types
//!
//! Google Chat wire types shared by the backend and its tests.

pub mod event;
pub mod message;

pub use event::{ChatEvent, EventCommon, EventMessage, EventType, EventUser, SlashCommand, Space};
pub use message::{
    Action, ActionResponse, ActionResponseType, Button, ButtonList, Card, CardHeader, CardWithId,
    Message, OnClick, Section, TextParagraph, Widget,
};
