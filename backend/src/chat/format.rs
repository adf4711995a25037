//! Response payloads and fixed texts.

use bridgette_common::{Button, ButtonList, Card, CardHeader, CardWithId, Message, Section, Widget};

/// Card button function that records consent.
pub const GIVE_CONSENT_ACTION: &str = "give_consent";

pub const UNDER_DEVELOPMENT: &str = "I am under development but some commands are up!";
pub const STILL_UNDER_DEVELOPMENT: &str = "I am still under development but some commands are up!";
pub const GENERIC_ERROR: &str = "An error occurred. Please try again later.";
pub const UNKNOWN_COMMAND: &str = "Unknown command";
pub const NOT_UNDERSTOOD: &str = "I am not sure what you mean by that. Please try again.";

pub const REGISTER_USAGE: &str =
    "Please provide a valid spreadsheet ID. Usage: `/registertimesheet <spreadsheetId>`";
pub const REGISTER_SUCCESS: &str = "Timesheet registered successfully.";
pub const USER_NOT_FOUND: &str = "Could not find your data. Please try again.";

pub const CONSENT_REQUIRED: &str = "You must first provide consent before I can check your timesheet. \
     Please re-add me to start the consent process.";
pub const REGISTRATION_REQUIRED: &str = "You have not registered a timesheet yet. \
     Please use `/registertimesheet <spreadsheetId>` to register your timesheet.";
pub const CURRENT_MONTH: &str = "the current month";

pub const PERMISSION_DENIED: &str = "You do not have permission to use this command.";
pub const MONTH_USAGE: &str =
    "Please provide a valid month in the format YYYYMM. Usage: `/checkalltimesheets <YYYYMM>`";
pub const NO_ENABLED_USERS: &str = "No users have registered timesheets.";

const CONSENT_CARD_ID: &str = "consentCard";
const CONSENT_ACK_CARD_ID: &str = "consent_card";

pub fn text(text: impl Into<String>) -> Message {
    Message::text(text)
}

/// Card asking a new user for consent to read their timesheet.
pub fn consent_card() -> Message {
    Message::cards(vec![CardWithId {
        card_id: CONSENT_CARD_ID.to_string(),
        card: Card {
            header: Some(CardHeader {
                title: "Hello, I'm Bridgette!".to_string(),
                subtitle: Some("The BPG Digital Assistant".to_string()),
            }),
            sections: vec![Section {
                widgets: vec![
                    Widget::text_paragraph(
                        "To allow me to enable my functionalities, you must first give me consent \
                         to access your timesheet data. Please click the button below to agree.",
                    ),
                    Widget::ButtonList(ButtonList {
                        buttons: vec![Button::action("Give Consent", GIVE_CONSENT_ACTION)],
                    }),
                ],
            }],
        },
    }])
}

/// In-place replacement for the consent card once consent is given.
pub fn consent_acknowledgement() -> Message {
    Message::update_cards(vec![CardWithId {
        card_id: CONSENT_ACK_CARD_ID.to_string(),
        card: Card {
            header: None,
            sections: vec![Section {
                widgets: vec![Widget::text_paragraph(
                    "Thank you! Commands are now enabled. You can register your timesheet \
                     using `/registertimesheet <spreadsheet ID>` command",
                )],
            }],
        },
    }])
}

/// Placeholder reply for a single-user timesheet check.
pub fn check_placeholder(display_name: &str, month: &str) -> Message {
    Message::text(format!(
        "Checking timesheet for {} for {}. \
         (This is a placeholder response; actual checking logic not implemented.)",
        display_name, month
    ))
}

/// Direct message sent to a user whose timesheet is incomplete.
pub fn reminder(display_name: &str, month: &str) -> Message {
    Message::text(format!(
        "Hi {}, your timesheet for {} is incomplete. Please check it.",
        display_name, month
    ))
}

/// Result of a bulk check.
pub fn bulk_summary(month: &str, checked: usize, reminded: usize) -> Message {
    Message::text(format!(
        "Timesheet check for {} complete.\n\
         - Checked {} users.\n\
         - Sent reminders to {} users with incomplete timesheets.",
        month, checked, reminded
    ))
}
