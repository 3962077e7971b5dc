use serde::Serialize;

use super::structs::StudentId;

/// Sent once when the widget loads.
#[derive(Debug, Clone, Serialize)]
pub struct RefreshParams {
    pub display_refreshed: &'static str,
}

impl Default for RefreshParams {
    fn default() -> Self {
        Self {
            display_refreshed: "True",
        }
    }
}

/// Sent by the register/unregister button.
#[derive(Debug, Clone, Serialize)]
pub struct RegisterParams {
    pub button_clicked: &'static str,
}

impl Default for RegisterParams {
    fn default() -> Self {
        Self {
            button_clicked: "True",
        }
    }
}

/// Instructor approves, unapproves or removes one registrant.
#[derive(Debug, Clone, Serialize)]
pub struct ApprovalParams<'a> {
    pub student_id: &'a StudentId,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MailMessage {
    pub subject: String,
    pub text: String,
}

impl MailMessage {
    pub fn new(subject: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            text: text.into(),
        }
    }
}
