#![allow(async_fn_in_trait)] // 允许在内部 trait 中使用 async fn

use crate::config::Config;
use crate::error::Result;
use crate::model::dtos::{ApprovalParams, MailMessage, RefreshParams, RegisterParams};
use crate::model::structs::{
    check_mail_ack, ApprovalUpdate, RegistrationView, StatusUpdate, StudentId,
};
use crate::runtime::Handler;
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;

/// Common trait for HTTP client functionality
pub trait HttpClient {
    /// Create a new HTTP client instance
    async fn new(config: &Config) -> Result<Self>
    where
        Self: Sized;
}

/// Common interface for all masterclass handler calls.
///
/// Transports only implement [`post_json`](MasterclassApi::post_json); the
/// typed calls decode its result so every backend checks responses the same way.
pub trait MasterclassApi {
    /// POST `body` as JSON to `handler` and return the parsed JSON reply.
    async fn post_json<B>(&self, handler: Handler, body: &B) -> Result<Value>
    where
        B: Serialize + ?Sized;

    /// URL of a handler, for links the page serves directly.
    fn handler_url(&self, handler: Handler) -> String;

    /// Ask for the current registration state
    async fn refresh_display(&self) -> Result<RegistrationView> {
        let value = self
            .post_json(Handler::RefreshDisplay, &RefreshParams::default())
            .await?;
        RegistrationView::from_value(value)
    }

    /// Toggle the caller's own registration
    async fn register_button(&self) -> Result<StatusUpdate> {
        let value = self
            .post_json(Handler::RegisterButton, &RegisterParams::default())
            .await?;
        StatusUpdate::from_value(value)
    }

    /// Approve, unapprove or remove one registrant
    async fn approval_button(&self, student_id: &StudentId) -> Result<ApprovalUpdate> {
        let value = self
            .post_json(Handler::ApprovalButton, &ApprovalParams { student_id })
            .await?;
        ApprovalUpdate::from_value(value)
    }

    /// Mail every approved registrant
    async fn send_mail_to_all(&self, message: &MailMessage) -> Result<()> {
        let value = self.post_json(Handler::SendMailToAll, message).await?;
        check_mail_ack(&value)
    }

    /// Store studio settings
    async fn save_masterclass(&self, fields: &BTreeMap<String, String>) -> Result<()> {
        self.post_json(Handler::SaveMasterclass, fields).await?;
        Ok(())
    }

    /// Link for the registrant CSV export
    fn csv_export_url(&self) -> String {
        self.handler_url(Handler::GetCsv)
    }
}
