use futures::lock::Mutex;

use super::control::ControlState;
use super::view::{render, render_approval, render_status, ApprovalRow, Mutation, Target, WidgetView};
use crate::error::{Error, ErrorKind, FieldError, Result};
use crate::interface::MasterclassApi;
use crate::model::dtos::MailMessage;
use crate::model::structs::StudentId;

const REGISTER: &str = "register button";
const APPROVAL: &str = "approval button";
const MAIL: &str = "send mail";

/// Learner/instructor side of the masterclass widget.
///
/// The view is locked only while a request is prepared or a response is
/// applied, never across the request itself, so overlapping calls behave like
/// overlapping clicks on the page.
pub struct Widget<A> {
    api: A,
    show_counter: bool,
    view: Mutex<WidgetView>,
}

impl<A: MasterclassApi> Widget<A> {
    pub fn new(api: A, show_counter: bool) -> Self {
        let view = WidgetView {
            csv_link: Some(api.csv_export_url()),
            ..WidgetView::default()
        };
        Self {
            api,
            show_counter,
            view: Mutex::new(view),
        }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    /// Copy of the current view.
    pub async fn snapshot(&self) -> WidgetView {
        self.view.lock().await.clone()
    }

    /// Add a row to the registrant list, as the server-rendered page does for staff.
    pub async fn add_registrant(&self, student_id: StudentId, label: impl Into<String>) {
        self.view.lock().await.approvals.insert(
            student_id,
            ApprovalRow {
                label: label.into(),
                control: ControlState::Idle,
            },
        );
    }

    /// Initial status refresh.
    pub async fn load(&self) -> Result<()> {
        let outcome = self.api.refresh_display().await;
        let mut view = self.view.lock().await;
        match &outcome {
            Ok(registration) => {
                log::debug!("refreshed: {registration:?}");
                view.apply_all(render(registration, self.show_counter));
                view.apply(Mutation::SetError(None));
            }
            Err(e) => {
                log::warn!("refresh failed: {e}");
                view.apply(Mutation::SetError(Some(e.user_message())));
            }
        }
        outcome.map(|_| ())
    }

    pub async fn click_register(&self) -> Result<()> {
        self.begin(Target::RegisterButton, REGISTER).await?;

        let outcome = self.api.register_button().await;

        let mut view = self.view.lock().await;
        if let Ok(update) = &outcome {
            view.apply_all(render_status(update, self.show_counter));
        }
        Self::finish(&mut view, Target::RegisterButton, &outcome);
        outcome.map(|_| ())
    }

    /// Approve, unapprove or remove one registrant; only that row is relabelled.
    pub async fn click_approval(&self, student_id: &StudentId) -> Result<()> {
        let target = Target::ApprovalButton(student_id.clone());
        {
            let view = self.view.lock().await;
            if !view.approvals.contains_key(student_id) {
                return Err(ErrorKind::UnknownStudent(student_id.clone()).into());
            }
        }
        self.begin(target.clone(), APPROVAL).await?;

        let outcome = self
            .api
            .approval_button(student_id)
            .await
            .and_then(|update| {
                let echoed = update.student_id.as_ref();
                if let Some(echoed) = echoed.filter(|echoed| *echoed != student_id) {
                    return Err(ErrorKind::Schema(format!(
                        "approval answer for student {echoed}, expected {student_id}"
                    ))
                    .into());
                }
                Ok(update)
            });

        let mut view = self.view.lock().await;
        if let Ok(update) = &outcome {
            view.apply_all(render_approval(student_id, update, self.show_counter));
        }
        Self::finish(&mut view, target, &outcome);
        outcome.map(|_| ())
    }

    /// Show or hide the compose panel. Local only.
    pub async fn toggle_mail_panel(&self) -> bool {
        let mut view = self.view.lock().await;
        let visible = !view.mail.visible;
        view.apply(Mutation::SetMailPanel(visible));
        visible
    }

    pub async fn set_mail_subject(&self, subject: impl Into<String>) {
        self.view.lock().await.mail.subject = subject.into();
    }

    pub async fn set_mail_text(&self, text: impl Into<String>) {
        self.view.lock().await.mail.text = text.into();
    }

    pub async fn submit_mail(&self) -> Result<()> {
        let message = {
            let mut view = self.view.lock().await;
            let message = MailMessage::new(view.mail.subject.clone(), view.mail.text.clone());
            let mut problems = Vec::new();
            if message.subject.trim().is_empty() {
                problems.push(FieldError::new("subject", "must not be empty"));
            }
            if message.text.trim().is_empty() {
                problems.push(FieldError::new("text", "must not be empty"));
            }
            if !problems.is_empty() {
                let err: Error = ErrorKind::Validation(problems).into();
                view.apply(Mutation::SetError(Some(err.user_message())));
                return Err(err);
            }
            view.mail.submit.begin(MAIL)?;
            view.apply(Mutation::SetError(None));
            message
        };

        let outcome = self.api.send_mail_to_all(&message).await;

        let mut view = self.view.lock().await;
        if outcome.is_ok() {
            log::info!("mail sent: {:?}", message.subject);
            view.apply(Mutation::SetMailPanel(false));
            view.apply(Mutation::ClearMailFields);
        }
        Self::finish(&mut view, Target::MailSubmit, &outcome);
        outcome
    }

    async fn begin(&self, target: Target, name: &'static str) -> Result<()> {
        let mut view = self.view.lock().await;
        if let Some(control) = view.control_mut(&target) {
            control.begin(name)?;
        }
        view.apply(Mutation::SetError(None));
        Ok(())
    }

    fn finish<T>(view: &mut WidgetView, target: Target, outcome: &Result<T>) {
        let mut state = view.control(&target).cloned().unwrap_or_default();
        state.finish(outcome);
        view.apply(Mutation::SetControl(target, state));
        let error = outcome.as_ref().err().map(|e| {
            log::warn!("request failed: {e}");
            e.user_message()
        });
        view.apply(Mutation::SetError(error));
    }
}
