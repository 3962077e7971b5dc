//! Widget view model and the pure render step
//!
//! [`WidgetView`] is the in-memory stand-in for the widget's DOM. It only
//! changes through [`WidgetView::apply`], and the render functions turn server
//! responses into lists of [`Mutation`]s without touching any state.

use std::collections::BTreeMap;
use std::fmt;

use super::control::ControlState;
use crate::model::structs::{ApprovalUpdate, Counter, RegistrationView, StatusUpdate, StudentId};

/// Elements of the widget that carry text or a busy indicator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    Status,
    RegisterButton,
    Counter,
    ApprovalButton(StudentId),
    MailSubmit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mutation {
    SetText(Target, String),
    SetControl(Target, ControlState),
    SetMailPanel(bool),
    ClearMailFields,
    SetError(Option<String>),
}

/// One row of the instructor's registrant list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApprovalRow {
    pub label: String,
    pub control: ControlState,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MailPanel {
    pub visible: bool,
    pub subject: String,
    pub text: String,
    pub submit: ControlState,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WidgetView {
    pub status_text: String,
    pub button_label: String,
    pub counter: Option<String>,
    pub register: ControlState,
    pub approvals: BTreeMap<StudentId, ApprovalRow>,
    pub mail: MailPanel,
    pub error: Option<String>,
    pub csv_link: Option<String>,
}

impl WidgetView {
    pub fn apply(&mut self, mutation: Mutation) {
        match mutation {
            Mutation::SetText(target, text) => match target {
                Target::Status => self.status_text = text,
                Target::RegisterButton => self.button_label = text,
                Target::Counter => self.counter = Some(text),
                Target::ApprovalButton(id) => {
                    if let Some(row) = self.approvals.get_mut(&id) {
                        row.label = text;
                    }
                }
                Target::MailSubmit => {}
            },
            Mutation::SetControl(target, state) => {
                if let Some(control) = self.control_mut(&target) {
                    *control = state;
                }
            }
            Mutation::SetMailPanel(visible) => self.mail.visible = visible,
            Mutation::ClearMailFields => {
                self.mail.subject.clear();
                self.mail.text.clear();
            }
            Mutation::SetError(error) => self.error = error,
        }
    }

    pub fn apply_all(&mut self, mutations: impl IntoIterator<Item = Mutation>) {
        for mutation in mutations {
            self.apply(mutation);
        }
    }

    pub fn control(&self, target: &Target) -> Option<&ControlState> {
        match target {
            Target::RegisterButton => Some(&self.register),
            Target::ApprovalButton(id) => self.approvals.get(id).map(|row| &row.control),
            Target::MailSubmit => Some(&self.mail.submit),
            Target::Status | Target::Counter => None,
        }
    }

    pub fn control_mut(&mut self, target: &Target) -> Option<&mut ControlState> {
        match target {
            Target::RegisterButton => Some(&mut self.register),
            Target::ApprovalButton(id) => self.approvals.get_mut(id).map(|row| &mut row.control),
            Target::MailSubmit => Some(&mut self.mail.submit),
            Target::Status | Target::Counter => None,
        }
    }

    /// Number of busy indicators currently shown.
    pub fn busy_count(&self) -> usize {
        let rows = self.approvals.values().filter(|row| row.control.is_busy()).count();
        rows + usize::from(self.register.is_busy()) + usize::from(self.mail.submit.is_busy())
    }
}

impl fmt::Display for WidgetView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.status_text)?;
        write!(f, "[{}]", self.button_label)?;
        if self.register.is_busy() {
            write!(f, " ...")?;
        }
        writeln!(f)?;
        if let Some(counter) = &self.counter {
            writeln!(f, "free places: {counter}")?;
        }
        for (id, row) in &self.approvals {
            writeln!(f, "  {id:<12}[{}]", row.label)?;
        }
        if let Some(link) = &self.csv_link {
            writeln!(f, "csv: {link}")?;
        }
        if let Some(error) = &self.error {
            writeln!(f, "error: {error}")?;
        }
        Ok(())
    }
}

fn counter_mutation(counter: Counter) -> Mutation {
    Mutation::SetText(Target::Counter, counter.to_string())
}

/// Mutations for a full registration view.
pub fn render(view: &RegistrationView, show_counter: bool) -> Vec<Mutation> {
    let mut mutations = vec![
        Mutation::SetText(Target::Status, view.registration_status.clone()),
        Mutation::SetText(Target::RegisterButton, view.button_text.clone()),
    ];
    if show_counter {
        mutations.push(counter_mutation(view.counter()));
    }
    mutations
}

/// Mutations for a register-toggle response.
pub fn render_status(update: &StatusUpdate, show_counter: bool) -> Vec<Mutation> {
    let mut mutations = vec![
        Mutation::SetText(Target::Status, update.registration_status.clone()),
        Mutation::SetText(Target::RegisterButton, update.button_text.clone()),
    ];
    if let Some(counter) = update.counter.filter(|_| show_counter) {
        mutations.push(counter_mutation(counter));
    }
    mutations
}

/// Relabels the approval control of `student_id` and nothing else.
pub fn render_approval(
    student_id: &StudentId,
    update: &ApprovalUpdate,
    show_counter: bool,
) -> Vec<Mutation> {
    let mut mutations = vec![Mutation::SetText(
        Target::ApprovalButton(student_id.clone()),
        update.button_text.clone(),
    )];
    if let Some(counter) = update.counter.filter(|_| show_counter) {
        mutations.push(counter_mutation(counter));
    }
    mutations
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn view(status: &str, button: &str, free: u32, capacity: u32) -> RegistrationView {
        RegistrationView {
            registration_status: status.to_string(),
            button_text: button.to_string(),
            free_places: free,
            capacity,
        }
    }

    #[test]
    fn render_registered_view() {
        let mutations = render(&view("Registered", "Unregister", 3, 10), true);
        assert_eq!(
            mutations,
            vec![
                Mutation::SetText(Target::Status, "Registered".to_string()),
                Mutation::SetText(Target::RegisterButton, "Unregister".to_string()),
                Mutation::SetText(Target::Counter, "3 / 10".to_string()),
            ]
        );

        let mut widget = WidgetView::default();
        widget.apply_all(mutations);
        assert_eq!(widget.status_text, "Registered");
        assert_eq!(widget.button_label, "Unregister");
        assert_eq!(widget.counter.as_deref(), Some("3 / 10"));
    }

    #[test]
    fn render_counter_edges() {
        for (free, expected) in [(0, "0 / 10"), (10, "10 / 10")] {
            let mut widget = WidgetView::default();
            widget.apply_all(render(&view("s", "b", free, 10), true));
            assert_eq!(widget.counter.as_deref(), Some(expected));
        }
        let mut widget = WidgetView::default();
        widget.apply_all(render(&view("s", "b", 0, 0), true));
        assert_eq!(widget.counter.as_deref(), Some("0 / 0"));
    }

    #[test]
    fn counter_can_be_hidden() {
        let mutations = render(&view("s", "b", 1, 2), false);
        assert_eq!(mutations.len(), 2);
        let mut widget = WidgetView::default();
        widget.apply_all(mutations);
        assert_eq!(widget.counter, None);
    }

    #[test]
    fn approval_relabel_touches_one_row() {
        let mut widget = WidgetView::default();
        for id in [1, 2] {
            widget.approvals.insert(
                StudentId::Number(id),
                ApprovalRow {
                    label: "Approve".to_string(),
                    control: ControlState::Idle,
                },
            );
        }
        let update = ApprovalUpdate {
            button_text: "Unapprove".to_string(),
            student_id: Some(StudentId::Number(2)),
            counter: None,
        };
        widget.apply_all(render_approval(&StudentId::Number(2), &update, true));
        assert_eq!(widget.approvals[&StudentId::Number(1)].label, "Approve");
        assert_eq!(widget.approvals[&StudentId::Number(2)].label, "Unapprove");
        assert_eq!(widget.counter, None);
    }

    #[test]
    fn display_shows_busy_and_error() {
        let mut widget = WidgetView::default();
        widget.apply_all(render(&view("Open", "Register", 5, 30), true));
        widget.apply(Mutation::SetControl(Target::RegisterButton, ControlState::Pending));
        widget.apply(Mutation::SetError(Some("boom".to_string())));
        assert_eq!(
            widget.to_string(),
            "Open\n[Register] ...\nfree places: 5 / 30\nerror: boom\n"
        );
        assert_eq!(widget.busy_count(), 1);
    }
}
