#![allow(dead_code)]

use masterclass_core::error::{ErrorKind, Result};
use masterclass_core::interface::MasterclassApi;
use masterclass_core::model::structs::StudentId;
use masterclass_core::runtime::{handler_url, Handler, Notification, Runtime};
use serde::Serialize;
use serde_json::{json, Value};
use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, VecDeque};
use std::sync::Mutex;

pub const BASE: &str = "http://lms.test/courses/c/xblock/b/handler";

/// Canned answer for the next call of a handler, bypassing the rules.
#[derive(Debug, Clone)]
pub enum Canned {
    Status(u16),
    Reply(Value),
}

#[derive(Debug, Default)]
pub struct State {
    pub capacity: i64,
    pub approval_required: bool,
    pub approved: Vec<StudentId>,
    pub pending: Vec<StudentId>,
    pub me: Option<StudentId>,
    pub staff: bool,
    pub calls: Vec<(Handler, Value)>,
    pub mails: Vec<(String, String)>,
    pub saved: Option<BTreeMap<String, String>>,
    pub canned: VecDeque<(Handler, Canned)>,
}

/// In-memory registration server with the same rules as the real block.
pub struct FakeServer {
    pub state: Mutex<State>,
}

impl FakeServer {
    pub fn new(capacity: i64) -> Self {
        Self {
            state: Mutex::new(State {
                capacity,
                me: Some(StudentId::Number(1)),
                ..State::default()
            }),
        }
    }

    pub fn staff(self) -> Self {
        self.state.lock().unwrap().staff = true;
        self
    }

    pub fn with_approval(self) -> Self {
        self.state.lock().unwrap().approval_required = true;
        self
    }

    pub fn respond_next(&self, handler: Handler, canned: Canned) {
        self.state.lock().unwrap().canned.push_back((handler, canned));
    }

    pub fn calls(&self, handler: Handler) -> usize {
        self.state
            .lock()
            .unwrap()
            .calls
            .iter()
            .filter(|(h, _)| *h == handler)
            .count()
    }

    pub fn free_places(&self) -> i64 {
        let state = self.state.lock().unwrap();
        state.capacity - state.approved.len() as i64
    }
}

impl State {
    fn status_string(&self) -> String {
        let me = self.me.as_ref();
        match me {
            Some(id) if self.approved.contains(id) => "You are registered for this master-class.",
            Some(id) if self.pending.contains(id) => {
                "Your registration is waiting for staff approval."
            }
            _ if self.approved.len() as i64 >= self.capacity => {
                "There are no free spaces remaining to register for this master-class."
            }
            _ => "You can register for this master-class.",
        }
        .to_string()
    }

    fn button_text(&self) -> String {
        match &self.me {
            Some(id) if self.approved.contains(id) || self.pending.contains(id) => "Unregister",
            _ => "Register",
        }
        .to_string()
    }

    fn free(&self) -> i64 {
        self.capacity - self.approved.len() as i64
    }

    fn refresh(&self) -> Value {
        json!({
            "registration_status": self.status_string(),
            "button_text": self.button_text(),
            "free_places": self.free(),
            "capacity": self.capacity,
        })
    }

    fn register(&mut self) -> Value {
        let Some(me) = self.me.clone() else {
            return json!({
                "registration_status": "Registration button does not work in Studio.",
                "button_text": "Register",
            });
        };
        let message = if let Some(pos) = self.pending.iter().position(|id| *id == me) {
            self.pending.remove(pos);
            "You are no longer requesting to be registered for this master-class."
        } else if let Some(pos) = self.approved.iter().position(|id| *id == me) {
            self.approved.remove(pos);
            "You are no longer registered for this master-class."
        } else if self.free() > 0 {
            if self.approval_required {
                self.pending.push(me);
                "Your request for registration is now waiting for staff approval."
            } else {
                self.approved.push(me);
                "You have been successfully registered."
            }
        } else {
            "There are no free spots remaining, sorry."
        };
        json!({
            "registration_status": message,
            "button_text": self.button_text(),
            "free_places": self.free(),
            "capacity": self.capacity,
        })
    }

    fn approve(&mut self, body: &Value) -> Value {
        let student: StudentId = serde_json::from_value(body["student_id"].clone()).unwrap();
        let label = if let Some(pos) = self.approved.iter().position(|id| *id == student) {
            self.approved.remove(pos);
            if self.approval_required {
                self.pending.push(student.clone());
                "Remove"
            } else {
                "Register"
            }
        } else if let Some(pos) = self.pending.iter().position(|id| *id == student) {
            self.pending.remove(pos);
            self.approved.push(student.clone());
            "Unapprove"
        } else if self.approval_required {
            self.pending.push(student.clone());
            "Approve"
        } else {
            self.approved.push(student.clone());
            "Remove"
        };
        json!({"button_text": label, "student_id": student})
    }

    fn mail(&mut self, body: &Value) -> Value {
        if !self.staff {
            return Value::Null;
        }
        let subject = body["subject"].as_str().unwrap_or_default();
        let text = body["text"].as_str().unwrap_or_default();
        if subject.is_empty() || text.is_empty() {
            return json!({"status": "fail"});
        }
        self.mails.push((subject.to_string(), text.to_string()));
        json!({"status": "ok"})
    }
}

impl MasterclassApi for FakeServer {
    async fn post_json<B>(&self, handler: Handler, body: &B) -> Result<Value>
    where
        B: Serialize + ?Sized,
    {
        let body = serde_json::to_value(body)?;
        // Give overlapping calls a chance to run, like a real round trip.
        tokio::task::yield_now().await;

        let mut state = self.state.lock().unwrap();
        state.calls.push((handler, body.clone()));

        if let Some(pos) = state.canned.iter().position(|(h, _)| *h == handler) {
            let (_, canned) = state.canned.remove(pos).unwrap();
            return match canned {
                Canned::Status(code) => Err(ErrorKind::Status {
                    code,
                    body: "Internal Server Error".to_string(),
                }
                .into()),
                Canned::Reply(value) => Ok(value),
            };
        }

        Ok(match handler {
            Handler::RefreshDisplay => state.refresh(),
            Handler::RegisterButton => state.register(),
            Handler::ApprovalButton => state.approve(&body),
            Handler::SendMailToAll => state.mail(&body),
            Handler::SaveMasterclass => {
                state.saved = Some(serde_json::from_value(body).unwrap());
                Value::Null
            }
            Handler::GetCsv => Value::Null,
        })
    }

    fn handler_url(&self, handler: Handler) -> String {
        handler_url(BASE, handler)
    }
}

/// Runtime that records what the editor tells it.
#[derive(Default)]
pub struct RecordingRuntime {
    pub notes: RefCell<Vec<Notification>>,
    pub reloads: Cell<u32>,
}

impl Runtime for RecordingRuntime {
    fn notify(&self, notification: Notification) {
        self.notes.borrow_mut().push(notification);
    }

    fn reload(&self) {
        self.reloads.set(self.reloads.get() + 1);
    }
}
