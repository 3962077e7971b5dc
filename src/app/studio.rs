//! Studio editor for the masterclass settings
//!
//! Every field carries the validator its type calls for, and all of them run
//! before anything is posted.

use std::collections::BTreeMap;

use crate::error::{Error, ErrorKind, FieldError, Result};
use crate::interface::MasterclassApi;
use crate::runtime::{Notification, Runtime, SaveState};

/// Validator kinds understood by the settings form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Number { min: Option<i64> },
    String,
    Boolean,
}

const TRUTHY: [&str; 3] = ["true", "yes", "1"];
const FALSY: [&str; 3] = ["false", "no", "0"];

impl FieldKind {
    /// Checks `raw` and returns the value to submit.
    pub fn validate(self, raw: &str) -> std::result::Result<String, String> {
        let value = raw.trim();
        match self {
            FieldKind::Number { min } => {
                if value.is_empty() {
                    return Err("must be a number".to_string());
                }
                let number: f64 = value.parse().map_err(|_| format!("{value:?} is not a number"))?;
                if !number.is_finite() {
                    return Err(format!("{value:?} is not a number"));
                }
                if let Some(min) = min {
                    if number.fract() != 0.0 {
                        return Err(format!("{value:?} is not a whole number"));
                    }
                    if number < min as f64 {
                        return Err(format!("must be at least {min}"));
                    }
                }
                Ok(value.to_string())
            }
            FieldKind::String => {
                if value.is_empty() {
                    Err("must not be empty".to_string())
                } else {
                    Ok(raw.to_string())
                }
            }
            FieldKind::Boolean => {
                let lower = value.to_lowercase();
                if TRUTHY.contains(&lower.as_str()) || FALSY.contains(&lower.as_str()) {
                    Ok(lower)
                } else {
                    Err(format!("{value:?} is not one of true/false/yes/no/1/0"))
                }
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditField {
    pub name: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
    pub value: String,
}

impl EditField {
    pub fn new(
        name: &'static str,
        label: &'static str,
        kind: FieldKind,
        value: impl Into<String>,
    ) -> Self {
        Self {
            name,
            label,
            kind,
            value: value.into(),
        }
    }
}

/// The masterclass settings with their stock defaults.
pub fn default_fields() -> Vec<EditField> {
    vec![
        EditField::new(
            "display_name",
            "Display Name",
            FieldKind::String,
            "Master-class registration",
        ),
        EditField::new("capacity", "Venue capacity", FieldKind::Number { min: Some(1) }, "30"),
        EditField::new(
            "minimum_score",
            "Required test score",
            FieldKind::Number { min: Some(1) },
            "250",
        ),
        EditField::new("approval_required", "Manual approval", FieldKind::Boolean, "false"),
    ]
}

/// The same fields with no values. The save handler applies every key it gets,
/// so a form without the block's current values must have each field filled in
/// before it validates.
pub fn blank_fields() -> Vec<EditField> {
    default_fields()
        .into_iter()
        .map(|field| EditField {
            value: String::new(),
            ..field
        })
        .collect()
}

pub struct StudioEditor<A, R> {
    api: A,
    runtime: R,
    fields: Vec<EditField>,
    reload_after_save: bool,
}

impl<A: MasterclassApi, R: Runtime> StudioEditor<A, R> {
    pub fn new(api: A, runtime: R, fields: Vec<EditField>, reload_after_save: bool) -> Self {
        Self {
            api,
            runtime,
            fields,
            reload_after_save,
        }
    }

    pub fn fields(&self) -> &[EditField] {
        &self.fields
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn runtime(&self) -> &R {
        &self.runtime
    }

    pub fn set(&mut self, name: &str, value: impl Into<String>) -> Result<()> {
        let field = self
            .fields
            .iter_mut()
            .find(|field| field.name == name)
            .ok_or_else(|| ErrorKind::ParseError(format!("unknown field {name:?}")))?;
        field.value = value.into();
        Ok(())
    }

    /// Runs every validator and collects the flat name/value map to submit.
    pub fn collect(&self) -> Result<BTreeMap<String, String>> {
        let mut data = BTreeMap::new();
        let mut problems = Vec::new();
        for field in &self.fields {
            match field.kind.validate(&field.value) {
                Ok(value) => {
                    data.insert(field.name.to_string(), value);
                }
                Err(reason) => problems.push(FieldError::new(field.name, reason)),
            }
        }
        if problems.is_empty() {
            Ok(data)
        } else {
            Err(ErrorKind::Validation(problems).into())
        }
    }

    pub async fn save(&self) -> Result<()> {
        self.runtime.notify(Notification::Save {
            state: SaveState::Start,
        });

        let outcome = match self.collect() {
            Ok(data) => self.api.save_masterclass(&data).await,
            Err(e) => Err(e),
        };

        match outcome {
            Ok(()) => {
                self.runtime.notify(Notification::Save {
                    state: SaveState::End,
                });
                if self.reload_after_save {
                    self.runtime.reload();
                }
                Ok(())
            }
            Err(e) => {
                self.report(&e);
                Err(e)
            }
        }
    }

    fn report(&self, e: &Error) {
        log::warn!("save failed: {e}");
        self.runtime.notify(Notification::Error {
            title: "Unable to update settings".to_string(),
            message: e.user_message(),
        });
    }
}
