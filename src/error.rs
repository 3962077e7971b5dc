use crate::model::structs::StudentId;

pub type Result<T> = core::result::Result<T, Error>;

pub struct Error {
    pub inner: Box<ErrorKind>,
}

impl Error {
    pub fn new(kind: ErrorKind) -> Error {
        Error {
            inner: Box::new(kind),
        }
    }

    pub fn kind(&self) -> &ErrorKind {
        &self.inner
    }

    pub fn category(&self) -> Category {
        match *self.inner {
            #[cfg(feature = "no-wasm")]
            ErrorKind::ReqwestError(_) => Category::Network,
            #[cfg(feature = "wasm")]
            ErrorKind::GlooNetError(_) => Category::Network,
            ErrorKind::Status { .. } => Category::Status,
            ErrorKind::SerdeJsonError(_) | ErrorKind::Schema(_) => Category::Schema,
            ErrorKind::Rejected(_) => Category::Rejected,
            ErrorKind::Validation(_) => Category::Validation,
            ErrorKind::Busy(_) => Category::Busy,
            ErrorKind::UnknownStudent(_)
            | ErrorKind::StdIoError(_)
            | ErrorKind::YamlError(_)
            | ErrorKind::ParseError(_) => Category::Local,
        }
    }

    /// Short text suitable for the widget's error slot.
    pub fn user_message(&self) -> String {
        match *self.inner {
            ErrorKind::Status { code, .. } => format!("The server answered with status {code}."),
            ErrorKind::Rejected(ref msg) => format!("The server refused the request: {msg}"),
            ErrorKind::Validation(ref fields) => {
                let parts: Vec<String> = fields.iter().map(ToString::to_string).collect();
                format!("Please fix: {}", parts.join("; "))
            }
            ErrorKind::Busy(ref control) => format!("{control} is still in progress."),
            ErrorKind::UnknownStudent(ref id) => format!("No registrant with id {id}."),
            _ => match self.category() {
                Category::Network => "Could not reach the server. Please try again.".to_string(),
                Category::Schema => "The server sent an unexpected response.".to_string(),
                _ => self.to_string(),
            },
        }
    }
}

impl std::fmt::Debug for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{:?}", self.inner)
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.inner)
    }
}

impl std::error::Error for Error {}

impl From<ErrorKind> for Error {
    fn from(kind: ErrorKind) -> Error {
        Error::new(kind)
    }
}

#[cfg(feature = "no-wasm")]
impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Error {
        Error::new(ErrorKind::ReqwestError(e))
    }
}

#[cfg(feature = "wasm")]
impl From<gloo_net::Error> for Error {
    fn from(e: gloo_net::Error) -> Error {
        Error::new(ErrorKind::GlooNetError(e))
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Error {
        Error::new(ErrorKind::SerdeJsonError(e))
    }
}

impl From<serde_yaml::Error> for Error {
    fn from(e: serde_yaml::Error) -> Error {
        Error::new(ErrorKind::YamlError(e))
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Error {
        Error::new(ErrorKind::StdIoError(e))
    }
}

/// Coarse grouping of failures, used to pick what the user is told.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Network,
    Status,
    Schema,
    Rejected,
    Validation,
    Busy,
    Local,
}

/// A single field that failed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: String,
    pub reason: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

impl std::fmt::Display for FieldError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.reason)
    }
}

pub enum ErrorKind {
    #[cfg(feature = "no-wasm")]
    ReqwestError(reqwest::Error),
    #[cfg(feature = "wasm")]
    GlooNetError(gloo_net::Error),
    Status { code: u16, body: String },
    SerdeJsonError(serde_json::Error),
    Schema(String),
    Rejected(String),
    Validation(Vec<FieldError>),
    Busy(&'static str),
    UnknownStudent(StudentId),
    YamlError(serde_yaml::Error),
    StdIoError(std::io::Error),
    ParseError(String),
}

impl std::fmt::Debug for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match *self {
            #[cfg(feature = "no-wasm")]
            ErrorKind::ReqwestError(ref e) => write!(f, "ReqwestError: {e:?}"),
            #[cfg(feature = "wasm")]
            ErrorKind::GlooNetError(ref e) => write!(f, "GlooNetError: {e:?}"),
            ErrorKind::Status { code, ref body } => write!(f, "Status: {code} {body:?}"),
            ErrorKind::SerdeJsonError(ref e) => write!(f, "SerdeJsonError: {e:?}"),
            ErrorKind::Schema(ref e) => write!(f, "Schema: {e:?}"),
            ErrorKind::Rejected(ref e) => write!(f, "Rejected: {e:?}"),
            ErrorKind::Validation(ref e) => write!(f, "Validation: {e:?}"),
            ErrorKind::Busy(control) => write!(f, "Busy: {control:?}"),
            ErrorKind::UnknownStudent(ref id) => write!(f, "UnknownStudent: {id:?}"),
            ErrorKind::YamlError(ref e) => write!(f, "YamlError: {e:?}"),
            ErrorKind::StdIoError(ref e) => write!(f, "StdIoError: {e:?}"),
            ErrorKind::ParseError(ref e) => write!(f, "ParseError: {e:?}"),
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match *self {
            #[cfg(feature = "no-wasm")]
            ErrorKind::ReqwestError(ref e) => write!(f, "request failed: {e}"),
            #[cfg(feature = "wasm")]
            ErrorKind::GlooNetError(ref e) => write!(f, "request failed: {e}"),
            ErrorKind::Status { code, ref body } => write!(f, "status {code}: {body}"),
            ErrorKind::SerdeJsonError(ref e) => write!(f, "invalid json: {e}"),
            ErrorKind::Schema(ref e) => write!(f, "unexpected response: {e}"),
            ErrorKind::Rejected(ref e) => write!(f, "rejected: {e}"),
            ErrorKind::Validation(ref fields) => {
                write!(f, "invalid input:")?;
                for field in fields {
                    write!(f, " [{field}]")?;
                }
                Ok(())
            }
            ErrorKind::Busy(control) => write!(f, "{control} is busy"),
            ErrorKind::UnknownStudent(ref id) => write!(f, "unknown student {id}"),
            ErrorKind::YamlError(ref e) => write!(f, "invalid config: {e}"),
            ErrorKind::StdIoError(ref e) => write!(f, "io error: {e}"),
            ErrorKind::ParseError(ref e) => write!(f, "parse error: {e}"),
        }
    }
}
