//! Hosting runtime seam
//!
//! Handler URLs are `{handler_base}/{name}`. The studio editor reports to the
//! hosting runtime, and [`XBlockRuntime`] passes those notifications to the log.

use std::cell::Cell;

/// Server-side handlers the widget talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Handler {
    RefreshDisplay,
    RegisterButton,
    ApprovalButton,
    SendMailToAll,
    SaveMasterclass,
    GetCsv,
}

impl Handler {
    pub fn name(self) -> &'static str {
        match self {
            Handler::RefreshDisplay => "refresh_display",
            Handler::RegisterButton => "register_button",
            Handler::ApprovalButton => "approval_button",
            Handler::SendMailToAll => "send_mail_to_all",
            Handler::SaveMasterclass => "save_masterclass",
            Handler::GetCsv => "get_csv",
        }
    }
}

/// `{base}/{handler}`, tolerating a trailing slash on the base.
pub fn handler_url(base: &str, handler: Handler) -> String {
    format!("{}/{}", base.trim_end_matches('/'), handler.name())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveState {
    Start,
    End,
}

/// Events pushed to the runtime, mirroring `runtime.notify(name, data)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    Save { state: SaveState },
    Error { title: String, message: String },
}

pub trait Runtime {
    fn notify(&self, notification: Notification);

    /// Re-derive every piece of UI state from a freshly rendered page.
    fn reload(&self);
}

#[derive(Debug, Default)]
pub struct XBlockRuntime {
    reloads: Cell<u32>,
}

impl XBlockRuntime {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of reloads requested so far.
    pub fn reloads(&self) -> u32 {
        self.reloads.get()
    }
}

impl Runtime for XBlockRuntime {
    fn notify(&self, notification: Notification) {
        match notification {
            Notification::Save { state } => log::info!("save {state:?}"),
            Notification::Error { title, message } => log::error!("{title}: {message}"),
        }
    }

    fn reload(&self) {
        self.reloads.set(self.reloads.get() + 1);
        log::info!("page reload requested");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn handler_urls_join_cleanly() {
        let base = "https://lms.example/courses/x/xblock/block-v1:a/handler";
        assert_eq!(
            handler_url(&format!("{base}/"), Handler::RegisterButton),
            "https://lms.example/courses/x/xblock/block-v1:a/handler/register_button"
        );
        assert_eq!(
            handler_url(base, Handler::GetCsv),
            "https://lms.example/courses/x/xblock/block-v1:a/handler/get_csv"
        );
    }

    #[test]
    fn reloads_are_counted() {
        let runtime = XBlockRuntime::new();
        runtime.reload();
        runtime.reload();
        assert_eq!(runtime.reloads(), 2);
    }
}
