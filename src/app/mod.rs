//! Application module - the registration sync client
//!
//! This module holds the widget logic (view model, render step, control
//! states) and the studio settings editor. It is generic over the transport,
//! so the same code runs with the reqwest client and in the browser.

pub mod control;
pub mod studio;
pub mod view;
pub mod widget;

pub use control::ControlState;
pub use studio::{blank_fields, default_fields, EditField, FieldKind, StudioEditor};
pub use view::{render, render_approval, render_status, Mutation, Target, WidgetView};
pub use widget::Widget;
