//! Client module - handler transports for both WASM and no-WASM environments
//!
//! Both clients implement [`crate::interface::MasterclassApi`], so the widget
//! and studio logic never see which one is in use.

#[cfg(feature = "no-wasm")]
pub mod request;

#[cfg(feature = "wasm")]
pub mod gloo;
