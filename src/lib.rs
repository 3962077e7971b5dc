pub mod app;
pub mod client;
pub mod config;
pub mod error;
pub mod interface;
pub mod model;
pub mod runtime;

#[cfg(feature = "no-wasm")]
pub use client::request::NoWasmClient;
#[cfg(feature = "wasm")]
pub use client::gloo::WasmClient;
#[cfg(feature = "no-wasm")]
pub use tokio;
