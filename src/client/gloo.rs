//! WASM HTTP client implementation using gloo_net
//!
//! This module provides the handler transport for the in-browser widget,
//! going through the browser's fetch API. The session cookie is sent by the
//! browser itself, so only the CSRF token is added here.

use crate::error::{ErrorKind, Result};
use gloo_net::http::{Request, RequestBuilder};
use serde::Serialize;
use serde_json::Value;
use web_sys::{RequestCredentials, RequestMode};

use crate::config::Config;
use crate::interface::{HttpClient, MasterclassApi};
use crate::runtime::{handler_url, Handler};

/// HTTP client for WASM environments using gloo_net
#[derive(Debug, Clone)]
pub struct WasmClient {
    handler_base: String,
    csrf_token: Option<String>,
}

impl HttpClient for WasmClient {
    async fn new(config: &Config) -> Result<Self> {
        Ok(Self {
            handler_base: config.handler_base.clone(),
            csrf_token: config.csrf_token.clone(),
        })
    }
}

impl WasmClient {
    /// Build a request with common headers and settings
    fn build_request(&self, url: &str) -> RequestBuilder {
        let mut builder = Request::post(url)
            .mode(RequestMode::SameOrigin)
            .credentials(RequestCredentials::SameOrigin)
            .header("Accept", "application/json")
            .header("Content-Type", "application/json")
            .header("X-Requested-With", "XMLHttpRequest");

        if let Some(token) = &self.csrf_token {
            builder = builder.header("X-CSRFToken", token);
        }

        builder
    }

    /// Handle JSON response with error checking
    async fn handle_json_response(resp: gloo_net::http::Response) -> Result<Value> {
        let ok = resp.ok();
        let code = resp.status();
        let text = resp.text().await?;

        if !ok {
            log::warn!("handler answered {code}");
            return Err(ErrorKind::Status { code, body: text }.into());
        }

        if text.trim().is_empty() {
            return Ok(Value::Null);
        }

        serde_json::from_str::<Value>(&text).map_err(|e| {
            log::debug!("invalid JSON response: {text}");
            ErrorKind::Schema(format!("invalid JSON response: {e}")).into()
        })
    }
}

impl MasterclassApi for WasmClient {
    async fn post_json<B>(&self, handler: Handler, body: &B) -> Result<Value>
    where
        B: Serialize + ?Sized,
    {
        let url = self.handler_url(handler);
        log::debug!("POST {url}");

        let resp = self
            .build_request(&url)
            .body(serde_json::to_string(body)?)?
            .send()
            .await?;

        Self::handle_json_response(resp).await
    }

    fn handler_url(&self, handler: Handler) -> String {
        handler_url(&self.handler_base, handler)
    }
}
