//! No-WASM HTTP client implementation using reqwest
//!
//! This module provides the handler transport for non-WASM environments
//! (the CLI and tests) using the reqwest crate.

use crate::error::{ErrorKind, Result};
use reqwest::{
    header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE, COOKIE},
    Client,
};
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;

use crate::config::Config;
use crate::interface::{HttpClient, MasterclassApi};
use crate::runtime::{handler_url, Handler};

/// HTTP client for no-WASM environments using reqwest
#[derive(Debug, Clone)]
pub struct NoWasmClient {
    client: Client,
    handler_base: String,
}

impl HttpClient for NoWasmClient {
    async fn new(config: &Config) -> Result<Self> {
        let client = Client::builder()
            .danger_accept_invalid_certs(config.accept_invalid_certs)
            .timeout(Duration::from_secs(config.timeout_secs))
            .default_headers(default_headers(config)?)
            .build()?;

        Ok(Self {
            client,
            handler_base: config.handler_base.clone(),
        })
    }
}

fn default_headers(config: &Config) -> Result<HeaderMap> {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
    headers.insert("X-Requested-With", HeaderValue::from_static("XMLHttpRequest"));
    if let Some(token) = &config.csrf_token {
        headers.insert(
            "X-CSRFToken",
            HeaderValue::from_str(token).map_err(|e| ErrorKind::ParseError(e.to_string()))?,
        );
    }
    if let Some(cookie) = &config.session_cookie {
        headers.insert(
            COOKIE,
            HeaderValue::from_str(cookie).map_err(|e| ErrorKind::ParseError(e.to_string()))?,
        );
    }
    Ok(headers)
}

impl NoWasmClient {
    /// Handle JSON response with error checking
    async fn handle_json_response(resp: reqwest::Response) -> Result<Value> {
        let status = resp.status();
        let text = resp.text().await?;

        if !status.is_success() {
            log::warn!("handler answered {status}");
            return Err(ErrorKind::Status {
                code: status.as_u16(),
                body: text,
            }
            .into());
        }

        // json_handler serializes a bare `None` as `null`; an empty body means the same.
        if text.trim().is_empty() {
            return Ok(Value::Null);
        }

        serde_json::from_str::<Value>(&text).map_err(|e| {
            log::debug!("invalid JSON response: {text}");
            ErrorKind::Schema(format!("invalid JSON response: {e}")).into()
        })
    }

    /// Download the registrant CSV, without the UTF-8 byte order mark.
    pub async fn fetch_csv(&self) -> Result<String> {
        let url = self.handler_url(Handler::GetCsv);
        log::debug!("GET {url}");
        let resp = self.client.get(&url).header(ACCEPT, "text/csv").send().await?;
        let status = resp.status();
        let body = resp.text().await?;
        if !status.is_success() {
            log::warn!("csv export answered {status}");
            return Err(ErrorKind::Status { code: status.as_u16(), body }.into());
        }
        Ok(body.trim_start_matches('\u{feff}').to_string())
    }
}

impl MasterclassApi for NoWasmClient {
    async fn post_json<B>(&self, handler: Handler, body: &B) -> Result<Value>
    where
        B: Serialize + ?Sized,
    {
        let url = self.handler_url(handler);
        log::debug!("POST {url}");

        let resp = self
            .client
            .post(&url)
            .header(CONTENT_TYPE, "application/json")
            .body(serde_json::to_vec(body)?)
            .send()
            .await?;

        Self::handle_json_response(resp).await
    }

    fn handler_url(&self, handler: Handler) -> String {
        handler_url(&self.handler_base, handler)
    }
}
