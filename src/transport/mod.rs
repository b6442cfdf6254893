//! Transports that carry an operation to the Nexus node.
//!
//! Two strategies, picked per submission by the SDK/API button:
//!
//! - [`api`]: a direct GET against `<api_url>/<path>?<query>`.
//! - [`sdk`]: a call through a client handle that keeps its own credentials
//!   and login session.
//!
//! Both go through the [`HttpFetch`] seam so tests can count and script
//! remote calls without a node.
use std::sync::{PoisonError, RwLock};

use anyhow::{Context, Result};
use serde_json::{Value, json};
use url::Url;

use crate::config::schema::NodesConfig;

pub mod api;
pub mod sdk;

/// Message used when the node cannot be reached or answers with nothing.
pub const NODE_UNREACHABLE: &str = "request failed, nexus daemon may not be running";

// ---------------------------------------------------------------------------
// Transport selector
// ---------------------------------------------------------------------------

/// Which transport a submission asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transport {
    /// Through a client library handle.
    Sdk,
    /// Direct query-string call.
    Api,
}

impl Transport {
    /// Decode the `action` value of the submit button. Anything that is not
    /// the SDK button goes direct.
    pub fn from_action(action: &str) -> Self {
        if action.contains("SDK") {
            Self::Sdk
        } else {
            Self::Api
        }
    }

    /// Parse the `<which>` part of `/url/<which>`.
    pub fn from_url_target(target: &str) -> Option<Self> {
        match target {
            "sdk" => Some(Self::Sdk),
            "api" => Some(Self::Api),
            _ => None,
        }
    }

    /// Name of the URL-change form, used in error messages.
    pub fn url_form(self) -> &'static str {
        match self {
            Self::Sdk => "url/sdk",
            Self::Api => "url/api",
        }
    }
}

impl std::fmt::Display for Transport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sdk => write!(f, "SDK"),
            Self::Api => write!(f, "API"),
        }
    }
}

// ---------------------------------------------------------------------------
// Node URLs
// ---------------------------------------------------------------------------

/// The two runtime-mutable node base URLs, one per transport.
#[derive(Debug)]
pub struct NodeUrls {
    api: RwLock<String>,
    sdk: RwLock<String>,
}

impl NodeUrls {
    pub fn new(api: impl Into<String>, sdk: impl Into<String>) -> Self {
        Self {
            api: RwLock::new(normalize(&api.into())),
            sdk: RwLock::new(normalize(&sdk.into())),
        }
    }

    pub fn from_config(nodes: &NodesConfig) -> Self {
        Self::new(nodes.api_url.as_str(), nodes.sdk_url.as_str())
    }

    /// Current base URL for `transport`.
    pub fn get(&self, transport: Transport) -> String {
        self.slot(transport)
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Replace the base URL for `transport`. The other transport is untouched.
    pub fn set(&self, transport: Transport, url: &str) {
        *self
            .slot(transport)
            .write()
            .unwrap_or_else(PoisonError::into_inner) = normalize(url);
    }

    fn slot(&self, transport: Transport) -> &RwLock<String> {
        match transport {
            Transport::Api => &self.api,
            Transport::Sdk => &self.sdk,
        }
    }
}

fn normalize(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}

// ---------------------------------------------------------------------------
// HTTP seam
// ---------------------------------------------------------------------------

/// Blocking HTTP GET returning the raw response body.
///
/// Implementations return the body of non-2xx responses too: the node
/// reports application errors as JSON with an error status.
pub trait HttpFetch: Send + Sync {
    fn get(&self, url: &Url) -> Result<String>;
}

/// [`HttpFetch`] over a shared `ureq` agent. No timeout is set: a hung node
/// blocks the request that called it.
#[derive(Debug)]
pub struct UreqFetch {
    agent: ureq::Agent,
}

impl UreqFetch {
    pub fn new() -> Self {
        Self {
            agent: ureq::AgentBuilder::new().build(),
        }
    }
}

impl Default for UreqFetch {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpFetch for UreqFetch {
    fn get(&self, url: &Url) -> Result<String> {
        match self.agent.request_url("GET", url).call() {
            Ok(resp) => resp
                .into_string()
                .with_context(|| format!("failed to read response from {url}")),
            Err(ureq::Error::Status(code, resp)) => {
                log::debug!("node answered {code} for {url}");
                resp.into_string()
                    .with_context(|| format!("failed to read {code} response from {url}"))
            }
            Err(e) => Err(e).with_context(|| format!("GET {url} failed")),
        }
    }
}

// ---------------------------------------------------------------------------
// Shared helpers
// ---------------------------------------------------------------------------

/// Build `<base>/<path>?<query>`, percent-encoding every query value.
pub fn endpoint(base: &str, path: &str, query: &[(&str, &str)]) -> Result<Url> {
    let raw = format!("{}/{}", base.trim_end_matches('/'), path);
    let mut url = Url::parse(&raw).with_context(|| format!("invalid node URL '{raw}'"))?;
    if !query.is_empty() {
        url.query_pairs_mut().extend_pairs(query.iter().copied());
    }
    Ok(url)
}

/// GET `url` and decode the node's JSON answer.
///
/// Never fails: an unreachable node, an empty body, or a body that is not
/// JSON all come back as a synthetic `{"error": ...}` object.
pub fn fetch_json(fetch: &dyn HttpFetch, url: &Url) -> Value {
    log::debug!("GET {url}");
    match fetch.get(url) {
        Ok(body) if body.trim().is_empty() => json!({ "error": NODE_UNREACHABLE }),
        Ok(body) => serde_json::from_str(&body).unwrap_or_else(|e| {
            json!({ "error": format!("malformed response from node: {e}") })
        }),
        Err(e) => {
            log::warn!("{e:#}");
            json!({ "error": format!("{NODE_UNREACHABLE} ({e:#})") })
        }
    }
}

/// Whether a node answer carries an application error.
pub fn is_error(value: &Value) -> bool {
    value.get("error").is_some()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
