/// Configuration schema and defaults for the cookbook server.
///
/// Defines the TOML-serializable configuration structure with three sections:
/// `[server]`, `[nodes]` and `[sessions]`.
///
/// Every field has a built-in default. Users only need to set the values they
/// want to override.
use serde::{Deserialize, Serialize};

/// Default listening port.
pub const DEFAULT_PORT: u16 = 1111;

/// Default Nexus node for both transports.
pub const DEFAULT_NODE_URL: &str = "http://localhost:8080";

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

/// Top-level cookbook configuration.
///
/// Maps directly to the `~/.cookbook/config.toml` and `.cookbook.toml` file
/// schemas. Missing sections and fields fall back to built-in defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CookbookConfig {
    pub server: ServerConfig,
    pub nodes: NodesConfig,
    pub sessions: SessionsConfig,
}

// ---------------------------------------------------------------------------
// [server]
// ---------------------------------------------------------------------------

/// Listener settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Interface to bind.
    pub bind: String,
    /// TCP port to listen on.
    pub port: u16,
    /// Number of worker threads pulling requests off the listener.
    pub workers: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0".to_string(),
            port: DEFAULT_PORT,
            workers: 4,
        }
    }
}

impl ServerConfig {
    /// `bind:port` string suitable for `tiny_http::Server::http`.
    pub fn addr(&self) -> String {
        format!("{}:{}", self.bind, self.port)
    }

    /// Worker threads actually spawned. A configured zero still gets one.
    pub fn worker_count(&self) -> usize {
        self.workers.max(1)
    }
}

// ---------------------------------------------------------------------------
// [nodes]
// ---------------------------------------------------------------------------

/// Startup base URLs for the two transports. Both can be changed at runtime
/// from the landing page.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NodesConfig {
    /// Base URL used by the direct (API) transport.
    pub api_url: String,
    /// Base URL used by the client library (SDK) transport.
    pub sdk_url: String,
}

impl Default for NodesConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_NODE_URL.to_string(),
            sdk_url: DEFAULT_NODE_URL.to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// [sessions]
// ---------------------------------------------------------------------------

/// Limits for the login-session registry.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionsConfig {
    /// Maximum number of live sessions; the least recently used one is
    /// dropped when a new login would exceed it.
    pub capacity: usize,
    /// Seconds a session may sit unused before it is forgotten.
    pub idle_timeout_secs: u64,
}

impl Default for SessionsConfig {
    fn default() -> Self {
        Self {
            capacity: 256,
            idle_timeout_secs: 3600,
        }
    }
}

// ---------------------------------------------------------------------------
// Default TOML
// ---------------------------------------------------------------------------

impl CookbookConfig {
    /// Annotated default config written by `cookbook config init`.
    pub fn default_toml() -> String {
        format!(
            r#"# cookbook configuration
#
# Layers: built-in defaults -> ~/.cookbook/config.toml -> ./.cookbook.toml
#         -> COOKBOOK_* environment variables -> command-line flags

[server]
# Interface and port the web UI listens on.
bind = "0.0.0.0"
port = {DEFAULT_PORT}
# Worker threads serving requests.
workers = 4

[nodes]
# Nexus node reached by the API (direct) buttons.
api_url = "{DEFAULT_NODE_URL}"
# Nexus node reached by the SDK (client library) buttons.
sdk_url = "{DEFAULT_NODE_URL}"

[sessions]
# Maximum number of remembered SDK login sessions.
capacity = 256
# Forget a session after this many idle seconds.
idle_timeout_secs = 3600
"#
        )
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_toml_parses_to_defaults() {
        let parsed: CookbookConfig = toml::from_str(&CookbookConfig::default_toml()).unwrap();
        assert_eq!(parsed.server.port, DEFAULT_PORT);
        assert_eq!(parsed.server.bind, "0.0.0.0");
        assert_eq!(parsed.nodes.api_url, DEFAULT_NODE_URL);
        assert_eq!(parsed.nodes.sdk_url, DEFAULT_NODE_URL);
        assert_eq!(parsed.sessions.capacity, 256);
    }

    #[test]
    fn partial_toml_fills_missing_fields() {
        let parsed: CookbookConfig = toml::from_str(
            r#"
[nodes]
api_url = "http://node:9336"
"#,
        )
        .unwrap();
        assert_eq!(parsed.nodes.api_url, "http://node:9336");
        assert_eq!(parsed.nodes.sdk_url, DEFAULT_NODE_URL);
        assert_eq!(parsed.server.port, DEFAULT_PORT);
    }

    #[test]
    fn server_addr_joins_bind_and_port() {
        let server = ServerConfig {
            bind: "127.0.0.1".to_string(),
            port: 2222,
            workers: 1,
        };
        assert_eq!(server.addr(), "127.0.0.1:2222");
    }

    #[test]
    fn zero_workers_still_spawns_one() {
        let mut server = ServerConfig {
            workers: 0,
            ..ServerConfig::default()
        };
        assert_eq!(server.worker_count(), 1);
        server.workers = 6;
        assert_eq!(server.worker_count(), 6);
    }
}
