/// Configuration system for the cookbook.
///
/// Provides a layered configuration hierarchy:
///
/// 1. **Built-in defaults**: hardcoded in [`schema::CookbookConfig::default()`]
/// 2. **User global config**: `~/.cookbook/config.toml`
/// 3. **Project local config**: `.cookbook.toml` in the current working directory
/// 4. **Environment variables**: `COOKBOOK_*` overrides
///
/// Command-line flags are applied on top by `main`. Later layers override
/// earlier ones key by key: a file that sets one value leaves every other value
/// to the layers below it.
pub mod schema;

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};

pub use schema::CookbookConfig;

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Load the fully resolved configuration.
///
/// Merges all layers in order: defaults → global TOML → project TOML → env
/// vars. A file only overrides the keys it sets; everything else keeps the
/// value from the layer below.
pub fn load() -> CookbookConfig {
    let files = [global_config_path(), project_config_path()];
    let layers = files.into_iter().filter_map(load_toml_file).collect();
    let mut config = merge_layers(layers);
    apply_env_overrides(&mut config);
    config
}

/// Read one TOML layer from `path` (if it exists).
///
/// Malformed files, and files whose values do not fit the schema, are logged
/// and skipped so a typo never keeps the server from starting.
fn load_toml_file(path: Option<PathBuf>) -> Option<toml::Value> {
    let path = path?;
    let content = fs::read_to_string(&path).ok()?;
    match parse_layer(&content) {
        Ok(layer) => Some(layer),
        Err(e) => {
            log::warn!("ignoring malformed config {}: {e:#}", path.display());
            None
        }
    }
}

/// Parse a TOML layer and check it against the schema on its own.
fn parse_layer(content: &str) -> Result<toml::Value> {
    let layer: toml::Value = toml::from_str(content).context("invalid TOML")?;
    layer
        .clone()
        .try_into::<CookbookConfig>()
        .context("values do not match the config schema")?;
    Ok(layer)
}

/// Deep-merge `layers` over the built-in defaults, later layers winning.
fn merge_layers(layers: Vec<toml::Value>) -> CookbookConfig {
    let Ok(mut merged) = toml::Value::try_from(CookbookConfig::default()) else {
        return CookbookConfig::default();
    };
    for layer in layers {
        merge_value(&mut merged, layer);
    }
    merged.try_into().unwrap_or_else(|e| {
        log::warn!("merged config is invalid, using defaults: {e}");
        CookbookConfig::default()
    })
}

/// Overlay `overlay` onto `base`. Tables merge key by key; any other value
/// replaces what was there.
fn merge_value(base: &mut toml::Value, overlay: toml::Value) {
    match (base, overlay) {
        (toml::Value::Table(base), toml::Value::Table(overlay)) => {
            for (key, value) in overlay {
                match base.get_mut(&key) {
                    Some(existing) => merge_value(existing, value),
                    None => {
                        base.insert(key, value);
                    }
                }
            }
        }
        (base, overlay) => *base = overlay,
    }
}

// ---------------------------------------------------------------------------
// File paths
// ---------------------------------------------------------------------------

/// Path to the user global config: `~/.cookbook/config.toml`.
fn global_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".cookbook").join("config.toml"))
}

/// Path to the project local config: `.cookbook.toml` in the current directory.
fn project_config_path() -> Option<PathBuf> {
    std::env::current_dir()
        .ok()
        .map(|cwd| cwd.join(".cookbook.toml"))
}

/// Return the path to the global config file for display/init purposes.
pub fn global_config_file() -> Option<PathBuf> {
    global_config_path()
}

/// Return the path to the project config file for display purposes.
pub fn project_config_file() -> Option<PathBuf> {
    project_config_path()
}

// ---------------------------------------------------------------------------
// Environment variable overrides
// ---------------------------------------------------------------------------

/// Apply environment variable overrides.
///
/// Supported variables:
/// - `COOKBOOK_BIND`: listen interface
/// - `COOKBOOK_PORT`: listen port
/// - `COOKBOOK_WORKERS`: worker thread count
/// - `COOKBOOK_API_URL`: direct transport base URL
/// - `COOKBOOK_SDK_URL`: client library base URL
/// - `COOKBOOK_SESSION_CAPACITY`: session registry bound
/// - `COOKBOOK_SESSION_IDLE_SECS`: session idle timeout
fn apply_env_overrides(config: &mut CookbookConfig) {
    apply_overrides(config, |key| std::env::var(key).ok());
}

fn apply_overrides(config: &mut CookbookConfig, var: impl Fn(&str) -> Option<String>) {
    if let Some(val) = var("COOKBOOK_BIND")
        && !val.is_empty()
    {
        config.server.bind = val;
    }
    if let Some(val) = var("COOKBOOK_PORT")
        && let Ok(port) = val.parse::<u16>()
    {
        config.server.port = port;
    }
    if let Some(val) = var("COOKBOOK_WORKERS")
        && let Ok(n) = val.parse::<usize>()
        && n > 0
    {
        config.server.workers = n;
    }
    if let Some(val) = var("COOKBOOK_API_URL")
        && !val.is_empty()
    {
        config.nodes.api_url = val;
    }
    if let Some(val) = var("COOKBOOK_SDK_URL")
        && !val.is_empty()
    {
        config.nodes.sdk_url = val;
    }
    if let Some(val) = var("COOKBOOK_SESSION_CAPACITY")
        && let Ok(n) = val.parse::<usize>()
    {
        config.sessions.capacity = n;
    }
    if let Some(val) = var("COOKBOOK_SESSION_IDLE_SECS")
        && let Ok(secs) = val.parse::<u64>()
    {
        config.sessions.idle_timeout_secs = secs;
    }
}

// ---------------------------------------------------------------------------
// Config init / show
// ---------------------------------------------------------------------------

/// Write the default annotated config to `~/.cookbook/config.toml`.
///
/// Returns an error if the file already exists (use `force = true` to
/// overwrite).
pub fn init_config(force: bool) -> Result<PathBuf> {
    let path = global_config_path().context("could not determine home directory")?;

    if path.exists() && !force {
        anyhow::bail!(
            "config file already exists at {}. Use --force to overwrite.",
            path.display()
        );
    }

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).context("failed to create ~/.cookbook/ directory")?;
    }

    fs::write(&path, CookbookConfig::default_toml()).context("failed to write config file")?;

    Ok(path)
}

/// Show the effective (fully resolved) config as TOML.
pub fn show_effective_config() -> Result<String> {
    let config = load();
    toml::to_string_pretty(&config).context("failed to serialize effective config")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
