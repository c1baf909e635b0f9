use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub store: StoreSettings,
}

/// Raw store settings as they arrive from file/environment layers. Use
/// [`StoreSettings::access`] to get the validated form; empty strings never
/// reach the writer or reader.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StoreSettings {
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_table")]
    pub table: String,
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
}

fn default_table() -> String {
    "call_logs".to_string()
}

fn default_timeout() -> u64 {
    30
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            url: String::new(),
            api_key: String::new(),
            table: default_table(),
            timeout_seconds: default_timeout(),
        }
    }
}

/// Whether the store is reachable at all. Running without credentials is a
/// supported degraded mode: writes no-op and reads come back empty, so a
/// worker without store access still completes its calls.
#[derive(Debug, Clone)]
pub enum StoreAccess {
    Unconfigured,
    Configured(StoreCredentials),
}

#[derive(Debug, Clone)]
pub struct StoreCredentials {
    pub url: String,
    pub api_key: String,
    pub table: String,
    pub timeout_seconds: u64,
}

impl StoreSettings {
    pub fn access(&self) -> StoreAccess {
        if self.url.is_empty() || self.api_key.is_empty() {
            StoreAccess::Unconfigured
        } else {
            StoreAccess::Configured(StoreCredentials {
                url: self.url.trim_end_matches('/').to_string(),
                api_key: self.api_key.clone(),
                table: self.table.clone(),
                timeout_seconds: self.timeout_seconds,
            })
        }
    }
}

/// Load configuration: optional `ledger.toml`, then `CALL_LEDGER__*`
/// environment variables, then the `SUPABASE_URL`/`SUPABASE_KEY` variables
/// the deployment already exports.
pub fn load_config() -> anyhow::Result<Config> {
    let config = config::Config::builder()
        .add_source(config::File::with_name("ledger").required(false))
        .add_source(config::Environment::with_prefix("CALL_LEDGER").separator("__"))
        .build()?;

    let mut cfg: Config = config.try_deserialize()?;

    if cfg.store.url.is_empty() {
        if let Ok(url) = std::env::var("SUPABASE_URL") {
            cfg.store.url = url;
        }
    }
    if cfg.store.api_key.is_empty() {
        if let Ok(key) = std::env::var("SUPABASE_KEY") {
            cfg.store.api_key = key;
        }
    }

    validate_config(&cfg)?;

    Ok(cfg)
}

fn validate_config(cfg: &Config) -> anyhow::Result<()> {
    // Exactly one credential present is almost always an operator mistake,
    // but it only downgrades to unconfigured mode; warn rather than fail.
    if cfg.store.url.is_empty() != cfg.store.api_key.is_empty() {
        tracing::warn!(
            "store url and api_key must both be set; running in unconfigured mode"
        );
    }

    if cfg.store.table.is_empty() {
        anyhow::bail!("store table name cannot be empty");
    }
    if cfg.store.timeout_seconds == 0 {
        anyhow::bail!("store timeout_seconds must be at least 1");
    }

    Ok(())
}
