/*
[INPUT]:  YAML settings file, LAYR0_IMC_* environment, CLI overrides
[OUTPUT]: Parsed connection settings and ready-to-use API clients
[POS]:    Configuration layer - client setup
[UPDATE]: When adding new configuration options
*/

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use config::{Config, Environment, File, Map, Source};
use layr0_imc_adapter::{
    ApiKeyPlacement, ClientConfig, Layr0Client, PositionParams, StrategyClient,
};
use serde::{Deserialize, Serialize};

/// Prefix of environment overrides, e.g. `LAYR0_IMC_API_KEY`
pub const ENV_PREFIX: &str = "LAYR0_IMC";

/// Connection settings for the trading platform
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Settings {
    /// Server base URL
    #[serde(default = "default_host")]
    pub host: String,
    /// API key from the platform's API key page
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Where the key travels: in the JSON body or in a header
    #[serde(default)]
    pub api_key_placement: KeyPlacement,
    /// Header name used with `api_key_placement: header`
    #[serde(default = "default_api_key_header")]
    pub api_key_header: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
    /// Strategy webhook id for `strategy-order`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub webhook_id: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum KeyPlacement {
    #[default]
    Body,
    Header,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            host: default_host(),
            api_key: None,
            api_key_placement: KeyPlacement::Body,
            api_key_header: default_api_key_header(),
            timeout_secs: default_timeout_secs(),
            connect_timeout_secs: default_connect_timeout_secs(),
            webhook_id: None,
        }
    }
}

fn default_host() -> String {
    "http://127.0.0.1:5000".to_string()
}

fn default_api_key_header() -> String {
    layr0_imc_adapter::http::DEFAULT_API_KEY_HEADER.to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_connect_timeout_secs() -> u64 {
    10
}

impl Settings {
    /// `<config dir>/layr0-imc/config.yaml`, if the platform has a config dir
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("layr0-imc").join("config.yaml"))
    }

    /// Load settings: defaults, then the file, then the environment.
    ///
    /// An explicit `path` must exist; the default path is optional.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let file = match path {
            Some(path) => Some(File::from(path).required(true)),
            None => Self::default_path().map(|path| File::from(path).required(false)),
        };
        Self::load_from(file, None)
    }

    /// Layer `file` and the environment (or `env_vars` in place of the
    /// process environment) over the defaults.
    pub fn load_from<S>(file: Option<S>, env_vars: Option<Map<String, String>>) -> Result<Self>
    where
        S: Source + Send + Sync + 'static,
    {
        let mut builder = Config::builder();
        if let Some(file) = file {
            builder = builder.add_source(file);
        }
        builder = builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .source(env_vars),
        );

        let settings: Settings = builder
            .build()
            .context("read settings sources")?
            .try_deserialize()
            .context("parse settings")?;
        Ok(settings)
    }

    /// Apply command-line overrides
    pub fn with_overrides(mut self, host: Option<String>, api_key: Option<String>) -> Self {
        if let Some(host) = host {
            self.host = host;
        }
        if let Some(api_key) = api_key {
            self.api_key = Some(api_key);
        }
        self
    }

    pub fn client_config(&self) -> ClientConfig {
        let api_key_placement = match self.api_key_placement {
            KeyPlacement::Body => ApiKeyPlacement::Body,
            KeyPlacement::Header => ApiKeyPlacement::Header {
                name: self.api_key_header.clone(),
            },
        };
        ClientConfig {
            timeout: Duration::from_secs(self.timeout_secs),
            connect_timeout: Duration::from_secs(self.connect_timeout_secs),
            api_key_placement,
        }
    }

    pub fn margin_client(&self) -> Result<Layr0Client> {
        let api_key = self
            .api_key
            .as_deref()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| {
                anyhow!("api key not configured; set api_key, {ENV_PREFIX}_API_KEY or --api-key")
            })?;
        Layr0Client::with_config(&self.host, api_key, self.client_config())
            .context("create margin client")
    }

    pub fn strategy_client(&self, webhook_id: Option<String>) -> Result<StrategyClient> {
        let webhook_id = webhook_id
            .or_else(|| self.webhook_id.clone())
            .ok_or_else(|| anyhow!("webhook id not configured; set webhook_id or --webhook-id"))?;
        StrategyClient::with_config(&self.host, webhook_id, &self.client_config())
            .context("create strategy client")
    }

    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).context("serialize settings")
    }

    /// Write settings as YAML, creating parent directories
    pub fn write_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("create {}", parent.display()))?;
        }
        std::fs::write(path, self.to_yaml()?)
            .with_context(|| format!("write {}", path.display()))
    }
}

/// Positions file: either a bare list or `positions: [...]`
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum PositionsFile {
    Wrapped { positions: Vec<PositionParams> },
    Bare(Vec<PositionParams>),
}

/// Load legs from a YAML (or JSON) file
pub fn load_positions(path: &Path) -> Result<Vec<PositionParams>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("read positions file {}", path.display()))?;
    parse_positions(&content).with_context(|| format!("parse positions file {}", path.display()))
}

pub fn parse_positions(content: &str) -> Result<Vec<PositionParams>> {
    let file: PositionsFile = serde_yaml::from_str(content)?;
    Ok(match file {
        PositionsFile::Wrapped { positions } => positions,
        PositionsFile::Bare(positions) => positions,
    })
}
