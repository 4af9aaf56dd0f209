use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;
use tracing::{debug, info};

/// Native wrapped-SOL mint, the canonical quote token for pool selection
pub const SOL_MINT: &str = "So11111111111111111111111111111111111111112";

#[derive(Error, Debug)]
pub enum ConfigurationError {
    #[error("Configuration loading error: {0}")]
    ConfigLoad(#[from] ConfigError),
    #[error("Invalid configuration value: {0}")]
    InvalidValue(String),
}

pub type Result<T> = std::result::Result<T, ConfigurationError>;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemConfig {
    /// BirdEye API configuration
    pub birdeye: BirdEyeConfig,

    /// DexScreener API configuration
    pub dexscreener: DexScreenerConfig,

    /// Provider selection and result policy
    pub client: ClientSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BirdEyeConfig {
    /// BirdEye API key, sent as `X-API-KEY`
    pub api_key: String,

    /// BirdEye API base URL
    pub api_base_url: String,

    /// Request timeout in seconds
    pub request_timeout_seconds: u64,

    /// Value of the `x-chain` header
    pub chain: String,

    /// Maximum addresses per multi_price request
    pub max_batch_size: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DexScreenerConfig {
    /// DexScreener API base URL
    pub api_base_url: String,

    /// Request timeout in seconds
    pub request_timeout_seconds: u64,

    /// Chain path segment used by the tokens endpoint
    pub chain_id: String,

    /// Quote token preferred when picking the reference pool
    pub quote_address: String,

    /// Maximum addresses per tokens request (API limit is 30)
    pub max_batch_size: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientSettings {
    /// Provider used when the caller does not pick one: "birdeye" or "dexscreener"
    pub default_provider: String,

    /// Drop tokens the provider has no data for instead of failing the whole call
    pub allow_partial: bool,
}

impl Default for BirdEyeConfig {
    fn default() -> Self {
        Self {
            api_key: "".to_string(), // Must be set in config.toml or environment
            api_base_url: "https://public-api.birdeye.so".to_string(),
            request_timeout_seconds: 30,
            chain: "solana".to_string(),
            max_batch_size: 100,
        }
    }
}

impl Default for DexScreenerConfig {
    fn default() -> Self {
        Self {
            api_base_url: "https://api.dexscreener.com".to_string(),
            request_timeout_seconds: 30,
            chain_id: "solana".to_string(),
            quote_address: SOL_MINT.to_string(),
            max_batch_size: 30,
        }
    }
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            default_provider: "dexscreener".to_string(),
            allow_partial: false,
        }
    }
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            birdeye: BirdEyeConfig::default(),
            dexscreener: DexScreenerConfig::default(),
            client: ClientSettings::default(),
        }
    }
}

impl BirdEyeConfig {
    /// Validate BirdEye configuration. The API key is checked separately since
    /// it is only required when BirdEye is actually used.
    pub fn validate(&self) -> Result<()> {
        if self.api_base_url.trim().is_empty() {
            return Err(ConfigurationError::InvalidValue(
                "BirdEye API base URL cannot be empty".to_string(),
            ));
        }

        if self.request_timeout_seconds == 0 {
            return Err(ConfigurationError::InvalidValue(
                "Request timeout must be greater than 0".to_string(),
            ));
        }

        if self.max_batch_size == 0 {
            return Err(ConfigurationError::InvalidValue(
                "BirdEye batch size must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }

    pub fn validate_api_key(&self) -> Result<()> {
        if self.api_key.trim().is_empty() {
            return Err(ConfigurationError::InvalidValue(
                "BirdEye API key is required".to_string(),
            ));
        }
        Ok(())
    }
}

impl DexScreenerConfig {
    /// Validate DexScreener configuration
    pub fn validate(&self) -> Result<()> {
        if self.api_base_url.trim().is_empty() {
            return Err(ConfigurationError::InvalidValue(
                "DexScreener API base URL cannot be empty".to_string(),
            ));
        }

        if self.request_timeout_seconds == 0 {
            return Err(ConfigurationError::InvalidValue(
                "Request timeout must be greater than 0".to_string(),
            ));
        }

        if self.max_batch_size == 0 {
            return Err(ConfigurationError::InvalidValue(
                "DexScreener batch size must be greater than 0".to_string(),
            ));
        }

        if self.quote_address.trim().is_empty() {
            return Err(ConfigurationError::InvalidValue(
                "DexScreener quote address cannot be empty".to_string(),
            ));
        }

        Ok(())
    }
}

impl SystemConfig {
    /// Load configuration from file and environment variables
    pub fn load() -> Result<Self> {
        Self::load_from_path("config.toml")
    }

    /// Load configuration from a specific file path
    pub fn load_from_path<P: AsRef<Path>>(config_path: P) -> Result<Self> {
        let mut config_builder = Config::builder()
            // Start with defaults
            .add_source(Config::try_from(&SystemConfig::default())?);

        if config_path.as_ref().exists() {
            info!(
                "Loading configuration from: {}",
                config_path.as_ref().display()
            );
            config_builder = config_builder.add_source(File::from(config_path.as_ref()));
        } else {
            debug!("Config file not found, using defaults and environment variables");
        }

        // e.g. TOKEN_DATA__BIRDEYE__API_KEY
        config_builder = config_builder.add_source(
            Environment::with_prefix("TOKEN_DATA")
                .try_parsing(true)
                .separator("__"),
        );

        let mut system_config: SystemConfig = config_builder.build()?.try_deserialize()?;

        system_config.birdeye.chain = normalize_chain(&system_config.birdeye.chain)
            .map_err(ConfigurationError::InvalidValue)?;
        system_config.dexscreener.chain_id = normalize_chain(&system_config.dexscreener.chain_id)
            .map_err(ConfigurationError::InvalidValue)?;
        system_config.client.default_provider =
            system_config.client.default_provider.trim().to_lowercase();

        system_config.validate()?;

        Ok(system_config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        self.birdeye.validate()?;
        self.dexscreener.validate()?;

        match self.client.default_provider.as_str() {
            "birdeye" => self.birdeye.validate_api_key()?,
            "dexscreener" => {}
            other => {
                return Err(ConfigurationError::InvalidValue(format!(
                    "Unknown default provider: '{}'",
                    other
                )))
            }
        }

        Ok(())
    }
}

/// Normalize a chain name to the identifier both providers use for Solana.
/// Only Solana is supported.
pub fn normalize_chain(input: &str) -> std::result::Result<String, String> {
    match input.trim().to_lowercase().as_str() {
        "solana" | "sol" => Ok("solana".to_string()),
        _ => Err(format!("Unsupported chain: '{}'", input)),
    }
}
