use anyhow::Result as AnyResult;
use async_trait::async_trait;
use config_manager::SystemConfig;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

use crate::birdeye_client::BirdEyeProvider;
use crate::dexscreener_client::DexScreenerProvider;
use crate::error::{Result, TokenDataError};
use crate::transport::{HttpTransport, ReqwestTransport};
use crate::types::{PriceInfo, PriceMap, TokenOverview};

/// Price and overview lookups, implemented once per market data provider
#[async_trait]
pub trait TokenDataClient: Send + Sync {
    fn provider(&self) -> Provider;

    /// Prices for every requested address. Fails as a whole unless the client
    /// was built with partial results allowed.
    async fn fetch_prices(&self, addresses: &[String]) -> Result<PriceMap>;

    async fn fetch_token_overview(&self, address: &str) -> Result<TokenOverview>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Provider {
    BirdEye,
    DexScreener,
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Provider::BirdEye => write!(f, "BirdEye"),
            Provider::DexScreener => write!(f, "DexScreener"),
        }
    }
}

impl FromStr for Provider {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "birdeye" => Ok(Provider::BirdEye),
            "dexscreener" | "dex" => Ok(Provider::DexScreener),
            other => Err(format!("Unknown provider: '{}'", other)),
        }
    }
}

/// Build the client for `provider` from loaded configuration, backed by reqwest
pub fn build_client(provider: Provider, config: &SystemConfig) -> AnyResult<Box<dyn TokenDataClient>> {
    let allow_partial = config.client.allow_partial;

    let client: Box<dyn TokenDataClient> = match provider {
        Provider::BirdEye => {
            config.birdeye.validate()?;
            config.birdeye.validate_api_key()?;
            let transport = reqwest_transport(config.birdeye.request_timeout_seconds)?;
            Box::new(
                BirdEyeProvider::with_transport(config.birdeye.clone(), transport)
                    .with_allow_partial(allow_partial),
            )
        }
        Provider::DexScreener => {
            config.dexscreener.validate()?;
            let transport = reqwest_transport(config.dexscreener.request_timeout_seconds)?;
            Box::new(
                DexScreenerProvider::with_transport(config.dexscreener.clone(), transport)
                    .with_allow_partial(allow_partial),
            )
        }
    };

    info!("Built {} token data client (allow_partial: {})", provider, allow_partial);
    Ok(client)
}

pub(crate) fn reqwest_transport(timeout_seconds: u64) -> AnyResult<Arc<dyn HttpTransport>> {
    let transport = ReqwestTransport::new(Duration::from_secs(timeout_seconds))?;
    Ok(Arc::new(transport))
}

/// Turn per-address outcomes (in request order) into the final map.
///
/// Strict mode fails on the first token without data. Partial mode drops such
/// tokens with a warning. Provider failures abort in both modes.
pub(crate) fn assemble_price_map(
    provider: Provider,
    outcomes: Vec<(String, Result<PriceInfo>)>,
    allow_partial: bool,
) -> Result<PriceMap> {
    let requested = outcomes.len();
    let mut prices = PriceMap::with_capacity(requested);

    for (address, outcome) in outcomes {
        match outcome {
            Ok(info) => {
                prices.insert(address, info);
            }
            Err(err @ TokenDataError::InvalidToken { .. }) if allow_partial => {
                warn!("{}: dropping {} from price result: {}", provider, address, err);
            }
            Err(err) => return Err(err),
        }
    }

    info!("✅ {} returned prices for {}/{} tokens", provider, prices.len(), requested);
    Ok(prices)
}
