use async_trait::async_trait;
use config_manager::DexScreenerConfig;
use futures::future::try_join_all;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

use crate::address::{validate_address, validate_addresses};
use crate::decimal::{decimal_from_json, optional_decimal, required_decimal};
use crate::error::{Result, TokenDataError};
use crate::pool_selector::select_reference_pool;
use crate::token_data_client::{assemble_price_map, reqwest_transport, Provider, TokenDataClient};
use crate::transport::{HttpRequest, HttpTransport};
use crate::types::{PriceInfo, PriceMap, TokenOverview, TradingPair};

/// Legacy `/latest/dex/tokens` shape
#[derive(Debug, Deserialize)]
struct PairsEnvelope {
    #[serde(default)]
    pairs: Option<Vec<TradingPair>>,
}

/// DexScreener-backed token data client. Prices come from each token's
/// reference pool, preferring pairs quoted in the configured quote token.
#[derive(Clone)]
pub struct DexScreenerProvider {
    config: DexScreenerConfig,
    transport: Arc<dyn HttpTransport>,
    allow_partial: bool,
}

impl DexScreenerProvider {
    pub fn new(config: DexScreenerConfig) -> anyhow::Result<Self> {
        let transport = reqwest_transport(config.request_timeout_seconds)?;
        Ok(Self::with_transport(config, transport))
    }

    pub fn with_transport(config: DexScreenerConfig, transport: Arc<dyn HttpTransport>) -> Self {
        Self {
            config,
            transport,
            allow_partial: false,
        }
    }

    pub fn with_allow_partial(mut self, allow_partial: bool) -> Self {
        self.allow_partial = allow_partial;
        self
    }

    pub fn get_config(&self) -> &DexScreenerConfig {
        &self.config
    }

    /// Raw trading pairs for one token, for callers that want to run pool
    /// selection themselves
    pub async fn fetch_token_pairs(&self, address: &str) -> Result<Vec<TradingPair>> {
        validate_address(address)?;
        self.get_pairs(&[address.to_string()]).await
    }

    fn tokens_endpoint(&self) -> String {
        format!("/tokens/v1/{}", self.config.chain_id)
    }

    async fn get_pairs(&self, addresses: &[String]) -> Result<Vec<TradingPair>> {
        let endpoint = self.tokens_endpoint();
        let url = format!(
            "{}{}/{}",
            self.config.api_base_url.trim_end_matches('/'),
            endpoint,
            addresses.join(",")
        );
        debug!("🔍 Fetching DexScreener pairs for {} tokens from: {}", addresses.len(), url);

        let request = HttpRequest::get(url).header("accept", "application/json");
        let response = self
            .transport
            .get(request)
            .await
            .map_err(|e| TokenDataError::from_transport(Provider::DexScreener, &endpoint, e))?;

        if !response.is_success() {
            warn!(
                "DexScreener API error on {}: HTTP {} - {}",
                endpoint, response.status, response.body
            );
            return Err(TokenDataError::provider_status(
                Provider::DexScreener,
                &endpoint,
                response.status,
            ));
        }

        let pairs = parse_pairs(&response.body).map_err(|e| {
            error!("DexScreener returned unparseable body on {}: {}", endpoint, e);
            TokenDataError::provider_fault(Provider::DexScreener, &endpoint, format!("invalid JSON: {}", e))
        })?;

        debug!("📊 Retrieved {} pairs from DexScreener", pairs.len());
        Ok(pairs)
    }

    async fn fetch_price_chunk(&self, chunk: &[String]) -> Result<Vec<(String, Result<PriceInfo>)>> {
        let pairs = self.get_pairs(chunk).await?;

        Ok(chunk
            .iter()
            .map(|address| {
                let outcome = self.reference_pool(&pairs, address).and_then(|pool| {
                    price_info_from_pool(pool, address)
                });
                (address.clone(), outcome)
            })
            .collect())
    }

    fn reference_pool<'a>(&self, pairs: &'a [TradingPair], address: &str) -> Result<&'a TradingPair> {
        select_reference_pool(pairs, address, &self.config.quote_address)
            .ok_or_else(|| TokenDataError::invalid_token(address, "no trading pairs found"))
    }
}

/// The tokens endpoint answers with a bare array; older endpoints wrap it in `{"pairs": [...]}`
fn parse_pairs(body: &str) -> serde_json::Result<Vec<TradingPair>> {
    if body.trim_start().starts_with('{') {
        let envelope: PairsEnvelope = serde_json::from_str(body)?;
        Ok(envelope.pairs.unwrap_or_default())
    } else {
        serde_json::from_str(body)
    }
}

fn pool_price(pool: &TradingPair, address: &str) -> Result<Decimal> {
    required_decimal(pool.price_usd.as_ref(), address, "priceUsd")
}

fn pool_liquidity(pool: &TradingPair) -> Option<&Value> {
    pool.liquidity.as_ref().and_then(|l| l.usd.as_ref())
}

fn price_info_from_pool(pool: &TradingPair, address: &str) -> Result<PriceInfo> {
    Ok(PriceInfo {
        price: pool_price(pool, address)?,
        liquidity: optional_decimal(pool_liquidity(pool), address, "liquidity.usd")?,
    })
}

fn overview_from_pool(pool: &TradingPair, address: &str) -> Result<TokenOverview> {
    if pool.base_token.name.is_empty() || pool.base_token.symbol.is_empty() {
        return Err(TokenDataError::invalid_token(address, "pool is missing token name or symbol"));
    }

    let price = pool_price(pool, address)?;
    let liquidity = required_decimal(pool_liquidity(pool), address, "liquidity.usd")?;
    // Pairs without a circulating supply only report fdv
    let market_cap = match pool.market_cap.as_ref() {
        Some(v) if !v.is_null() => required_decimal(Some(v), address, "marketCap")?,
        _ => required_decimal(pool.fdv.as_ref(), address, "marketCap")?,
    };

    Ok(TokenOverview {
        name: pool.base_token.name.clone(),
        symbol: pool.base_token.symbol.clone(),
        price,
        liquidity,
        market_cap,
        decimals: None,
        fdv: pool.fdv.as_ref().and_then(decimal_from_json),
        pair_address: Some(pool.pair_address.clone()).filter(|p| !p.is_empty()),
    })
}

#[async_trait]
impl TokenDataClient for DexScreenerProvider {
    fn provider(&self) -> Provider {
        Provider::DexScreener
    }

    async fn fetch_prices(&self, addresses: &[String]) -> Result<PriceMap> {
        let addresses = validate_addresses(addresses)?;

        let chunks: Vec<&[String]> = addresses.chunks(self.config.max_batch_size.max(1)).collect();
        debug!(
            "Fetching DexScreener prices for {} tokens in {} request(s)",
            addresses.len(),
            chunks.len()
        );

        let outcomes = try_join_all(chunks.into_iter().map(|chunk| self.fetch_price_chunk(chunk)))
            .await?
            .into_iter()
            .flatten()
            .collect();

        assemble_price_map(Provider::DexScreener, outcomes, self.allow_partial)
    }

    async fn fetch_token_overview(&self, address: &str) -> Result<TokenOverview> {
        let pairs = self.fetch_token_pairs(address).await?;
        let pool = self.reference_pool(&pairs, address)?;
        let overview = overview_from_pool(pool, address)?;

        info!(
            "📊 Retrieved DexScreener overview for {} ({}) from pool {}",
            overview.symbol, address, pool.pair_address
        );
        Ok(overview)
    }
}
