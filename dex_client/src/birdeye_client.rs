use async_trait::async_trait;
use config_manager::BirdEyeConfig;
use futures::future::try_join_all;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

use crate::address::{validate_address, validate_addresses};
use crate::decimal::{decimal_from_json, optional_decimal, required_decimal};
use crate::error::{Result, TokenDataError};
use crate::token_data_client::{assemble_price_map, reqwest_transport, Provider, TokenDataClient};
use crate::transport::{HttpRequest, HttpTransport};
use crate::types::{PriceInfo, PriceMap, TokenOverview};

const MULTI_PRICE_PATH: &str = "/defi/multi_price";
const TOKEN_OVERVIEW_PATH: &str = "/defi/token_overview";

/// BirdEye-backed token data client
#[derive(Clone)]
pub struct BirdEyeProvider {
    config: BirdEyeConfig,
    transport: Arc<dyn HttpTransport>,
    allow_partial: bool,
}

impl BirdEyeProvider {
    pub fn new(config: BirdEyeConfig) -> anyhow::Result<Self> {
        let transport = reqwest_transport(config.request_timeout_seconds)?;
        Ok(Self::with_transport(config, transport))
    }

    pub fn with_transport(config: BirdEyeConfig, transport: Arc<dyn HttpTransport>) -> Self {
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

    /// Get the BirdEye client configuration
    pub fn config(&self) -> &BirdEyeConfig {
        &self.config
    }

    fn request(&self, path: &str) -> HttpRequest {
        let url = format!("{}{}", self.config.api_base_url.trim_end_matches('/'), path);
        HttpRequest::get(url)
            .header("accept", "application/json")
            .header("x-chain", self.config.chain.as_str())
            .header("X-API-KEY", self.config.api_key.as_str())
    }

    /// Send a request and unwrap BirdEye's `{success, data}` envelope
    async fn get_data(&self, request: HttpRequest, endpoint: &str) -> Result<Value> {
        let response = self
            .transport
            .get(request)
            .await
            .map_err(|e| TokenDataError::from_transport(Provider::BirdEye, endpoint, e))?;

        if response.status == 429 {
            warn!("BirdEye rate limit hit on {}", endpoint);
            return Err(TokenDataError::provider_status(Provider::BirdEye, endpoint, 429));
        }

        if !response.is_success() {
            error!(
                "BirdEye API error on {}: HTTP {} - Body: {}",
                endpoint, response.status, response.body
            );
            return Err(TokenDataError::provider_status(
                Provider::BirdEye,
                endpoint,
                response.status,
            ));
        }

        let mut envelope: Value = serde_json::from_str(&response.body).map_err(|e| {
            error!("BirdEye returned unparseable body on {}: {}", endpoint, e);
            TokenDataError::provider_fault(Provider::BirdEye, endpoint, format!("invalid JSON: {}", e))
        })?;

        if !envelope.get("success").and_then(Value::as_bool).unwrap_or(false) {
            return Err(TokenDataError::provider_fault(
                Provider::BirdEye,
                endpoint,
                "API returned success=false",
            ));
        }

        Ok(envelope.get_mut("data").map(Value::take).unwrap_or(Value::Null))
    }

    /// One multi_price call; each address gets its own outcome
    async fn fetch_price_chunk(&self, chunk: &[String]) -> Result<Vec<(String, Result<PriceInfo>)>> {
        debug!("Fetching BirdEye prices for {} tokens", chunk.len());

        let request = self
            .request(MULTI_PRICE_PATH)
            .query("list_address", chunk.join(","))
            .query("include_liquidity", "true");
        let data = self.get_data(request, MULTI_PRICE_PATH).await?;

        Ok(chunk
            .iter()
            .map(|address| {
                let outcome = match data.get(address.as_str()) {
                    None | Some(Value::Null) => Err(TokenDataError::invalid_token(
                        address,
                        "no price data returned",
                    )),
                    Some(entry) => price_info_from_entry(entry, address),
                };
                (address.clone(), outcome)
            })
            .collect())
    }
}

fn price_info_from_entry(entry: &Value, address: &str) -> Result<PriceInfo> {
    Ok(PriceInfo {
        price: required_decimal(entry.get("value"), address, "value")?,
        liquidity: optional_decimal(entry.get("liquidity"), address, "liquidity")?,
    })
}

fn required_str(data: &Value, address: &str, field: &str) -> Result<String> {
    data.get(field)
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| TokenDataError::invalid_token(address, format!("missing field '{}'", field)))
}

fn overview_from_data(data: &Value, address: &str) -> Result<TokenOverview> {
    if !data.is_object() {
        return Err(TokenDataError::invalid_token(address, "no overview data returned"));
    }

    // Newer payloads use `marketCap`, older ones `mc`
    let market_cap_field = match data.get("marketCap") {
        Some(v) if !v.is_null() => Some(v),
        _ => data.get("mc"),
    };

    Ok(TokenOverview {
        name: required_str(data, address, "name")?,
        symbol: required_str(data, address, "symbol")?,
        price: required_decimal(data.get("price"), address, "price")?,
        liquidity: required_decimal(data.get("liquidity"), address, "liquidity")?,
        market_cap: required_decimal(market_cap_field, address, "marketCap")?,
        decimals: data
            .get("decimals")
            .and_then(Value::as_u64)
            .and_then(|d| u8::try_from(d).ok()),
        fdv: data.get("fdv").and_then(decimal_from_json),
        pair_address: None,
    })
}

#[async_trait]
impl TokenDataClient for BirdEyeProvider {
    fn provider(&self) -> Provider {
        Provider::BirdEye
    }

    async fn fetch_prices(&self, addresses: &[String]) -> Result<PriceMap> {
        let addresses = validate_addresses(addresses)?;

        let chunks: Vec<&[String]> = addresses.chunks(self.config.max_batch_size.max(1)).collect();
        debug!(
            "Fetching BirdEye prices for {} tokens in {} request(s)",
            addresses.len(),
            chunks.len()
        );

        let outcomes = try_join_all(chunks.into_iter().map(|chunk| self.fetch_price_chunk(chunk)))
            .await?
            .into_iter()
            .flatten()
            .collect();

        assemble_price_map(Provider::BirdEye, outcomes, self.allow_partial)
    }

    async fn fetch_token_overview(&self, address: &str) -> Result<TokenOverview> {
        validate_address(address)?;
        debug!("Fetching BirdEye token overview for: {}", address);

        let request = self.request(TOKEN_OVERVIEW_PATH).query("address", address);
        let data = self.get_data(request, TOKEN_OVERVIEW_PATH).await?;
        let overview = overview_from_data(&data, address)?;

        info!(
            "Retrieved BirdEye overview for {} ({}): ${}",
            overview.symbol, address, overview.price
        );
        Ok(overview)
    }
}
