use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

use crate::decimal::decimal_from_json;

/// Spot price and liquidity for one token, both in USD
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceInfo {
    pub price: Decimal,
    pub liquidity: Decimal,
}

/// One entry per requested address
pub type PriceMap = HashMap<String, PriceInfo>;

/// Descriptive snapshot of a token. The first five fields are always populated;
/// the rest depend on what the provider reports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenOverview {
    pub name: String,
    pub symbol: String,
    pub price: Decimal,
    pub liquidity: Decimal,
    pub market_cap: Decimal,
    pub decimals: Option<u8>,
    pub fdv: Option<Decimal>,
    pub pair_address: Option<String>,
}

/// DexScreener trading pair. Only the fields the client reads are kept; the
/// rest of the payload is ignored. Numeric fields stay as raw JSON so each
/// caller decides how strictly to decode them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradingPair {
    #[serde(rename = "chainId", default)]
    pub chain_id: String,
    #[serde(rename = "dexId", default)]
    pub dex_id: String,
    #[serde(default)]
    pub url: String,
    #[serde(rename = "pairAddress", default)]
    pub pair_address: String,
    #[serde(rename = "baseToken", default)]
    pub base_token: PairToken,
    #[serde(rename = "quoteToken", default)]
    pub quote_token: PairToken,
    #[serde(rename = "priceNative", default)]
    pub price_native: Option<Value>,
    #[serde(rename = "priceUsd", default)]
    pub price_usd: Option<Value>,
    #[serde(default)]
    pub liquidity: Option<PairLiquidity>,
    #[serde(default)]
    pub fdv: Option<Value>,
    #[serde(rename = "marketCap", default)]
    pub market_cap: Option<Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PairToken {
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub symbol: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PairLiquidity {
    #[serde(default)]
    pub usd: Option<Value>,
    #[serde(default)]
    pub base: Option<Value>,
    #[serde(default)]
    pub quote: Option<Value>,
}

impl TradingPair {
    /// USD liquidity for ranking pools; absent or unparseable counts as zero
    pub fn liquidity_usd(&self) -> Decimal {
        self.liquidity
            .as_ref()
            .and_then(|l| l.usd.as_ref())
            .and_then(decimal_from_json)
            .unwrap_or(Decimal::ZERO)
    }

    /// USD price if the pair reports a numeric one
    pub fn price_usd_decimal(&self) -> Option<Decimal> {
        self.price_usd.as_ref().and_then(decimal_from_json)
    }
}
