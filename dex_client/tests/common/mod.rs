#![allow(dead_code)]

use async_trait::async_trait;
use dex_client::{HttpRequest, HttpResponse, HttpTransport, TransportError};
use std::sync::{Arc, Mutex};

pub const SOL: &str = "So11111111111111111111111111111111111111112";
pub const USDC: &str = "EPjFWdd5AufqSSqeM2qN1xzybapC8G4wEGGkZwyTDt1v";
pub const TOKEN_A: &str = "WskzsKqEW3ZsmrhPAevfVZb6PuuLzWov9mJWZsfDePC";
pub const TOKEN_B: &str = "2uvch6aviS6xE3yhWjVZnFrDw7skUtf6ubc7xYJEPpwj";

/// Answers by the first route whose pattern is contained in the request URL,
/// and records every request it sees
#[derive(Default)]
pub struct ScriptedTransport {
    routes: Vec<(String, Result<HttpResponse, TransportError>)>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(mut self, url_contains: &str, status: u16, body: &str) -> Self {
        self.routes.push((
            url_contains.to_string(),
            Ok(HttpResponse {
                status,
                body: body.to_string(),
            }),
        ));
        self
    }

    pub fn fail(mut self, url_contains: &str, error: TransportError) -> Self {
        self.routes.push((url_contains.to_string(), Err(error)));
        self
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl HttpTransport for ScriptedTransport {
    async fn get(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        self.requests.lock().unwrap().push(request.clone());

        self.routes
            .iter()
            .find(|(pattern, _)| request.url.contains(pattern.as_str()))
            .map(|(_, response)| response.clone())
            .unwrap_or_else(|| {
                Ok(HttpResponse {
                    status: 404,
                    body: format!("no route for {}", request.url),
                })
            })
    }
}

/// Fails the test if any request reaches the network layer
pub struct PanicTransport;

#[async_trait]
impl HttpTransport for PanicTransport {
    async fn get(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        panic!("unexpected network call to {}", request.url);
    }
}

pub fn shared<T: HttpTransport + 'static>(transport: T) -> (Arc<T>, Arc<dyn HttpTransport>) {
    let concrete = Arc::new(transport);
    let dynamic: Arc<dyn HttpTransport> = concrete.clone();
    (concrete, dynamic)
}

pub fn addresses(list: &[&str]) -> Vec<String> {
    list.iter().map(|a| a.to_string()).collect()
}

/// Minimal DexScreener pair JSON
pub fn pair_json(pair: &str, base: &str, quote: &str, price_usd: &str, liquidity_usd: &str) -> String {
    format!(
        r#"{{"chainId": "solana", "dexId": "raydium", "url": "https://dexscreener.com/solana/{pair}",
            "pairAddress": "{pair}",
            "baseToken": {{"address": "{base}", "name": "Token {pair}", "symbol": "T{pair}"}},
            "quoteToken": {{"address": "{quote}", "name": "Quote", "symbol": "Q"}},
            "priceNative": "0.001", "priceUsd": "{price_usd}",
            "liquidity": {{"usd": {liquidity_usd}, "base": 1, "quote": 1}},
            "fdv": 5000000, "marketCap": 4000000.5}}"#
    )
}
