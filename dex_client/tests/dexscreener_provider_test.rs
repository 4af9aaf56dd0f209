mod common;

use common::*;
use dex_client::{DexScreenerConfig, DexScreenerProvider, Provider, TokenDataClient, TokenDataError};
use rust_decimal_macros::dec;

fn config() -> DexScreenerConfig {
    DexScreenerConfig {
        api_base_url: "https://dexscreener.test".to_string(),
        ..DexScreenerConfig::default()
    }
}

fn pairs_body() -> String {
    format!(
        "[{}, {}, {}, {}]",
        pair_json("a-small", TOKEN_A, SOL, "0.0105", "100"),
        pair_json("a-big", TOKEN_A, SOL, "0.0110", "500.25"),
        pair_json("a-usdc", TOKEN_A, USDC, "0.0200", "9000"),
        pair_json("b-usdc", TOKEN_B, USDC, "1.5", "42"),
    )
}

#[tokio::test]
async fn test_fetch_prices_uses_largest_sol_pool() {
    let (transport, dynamic) = shared(ScriptedTransport::new().respond("/tokens/v1/solana/", 200, &pairs_body()));
    let client = DexScreenerProvider::with_transport(config(), dynamic);

    let prices = client
        .fetch_prices(&addresses(&[TOKEN_A, TOKEN_B]))
        .await
        .unwrap();

    assert_eq!(prices.len(), 2);
    assert_eq!(prices[TOKEN_A].price, dec!(0.0110));
    assert_eq!(prices[TOKEN_A].liquidity, dec!(500.25));
    // no SOL pool for B, so its largest pool of any quote is used
    assert_eq!(prices[TOKEN_B].price, dec!(1.5));
    assert_eq!(prices[TOKEN_B].liquidity, dec!(42));

    let requests = transport.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(
        requests[0].url,
        format!("https://dexscreener.test/tokens/v1/solana/{},{}", TOKEN_A, TOKEN_B)
    );
    assert_eq!(requests[0].header_value("X-API-KEY"), None);
}

#[tokio::test]
async fn test_token_without_pairs_fails_call() {
    let body = format!("[{}]", pair_json("a-big", TOKEN_A, SOL, "0.0110", "500"));
    let (_, dynamic) = shared(ScriptedTransport::new().respond("/tokens/v1/solana/", 200, &body));
    let client = DexScreenerProvider::with_transport(config(), dynamic);

    let err = client
        .fetch_prices(&addresses(&[TOKEN_A, TOKEN_B]))
        .await
        .unwrap_err();

    assert_eq!(
        err,
        TokenDataError::InvalidToken {
            address: TOKEN_B.to_string(),
            reason: "no trading pairs found".to_string()
        }
    );
}

#[tokio::test]
async fn test_token_without_pairs_dropped_in_partial_mode() {
    let body = format!("[{}]", pair_json("a-big", TOKEN_A, SOL, "0.0110", "500"));
    let (_, dynamic) = shared(ScriptedTransport::new().respond("/tokens/v1/solana/", 200, &body));
    let client = DexScreenerProvider::with_transport(config(), dynamic).with_allow_partial(true);

    let prices = client
        .fetch_prices(&addresses(&[TOKEN_A, TOKEN_B]))
        .await
        .unwrap();

    assert_eq!(prices.len(), 1);
    assert_eq!(prices[TOKEN_A].price, dec!(0.0110));
}

#[tokio::test]
async fn test_non_success_status_is_provider_failure() {
    let (_, dynamic) = shared(ScriptedTransport::new().respond("/tokens/v1/solana/", 429, "Too Many Requests"));
    let client = DexScreenerProvider::with_transport(config(), dynamic);

    let err = client.fetch_prices(&addresses(&[TOKEN_A])).await.unwrap_err();
    assert_eq!(
        err,
        TokenDataError::ProviderRequestFailed {
            provider: Provider::DexScreener,
            endpoint: "/tokens/v1/solana".to_string(),
            status: Some(429),
            reason: "HTTP 429".to_string(),
        }
    );
}

#[tokio::test]
async fn test_chunks_respect_batch_size() {
    let (transport, dynamic) = shared(ScriptedTransport::new().respond("/tokens/v1/solana/", 200, &pairs_body()));
    let client = DexScreenerProvider::with_transport(
        DexScreenerConfig {
            max_batch_size: 1,
            ..config()
        },
        dynamic,
    );

    let prices = client
        .fetch_prices(&addresses(&[TOKEN_A, TOKEN_B]))
        .await
        .unwrap();

    assert_eq!(prices.len(), 2);
    assert_eq!(transport.requests().len(), 2);
}

#[tokio::test]
async fn test_one_failing_chunk_fails_call() {
    let (_, dynamic) = shared(
        ScriptedTransport::new()
            .respond(&format!("/tokens/v1/solana/{}", TOKEN_B), 500, "internal")
            .respond("/tokens/v1/solana/", 200, &pairs_body()),
    );
    let client = DexScreenerProvider::with_transport(
        DexScreenerConfig {
            max_batch_size: 1,
            ..config()
        },
        dynamic,
    );

    let err = client
        .fetch_prices(&addresses(&[TOKEN_A, TOKEN_B]))
        .await
        .unwrap_err();
    assert!(matches!(err, TokenDataError::ProviderRequestFailed { status: Some(500), .. }));
}

#[tokio::test]
async fn test_fetch_token_overview_from_reference_pool() {
    let (_, dynamic) = shared(ScriptedTransport::new().respond("/tokens/v1/solana/", 200, &pairs_body()));
    let client = DexScreenerProvider::with_transport(config(), dynamic);

    let overview = client.fetch_token_overview(TOKEN_A).await.unwrap();

    assert_eq!(overview.name, "Token a-big");
    assert_eq!(overview.symbol, "Ta-big");
    assert_eq!(overview.price, dec!(0.0110));
    assert_eq!(overview.liquidity, dec!(500.25));
    assert_eq!(overview.market_cap, dec!(4000000.5));
    assert_eq!(overview.fdv, Some(dec!(5000000)));
    assert_eq!(overview.pair_address.as_deref(), Some("a-big"));
}

#[tokio::test]
async fn test_overview_for_unlisted_token() {
    let (_, dynamic) = shared(ScriptedTransport::new().respond("/tokens/v1/solana/", 200, "[]"));
    let client = DexScreenerProvider::with_transport(config(), dynamic);

    let err = client.fetch_token_overview(TOKEN_A).await.unwrap_err();
    assert!(matches!(err, TokenDataError::InvalidToken { ref address, .. } if address == TOKEN_A));
}

#[tokio::test]
async fn test_repeated_calls_are_identical() {
    let (_, dynamic) = shared(ScriptedTransport::new().respond("/tokens/v1/solana/", 200, &pairs_body()));
    let client = DexScreenerProvider::with_transport(config(), dynamic);
    let input = addresses(&[TOKEN_A, TOKEN_B]);

    let first = client.fetch_prices(&input).await.unwrap();
    let second = client.fetch_prices(&input).await.unwrap();

    assert_eq!(first, second);
}

#[tokio::test]
async fn test_garbled_liquidity_is_invalid_token() {
    let body = format!("[{}]", pair_json("a-big", TOKEN_A, SOL, "0.5", r#""garbage""#));
    let (_, dynamic) = shared(ScriptedTransport::new().respond("/tokens/v1/solana/", 200, &body));
    let client = DexScreenerProvider::with_transport(config(), dynamic);

    let err = client.fetch_prices(&addresses(&[TOKEN_A])).await.unwrap_err();
    assert_eq!(
        err,
        TokenDataError::InvalidToken {
            address: TOKEN_A.to_string(),
            reason: r#"malformed numeric field 'liquidity.usd': "garbage""#.to_string()
        }
    );
}

#[tokio::test]
async fn test_negative_pool_price_is_invalid_token() {
    let body = format!("[{}]", pair_json("a-big", TOKEN_A, SOL, "-1", "500"));
    let (_, dynamic) = shared(ScriptedTransport::new().respond("/tokens/v1/solana/", 200, &body));
    let client = DexScreenerProvider::with_transport(config(), dynamic);

    let err = client.fetch_prices(&addresses(&[TOKEN_A])).await.unwrap_err();
    assert!(matches!(err, TokenDataError::InvalidToken { ref address, .. } if address == TOKEN_A));
}

#[tokio::test]
async fn test_overview_without_liquidity_or_market_cap_is_invalid_token() {
    let body = format!(
        r#"[{{"pairAddress": "p", "priceUsd": "0.5",
            "baseToken": {{"address": "{}", "name": "Token", "symbol": "TKN"}},
            "quoteToken": {{"address": "{}"}}}}]"#,
        TOKEN_A, SOL
    );
    let (_, dynamic) = shared(ScriptedTransport::new().respond("/tokens/v1/solana/", 200, &body));
    let client = DexScreenerProvider::with_transport(config(), dynamic);

    let err = client.fetch_token_overview(TOKEN_A).await.unwrap_err();
    assert!(matches!(err, TokenDataError::InvalidToken { ref address, .. } if address == TOKEN_A));
}
