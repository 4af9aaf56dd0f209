use crate::types::TradingPair;

/// Largest-liquidity pair whose base token is `base_address` and quote token is
/// `quote_address`. Liquidity missing from a pair counts as zero. On equal
/// liquidity the first pair seen wins. `None` when nothing qualifies.
pub fn find_largest_pool<'a>(
    pairs: &'a [TradingPair],
    base_address: &str,
    quote_address: &str,
) -> Option<&'a TradingPair> {
    largest_where(pairs, |pair| {
        pair.base_token.address == base_address && pair.quote_token.address == quote_address
    })
}

/// Same selection as [`find_largest_pool`] but across every quote token
pub fn find_largest_pool_for_base<'a>(
    pairs: &'a [TradingPair],
    base_address: &str,
) -> Option<&'a TradingPair> {
    largest_where(pairs, |pair| pair.base_token.address == base_address)
}

/// Preferred quote first, then any quote for the same base
pub fn select_reference_pool<'a>(
    pairs: &'a [TradingPair],
    base_address: &str,
    preferred_quote: &str,
) -> Option<&'a TradingPair> {
    find_largest_pool(pairs, base_address, preferred_quote)
        .or_else(|| find_largest_pool_for_base(pairs, base_address))
}

fn largest_where<'a, F>(pairs: &'a [TradingPair], qualifies: F) -> Option<&'a TradingPair>
where
    F: Fn(&TradingPair) -> bool,
{
    let mut best: Option<&TradingPair> = None;

    for pair in pairs.iter().filter(|p| qualifies(p)) {
        // strictly greater keeps the earlier pair on ties
        match best {
            Some(current) if pair.liquidity_usd() <= current.liquidity_usd() => {}
            _ => best = Some(pair),
        }
    }

    best
}
