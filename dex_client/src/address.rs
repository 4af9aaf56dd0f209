use std::collections::HashSet;

use crate::error::{Result, TokenDataError};

/// Length of a Solana public key in bytes
pub const PUBKEY_BYTES: usize = 32;

/// True when `address` base58-decodes to exactly a 32 byte public key.
/// Pure; never touches the network.
pub fn is_valid_solana_address(address: &str) -> bool {
    if address.is_empty() {
        return false;
    }

    match bs58::decode(address).into_vec() {
        Ok(bytes) => bytes.len() == PUBKEY_BYTES,
        Err(_) => false,
    }
}

/// Fails with `InvalidAddress` naming the offending address
pub fn validate_address(address: &str) -> Result<()> {
    if is_valid_solana_address(address) {
        Ok(())
    } else {
        Err(TokenDataError::InvalidAddress(address.to_string()))
    }
}

/// Validate a batch of addresses: rejects an empty batch, then the first
/// malformed address. Returns the addresses deduplicated in first-seen order.
pub fn validate_addresses(addresses: &[String]) -> Result<Vec<String>> {
    if addresses.is_empty() {
        return Err(TokenDataError::NoAddressesProvided);
    }

    let mut seen = HashSet::new();
    let mut unique = Vec::with_capacity(addresses.len());
    for address in addresses {
        validate_address(address)?;
        if seen.insert(address.as_str()) {
            unique.push(address.clone());
        }
    }

    Ok(unique)
}
