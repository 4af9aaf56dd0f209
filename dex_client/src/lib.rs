// Token data client - Solana spot prices and token overviews
// from BirdEye or DexScreener behind one contract

pub mod address;
pub mod birdeye_client;
pub mod decimal;
pub mod dexscreener_client;
pub mod error;
pub mod pool_selector;
pub mod token_data_client;
pub mod transport;
pub mod types;

// Re-export configs from config_manager
pub use config_manager::{BirdEyeConfig, ClientSettings, DexScreenerConfig, SOL_MINT};

pub use address::{is_valid_solana_address, validate_address, validate_addresses};
pub use birdeye_client::BirdEyeProvider;
pub use dexscreener_client::DexScreenerProvider;
pub use error::{Result, TokenDataError};
pub use pool_selector::{find_largest_pool, find_largest_pool_for_base, select_reference_pool};
pub use token_data_client::{build_client, Provider, TokenDataClient};
pub use transport::{HttpRequest, HttpResponse, HttpTransport, ReqwestTransport, TransportError};
pub use types::{PairLiquidity, PairToken, PriceInfo, PriceMap, TokenOverview, TradingPair};
