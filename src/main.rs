use anyhow::Result;
use clap::{Parser, Subcommand};
use config_manager::{SystemConfig, SOL_MINT};
use dex_client::{
    build_client, find_largest_pool, DexScreenerProvider, Provider, TokenDataClient,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

const DEMO_ADDRESSES: [&str; 4] = [
    "WskzsKqEW3ZsmrhPAevfVZb6PuuLzWov9mJWZsfDePC",
    "2uvch6aviS6xE3yhWjVZnFrDw7skUtf6ubc7xYJEPpwj",
    "EKpQGSJtjMFqKZ9KQanSqYXRcF8fBopzLHYxdM65zcjm",
    "2LxZrcJJhzcAju1FBHuGvw929EVkX7R7Q8yA2cdp8q7b",
];

#[derive(Parser)]
#[command(name = "token_data", about = "Fetch Solana token prices and overviews")]
struct Cli {
    /// birdeye or dexscreener (defaults to client.default_provider)
    #[arg(long)]
    provider: Option<Provider>,

    /// Path to the TOML configuration file
    #[arg(long, default_value = "config.toml")]
    config: String,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Spot price and liquidity for one or more tokens
    Prices { addresses: Vec<String> },
    /// Name, symbol, price, liquidity and market cap of a token
    Overview { address: Option<String> },
    /// Largest DexScreener pool pairing the token with a quote token
    Pool {
        address: String,
        #[arg(long, default_value = SOL_MINT)]
        quote: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let config = SystemConfig::load_from_path(&cli.config)?;
    let provider = match cli.provider {
        Some(provider) => provider,
        None => config
            .client
            .default_provider
            .parse::<Provider>()
            .map_err(anyhow::Error::msg)?,
    };
    info!("Using {} provider", provider);

    let ok = match cli.command {
        Some(Command::Prices { addresses }) => {
            let client = build_client(provider, &config)?;
            let addresses = if addresses.is_empty() { demo_addresses() } else { addresses };
            print_prices(client.as_ref(), &addresses).await
        }
        Some(Command::Overview { address }) => {
            let client = build_client(provider, &config)?;
            print_overview(client.as_ref(), address.as_deref().unwrap_or(SOL_MINT)).await
        }
        Some(Command::Pool { address, quote }) => print_pool(&config, &address, &quote).await?,
        None => {
            // Demo run: prices for the sample tokens, then the SOL overview
            let client = build_client(provider, &config)?;
            let prices_ok = print_prices(client.as_ref(), &demo_addresses()).await;
            let overview_ok = print_overview(client.as_ref(), SOL_MINT).await;
            prices_ok && overview_ok
        }
    };

    if !ok {
        std::process::exit(1);
    }
    Ok(())
}

fn demo_addresses() -> Vec<String> {
    DEMO_ADDRESSES.iter().map(|a| a.to_string()).collect()
}

async fn print_prices(client: &dyn TokenDataClient, addresses: &[String]) -> bool {
    match client.fetch_prices(addresses).await {
        Ok(prices) => {
            println!("Prices fetched successfully:");
            // Print in request order rather than map order
            for address in addresses {
                if let Some(info) = prices.get(address) {
                    println!("{}: Price - {}, Liquidity - {}", address, info.price, info.liquidity);
                }
            }
            true
        }
        Err(e) => {
            println!("Error fetching prices: {}", e);
            false
        }
    }
}

async fn print_overview(client: &dyn TokenDataClient, address: &str) -> bool {
    match client.fetch_token_overview(address).await {
        Ok(overview) => {
            println!("Token overview fetched successfully:");
            println!("  Name:       {}", overview.name);
            println!("  Symbol:     {}", overview.symbol);
            println!("  Price:      {}", overview.price);
            println!("  Liquidity:  {}", overview.liquidity);
            println!("  Market cap: {}", overview.market_cap);
            if let Some(decimals) = overview.decimals {
                println!("  Decimals:   {}", decimals);
            }
            if let Some(pair) = overview.pair_address {
                println!("  Pair:       {}", pair);
            }
            true
        }
        Err(e) => {
            println!("Error fetching token overview: {}", e);
            false
        }
    }
}

async fn print_pool(config: &SystemConfig, address: &str, quote: &str) -> Result<bool> {
    let client = DexScreenerProvider::new(config.dexscreener.clone())?;

    let pairs = match client.fetch_token_pairs(address).await {
        Ok(pairs) => pairs,
        Err(e) => {
            println!("Error fetching pairs: {}", e);
            return Ok(false);
        }
    };

    match find_largest_pool(&pairs, address, quote) {
        Some(pool) => {
            println!("Largest pool for {} quoted in {}:", address, quote);
            println!("  Pair:      {} ({})", pool.pair_address, pool.dex_id);
            println!("  Liquidity: {}", pool.liquidity_usd());
            if let Some(price) = pool.price_usd_decimal() {
                println!("  Price USD: {}", price);
            }
        }
        None => println!("No pool found for {} quoted in {}", address, quote),
    }
    Ok(true)
}
