//! Place a limit bid well below market, then cancel it
//!
//! Needs TOKENOMY_TOKEN and TOKENOMY_SECRET (a `.env` file works) with trade
//! permission on the key.

use tokenomy_api::prelude::*;
use tokenomy_core::amount;
use tracing::{error, info};

const PAIR: &str = "btc_idr";

fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    init_logging();

    info!("🚀 Starting simple Tokenomy order placement");

    let env = match Environment::from_env().with_env_credentials() {
        Ok(env) => {
            info!("✅ API credentials loaded");
            env
        }
        Err(e) => {
            error!("❌ Failed to load API credentials: {}", e);
            return Err(e.into());
        }
    };

    let client = Client::connect_http(env)?;
    if let Some(auth) = client.authentication() {
        info!("✅ Authenticated as user {}", auth.user.id);
        info!("   IDR balance: {}", auth.user.balance("idr"));
    }

    info!("💱 Getting {} ticker...", PAIR);
    let tick = client.market_ticker(PAIR)?;
    info!("📈 Last price: {}", tick.last);

    // 10% below market so the order rests on the book
    let price = &tick.last * &Amount::from_fraction(9, 10)?;
    info!("🎯 Bid price: {} (10% below market)", price);

    let request = TradeRequest::limit(TradeType::Bid, PAIR, amount!("0.0001"), price);
    match client.trade_bid(&request) {
        Ok(response) => {
            let order = response.order;
            info!("✅ Order placed successfully!");
            info!("   Order ID: {}", order.id);
            info!("   Price: {}", order.price);
            info!("   Coin remain: {}", order.coin_remain);

            info!("⏳ Waiting 5 seconds before cancelling...");
            std::thread::sleep(std::time::Duration::from_secs(5));

            match client.trade_cancel(&order) {
                Ok(cancelled) => {
                    info!("✅ Order cancelled!");
                    info!("   Status: {}", cancelled.status);
                    info!("   Coin filled: {}", cancelled.coin_filled);
                }
                Err(e) => error!("❌ Failed to cancel: {}", e),
            }
        }
        Err(e) => {
            error!("❌ Failed to place order: {}", e);
            if let Some(api) = e.api_error() {
                if api.kind() == ApiErrorKind::InsufficientBalance {
                    error!("   Deposit IDR before running this demo");
                }
            }
        }
    }

    info!("✅ Done");
    Ok(())
}
