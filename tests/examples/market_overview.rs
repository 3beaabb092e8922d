//! Print public market data; no credentials needed

use tokenomy_api::prelude::*;
use tracing::info;

fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    init_logging();

    let client = Client::with_http(Environment::from_env())?;

    let markets = client.market_info()?;
    info!("📊 {} markets", markets.len());
    for market in markets.iter().take(5) {
        info!(
            "   {} (fee {}%, min {} {})",
            market.pair, market.trade_fee_percent, market.trade_min_coin_amount, market.coin_asset
        );
    }

    let depths = client.market_depths("btc_idr")?;
    if let (Some(ask), Some(bid)) = (depths.best_ask(), depths.best_bid()) {
        info!("📖 btc_idr best bid {} / best ask {}", bid.price, ask.price);
    }
    if let Some(spread) = depths.spread() {
        info!("   spread {}", spread);
    }

    let trades = client.market_trades("btc_idr", 0, 10)?;
    for trade in trades.asks.iter().chain(trades.bids.iter()) {
        info!("   #{} {} @ {}", trade.id, trade.coin_amount, trade.price);
    }

    let prices = client.market_prices()?;
    for (pair, price) in prices.iter().take(10) {
        info!("💱 {}: {}", pair, price);
    }

    Ok(())
}
