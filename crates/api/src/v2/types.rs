//! Response shapes specific to the v2 endpoints
//!
//! Market data is decoded leniently: every field defaults when absent so a
//! new server field or a dropped optional one never breaks a read.

use crate::errors::Result;
use crate::types::{Snapshot, Trade, TradePrice, WithdrawItem};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tokenomy_core::Amount;

/// One price level of an order book
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PriceLevel {
    pub price: Amount,
    pub coin_amount: Amount,
    pub base_amount: Amount,
}

/// Aggregated order book of one pair, best price first
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarketDepths {
    pub asks: Vec<PriceLevel>,
    pub bids: Vec<PriceLevel>,
}

impl MarketDepths {
    pub fn best_ask(&self) -> Option<&PriceLevel> {
        self.asks.first()
    }

    pub fn best_bid(&self) -> Option<&PriceLevel> {
        self.bids.first()
    }

    /// Best ask minus best bid, if both sides are present
    pub fn spread(&self) -> Option<Amount> {
        Some(&self.best_ask()?.price - &self.best_bid()?.price)
    }
}

impl Snapshot for MarketDepths {}

/// Trading rules of one pair
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarketInfo {
    pub pair: String,
    pub base_asset: String,
    pub coin_asset: String,
    pub price_round: i64,
    pub trade_fee_percent: Amount,
    pub trade_min_base_amount: Amount,
    pub trade_min_coin_amount: Amount,
}

impl Snapshot for MarketInfo {}

/// Individual open orders of one pair, grouped by side
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TradesOpen {
    pub asks: Vec<PriceLevel>,
    pub bids: Vec<PriceLevel>,
}

impl Snapshot for TradesOpen {}

/// Latest price per pair
pub type MarketPrices = BTreeMap<String, Amount>;

/// Ticker of one pair
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tick {
    pub pair: String,
    pub high: Amount,
    pub low: Amount,
    pub last: Amount,
    pub buy: Amount,
    pub sell: Amount,
    pub volume_base: Amount,
    pub volume_coin: Amount,
    pub server_time: i64,
}

impl Snapshot for Tick {}

/// Completed market trades of one pair, grouped by side
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarketTrades {
    pub asks: Vec<TradePrice>,
    pub bids: Vec<TradePrice>,
}

impl Snapshot for MarketTrades {}

/// Tickers of every pair plus reference prices 24 hours and 7 days ago
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarketSummaries {
    pub tickers: BTreeMap<String, Tick>,
    pub prices_24h: BTreeMap<String, Amount>,
    pub prices_7d: BTreeMap<String, Amount>,
}

impl Snapshot for MarketSummaries {}

/// The user's open orders keyed by pair
pub type PairTradesOpen = BTreeMap<String, Vec<Trade>>;

/// One deposit transaction
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DepositItem {
    pub id: i64,
    pub asset: String,
    pub network: String,
    pub amount: Amount,
    pub status: String,
    pub tx_id: String,
    pub address: String,
    pub submit_time: i64,
    pub success_time: i64,
}

impl Snapshot for DepositItem {}

/// Deposit and withdraw history keyed by asset
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetTransactions {
    pub deposit: BTreeMap<String, Vec<DepositItem>>,
    pub withdraw: BTreeMap<String, Vec<WithdrawItem>>,
}

impl Snapshot for AssetTransactions {
    fn verify(&self) -> Result<()> {
        self.withdraw.verify()
    }
}
