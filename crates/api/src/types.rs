//! Domain entities shared by every endpoint
//!
//! All financial fields are [`Amount`]s. Amount fields that the server omits
//! decode as zero, matching the exchange's `omitempty` encoding.

use crate::errors::{ExchangeError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::str::FromStr;
use tokenomy_core::{unix_to_datetime, Amount};

/// Consistency check run on every decoded payload
///
/// Snapshots from the server are authoritative, but only if they are
/// internally consistent. A payload failing its check is a protocol error.
pub trait Snapshot {
    fn verify(&self) -> Result<()> {
        Ok(())
    }

    /// What a `null` payload stands for, if anything
    ///
    /// The server encodes empty lists and maps as `null`.
    fn from_null() -> Option<Self>
    where
        Self: Sized,
    {
        None
    }
}

impl Snapshot for Amount {}

impl<T: Snapshot> Snapshot for Vec<T> {
    fn verify(&self) -> Result<()> {
        self.iter().try_for_each(Snapshot::verify)
    }

    fn from_null() -> Option<Self> {
        Some(Vec::new())
    }
}

impl<K: Ord, V: Snapshot> Snapshot for BTreeMap<K, V> {
    fn verify(&self) -> Result<()> {
        self.values().try_for_each(Snapshot::verify)
    }

    fn from_null() -> Option<Self> {
        Some(BTreeMap::new())
    }
}

impl<K, V: Snapshot, S: Default> Snapshot for HashMap<K, V, S> {
    fn verify(&self) -> Result<()> {
        self.values().try_for_each(Snapshot::verify)
    }

    fn from_null() -> Option<Self> {
        Some(HashMap::default())
    }
}

/// Order side
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TradeType {
    #[serde(alias = "sell")]
    Ask,
    #[serde(alias = "buy")]
    Bid,
}

impl TradeType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TradeType::Ask => "ask",
            TradeType::Bid => "bid",
        }
    }
}

impl fmt::Display for TradeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TradeType {
    type Err = ExchangeError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "ask" | "sell" => Ok(TradeType::Ask),
            "bid" | "buy" => Ok(TradeType::Bid),
            other => Err(ExchangeError::InvalidTradeType(other.to_string())),
        }
    }
}

/// Order pricing method
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TradeMethod {
    Limit,
    #[default]
    Market,
}

impl TradeMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            TradeMethod::Limit => "limit",
            TradeMethod::Market => "market",
        }
    }
}

impl fmt::Display for TradeMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TradeMethod {
    type Err = ExchangeError;

    /// An empty method means market
    fn from_str(s: &str) -> Result<Self> {
        match s {
            "" | "market" => Ok(TradeMethod::Market),
            "limit" => Ok(TradeMethod::Limit),
            other => Err(ExchangeError::InvalidMethod(other.to_string())),
        }
    }
}

/// Order state; open orders carry no status on the wire
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TradeStatus {
    #[default]
    #[serde(alias = "")]
    Open,
    Filled,
    #[serde(alias = "canceled")]
    Cancelled,
}

impl fmt::Display for TradeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TradeStatus::Open => write!(f, "open"),
            TradeStatus::Filled => write!(f, "filled"),
            TradeStatus::Cancelled => write!(f, "cancelled"),
        }
    }
}

/// One order, open or closed, as last reported by the exchange
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trade {
    #[serde(default)]
    pub price: Amount,

    #[serde(default)]
    pub base_amount: Amount,
    #[serde(default)]
    pub base_filled: Amount,
    #[serde(default)]
    pub base_remain: Amount,

    #[serde(default)]
    pub coin_amount: Amount,
    #[serde(default)]
    pub coin_filled: Amount,
    #[serde(default)]
    pub coin_remain: Amount,

    #[serde(default)]
    pub pair: String,
    #[serde(rename = "type")]
    pub trade_type: TradeType,
    #[serde(default)]
    pub method: TradeMethod,
    #[serde(default)]
    pub status: TradeStatus,

    #[serde(default)]
    pub base_asset: String,
    #[serde(default)]
    pub coin_asset: String,

    #[serde(default)]
    pub id: i64,
    #[serde(default)]
    pub submit_time: i64,
    #[serde(default)]
    pub finish_time: i64,
}

impl Trade {
    pub fn is_open(&self) -> bool {
        self.status == TradeStatus::Open
    }

    pub fn submitted_at(&self) -> Option<DateTime<Utc>> {
        unix_to_datetime(self.submit_time)
    }

    /// `None` while the order is open
    pub fn finished_at(&self) -> Option<DateTime<Utc>> {
        unix_to_datetime(self.finish_time)
    }

    fn inconsistent(&self, what: impl fmt::Display) -> ExchangeError {
        ExchangeError::InconsistentSnapshot(format!("trade {} ({}): {}", self.id, self.pair, what))
    }
}

impl Snapshot for Trade {
    /// Fill accounting: `amount == filled + remain` on both legs, no
    /// negative legs, a filled order has nothing left, an open order has
    /// something left and no finish time, a closed order has a finish time.
    fn verify(&self) -> Result<()> {
        let legs = [
            ("base", &self.base_amount, &self.base_filled, &self.base_remain),
            ("coin", &self.coin_amount, &self.coin_filled, &self.coin_remain),
        ];

        for (leg, amount, filled, remain) in legs {
            if filled.is_negative() || remain.is_negative() {
                return Err(self.inconsistent(format_args!(
                    "negative {leg} leg (filled {filled}, remain {remain})"
                )));
            }
            if &(filled + remain) != amount {
                return Err(self.inconsistent(format_args!(
                    "{leg}_amount {amount} != {leg}_filled {filled} + {leg}_remain {remain}"
                )));
            }
        }

        match self.status {
            TradeStatus::Filled => {
                if !self.base_remain.is_zero() || !self.coin_remain.is_zero() {
                    return Err(self.inconsistent("filled order with remaining amount"));
                }
            }
            TradeStatus::Open => {
                if self.finish_time != 0 {
                    return Err(self.inconsistent("open order with finish time"));
                }
                // Market orders carry a single leg; the other stays zero.
                if self.base_remain.is_zero() && self.coin_remain.is_zero() {
                    return Err(self.inconsistent("open order with nothing remaining"));
                }
            }
            TradeStatus::Cancelled => {}
        }

        if self.status != TradeStatus::Open && self.finish_time <= 0 {
            return Err(self.inconsistent(format_args!("{} order without finish time", self.status)));
        }

        Ok(())
    }
}

/// Completed market trade
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradePrice {
    pub id: i64,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub pair: String,
    pub trade_time: i64,
    pub base_amount: Amount,
    pub coin_amount: Amount,
    pub price: Amount,
}

impl Snapshot for TradePrice {}

/// Caller's intent to buy or sell
///
/// Build one with [`TradeRequest::limit`] or [`TradeRequest::market`];
/// validation runs when the request is packed for submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeRequest {
    pub pair: String,
    #[serde(rename = "type")]
    pub trade_type: TradeType,
    #[serde(default)]
    pub method: TradeMethod,
    pub amount: Amount,
    /// Limit price; absent for market orders
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<Amount>,
}

/// Result of a submission or of a single cancellation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeResponse {
    pub order: Trade,
}

impl Snapshot for TradeResponse {
    fn verify(&self) -> Result<()> {
        self.order.verify()
    }
}

/// One withdraw transaction
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WithdrawItem {
    pub amount: Amount,
    pub fee: Amount,
    pub final_amount: Amount,

    pub request_id: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub requester_ip: String,
    pub asset: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub network: String,
    pub status: String,
    pub address: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub address_type: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub memo: String,

    pub id: i64,
    pub submit_time: i64,
    pub success_time: i64,
}

impl Snapshot for WithdrawItem {
    fn verify(&self) -> Result<()> {
        if self.final_amount != &self.amount - &self.fee {
            return Err(ExchangeError::InconsistentSnapshot(format!(
                "withdraw {} ({}): final_amount {} != amount {} - fee {}",
                self.id, self.request_id, self.final_amount, self.amount, self.fee
            )));
        }
        Ok(())
    }
}

/// Authenticated user's profile and balances
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub balances: BTreeMap<String, Amount>,
    pub frozen_balances: BTreeMap<String, Amount>,
}

impl User {
    /// Available balance of an asset, zero when absent
    pub fn balance(&self, asset: &str) -> Amount {
        self.balances.get(asset).cloned().unwrap_or_default()
    }

    /// Balance locked in open orders and pending withdrawals
    pub fn frozen_balance(&self, asset: &str) -> Amount {
        self.frozen_balances.get(asset).cloned().unwrap_or_default()
    }

    pub fn total_balance(&self, asset: &str) -> Amount {
        self.balance(asset) + self.frozen_balance(asset)
    }
}

impl Snapshot for User {}
