//! Order submission, cancellation and history queries
//!
//! Everything here is checked locally before a request is signed, so an
//! invalid order never reaches the network.

use super::endpoint::{
    Endpoint, TRADE_ASK, TRADE_BID, TRADE_CANCEL_ASK, TRADE_CANCEL_BID, USER_WITHDRAW,
};
use super::params::{Param, Params};
use super::DEFAULT_LIMIT;
use crate::errors::{ExchangeError, Result};
use crate::types::{Trade, TradeMethod, TradeRequest, TradeType};
use std::fmt;
use tokenomy_core::{Amount, RequestId};

fn check_pair(pair: &str) -> Result<()> {
    if pair.trim().is_empty() {
        return Err(ExchangeError::InvalidPair(pair.to_string()));
    }
    Ok(())
}

/// Positive and expressible as a decimal string on the wire
fn check_amount(amount: &Amount) -> Result<()> {
    if !amount.is_positive() {
        return Err(ExchangeError::InvalidAmount(format!("{amount} must be greater than zero")));
    }
    if !amount.is_terminating() {
        return Err(ExchangeError::InvalidAmount(format!("{amount} has no decimal form")));
    }
    Ok(())
}

impl TradeRequest {
    /// Limit order at `price`
    pub fn limit(trade_type: TradeType, pair: impl Into<String>, amount: Amount, price: Amount) -> Self {
        Self {
            pair: pair.into(),
            trade_type,
            method: TradeMethod::Limit,
            amount,
            price: Some(price),
        }
    }

    /// Market order at the best available price
    pub fn market(trade_type: TradeType, pair: impl Into<String>, amount: Amount) -> Self {
        Self {
            pair: pair.into(),
            trade_type,
            method: TradeMethod::Market,
            amount,
            price: None,
        }
    }

    /// Submission endpoint for this side
    pub fn endpoint(&self) -> &'static Endpoint {
        match self.trade_type {
            TradeType::Ask => &TRADE_ASK,
            TradeType::Bid => &TRADE_BID,
        }
    }

    pub fn validate(&self) -> Result<()> {
        check_pair(&self.pair)?;

        check_amount(&self.amount)?;

        match (self.method, &self.price) {
            (TradeMethod::Limit, Some(price)) if !price.is_terminating() => Err(
                ExchangeError::InvalidPrice(format!("limit price {price} has no decimal form")),
            ),
            (TradeMethod::Limit, Some(price)) if price.is_positive() => Ok(()),
            (TradeMethod::Limit, Some(price)) => Err(ExchangeError::InvalidPrice(format!(
                "limit price {price} must be greater than zero"
            ))),
            (TradeMethod::Limit, None) => {
                Err(ExchangeError::InvalidPrice("limit order requires a price".to_string()))
            }
            (TradeMethod::Market, Some(price)) if !price.is_zero() => Err(
                ExchangeError::InvalidPrice(format!("market order takes no price, got {price}")),
            ),
            (TradeMethod::Market, _) => Ok(()),
        }
    }

    /// Validate and convert into request parameters
    ///
    /// The price is only sent for limit orders.
    pub fn pack(&self) -> Result<Params> {
        self.validate()?;

        let mut params = Params::new(self.endpoint());
        params
            .set(Param::Pair, &self.pair)?
            .set(Param::Method, self.method)?
            .set(Param::Amount, &self.amount)?;

        if let (TradeMethod::Limit, Some(price)) = (self.method, &self.price) {
            params.set(Param::Price, price)?;
        }

        Ok(params)
    }
}

/// Target of a single cancellation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CancelRequest {
    pub trade_type: TradeType,
    pub pair: String,
    pub id: i64,
}

impl CancelRequest {
    pub fn new(trade_type: TradeType, pair: impl Into<String>, id: i64) -> Self {
        Self {
            trade_type,
            pair: pair.into(),
            id,
        }
    }

    pub fn from_trade(trade: &Trade) -> Self {
        Self::new(trade.trade_type, trade.pair.clone(), trade.id)
    }

    pub fn endpoint(&self) -> &'static Endpoint {
        match self.trade_type {
            TradeType::Ask => &TRADE_CANCEL_ASK,
            TradeType::Bid => &TRADE_CANCEL_BID,
        }
    }

    pub fn validate(&self) -> Result<()> {
        check_pair(&self.pair)?;
        if self.id <= 0 {
            return Err(ExchangeError::InvalidTradeId(self.id));
        }
        Ok(())
    }

    pub fn pack(&self) -> Result<Params> {
        self.validate()?;
        Params::new(self.endpoint())
            .with(Param::Pair, &self.pair)?
            .with(Param::TradeId, self.id)
    }
}

/// Result ordering by trade id
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Filters for trade history and closed orders
///
/// Unset filters (zero) are not sent. Filters compose freely.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HistoryQuery {
    pub pair: String,
    pub time_after: i64,
    pub time_before: i64,
    pub id_after: i64,
    pub id_before: i64,
    pub offset: i64,
    pub limit: i64,
    pub sort: SortOrder,
}

impl HistoryQuery {
    pub fn new(pair: impl Into<String>) -> Self {
        Self {
            pair: pair.into(),
            ..Default::default()
        }
    }

    /// Trades finished after this Unix time
    pub fn time_after(mut self, seconds: i64) -> Self {
        self.time_after = seconds;
        self
    }

    /// Trades finished before this Unix time
    pub fn time_before(mut self, seconds: i64) -> Self {
        self.time_before = seconds;
        self
    }

    pub fn id_after(mut self, id: i64) -> Self {
        self.id_after = id;
        self
    }

    pub fn id_before(mut self, id: i64) -> Self {
        self.id_before = id;
        self
    }

    pub fn offset(mut self, offset: i64) -> Self {
        self.offset = offset;
        self
    }

    /// Page size; ignored unless in `1..=1000`
    pub fn limit(mut self, limit: i64) -> Self {
        self.limit = limit;
        self
    }

    pub fn sort(mut self, sort: SortOrder) -> Self {
        self.sort = sort;
        self
    }

    pub fn pack(&self, endpoint: &'static Endpoint) -> Result<Params> {
        let mut params = Params::new(endpoint);

        if !self.pair.is_empty() {
            params.set(Param::Pair, &self.pair)?;
        }

        let filters = [
            (Param::Offset, self.offset),
            (Param::IdAfter, self.id_after),
            (Param::IdBefore, self.id_before),
            (Param::TimeAfter, self.time_after),
            (Param::TimeBefore, self.time_before),
        ];
        for (param, value) in filters {
            if value > 0 {
                params.set(param, value)?;
            }
        }

        if self.limit > 0 && self.limit <= DEFAULT_LIMIT {
            params.set(Param::Limit, self.limit)?;
        }

        // Descending is the server default
        if self.sort == SortOrder::Asc {
            params.set(Param::SortIdBy, self.sort)?;
        }

        Ok(params)
    }
}

/// Withdraw of an asset to an external address
#[derive(Debug, Clone, PartialEq)]
pub struct WithdrawRequest {
    /// Idempotency key; resending the same id never withdraws twice
    pub request_id: RequestId,
    pub asset: String,
    pub address: String,
    pub memo: String,
    pub amount: Amount,
}

impl WithdrawRequest {
    /// Withdraw with a freshly generated request id
    pub fn new(asset: impl Into<String>, address: impl Into<String>, amount: Amount) -> Self {
        Self {
            request_id: RequestId::new(),
            asset: asset.into(),
            address: address.into(),
            memo: String::new(),
            amount,
        }
    }

    pub fn with_request_id(mut self, request_id: impl Into<RequestId>) -> Self {
        self.request_id = request_id.into();
        self
    }

    /// Destination tag required by some networks
    pub fn with_memo(mut self, memo: impl Into<String>) -> Self {
        self.memo = memo.into();
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.request_id.is_empty() {
            return Err(ExchangeError::InvalidRequestId);
        }
        if self.asset.is_empty() {
            return Err(ExchangeError::InvalidAsset);
        }
        if self.address.is_empty() {
            return Err(ExchangeError::InvalidAddress);
        }
        check_amount(&self.amount)
    }

    pub fn pack(&self) -> Result<Params> {
        self.validate()?;
        Params::new(&USER_WITHDRAW)
            .with(Param::RequestId, &self.request_id)?
            .with(Param::Asset, &self.asset)?
            .with(Param::Address, &self.address)?
            .with(Param::Memo, &self.memo)?
            .with(Param::Amount, &self.amount)
    }
}
