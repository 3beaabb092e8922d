//! v2 endpoint table
//!
//! Each endpoint names the parameters it accepts. [`Params`](super::Params)
//! refuses anything else, so a typo or a parameter sent to the wrong
//! endpoint fails before signing.

use super::params::Param;
use crate::traits::HttpMethod;
use std::fmt;

/// One REST endpoint of the v2 API
#[derive(Debug, PartialEq, Eq, Hash)]
pub struct Endpoint {
    /// Operation name used in errors and logs
    pub operation: &'static str,
    pub method: HttpMethod,
    pub path: &'static str,
    /// Private endpoints need a token and a signature
    pub signed: bool,
    pub params: &'static [Param],
}

impl Endpoint {
    /// Whether the endpoint accepts `param`; signed endpoints always take a timestamp
    pub fn accepts(&self, param: Param) -> bool {
        (self.signed && param == Param::Timestamp) || self.params.contains(&param)
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.method, self.path)
    }
}

const HISTORY: &[Param] = &[
    Param::Pair,
    Param::Offset,
    Param::Limit,
    Param::IdAfter,
    Param::IdBefore,
    Param::TimeAfter,
    Param::TimeBefore,
    Param::SortIdBy,
];

const TRADE: &[Param] = &[Param::Pair, Param::Method, Param::Amount, Param::Price];

const CANCEL: &[Param] = &[Param::Pair, Param::TradeId];

// Public market data

pub static MARKET_DEPTHS: Endpoint = Endpoint {
    operation: "MarketDepths",
    method: HttpMethod::Get,
    path: "/v2/market/depths",
    signed: false,
    params: &[Param::Pair],
};

pub static MARKET_INFO: Endpoint = Endpoint {
    operation: "MarketInfo",
    method: HttpMethod::Get,
    path: "/v2/market/info",
    signed: false,
    params: &[],
};

pub static MARKET_TRADES_OPEN: Endpoint = Endpoint {
    operation: "MarketTradesOpen",
    method: HttpMethod::Get,
    path: "/v2/market/trades/open",
    signed: false,
    params: &[Param::Pair],
};

pub static MARKET_PRICES: Endpoint = Endpoint {
    operation: "MarketPrices",
    method: HttpMethod::Get,
    path: "/v2/market/prices",
    signed: false,
    params: &[],
};

pub static MARKET_TICKER: Endpoint = Endpoint {
    operation: "MarketTicker",
    method: HttpMethod::Get,
    path: "/v2/market/ticker",
    signed: false,
    params: &[Param::Pair],
};

pub static MARKET_TRADES: Endpoint = Endpoint {
    operation: "MarketTrades",
    method: HttpMethod::Get,
    path: "/v2/market/trades",
    signed: false,
    params: &[Param::Pair, Param::Offset, Param::Limit],
};

pub static MARKET_SUMMARIES: Endpoint = Endpoint {
    operation: "MarketSummaries",
    method: HttpMethod::Get,
    path: "/v2/market/summaries",
    signed: false,
    params: &[],
};

// Private user data

pub static USER_INFO: Endpoint = Endpoint {
    operation: "UserInfo",
    method: HttpMethod::Get,
    path: "/v2/user/info",
    signed: true,
    params: &[],
};

pub static USER_TRADES: Endpoint = Endpoint {
    operation: "UserTrades",
    method: HttpMethod::Get,
    path: "/v2/user/trades",
    signed: true,
    params: HISTORY,
};

pub static USER_ORDERS_CLOSED: Endpoint = Endpoint {
    operation: "UserOrdersClosed",
    method: HttpMethod::Get,
    path: "/v2/user/trades/closed",
    signed: true,
    params: HISTORY,
};

pub static USER_ORDERS_OPEN: Endpoint = Endpoint {
    operation: "UserOrdersOpen",
    method: HttpMethod::Get,
    path: "/v2/user/trades/open",
    signed: true,
    params: &[Param::Pair],
};

pub static USER_ORDER_INFO: Endpoint = Endpoint {
    operation: "UserOrderInfo",
    method: HttpMethod::Get,
    path: "/v2/user/trade",
    signed: true,
    params: CANCEL,
};

pub static USER_TRANSACTIONS: Endpoint = Endpoint {
    operation: "UserTransactions",
    method: HttpMethod::Get,
    path: "/v2/user/transactions",
    signed: true,
    params: &[Param::Asset, Param::Limit],
};

pub static USER_WITHDRAW: Endpoint = Endpoint {
    operation: "UserWithdraw",
    method: HttpMethod::Post,
    path: "/v2/user/withdraw",
    signed: true,
    params: &[
        Param::RequestId,
        Param::Asset,
        Param::Address,
        Param::Memo,
        Param::Amount,
    ],
};

// Trading

pub static TRADE_ASK: Endpoint = Endpoint {
    operation: "TradeAsk",
    method: HttpMethod::Post,
    path: "/v2/trade/ask",
    signed: true,
    params: TRADE,
};

pub static TRADE_BID: Endpoint = Endpoint {
    operation: "TradeBid",
    method: HttpMethod::Post,
    path: "/v2/trade/bid",
    signed: true,
    params: TRADE,
};

pub static TRADE_CANCEL_ASK: Endpoint = Endpoint {
    operation: "TradeCancelAsk",
    method: HttpMethod::Delete,
    path: "/v2/trade/cancel/ask",
    signed: true,
    params: CANCEL,
};

pub static TRADE_CANCEL_BID: Endpoint = Endpoint {
    operation: "TradeCancelBid",
    method: HttpMethod::Delete,
    path: "/v2/trade/cancel/bid",
    signed: true,
    params: CANCEL,
};

pub static TRADE_CANCEL_ALL: Endpoint = Endpoint {
    operation: "TradeCancelAll",
    method: HttpMethod::Delete,
    path: "/v2/trade/cancel/all",
    signed: true,
    params: &[],
};

/// Every endpoint, public first
pub static ALL: [&Endpoint; 19] = [
    &MARKET_DEPTHS,
    &MARKET_INFO,
    &MARKET_TRADES_OPEN,
    &MARKET_PRICES,
    &MARKET_TICKER,
    &MARKET_TRADES,
    &MARKET_SUMMARIES,
    &USER_INFO,
    &USER_TRADES,
    &USER_ORDERS_CLOSED,
    &USER_ORDERS_OPEN,
    &USER_ORDER_INFO,
    &USER_TRANSACTIONS,
    &USER_WITHDRAW,
    &TRADE_ASK,
    &TRADE_BID,
    &TRADE_CANCEL_ASK,
    &TRADE_CANCEL_BID,
    &TRADE_CANCEL_ALL,
];
