//! Endpoint-aware request parameters

use super::endpoint::Endpoint;
use crate::errors::{ExchangeError, Result};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use url::form_urlencoded;

/// Request parameter names understood by the v2 API
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Param {
    Address,
    Amount,
    Asset,
    IdAfter,
    IdBefore,
    Limit,
    Memo,
    Method,
    Offset,
    Pair,
    Price,
    RequestId,
    SortIdBy,
    TimeAfter,
    TimeBefore,
    Timestamp,
    TradeId,
}

impl Param {
    pub fn as_str(&self) -> &'static str {
        match self {
            Param::Address => "address",
            Param::Amount => "amount",
            Param::Asset => "asset",
            Param::IdAfter => "id_after",
            Param::IdBefore => "id_before",
            Param::Limit => "limit",
            Param::Memo => "memo",
            Param::Method => "method",
            Param::Offset => "offset",
            Param::Pair => "pair",
            Param::Price => "price",
            Param::RequestId => "request_id",
            Param::SortIdBy => "sort_id_by",
            Param::TimeAfter => "time_after",
            Param::TimeBefore => "time_before",
            Param::Timestamp => "timestamp",
            Param::TradeId => "trade_id",
        }
    }
}

impl fmt::Display for Param {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Param {
    type Err = ExchangeError;

    fn from_str(s: &str) -> Result<Self> {
        let param = match s {
            "address" => Param::Address,
            "amount" => Param::Amount,
            "asset" => Param::Asset,
            "id_after" => Param::IdAfter,
            "id_before" => Param::IdBefore,
            "limit" => Param::Limit,
            "memo" => Param::Memo,
            "method" => Param::Method,
            "offset" => Param::Offset,
            "pair" => Param::Pair,
            "price" => Param::Price,
            "request_id" => Param::RequestId,
            "sort_id_by" => Param::SortIdBy,
            "time_after" => Param::TimeAfter,
            "time_before" => Param::TimeBefore,
            "timestamp" => Param::Timestamp,
            "trade_id" => Param::TradeId,
            other => {
                return Err(ExchangeError::UnsupportedParameter {
                    endpoint: String::new(),
                    param: other.to_string(),
                })
            }
        };
        Ok(param)
    }
}

/// Parameters bound to one endpoint
///
/// Values are kept sorted by name, which is also the canonical order used
/// for signing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Params {
    endpoint: &'static Endpoint,
    values: BTreeMap<Param, String>,
}

impl Params {
    pub fn new(endpoint: &'static Endpoint) -> Self {
        Self {
            endpoint,
            values: BTreeMap::new(),
        }
    }

    pub fn endpoint(&self) -> &'static Endpoint {
        self.endpoint
    }

    /// Set a parameter, replacing any previous value
    pub fn set(&mut self, param: Param, value: impl ToString) -> Result<&mut Self> {
        if !self.endpoint.accepts(param) {
            return Err(ExchangeError::UnsupportedParameter {
                endpoint: self.endpoint.operation.to_string(),
                param: param.as_str().to_string(),
            });
        }
        self.values.insert(param, value.to_string());
        Ok(self)
    }

    /// Set a parameter by its wire name
    pub fn set_named(&mut self, name: &str, value: impl ToString) -> Result<&mut Self> {
        let param = name.parse::<Param>().map_err(|_| ExchangeError::UnsupportedParameter {
            endpoint: self.endpoint.operation.to_string(),
            param: name.to_string(),
        })?;
        self.set(param, value)
    }

    /// Builder form of [`Params::set`]
    pub fn with(mut self, param: Param, value: impl ToString) -> Result<Self> {
        self.set(param, value)?;
        Ok(self)
    }

    pub fn get(&self, param: Param) -> Option<&str> {
        self.values.get(&param).map(String::as_str)
    }

    pub fn remove(&mut self, param: Param) -> Option<String> {
        self.values.remove(&param)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Name/value pairs in canonical order
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> + '_ {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// `application/x-www-form-urlencoded` encoding with keys sorted
    pub fn encode(&self) -> String {
        // Enum order is alphabetical by wire name
        form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.iter())
            .finish()
    }
}
