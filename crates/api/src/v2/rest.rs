//! Tokenomy REST API v2 client
//!
//! Every operation is one synchronous cycle: build parameters, sign when
//! private, send through the [`Transport`], decode. The client keeps no
//! mutable state apart from the one-time authentication result.

use super::auth::{Credentials, RequestSigner, ENV_SECRET, ENV_TOKEN};
use super::endpoint::{self, Endpoint};
use super::params::{Param, Params};
use super::response;
use super::trade::{CancelRequest, HistoryQuery, WithdrawRequest};
use super::types::{AssetTransactions, MarketDepths, MarketInfo, MarketPrices, MarketSummaries, MarketTrades, PairTradesOpen, Tick, TradesOpen};
use super::{DEFAULT_ADDRESS, DEFAULT_LIMIT};
use crate::errors::{ExchangeError, Result};
use crate::traits::{HttpRequest, Transport};
use crate::types::{Snapshot, Trade, TradeRequest, TradeResponse, TradeType, User, WithdrawItem};
use tokenomy_core::prelude::*;
use tokenomy_core::{log_error, log_order};

use once_cell::sync::OnceCell;
use serde::de::DeserializeOwned;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info};
use url::Url;

/// Environment variable overriding the API address
pub const ENV_ADDRESS: &str = "TOKENOMY_ADDRESS";
/// Environment variable disabling TLS certificate checks when truthy
pub const ENV_INSECURE: &str = "TOKENOMY_INSECURE";

fn default_address() -> String {
    DEFAULT_ADDRESS.to_string()
}

/// Client configuration
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Environment {
    #[serde(default = "default_address")]
    pub address: String,
    #[serde(default)]
    pub token: String,
    #[serde(default, skip_serializing)]
    pub secret: String,
    /// Skip TLS certificate verification, for test servers only
    #[serde(default)]
    pub insecure: bool,
}

impl Default for Environment {
    fn default() -> Self {
        Self {
            address: default_address(),
            token: String::new(),
            secret: String::new(),
            insecure: false,
        }
    }
}

impl Environment {
    /// Defaults overridden by any `TOKENOMY_*` variable that is set
    pub fn from_env() -> Self {
        let mut env = Self::default();
        if let Ok(address) = std::env::var(ENV_ADDRESS) {
            if !address.is_empty() {
                env.address = address;
            }
        }
        if let Ok(token) = std::env::var(ENV_TOKEN) {
            env.token = token;
        }
        if let Ok(secret) = std::env::var(ENV_SECRET) {
            env.secret = secret;
        }
        if let Ok(insecure) = std::env::var(ENV_INSECURE) {
            env.insecure = matches!(
                insecure.trim().to_ascii_lowercase().as_str(),
                "1" | "true" | "yes"
            );
        }
        env
    }

    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = address.into();
        self
    }

    pub fn with_credentials(mut self, token: impl Into<String>, secret: impl Into<String>) -> Self {
        self.token = token.into();
        self.secret = secret.into();
        self
    }

    pub fn with_insecure(mut self, insecure: bool) -> Self {
        self.insecure = insecure;
        self
    }

    /// Take token and secret from the environment; both must be set
    pub fn with_env_credentials(mut self) -> Result<Self> {
        let credentials = Credentials::from_env()?;
        self.token = credentials.token;
        self.secret = credentials.secret;
        Ok(self)
    }

    pub fn credentials(&self) -> Credentials {
        Credentials::new(self.token.clone(), self.secret.clone())
    }

    /// Parsed API address; an empty address means the production one
    pub fn base_url(&self) -> Result<Url> {
        let address = if self.address.is_empty() {
            DEFAULT_ADDRESS
        } else {
            self.address.as_str()
        };
        let url = Url::parse(address)?;
        if url.cannot_be_a_base() || !matches!(url.scheme(), "http" | "https") {
            return Err(ExchangeError::InvalidUrl(address.to_string()));
        }
        Ok(url)
    }
}

impl fmt::Debug for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Environment")
            .field("address", &self.address)
            .field("token", &self.token)
            .field("secret", &"<redacted>")
            .field("insecure", &self.insecure)
            .finish()
    }
}

/// Outcome of a successful [`Client::authenticate`]
#[derive(Debug, Clone, PartialEq)]
pub struct Authentication {
    pub user: User,
    /// Unix seconds at which the credentials were verified
    pub verified_at: i64,
}

/// Tokenomy REST API v2 client
pub struct Client {
    env: Environment,
    base_url: Url,
    signer: RequestSigner,
    transport: Arc<dyn Transport>,
    clock: Arc<dyn Clock>,
    auth: OnceCell<Arc<Authentication>>,
}

impl Client {
    /// Create a client without touching the network
    pub fn new(mut env: Environment, transport: Arc<dyn Transport>) -> Result<Self> {
        if env.address.is_empty() {
            env.address = default_address();
        }
        let base_url = env.base_url()?;
        let signer = RequestSigner::new(env.credentials());

        info!("🔗 Tokenomy REST client created");
        info!("   Base URL: {}", base_url);

        Ok(Self {
            env,
            base_url,
            signer,
            transport,
            clock: Arc::new(SystemClock),
            auth: OnceCell::new(),
        })
    }

    /// Create a client and, when a token is configured, authenticate it
    pub fn connect(env: Environment, transport: Arc<dyn Transport>) -> Result<Self> {
        let client = Self::new(env, transport)?;
        if !client.env.token.is_empty() {
            client.authenticate()?;
        }
        Ok(client)
    }

    /// [`Client::new`] over the blocking reqwest transport
    #[cfg(feature = "blocking-http")]
    pub fn with_http(env: Environment) -> Result<Self> {
        let transport = crate::http::ReqwestTransport::new(&env)?;
        Self::new(env, Arc::new(transport))
    }

    /// [`Client::connect`] over the blocking reqwest transport
    #[cfg(feature = "blocking-http")]
    pub fn connect_http(env: Environment) -> Result<Self> {
        let transport = crate::http::ReqwestTransport::new(&env)?;
        Self::connect(env, Arc::new(transport))
    }

    /// Replace the time source used for request timestamps
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn environment(&self) -> &Environment {
        &self.env
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Verify the credentials by fetching the user profile
    ///
    /// Runs at most once successfully. Concurrent callers wait for the call
    /// in flight; a failure caches nothing, so the next caller tries again.
    pub fn authenticate(&self) -> Result<Arc<Authentication>> {
        let auth = self.auth.get_or_try_init(|| {
            let user = self.user_info()?;
            info!("🔑 Authenticated as user {}", user.id);
            Ok::<_, ExchangeError>(Arc::new(Authentication {
                user,
                verified_at: self.clock.unix_seconds(),
            }))
        })?;
        Ok(Arc::clone(auth))
    }

    /// Result of the last successful [`Client::authenticate`]
    pub fn authentication(&self) -> Option<Arc<Authentication>> {
        self.auth.get().cloned()
    }

    // Market data

    /// Order book of `pair`
    pub fn market_depths(&self, pair: &str) -> Result<MarketDepths> {
        require_pair(pair)?;
        let params = Params::new(&endpoint::MARKET_DEPTHS).with(Param::Pair, pair)?;
        self.public_request(params)
    }

    /// Trading rules of every pair
    pub fn market_info(&self) -> Result<Vec<MarketInfo>> {
        self.public_request(Params::new(&endpoint::MARKET_INFO))
    }

    /// Open orders of `pair`, grouped by side
    pub fn market_trades_open(&self, pair: &str) -> Result<TradesOpen> {
        require_pair(pair)?;
        let params = Params::new(&endpoint::MARKET_TRADES_OPEN).with(Param::Pair, pair)?;
        self.public_request(params)
    }

    /// Latest price of every pair
    pub fn market_prices(&self) -> Result<MarketPrices> {
        self.public_request(Params::new(&endpoint::MARKET_PRICES))
    }

    pub fn market_ticker(&self, pair: &str) -> Result<Tick> {
        require_pair(pair)?;
        let params = Params::new(&endpoint::MARKET_TICKER).with(Param::Pair, pair)?;
        self.public_request(params)
    }

    /// Completed trades of `pair`, grouped by side
    pub fn market_trades(&self, pair: &str, offset: i64, limit: i64) -> Result<MarketTrades> {
        require_pair(pair)?;
        let mut params = Params::new(&endpoint::MARKET_TRADES);
        params.set(Param::Pair, pair)?;
        if offset > 0 {
            params.set(Param::Offset, offset)?;
        }
        if limit > 0 && limit <= DEFAULT_LIMIT {
            params.set(Param::Limit, limit)?;
        }
        self.public_request(params)
    }

    pub fn market_summaries(&self) -> Result<MarketSummaries> {
        self.public_request(Params::new(&endpoint::MARKET_SUMMARIES))
    }

    // User data

    /// Profile and balances of the authenticated user
    pub fn user_info(&self) -> Result<User> {
        self.signed_request(Params::new(&endpoint::USER_INFO))
    }

    /// Trade history, latest first unless sorted ascending
    pub fn user_trades(&self, query: &HistoryQuery) -> Result<Vec<Trade>> {
        self.signed_request(query.pack(&endpoint::USER_TRADES)?)
    }

    /// Filled and cancelled orders
    pub fn user_orders_closed(&self, query: &HistoryQuery) -> Result<Vec<Trade>> {
        self.signed_request(query.pack(&endpoint::USER_ORDERS_CLOSED)?)
    }

    /// Open orders keyed by pair; an empty `pair` returns every pair
    pub fn user_orders_open(&self, pair: &str) -> Result<PairTradesOpen> {
        let mut params = Params::new(&endpoint::USER_ORDERS_OPEN);
        if !pair.is_empty() {
            params.set(Param::Pair, pair)?;
        }
        self.signed_request(params)
    }

    /// One order by pair and id
    pub fn user_order_info(&self, pair: &str, id: i64) -> Result<Trade> {
        require_pair(pair)?;
        if id <= 0 {
            return Err(ExchangeError::InvalidTradeId(id));
        }
        let params = Params::new(&endpoint::USER_ORDER_INFO)
            .with(Param::Pair, pair)?
            .with(Param::TradeId, id)?;
        self.signed_request(params)
    }

    /// Deposit and withdraw history, optionally for one asset
    pub fn user_transactions(&self, asset: &str, limit: i64) -> Result<AssetTransactions> {
        let mut params = Params::new(&endpoint::USER_TRANSACTIONS);
        if !asset.is_empty() {
            params.set(Param::Asset, asset)?;
        }
        if limit > 0 && limit <= DEFAULT_LIMIT {
            params.set(Param::Limit, limit)?;
        }
        self.signed_request(params)
    }

    /// Withdraw an asset to an external address
    ///
    /// Needs the withdraw permission on the API key. Idempotent on the
    /// request id.
    pub fn user_withdraw(&self, request: &WithdrawRequest) -> Result<WithdrawItem> {
        let params = request.pack()?;
        let item: WithdrawItem = self.signed_request(params)?;
        log_order!("WITHDRAW", &item.request_id, &item.asset);
        Ok(item)
    }

    // Trading

    /// Submit an order to the endpoint matching its side
    pub fn trade(&self, request: &TradeRequest) -> Result<TradeResponse> {
        let params = request.pack()?;
        let response: TradeResponse = self.signed_request(params)?;
        log_order!(
            format!("SUBMITTED {} {}", request.trade_type, request.method),
            response.order.id,
            &response.order.pair
        );
        Ok(response)
    }

    /// Sell order; rejects a bid request
    pub fn trade_ask(&self, request: &TradeRequest) -> Result<TradeResponse> {
        expect_type(TradeType::Ask, request.trade_type)?;
        self.trade(request)
    }

    /// Buy order; rejects an ask request
    pub fn trade_bid(&self, request: &TradeRequest) -> Result<TradeResponse> {
        expect_type(TradeType::Bid, request.trade_type)?;
        self.trade(request)
    }

    /// Cancel an open order, dispatching on its side
    pub fn trade_cancel(&self, trade: &Trade) -> Result<Trade> {
        let response = self.cancel(&CancelRequest::from_trade(trade))?;
        Ok(response.order)
    }

    pub fn trade_cancel_ask(&self, pair: &str, id: i64) -> Result<TradeResponse> {
        self.cancel(&CancelRequest::new(TradeType::Ask, pair, id))
    }

    pub fn trade_cancel_bid(&self, pair: &str, id: i64) -> Result<TradeResponse> {
        self.cancel(&CancelRequest::new(TradeType::Bid, pair, id))
    }

    /// Cancel `request` after checking it targets the `expected` side
    pub fn trade_cancel_as(&self, expected: TradeType, request: &CancelRequest) -> Result<TradeResponse> {
        expect_type(expected, request.trade_type)?;
        self.cancel(request)
    }

    pub fn cancel(&self, request: &CancelRequest) -> Result<TradeResponse> {
        let params = request.pack()?;
        let response: TradeResponse = self.signed_request(params)?;
        log_order!("CANCELLED", response.order.id, &response.order.pair);
        Ok(response)
    }

    /// Cancel every open order
    ///
    /// Returns exactly the orders the server reports as cancelled, which may
    /// be fewer than were open.
    pub fn trade_cancel_all(&self) -> Result<Vec<Trade>> {
        let cancelled: Vec<Trade> = self.signed_request(Params::new(&endpoint::TRADE_CANCEL_ALL))?;
        info!("📋 Cancelled {} open orders", cancelled.len());
        Ok(cancelled)
    }

    // Request plumbing

    fn public_request<T>(&self, params: Params) -> Result<T>
    where
        T: DeserializeOwned + Snapshot,
    {
        let endpoint = params.endpoint();
        let request = HttpRequest {
            method: endpoint.method,
            path: endpoint.path.to_string(),
            headers: BTreeMap::new(),
            payload: params.encode(),
        };

        debug!("📡 {} {}", endpoint.method, endpoint.path);
        self.execute(endpoint, &request)
    }

    fn signed_request<T>(&self, params: Params) -> Result<T>
    where
        T: DeserializeOwned + Snapshot,
    {
        let endpoint = params.endpoint();
        if !self.env.credentials().is_valid() {
            return Err(ExchangeError::MissingCredentials(format!(
                "{} requires {} and {}",
                endpoint.operation, ENV_TOKEN, ENV_SECRET
            )));
        }

        let signed = self.signer.sign(&params, self.clock.unix_seconds())?;
        let request = HttpRequest {
            method: endpoint.method,
            path: endpoint.path.to_string(),
            headers: signed.headers,
            payload: signed.payload,
        };

        debug!("📡 {} {} (signed)", endpoint.method, endpoint.path);
        self.execute(endpoint, &request)
    }

    fn execute<T>(&self, endpoint: &Endpoint, request: &HttpRequest) -> Result<T>
    where
        T: DeserializeOwned + Snapshot,
    {
        let timer = PerfTimer::start(endpoint.operation);

        let reply = self.transport.send(request).map_err(|source| {
            log_error!(endpoint.operation, source);
            ExchangeError::Transport {
                operation: endpoint.operation.to_string(),
                source,
            }
        })?;

        timer.log_elapsed();
        debug!("Response: {} ({} bytes)", reply.status, reply.body.len());

        response::decode(endpoint.operation, &reply)
    }
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("env", &self.env)
            .field("authenticated", &self.auth.get().is_some())
            .finish()
    }
}

fn require_pair(pair: &str) -> Result<()> {
    if pair.trim().is_empty() {
        return Err(ExchangeError::InvalidPair(pair.to_string()));
    }
    Ok(())
}

fn expect_type(expected: TradeType, actual: TradeType) -> Result<()> {
    if expected != actual {
        return Err(ExchangeError::TradeTypeMismatch {
            expected: expected.to_string(),
            actual: actual.to_string(),
        });
    }
    Ok(())
}
