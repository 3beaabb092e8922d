//! Client behaviour against mocked and replayed transports
//!
//! Local validation must fail before the transport is touched; mocks with
//! `never()` expectations prove it.

use crate::{envelope, ReplayTransport};
use mockall::mock;
use rstest::*;
use serial_test::serial;
use std::sync::Arc;
use tokenomy_api::prelude::*;
use tokenomy_api::v2::{HEADER_KEY, HEADER_SIGN};
use tokenomy_core::amount;

mock! {
    pub Wire {}

    impl Transport for Wire {
        fn send(&self, request: &HttpRequest) -> std::result::Result<HttpResponse, TransportError>;
    }
}

const NOW: i64 = 1_700_000_000;

fn environment() -> Environment {
    Environment::default().with_credentials("test-token", "test-secret")
}

fn client_over(transport: Arc<dyn Transport>) -> Client {
    Client::new(environment(), transport)
        .expect("valid environment")
        .with_clock(Arc::new(FixedClock::new(NOW)))
}

/// Client whose transport fails the test if it is ever called
#[fixture]
fn offline_client() -> Client {
    let mut wire = MockWire::new();
    wire.expect_send().never();
    client_over(Arc::new(wire))
}

fn order_json(id: i64, trade_type: &str, status: &str) -> serde_json::Value {
    serde_json::json!({
        "id": id,
        "pair": "btc_idr",
        "type": trade_type,
        "method": "limit",
        "status": status,
        "price": "150000000",
        "coin_amount": "0.01",
        "coin_filled": "0",
        "coin_remain": "0.01",
        "submit_time": NOW - 60,
        "finish_time": if status == "cancelled" { NOW } else { 0 },
    })
}

// ============================================================================
// LOCAL VALIDATION (no transport call)
// ============================================================================

#[cfg(test)]
mod validation_tests {
    use super::*;

    #[rstest]
    fn test_limit_with_zero_price(offline_client: Client) {
        let request = TradeRequest::limit(TradeType::Bid, "btc_idr", amount!("0.01"), Amount::zero());
        let err = offline_client.trade(&request).unwrap_err();
        assert!(matches!(err, ExchangeError::InvalidPrice(_)));
        assert!(err.is_validation());
    }

    #[rstest]
    fn test_market_with_zero_amount(offline_client: Client) {
        let request = TradeRequest::market(TradeType::Ask, "btc_idr", Amount::zero());
        let err = offline_client.trade_ask(&request).unwrap_err();
        assert!(matches!(err, ExchangeError::InvalidAmount(_)));
    }

    #[rstest]
    fn test_withdraw_with_empty_request_id(offline_client: Client) {
        let request = WithdrawRequest::new("btc", "bc1qexample", amount!("0.5")).with_request_id("");
        assert_eq!(offline_client.user_withdraw(&request).unwrap_err(), ExchangeError::InvalidRequestId);
    }

    #[rstest]
    #[case(TradeType::Ask, TradeType::Bid)]
    #[case(TradeType::Bid, TradeType::Ask)]
    fn test_cancel_through_wrong_side(offline_client: Client, #[case] entry: TradeType, #[case] side: TradeType) {
        let cancel = CancelRequest::new(side, "btc_idr", 7);
        let err = offline_client.trade_cancel_as(entry, &cancel).unwrap_err();
        assert!(matches!(err, ExchangeError::TradeTypeMismatch { .. }));
    }

    #[rstest]
    #[case("", 1)]
    #[case("btc_idr", 0)]
    #[case("btc_idr", -5)]
    fn test_cancel_target_checked(offline_client: Client, #[case] pair: &str, #[case] id: i64) {
        assert!(offline_client.trade_cancel_bid(pair, id).unwrap_err().is_validation());
    }

    #[test]
    fn test_unknown_type_string_never_reaches_transport() {
        let decoded = serde_json::from_value::<Trade>(order_json(1, "short", ""));
        assert!(decoded.is_err());
        assert!("short".parse::<TradeType>().is_err());
    }

    #[test]
    fn test_missing_credentials() {
        let mut wire = MockWire::new();
        wire.expect_send().never();
        let client = Client::new(Environment::default(), Arc::new(wire)).unwrap();
        assert!(matches!(client.trade_cancel_all(), Err(ExchangeError::MissingCredentials(_))));
    }
}

// ============================================================================
// REQUEST DISPATCH
// ============================================================================

#[cfg(test)]
mod dispatch_tests {
    use super::*;

    #[rstest]
    #[case("ask", "/v2/trade/cancel/ask")]
    #[case("bid", "/v2/trade/cancel/bid")]
    fn test_trade_cancel_dispatches_by_type(#[case] trade_type: &'static str, #[case] path: &'static str) {
        let mut wire = MockWire::new();
        wire.expect_send()
            .withf(move |request| {
                request.method == HttpMethod::Delete
                    && request.path == path
                    && request.payload == format!("pair=btc_idr&timestamp={NOW}&trade_id=9")
            })
            .times(1)
            .returning(move |_| {
                let body = envelope(serde_json::json!({ "order": order_json(9, trade_type, "cancelled") }));
                Ok(HttpResponse::new(200, body))
            });

        let client = client_over(Arc::new(wire));
        let open: Trade = serde_json::from_value(order_json(9, trade_type, "")).unwrap();
        let cancelled = client.trade_cancel(&open).unwrap();

        assert_eq!(cancelled.id, 9);
        assert_eq!(cancelled.status, TradeStatus::Cancelled);
        assert_eq!(cancelled.trade_type.as_str(), trade_type);
    }

    #[test]
    fn test_submission_is_signed() {
        let mut wire = MockWire::new();
        wire.expect_send()
            .withf(|request| {
                let signer = RequestSigner::new(Credentials::new("test-token", "test-secret"));
                request.method == HttpMethod::Post
                    && request.path == "/v2/trade/bid"
                    && request.header(HEADER_KEY) == Some("test-token")
                    && request
                        .header(HEADER_SIGN)
                        .is_some_and(|sign| signer.validate_signature(&request.payload, sign))
            })
            .times(1)
            .returning(|_| {
                let body = envelope(serde_json::json!({ "order": order_json(21, "bid", "") }));
                Ok(HttpResponse::new(200, body))
            });

        let client = client_over(Arc::new(wire));
        let request = TradeRequest::limit(TradeType::Bid, "btc_idr", amount!("0.01"), amount!("150000000"));
        let response = client.trade_bid(&request).unwrap();
        assert_eq!(response.order.id, 21);
        assert!(response.order.is_open());
    }

    #[test]
    fn test_insufficient_balance() {
        let transport = Arc::new(ReplayTransport::new([HttpResponse::new(
            402,
            r#"{"code":402,"error":"insufficient balance"}"#,
        )]));
        let client = client_over(transport.clone());

        let request = TradeRequest::market(TradeType::Bid, "btc_idr", amount!("1000000"));
        let err = client.trade(&request).unwrap_err();

        let api = err.api_error().expect("api error");
        assert_eq!(api.status, 402);
        assert_eq!(api.message, "insufficient balance");
        assert_eq!(api.kind(), ApiErrorKind::InsufficientBalance);
        assert_eq!(transport.requests().len(), 1);
    }

    #[test]
    fn test_cancel_all_keeps_server_subset() {
        let body = envelope(serde_json::json!([
            order_json(1, "ask", "cancelled"),
            order_json(3, "bid", "cancelled"),
        ]));
        let transport = Arc::new(ReplayTransport::new([HttpResponse::new(200, body)]));
        let client = client_over(transport.clone());

        let cancelled = client.trade_cancel_all().unwrap();
        let ids: Vec<i64> = cancelled.iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![1, 3]);

        let sent = &transport.requests()[0];
        assert_eq!(sent.method, HttpMethod::Delete);
        assert_eq!(sent.path, "/v2/trade/cancel/all");
        assert_eq!(sent.payload, format!("timestamp={NOW}"));
    }

    #[test]
    fn test_history_query_on_the_wire() {
        let transport = Arc::new(ReplayTransport::new([HttpResponse::new(200, envelope(serde_json::json!([])))]));
        let client = client_over(transport.clone());

        let query = HistoryQuery::new("btc_idr").id_before(500).limit(100).sort(SortOrder::Desc);
        assert!(client.user_trades(&query).unwrap().is_empty());

        let sent = &transport.requests()[0];
        assert_eq!(sent.path, "/v2/user/trades");
        assert_eq!(sent.payload, format!("id_before=500&limit=100&pair=btc_idr&timestamp={NOW}"));
    }

    #[test]
    fn test_withdraw_round_trip() {
        let body = envelope(serde_json::json!({
            "id": 88,
            "request_id": "wd-42",
            "asset": "btc",
            "address": "bc1qexample",
            "status": "pending",
            "amount": "0.5",
            "fee": "0.0005",
            "final_amount": "0.4995",
        }));
        let transport = Arc::new(ReplayTransport::new([HttpResponse::new(200, body)]));
        let client = client_over(transport.clone());

        let request = WithdrawRequest::new("btc", "bc1qexample", amount!("0.5")).with_request_id("wd-42");
        let item = client.user_withdraw(&request).unwrap();
        assert_eq!(item.final_amount, amount!("0.4995"));

        let sent = &transport.requests()[0];
        assert_eq!(sent.method, HttpMethod::Post);
        assert!(sent.payload.contains("request_id=wd-42"));
    }

    #[test]
    fn test_market_summaries_public() {
        let body = envelope(serde_json::json!({
            "tickers": { "btc_idr": { "pair": "btc_idr", "last": "150000000", "high": 151000000 } },
            "prices_24h": { "btc_idr": "149000000" },
        }));
        let transport = Arc::new(ReplayTransport::new([HttpResponse::new(200, body)]));
        let client = client_over(transport.clone());

        let summaries = client.market_summaries().unwrap();
        assert_eq!(summaries.tickers["btc_idr"].high, amount!("151000000"));
        assert!(transport.requests()[0].headers.is_empty());
    }
}

// ============================================================================
// ENVIRONMENT (process-wide state, run serially)
// ============================================================================

#[cfg(test)]
mod environment_tests {
    use super::*;

    const VARS: [&str; 4] = ["TOKENOMY_ADDRESS", "TOKENOMY_TOKEN", "TOKENOMY_SECRET", "TOKENOMY_INSECURE"];

    fn clear() {
        for var in VARS {
            std::env::remove_var(var);
        }
    }

    #[test]
    #[serial]
    fn test_from_env_defaults() {
        clear();
        let env = Environment::from_env();
        assert_eq!(env.address, "https://api.tokenomy.com");
        assert!(env.token.is_empty());
        assert!(!env.insecure);
    }

    #[test]
    #[serial]
    fn test_from_env_overrides() {
        clear();
        std::env::set_var("TOKENOMY_ADDRESS", "https://sandbox.example.com");
        std::env::set_var("TOKENOMY_TOKEN", "env-token");
        std::env::set_var("TOKENOMY_SECRET", "env-secret");
        std::env::set_var("TOKENOMY_INSECURE", "true");

        let env = Environment::from_env();
        assert_eq!(env.address, "https://sandbox.example.com");
        assert_eq!(env.token, "env-token");
        assert_eq!(env.secret, "env-secret");
        assert!(env.insecure);
        assert!(!format!("{env:?}").contains("env-secret"));
        clear();
    }

    #[test]
    #[serial]
    fn test_env_credentials_required() {
        clear();
        std::env::set_var("TOKENOMY_TOKEN", "env-token");
        let err = Environment::default().with_env_credentials().unwrap_err();
        assert_eq!(err, ExchangeError::MissingCredentials("TOKENOMY_SECRET".to_string()));
        clear();
    }
}
