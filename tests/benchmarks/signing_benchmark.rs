//! Hot-path benchmarks: amount parsing and arithmetic, parameter packing and
//! request signing, envelope decoding.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use tokenomy_api::prelude::*;
use tokenomy_api::v2::response;
use tokenomy_core::amount;

fn amount_benchmarks(c: &mut Criterion) {
    c.bench_function("amount_parse_decimal", |b| {
        b.iter(|| Amount::from_str_exact(black_box("150000000.12345678")))
    });

    c.bench_function("amount_parse_fraction", |b| {
        b.iter(|| Amount::from_str_exact(black_box("1/3")))
    });

    let price = amount!("150000000.5");
    let volume = amount!("0.00012345");
    c.bench_function("amount_mul_display", |b| {
        b.iter(|| (black_box(&price) * black_box(&volume)).to_string())
    });
}

fn signing_benchmarks(c: &mut Criterion) {
    let signer = RequestSigner::new(Credentials::new("bench-token", "bench-secret"));
    let request = TradeRequest::limit(TradeType::Bid, "btc_idr", amount!("0.01"), amount!("150000000"));

    c.bench_function("trade_request_pack", |b| b.iter(|| black_box(&request).pack()));

    let params = match request.pack() {
        Ok(params) => params,
        Err(e) => panic!("bench request must be valid: {e}"),
    };
    c.bench_function("request_sign", |b| {
        b.iter(|| signer.sign(black_box(&params), black_box(1_700_000_000)))
    });
}

fn decode_benchmarks(c: &mut Criterion) {
    let body = r#"{"data": {"order": {
        "id": 11, "pair": "btc_idr", "type": "bid", "method": "limit",
        "price": "150000000", "coin_amount": "0.5", "coin_filled": "0.2", "coin_remain": "0.3",
        "base_amount": "75000000", "base_filled": "30000000", "base_remain": "45000000"
    }}}"#;
    let reply = HttpResponse::new(200, body);

    c.bench_function("decode_trade_response", |b| {
        b.iter(|| response::decode::<TradeResponse>("TradeBid", black_box(&reply)))
    });
}

criterion_group!(benches, amount_benchmarks, signing_benchmarks, decode_benchmarks);
criterion_main!(benches);
