mod common;

use serde_json::json;
use vesting_dash_adapters::HttpTransactionService;
use vesting_dash_core::{
    CancelTarget, CancellationRequest, EncodedUtxo, PortError, TransactionServicePort, UnsignedTx,
    Witness,
};

use common::{calls, config, recorded, spawn_mock_server};

fn request() -> CancellationRequest {
    CancellationRequest::new(
        CancelTarget::new("abc", "0"),
        vec![
            EncodedUtxo::from_hex("828258200001").expect("utxo"),
            EncodedUtxo::from_hex("828258200002").expect("utxo"),
        ],
    )
}

#[tokio::test]
async fn build_posts_output_reference_and_utxos() {
    let calls = calls();
    let (base_url, _join) = spawn_mock_server(calls.clone(), |path, _| match path {
        "/transaction/stake/cancel" => (200, "\"84a40081\"".to_owned()),
        _ => (404, "not found".to_owned()),
    });
    let service = HttpTransactionService::with_config(&config(&base_url, "")).expect("service");

    let unsigned = service.build_cancellation(&request()).await.expect("build");

    assert_eq!(unsigned.to_hex(), "84a40081");
    let calls = recorded(&calls);
    assert_eq!(calls.len(), 1);
    assert_eq!(
        calls[0].body,
        json!({
            "stakeRequestOutputReference": { "txHash": "abc", "index": "0" },
            "walletUtxoListCbor": ["828258200001", "828258200002"]
        })
    );
}

#[tokio::test]
async fn finalize_posts_tx_and_witness() {
    let calls = calls();
    let (base_url, _join) = spawn_mock_server(calls.clone(), |path, _| match path {
        "/transaction/finalize" => (200, "\"84a400a100\"".to_owned()),
        _ => (404, "not found".to_owned()),
    });
    let service = HttpTransactionService::with_config(&config(&base_url, "")).expect("service");

    let signed = service
        .finalize(
            &UnsignedTx::from_hex("84a40081").expect("tx"),
            &Witness::from_hex("a100").expect("witness"),
        )
        .await
        .expect("finalize");

    assert_eq!(signed.to_hex(), "84a400a100");
    assert_eq!(
        recorded(&calls)[0].body,
        json!({ "unsignedTxCbor": "84a40081", "txWitnessCbor": "a100" })
    );
}

#[tokio::test]
async fn non_success_status_is_rejected_with_body() {
    let (base_url, _join) = spawn_mock_server(calls(), |_, _| {
        (400, "stake request already spent".to_owned())
    });
    let service = HttpTransactionService::with_config(&config(&base_url, "")).expect("service");

    let err = service
        .build_cancellation(&request())
        .await
        .expect_err("must fail");

    match err {
        PortError::Rejected(msg) => assert!(msg.contains("already spent")),
        other => panic!("expected Rejected, got {other:?}"),
    }
}

#[tokio::test]
async fn non_hex_payload_is_a_validation_error() {
    let (base_url, _join) = spawn_mock_server(calls(), |_, _| (200, "\"not-hex\"".to_owned()));
    let service = HttpTransactionService::with_config(&config(&base_url, "")).expect("service");

    let err = service
        .build_cancellation(&request())
        .await
        .expect_err("must fail");

    assert!(matches!(err, PortError::Validation(_)));
}

#[tokio::test]
async fn unreachable_service_is_a_transport_error() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);
    let service = HttpTransactionService::with_config(&config(&format!("http://{addr}"), ""))
        .expect("service");

    let err = service
        .build_cancellation(&request())
        .await
        .expect_err("must fail");

    assert!(matches!(err, PortError::Transport(_)));
}
