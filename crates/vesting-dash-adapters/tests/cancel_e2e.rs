mod common;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use serde_json::{json, Value};
use vesting_dash_adapters::{AdapterConfig, BridgeWalletConnector, HttpTransactionService};
use vesting_dash_core::{
    CancelError, CancelObserver, CancelTarget, CancellationCoordinator, PortError, WalletSession,
};

use common::{calls, config, happy_wallet, recorded, rpc_error, rpc_result, spawn_mock_server};

#[derive(Default)]
struct Signals {
    succeeded: AtomicUsize,
    failed: AtomicUsize,
}

impl CancelObserver for Signals {
    fn cancellation_succeeded(&self) {
        self.succeeded.fetch_add(1, Ordering::SeqCst);
    }

    fn cancellation_failed(&self) {
        self.failed.fetch_add(1, Ordering::SeqCst);
    }
}

fn tx_service(path: &str, _body: &Value) -> (u16, String) {
    match path {
        "/transaction/stake/cancel" => (200, "\"84a40081\"".to_owned()),
        "/transaction/finalize" => (200, "\"84a400a100\"".to_owned()),
        _ => (404, "not found".to_owned()),
    }
}

#[tokio::test]
async fn pending_request_is_cancelled_end_to_end() {
    let service_calls = calls();
    let wallet_calls = calls();
    let (service_url, _s) = spawn_mock_server(service_calls.clone(), tx_service);
    let (wallet_url, _w) = spawn_mock_server(wallet_calls.clone(), happy_wallet);
    let cfg = config(&service_url, &wallet_url);

    let coordinator = CancellationCoordinator::with_timeouts(
        HttpTransactionService::with_config(&cfg).expect("service"),
        cfg.step_timeouts(),
    );
    let session =
        WalletSession::new(BridgeWalletConnector::with_config(&cfg).expect("connector"));
    session.connect("nami").await.expect("connect");
    let signals = Signals::default();

    let report = coordinator
        .cancel(&session, CancelTarget::new("abc", "0"), &signals)
        .await;

    assert_eq!(report.result.as_ref().map(|id| id.0.as_str()).ok(), Some("9a1fe0c1"));
    assert_eq!(signals.succeeded.load(Ordering::SeqCst), 1);
    assert_eq!(signals.failed.load(Ordering::SeqCst), 0);

    let paths: Vec<_> = recorded(&service_calls).into_iter().map(|c| c.path).collect();
    assert_eq!(paths, vec!["/transaction/stake/cancel", "/transaction/finalize"]);
    let finalize = &recorded(&service_calls)[1];
    assert_eq!(
        finalize.body,
        json!({ "unsignedTxCbor": "84a40081", "txWitnessCbor": "a100818258" })
    );
    let submit = recorded(&wallet_calls)
        .into_iter()
        .find(|c| c.method() == Some("submitTx"))
        .expect("submitTx call");
    assert_eq!(submit.params(), &json!(["nami", "84a400a100"]));
}

#[tokio::test]
async fn declined_signature_never_reaches_finalize() {
    let service_calls = calls();
    let (service_url, _s) = spawn_mock_server(service_calls.clone(), tx_service);
    let seen = Arc::new(Mutex::new(Vec::<String>::new()));
    let seen_in_server = Arc::clone(&seen);
    let (wallet_url, _w) = spawn_mock_server(calls(), move |path, body| {
        let method = body.get("method").and_then(Value::as_str).unwrap_or_default();
        if let Ok(mut g) = seen_in_server.lock() {
            g.push(method.to_owned());
        }
        match method {
            "signTx" => rpc_error(body, 2, "user declined"),
            _ => happy_wallet(path, body),
        }
    });
    let cfg = config(&service_url, &wallet_url);
    let coordinator =
        CancellationCoordinator::new(HttpTransactionService::with_config(&cfg).expect("service"));
    let session =
        WalletSession::new(BridgeWalletConnector::with_config(&cfg).expect("connector"));
    session.connect("nami").await.expect("connect");
    let signals = Signals::default();

    let report = coordinator
        .cancel(&session, CancelTarget::new("abc", "0"), &signals)
        .await;

    assert!(matches!(
        report.result,
        Err(CancelError::Sign(PortError::Rejected(_)))
    ));
    assert_eq!(signals.failed.load(Ordering::SeqCst), 1);
    assert_eq!(signals.succeeded.load(Ordering::SeqCst), 0);
    let paths: Vec<_> = recorded(&service_calls).into_iter().map(|c| c.path).collect();
    assert_eq!(paths, vec!["/transaction/stake/cancel"]);
    assert!(!seen.lock().expect("lock").iter().any(|m| m == "submitTx"));
}

#[tokio::test]
async fn slow_signature_is_bounded_by_the_sign_step() {
    let (service_url, _s) = spawn_mock_server(calls(), tx_service);
    let (wallet_url, _w) = spawn_mock_server(calls(), |path, body| {
        if body.get("method").and_then(Value::as_str) == Some("signTx") {
            std::thread::sleep(std::time::Duration::from_millis(800));
        }
        happy_wallet(path, body)
    });
    let cfg = AdapterConfig {
        http_timeout_ms: 300,
        sign_timeout_ms: 10_000,
        ..config(&service_url, &wallet_url)
    };
    let coordinator = CancellationCoordinator::with_timeouts(
        HttpTransactionService::with_config(&cfg).expect("service"),
        cfg.step_timeouts(),
    );
    let session =
        WalletSession::new(BridgeWalletConnector::with_config(&cfg).expect("connector"));
    session.connect("nami").await.expect("connect");
    let signals = Signals::default();

    let report = coordinator
        .cancel(&session, CancelTarget::new("abc", "0"), &signals)
        .await;

    assert!(report.result.is_ok(), "{:?}", report.result);
    assert_eq!(signals.succeeded.load(Ordering::SeqCst), 1);
}
