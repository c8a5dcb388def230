// tests/workflow_test.rs
// Workflow tests against ethers' MockProvider -- no live node required.

use deployer::{
    artifact::ContractArtifact,
    config::Config,
    error::DeployError,
    signer,
    workflow::run_deployment,
};
use ethers::providers::{JsonRpcError, MockResponse, Provider};
use ethers::signers::Signer;
use ethers::types::{Address, Bytes, TransactionReceipt, TxHash, U256, U64};

// Well-known Anvil development key (account #1).
const TEST_KEY: &str = "0x59c6995e998f97a5a0044966f0945389dc9e86dae88c7a8412f4603b6b78690d";
const TEST_ADDRESS: &str = "0x70997970C51812dc3A010C7d01b50e0d17dc79C8";

fn test_config() -> Config {
    Config {
        http_rpc_url: "http://127.0.0.1:8545".to_string(),
        chain_id: Some(31337),
        private_keys: vec![TEST_KEY.to_string()],
        artifact_path: None,
        constructor_args: vec![],
        confirmations: 1,
        confirmation_timeout_secs: 5,
        receipt_poll_interval_ms: 10,
        // Fixed gas values keep the mock response stack down to
        // nonce -> sendRawTransaction -> receipt.
        gas_limit: Some(3_000_000),
        gas_limit_buffer_percentage: 20,
        max_priority_fee_per_gas: U256::from(1_000_000_000u64),
        fallback_gas_price: None,
        gas_price_override: Some(U256::from(2_000_000_000u64)),
    }
}

fn test_artifact() -> ContractArtifact {
    ContractArtifact::from_parts(Bytes::from(vec![0x60, 0x80, 0x60, 0x40]), None, &[])
        .expect("valid artifact")
}

fn success_receipt(tx_hash: TxHash, contract_address: Address) -> TransactionReceipt {
    let mut receipt = TransactionReceipt::default();
    receipt.transaction_hash = tx_hash;
    receipt.status = Some(U64::from(1));
    receipt.block_number = Some(U64::from(1));
    receipt.contract_address = Some(contract_address);
    receipt
}

#[tokio::test]
async fn confirmed_deployment_returns_contract_address() {
    let (provider, mock) = Provider::mocked();
    let contract_address: Address = "0x5fbdb2315678afecb367f032d93f642f64180aa3".parse().unwrap();
    let tx_hash: TxHash = "0x11000000000000000000000000000000000000000000000000000000000000aa"
        .parse()
        .unwrap();

    // Responses pop LIFO; the workflow requests nonce, then broadcast, then receipt.
    mock.push(success_receipt(tx_hash, contract_address)).unwrap();
    mock.push(tx_hash).unwrap();
    mock.push(U256::zero()).unwrap();

    let record = run_deployment(provider, &test_artifact(), &test_config())
        .await
        .expect("deployment should confirm");
    assert_eq!(record.contract_address, contract_address);
    assert_eq!(record.transaction_hash, tx_hash);
}

#[tokio::test]
async fn empty_key_list_fails_before_any_network_call() {
    // Nothing is pushed: any RPC attempt would surface as NetworkUnavailable,
    // so getting NoSignerAvailable proves the resolver ran (and failed) first.
    let (provider, _mock) = Provider::mocked();
    let mut config = test_config();
    config.private_keys.clear();

    let err = run_deployment(provider, &test_artifact(), &config)
        .await
        .expect_err("no signer configured");
    assert!(matches!(err, DeployError::NoSignerAvailable(_)), "got {err:?}");
}

#[tokio::test]
async fn rejected_submission_surfaces_node_message() {
    let (provider, mock) = Provider::mocked();
    mock.push_response(MockResponse::Error(JsonRpcError {
        code: -32000,
        message: "insufficient funds for gas * price + value".to_string(),
        data: None,
    }));
    mock.push(U256::zero()).unwrap(); // nonce, popped before the send error

    let err = run_deployment(provider, &test_artifact(), &test_config())
        .await
        .expect_err("node rejects the transaction");
    match err {
        DeployError::SubmissionRejected(msg) => assert!(msg.contains("insufficient funds"), "got {msg}"),
        other => panic!("expected SubmissionRejected, got {other:?}"),
    }
}

#[tokio::test]
async fn unreachable_network_is_not_a_rejection() {
    // An empty response stack makes every request fail at the transport
    // level, which must classify as NetworkUnavailable.
    let (provider, _mock) = Provider::mocked();
    let err = run_deployment(provider, &test_artifact(), &test_config())
        .await
        .expect_err("nonce fetch cannot reach the network");
    assert!(matches!(err, DeployError::NetworkUnavailable(_)), "got {err:?}");
}

#[tokio::test]
async fn reverted_creation_fails_on_chain() {
    let (provider, mock) = Provider::mocked();
    let tx_hash: TxHash = "0x22000000000000000000000000000000000000000000000000000000000000bb"
        .parse()
        .unwrap();
    let mut receipt = TransactionReceipt::default();
    receipt.transaction_hash = tx_hash;
    receipt.status = Some(U64::from(0));
    receipt.block_number = Some(U64::from(1));

    mock.push(receipt).unwrap();
    mock.push(tx_hash).unwrap();
    mock.push(U256::zero()).unwrap();

    let err = run_deployment(provider, &test_artifact(), &test_config())
        .await
        .expect_err("creation reverted");
    assert!(matches!(err, DeployError::DeploymentFailedOnChain { tx_hash: h } if h == tx_hash));
}

#[tokio::test]
async fn success_status_without_contract_address_fails_on_chain() {
    let (provider, mock) = Provider::mocked();
    let tx_hash: TxHash = "0x33000000000000000000000000000000000000000000000000000000000000cc"
        .parse()
        .unwrap();
    let mut receipt = success_receipt(tx_hash, Address::zero());
    receipt.contract_address = None;

    mock.push(receipt).unwrap();
    mock.push(tx_hash).unwrap();
    mock.push(U256::zero()).unwrap();

    let err = run_deployment(provider, &test_artifact(), &test_config())
        .await
        .expect_err("no contract address in receipt");
    assert!(matches!(err, DeployError::DeploymentFailedOnChain { .. }), "got {err:?}");
}

#[tokio::test]
async fn missing_receipt_times_out_and_keeps_the_hash() {
    let (provider, mock) = Provider::mocked();
    let tx_hash: TxHash = "0x44000000000000000000000000000000000000000000000000000000000000dd"
        .parse()
        .unwrap();

    // Exactly one broadcast response is stocked; once it and the nonce are
    // consumed, every receipt poll fails until the deadline. A second submit
    // attempt would have drained a second broadcast response -- there is none,
    // and the error kind below proves none was attempted.
    mock.push(tx_hash).unwrap();
    mock.push(U256::zero()).unwrap();

    let mut config = test_config();
    config.confirmation_timeout_secs = 1;
    config.receipt_poll_interval_ms = 50;

    let err = run_deployment(provider, &test_artifact(), &config)
        .await
        .expect_err("no receipt before the deadline");
    match err {
        DeployError::ConfirmationTimeout { tx_hash: h, timeout_secs } => {
            assert_eq!(h, tx_hash);
            assert_eq!(timeout_secs, 1);
        }
        other => panic!("expected ConfirmationTimeout, got {other:?}"),
    }
}

#[tokio::test]
async fn waits_for_configured_confirmation_depth() {
    let (provider, mock) = Provider::mocked();
    let contract_address: Address = "0x5fbdb2315678afecb367f032d93f642f64180aa3".parse().unwrap();
    let tx_hash: TxHash = "0x55000000000000000000000000000000000000000000000000000000000000ee"
        .parse()
        .unwrap();

    // Receipt lands in block 1; with depth 2 the waiter must poll the head
    // until block 2 exists.
    mock.push(U64::from(2)).unwrap();
    mock.push(U64::from(1)).unwrap();
    mock.push(success_receipt(tx_hash, contract_address)).unwrap();
    mock.push(tx_hash).unwrap();
    mock.push(U256::zero()).unwrap();

    let mut config = test_config();
    config.confirmations = 2;

    let record = run_deployment(provider, &test_artifact(), &config)
        .await
        .expect("deployment should confirm at depth 2");
    assert_eq!(record.contract_address, contract_address);
}

#[tokio::test]
async fn huge_confirmation_depth_does_not_overflow() {
    let (provider, mock) = Provider::mocked();
    let contract_address: Address = "0x5fbdb2315678afecb367f032d93f642f64180aa3".parse().unwrap();
    let tx_hash: TxHash = "0x66000000000000000000000000000000000000000000000000000000000000ff"
        .parse()
        .unwrap();

    // Depth u64::MAX saturates the target block computation; with the head
    // already at U64::MAX the depth check passes instead of panicking on an
    // overflowing add.
    mock.push(U64::MAX).unwrap();
    mock.push(success_receipt(tx_hash, contract_address)).unwrap();
    mock.push(tx_hash).unwrap();
    mock.push(U256::zero()).unwrap();

    let mut config = test_config();
    config.confirmations = u64::MAX;

    let record = run_deployment(provider, &test_artifact(), &config)
        .await
        .expect("saturated depth target is reachable");
    assert_eq!(record.contract_address, contract_address);
}

#[test]
fn signer_resolution_is_deterministic() {
    let keys = vec![TEST_KEY.to_string(), "0xdeadbeef".to_string()];
    let first = signer::resolve(&keys).expect("first key resolves");
    let second = signer::resolve(&keys).expect("same key resolves again");
    assert_eq!(first.address(), second.address());
    assert_eq!(first.address(), TEST_ADDRESS.parse::<Address>().unwrap());
}

#[test]
fn unusable_first_key_is_no_signer() {
    let keys = vec!["not-a-key".to_string()];
    let err = signer::resolve(&keys).expect_err("garbage key");
    assert!(matches!(err, DeployError::NoSignerAvailable(_)));
}

#[test]
fn every_error_kind_has_a_stable_label() {
    let tx_hash = TxHash::zero();
    let cases = [
        (DeployError::NoSignerAvailable("x".into()), "NoSignerAvailable"),
        (DeployError::SubmissionRejected("x".into()), "SubmissionRejected"),
        (DeployError::NetworkUnavailable("x".into()), "NetworkUnavailable"),
        (DeployError::DeploymentFailedOnChain { tx_hash }, "DeploymentFailedOnChain"),
        (DeployError::ConfirmationTimeout { tx_hash, timeout_secs: 60 }, "ConfirmationTimeout"),
    ];
    for (err, kind) in cases {
        assert_eq!(err.kind(), kind);
    }
}
