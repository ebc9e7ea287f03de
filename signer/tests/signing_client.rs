use std::sync::Arc;
use std::time::Duration;

use fbx_messages::proto::{AuthInfo, ModeInfoSingle, TxRaw};
use fbx_messages::{Fee, Sequencing, TransactionRequest};
use fbx_nullables::{NullChain, NullChainConnector, NullHardwareConnector, NullHardwareDevice};
use fbx_rpc::{BroadcastError, NetworkError};
use fbx_signer::{
    derivation_path, HardwareConnector, KeySource, SignAndBroadcastError, SignerResolver, SigningError,
};
use fbx_types::{Amount, Coin, Ecosystem, Intent, Mnemonic, Registry};
use prost::Message;

const PHRASE: &str = "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about";

fn delegate_from(address: &str) -> TransactionRequest {
    TransactionRequest::build(
        &Ecosystem::Cosmos,
        vec![Intent::Delegate {
            delegator: address.into(),
            validator: "cosmosvaloper1xyz".into(),
            amount: Amount::from(100u64),
            denom: "uatom".into(),
        }],
        Fee::new(vec![Coin::new(5000u64, "uatom")], 200_000),
        "",
    )
    .unwrap()
}

fn sign_mode(tx: &[u8]) -> i32 {
    let raw = TxRaw::decode(tx).unwrap();
    let auth = AuthInfo::decode(raw.auth_info_bytes.as_slice()).unwrap();
    let ModeInfoSingle { mode } = auth.signer_infos[0].mode_info.clone().unwrap().single.unwrap();
    mode
}

#[tokio::test]
async fn mnemonic_signer_broadcasts_direct_tx() {
    let registry = Registry::builtin();
    let entry = registry.lookup("ATOM").unwrap();
    let chain = Arc::new(NullChain::new("cosmoshub-4"));
    let resolver = SignerResolver::new(Arc::new(NullChainConnector::new(chain.clone())));

    let signer = resolver
        .resolve(
            KeySource::Mnemonic(Mnemonic::new(PHRASE)),
            derivation_path(entry.coin_type, 0),
            entry,
        )
        .await
        .unwrap();
    let client = resolver.connect(signer, entry).unwrap();
    assert!(client.address().starts_with("cosmos1"));

    let result = client
        .sign_and_broadcast(&delegate_from(client.address()))
        .await
        .unwrap();
    assert!(result.success);
    let sent = chain.broadcasts();
    assert_eq!(sent.len(), 1);
    assert_eq!(sign_mode(&sent[0]), 1);
}

#[tokio::test]
async fn hardware_signer_uses_amino_json() {
    let registry = Registry::builtin();
    let entry = registry.lookup("ATOM").unwrap();
    let chain = Arc::new(NullChain::new("cosmoshub-4"));
    let resolver = SignerResolver::new(Arc::new(NullChainConnector::new(chain.clone())));
    let device = Arc::new(NullHardwareDevice::new(Mnemonic::new(PHRASE)));
    let transport = NullHardwareConnector::new(device.clone()).open().await.unwrap();

    let signer = resolver
        .resolve(KeySource::Hardware(transport), derivation_path(118, 0), entry)
        .await
        .unwrap();
    let client = resolver.connect(signer, entry).unwrap();
    client
        .sign_and_broadcast(&delegate_from(client.address()))
        .await
        .unwrap();

    assert_eq!(sign_mode(&chain.broadcasts()[0]), 127);
    let doc = String::from_utf8(device.signed_docs().remove(0)).unwrap();
    assert!(doc.starts_with(r#"{"account_number":"0","chain_id":"cosmoshub-4""#));
    assert!(doc.contains(r#""type":"cosmos-sdk/MsgDelegate""#));
}

#[tokio::test]
async fn same_mnemonic_same_address_on_both_paths() {
    let registry = Registry::builtin();
    let entry = registry.lookup("DSM").unwrap();
    let resolver = SignerResolver::new(Arc::new(NullChainConnector::new(Arc::new(NullChain::new("desmos-mainnet")))));
    let software = resolver
        .resolve(KeySource::Mnemonic(Mnemonic::new(PHRASE)), derivation_path(852, 0), entry)
        .await
        .unwrap();
    let device = Arc::new(NullHardwareDevice::new(Mnemonic::new(PHRASE)));
    let hardware = resolver
        .resolve(
            KeySource::Hardware(NullHardwareConnector::new(device).open().await.unwrap()),
            derivation_path(852, 0),
            entry,
        )
        .await
        .unwrap();
    assert_eq!(software.address(), hardware.address());
    assert!(software.address().starts_with("desmos1"));
}

#[tokio::test]
async fn foreign_signer_is_refused_before_any_chain_call() {
    let registry = Registry::builtin();
    let entry = registry.lookup("ATOM").unwrap();
    let chain = Arc::new(NullChain::new("cosmoshub-4"));
    let resolver = SignerResolver::new(Arc::new(NullChainConnector::new(chain.clone())));
    let signer = resolver
        .resolve(KeySource::Mnemonic(Mnemonic::new(PHRASE)), derivation_path(118, 0), entry)
        .await
        .unwrap();
    let client = resolver.connect(signer, entry).unwrap();

    let err = client
        .sign_and_broadcast(&delegate_from("cosmos1someoneelse"))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        SignAndBroadcastError::Signing(SigningError::SignerMismatch { .. })
    ));
    assert_eq!(chain.call_count(), 0);
}

#[tokio::test]
async fn sign_sends_nothing_until_broadcast() {
    let registry = Registry::builtin();
    let entry = registry.lookup("ATOM").unwrap();
    let chain = Arc::new(NullChain::new("cosmoshub-4"));
    let resolver = SignerResolver::new(Arc::new(NullChainConnector::new(chain.clone())));
    let signer = resolver
        .resolve(KeySource::Mnemonic(Mnemonic::new(PHRASE)), derivation_path(118, 0), entry)
        .await
        .unwrap();
    let client = resolver.connect(signer, entry).unwrap();

    let tx = client.sign(&delegate_from(client.address())).await.unwrap();
    assert_eq!(tx.chain_id(), "cosmoshub-4");
    assert!(chain.broadcasts().is_empty());

    client.broadcast(&tx).await.unwrap();
    assert_eq!(chain.broadcasts(), vec![tx.as_bytes().to_vec()]);
}

#[tokio::test]
async fn pinned_sequencing_skips_chain_queries() {
    let registry = Registry::builtin();
    let entry = registry.lookup("ATOM").unwrap();
    let chain = Arc::new(NullChain::new("cosmoshub-4").strict_accounts());
    let resolver = SignerResolver::new(Arc::new(NullChainConnector::new(chain.clone())));
    let signer = resolver
        .resolve(KeySource::Mnemonic(Mnemonic::new(PHRASE)), derivation_path(118, 0), entry)
        .await
        .unwrap();
    let client = resolver.connect(signer, entry).unwrap();
    let request = delegate_from(client.address()).with_sequencing(Sequencing {
        account_number: 12,
        sequence: 3,
        chain_id: "cosmoshub-4".into(),
    });
    client.sign_and_broadcast(&request).await.unwrap();
    assert_eq!(chain.call_count(), 1);
}

#[tokio::test]
async fn missing_account_fails_sequencing() {
    let registry = Registry::builtin();
    let entry = registry.lookup("ATOM").unwrap();
    let chain = Arc::new(NullChain::new("cosmoshub-4").strict_accounts());
    let resolver = SignerResolver::new(Arc::new(NullChainConnector::new(chain.clone())));
    let signer = resolver
        .resolve(KeySource::Mnemonic(Mnemonic::new(PHRASE)), derivation_path(118, 0), entry)
        .await
        .unwrap();
    let client = resolver.connect(signer, entry).unwrap();
    let err = client
        .sign_and_broadcast(&delegate_from(client.address()))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        SignAndBroadcastError::Sequencing(BroadcastError::AccountNotFound(_))
    ));
    assert!(chain.broadcasts().is_empty());
}

#[tokio::test]
async fn hanging_broadcast_times_out_as_network_error() {
    let registry = Registry::builtin();
    let entry = registry.lookup("ATOM").unwrap();
    let chain = Arc::new(NullChain::new("cosmoshub-4").hang_on_broadcast());
    let resolver = SignerResolver::new(Arc::new(NullChainConnector::new(chain)))
        .with_network_timeout(Duration::from_millis(50));
    let signer = resolver
        .resolve(KeySource::Mnemonic(Mnemonic::new(PHRASE)), derivation_path(118, 0), entry)
        .await
        .unwrap();
    let client = resolver.connect(signer, entry).unwrap();
    let err = client
        .sign_and_broadcast(&delegate_from(client.address()))
        .await
        .unwrap_err();
    assert_eq!(
        err,
        SignAndBroadcastError::Broadcast(BroadcastError::Network(NetworkError::Timeout))
    );
}

#[tokio::test]
async fn invalid_mnemonic_is_a_signing_error() {
    let registry = Registry::builtin();
    let entry = registry.lookup("ATOM").unwrap();
    let resolver = SignerResolver::new(Arc::new(NullChainConnector::new(Arc::new(NullChain::new("cosmoshub-4")))));
    let err = resolver
        .resolve(KeySource::Mnemonic(Mnemonic::new("not a phrase")), derivation_path(118, 0), entry)
        .await
        .err()
        .unwrap();
    assert!(matches!(err, SigningError::InvalidMnemonic(_)));
}
