use std::time::Duration;

use fbx_secrets::{
    channel_pair, KdfParams, RevealedSecret, SecretsClient, SecretsError, SecretsHolder, Vault,
};
use fbx_types::{Mnemonic, Password};

const PHRASE: &str = "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about";

fn holder() -> SecretsHolder {
    let unlock = Password::new("unlock");
    let mut vault = Vault::create_with_params(&unlock, KdfParams::insecure_fast()).unwrap();
    vault
        .add_mnemonic_wallet(&unlock, "main", &Mnemonic::new(PHRASE), &Password::new("security"))
        .unwrap();
    vault.add_hardware_wallet(&unlock, "ledger").unwrap();
    SecretsHolder::new(vault)
}

fn connect() -> SecretsClient {
    let (client_end, holder_end) = channel_pair(8);
    holder().spawn(holder_end);
    SecretsClient::new(client_end, Duration::from_secs(5))
}

#[tokio::test]
async fn reveals_mnemonic_over_channel() {
    let client = connect();
    client.ping().await.unwrap();
    let secret = client
        .reveal_mnemonic("main", &Password::new("unlock"), Some(&Password::new("security")))
        .await
        .unwrap();
    match secret {
        RevealedSecret::Mnemonic(m) => assert_eq!(m.expose_phrase(), PHRASE),
        other => panic!("unexpected {other:?}"),
    }
}

#[tokio::test]
async fn password_errors_cross_the_channel() {
    let client = connect();
    assert_eq!(
        client
            .reveal_mnemonic("main", &Password::new("wrong"), Some(&Password::new("security")))
            .await
            .unwrap_err(),
        SecretsError::InvalidUnlockPassword
    );
    assert_eq!(
        client
            .reveal_mnemonic("main", &Password::new("unlock"), Some(&Password::new("wrong")))
            .await
            .unwrap_err(),
        SecretsError::InvalidSecurityPassword
    );
    assert_eq!(
        client
            .reveal_mnemonic("ghost", &Password::new("unlock"), None)
            .await
            .unwrap_err(),
        SecretsError::WalletNotFound("ghost".into())
    );
}

#[tokio::test]
async fn hardware_wallet_reveals_nothing() {
    let client = connect();
    let secret = client
        .reveal_mnemonic("ledger", &Password::new("unlock"), None)
        .await
        .unwrap();
    assert!(matches!(secret, RevealedSecret::HardwareWallet));
}

#[tokio::test]
async fn concurrent_requests_get_their_own_answers() {
    let client = std::sync::Arc::new(connect());
    let a = {
        let client = client.clone();
        tokio::spawn(async move {
            client
                .reveal_mnemonic("main", &Password::new("unlock"), Some(&Password::new("security")))
                .await
        })
    };
    let b = {
        let client = client.clone();
        tokio::spawn(async move { client.reveal_mnemonic("ledger", &Password::new("unlock"), None).await })
    };
    assert!(matches!(a.await.unwrap().unwrap(), RevealedSecret::Mnemonic(_)));
    assert!(matches!(b.await.unwrap().unwrap(), RevealedSecret::HardwareWallet));
}
