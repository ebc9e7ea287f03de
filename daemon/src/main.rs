//! FBX command-line wallet.
//!
//! Runs the secrets holder in-process behind the same channel a UI would use,
//! so every transaction goes through the full authorize/sign/broadcast
//! pipeline.

use anyhow::{bail, Context};
use clap::{Args, Parser, Subcommand};
use fbx_crypto::{account_address, compressed_public_key, derive_signing_key, generate_mnemonic, validate_mnemonic};
use fbx_messages::Fee;
use fbx_rpc::HttpConnector;
use fbx_secrets::{channel_pair, RevealedSecret, SecretsClient, SecretsHolder, Vault};
use fbx_signer::{derivation_path, SignerResolver, UnavailableHardware};
use fbx_types::{Amount, Coin, Credentials, Intent, Mnemonic, Password, Registry};
use fbx_utils::{init_logging, LogFormat};
use fbx_wallet::{EventBus, SubmitOptions, TransactionOrchestrator, WalletConfig};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

#[derive(Parser)]
#[command(name = "fbx", about = "FBX wallet: sign and broadcast Cosmos transactions")]
struct Cli {
    /// Path to a TOML configuration file. CLI flags and env vars override it.
    #[arg(long, env = "FBX_CONFIG")]
    config: Option<PathBuf>,

    /// Encrypted vault file.
    #[arg(long, env = "FBX_VAULT")]
    vault: Option<PathBuf>,

    /// Log level: "trace", "debug", "info", "warn", "error".
    #[arg(long, env = "FBX_LOG_LEVEL")]
    log_level: Option<String>,

    /// Log format: "human" or "json".
    #[arg(long, env = "FBX_LOG_FORMAT")]
    log_format: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Manage the encrypted vault.
    Vault {
        #[command(subcommand)]
        action: VaultAction,
    },
    /// Print the account address of a mnemonic wallet.
    Address {
        #[command(flatten)]
        wallet: WalletArgs,
    },
    /// Delegate tokens to a validator.
    Delegate {
        #[command(flatten)]
        wallet: WalletArgs,
        #[command(flatten)]
        tx: TxArgs,
        #[arg(long)]
        validator: String,
        #[arg(long)]
        amount: String,
    },
    /// Undelegate tokens from a validator.
    Undelegate {
        #[command(flatten)]
        wallet: WalletArgs,
        #[command(flatten)]
        tx: TxArgs,
        #[arg(long)]
        validator: String,
        #[arg(long)]
        amount: String,
    },
    /// Move a delegation between validators.
    Redelegate {
        #[command(flatten)]
        wallet: WalletArgs,
        #[command(flatten)]
        tx: TxArgs,
        #[arg(long)]
        from_validator: String,
        #[arg(long)]
        to_validator: String,
        #[arg(long)]
        amount: String,
    },
    /// Withdraw staking rewards from one or more validators.
    WithdrawReward {
        #[command(flatten)]
        wallet: WalletArgs,
        #[command(flatten)]
        tx: TxArgs,
        /// Repeat or comma-separate to withdraw from several validators.
        #[arg(long, required = true, value_delimiter = ',')]
        validator: Vec<String>,
    },
    /// Send tokens to another address.
    Send {
        #[command(flatten)]
        wallet: WalletArgs,
        #[command(flatten)]
        tx: TxArgs,
        #[arg(long)]
        to: String,
        #[arg(long)]
        amount: String,
    },
}

#[derive(Subcommand)]
enum VaultAction {
    /// Create an empty vault.
    Init {
        #[arg(long, env = "FBX_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Add a mnemonic wallet. Generates a new phrase unless one is given.
    AddMnemonic {
        #[arg(long)]
        id: String,
        #[arg(long, env = "FBX_PASSWORD", hide_env_values = true)]
        password: String,
        #[arg(long, env = "FBX_SECURITY_PASSWORD", hide_env_values = true)]
        security_password: String,
        #[arg(long, env = "FBX_MNEMONIC", hide_env_values = true)]
        mnemonic: Option<String>,
    },
    /// Register a hardware wallet.
    AddHardware {
        #[arg(long)]
        id: String,
        #[arg(long, env = "FBX_PASSWORD", hide_env_values = true)]
        password: String,
    },
}

#[derive(Args)]
struct WalletArgs {
    /// Registry symbol, e.g. ATOM or DSM.
    #[arg(long, default_value = "ATOM", env = "FBX_CRYPTO")]
    crypto: String,

    /// Wallet id in the vault.
    #[arg(long = "wallet", env = "FBX_WALLET")]
    wallet_id: String,

    #[arg(long, env = "FBX_PASSWORD", hide_env_values = true)]
    password: String,

    #[arg(long, env = "FBX_SECURITY_PASSWORD", hide_env_values = true)]
    security_password: Option<String>,

    #[arg(long, default_value_t = 0)]
    account_index: u32,
}

#[derive(Args)]
struct TxArgs {
    /// Signing account address (see `fbx address`).
    #[arg(long, env = "FBX_ADDRESS")]
    address: String,

    /// Denomination; defaults to the chain's staking denom.
    #[arg(long)]
    denom: Option<String>,

    #[arg(long, default_value = "")]
    memo: String,

    #[arg(long, default_value = "5000")]
    fee_amount: String,

    #[arg(long, default_value_t = 200_000)]
    gas: u64,

    /// Overall deadline for the submission.
    #[arg(long)]
    timeout_ms: Option<u64>,
}

impl WalletArgs {
    fn credentials(&self) -> Credentials {
        Credentials::new(
            self.wallet_id.clone(),
            self.account_index,
            Password::new(self.password.as_str()),
            self.security_password.as_deref().map(Password::new),
        )
    }
}

fn load_config(cli: &Cli) -> anyhow::Result<WalletConfig> {
    let mut config = match &cli.config {
        Some(path) => WalletConfig::from_toml_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => WalletConfig::default(),
    };
    if let Some(vault) = &cli.vault {
        config.vault_path = vault.clone();
    }
    if let Some(level) = &cli.log_level {
        config.log_level = level.clone();
    }
    if let Some(format) = &cli.log_format {
        config.log_format = format.clone();
    }
    Ok(config)
}

fn connect_secrets(config: &WalletConfig) -> anyhow::Result<SecretsClient> {
    let vault = Vault::load(&config.vault_path)
        .with_context(|| format!("opening vault {}", config.vault_path.display()))?;
    let (client_end, holder_end) = channel_pair(8);
    SecretsHolder::new(vault).spawn(holder_end);
    Ok(SecretsClient::new(client_end, config.secrets_timeout()))
}

fn vault_command(config: &WalletConfig, action: VaultAction) -> anyhow::Result<()> {
    let path = &config.vault_path;
    match action {
        VaultAction::Init { password } => {
            if path.exists() {
                bail!("vault {} already exists", path.display());
            }
            Vault::create(&Password::new(password))?.save(path)?;
            println!("created vault {}", path.display());
        }
        VaultAction::AddMnemonic {
            id,
            password,
            security_password,
            mnemonic,
        } => {
            let mut vault = Vault::load(path)?;
            let (mnemonic, generated) = match mnemonic {
                Some(phrase) => {
                    if !validate_mnemonic(&phrase) {
                        bail!("not a valid BIP39 mnemonic");
                    }
                    (Mnemonic::new(phrase), false)
                }
                None => (generate_mnemonic()?, true),
            };
            vault.add_mnemonic_wallet(&Password::new(password), &id, &mnemonic, &Password::new(security_password))?;
            vault.save(path)?;
            if generated {
                println!("{}", mnemonic.expose_phrase());
            }
            println!("added mnemonic wallet {id}");
        }
        VaultAction::AddHardware { id, password } => {
            let mut vault = Vault::load(path)?;
            vault.add_hardware_wallet(&Password::new(password), &id)?;
            vault.save(path)?;
            println!("added hardware wallet {id}");
        }
    }
    Ok(())
}

async fn print_address(config: &WalletConfig, registry: &Registry, wallet: &WalletArgs) -> anyhow::Result<()> {
    let entry = registry.lookup(&wallet.crypto)?;
    let secrets = connect_secrets(config)?;
    let credentials = wallet.credentials();
    let secret = secrets
        .reveal_mnemonic(
            &credentials.wallet_id,
            &credentials.unlock_password,
            credentials.security_password.as_ref(),
        )
        .await?;
    let RevealedSecret::Mnemonic(mnemonic) = secret else {
        bail!("wallet {} is hardware-backed; read the address from the device", wallet.wallet_id);
    };
    let key = derive_signing_key(&mnemonic, &derivation_path(entry.coin_type, wallet.account_index))?;
    println!("{}", account_address(&entry.prefix, &compressed_public_key(&key))?);
    Ok(())
}

fn amount(raw: &str) -> anyhow::Result<Amount> {
    Amount::new(raw).with_context(|| format!("invalid amount {raw:?}"))
}

async fn submit(
    config: &WalletConfig,
    registry: Registry,
    wallet: WalletArgs,
    tx: TxArgs,
    intents: impl FnOnce(&str, String) -> anyhow::Result<Vec<Intent>>,
) -> anyhow::Result<()> {
    let entry = registry.lookup(&wallet.crypto)?;
    let denom = tx.denom.clone().unwrap_or_else(|| entry.denom.clone());
    let fee = Fee::new(vec![Coin::new(amount(&tx.fee_amount)?, entry.denom.clone())], tx.gas);
    let intents = intents(&tx.address, denom)?;

    let resolver = SignerResolver::new(Arc::new(HttpConnector::new(config.broadcast_timeout())))
        .with_network_timeout(config.broadcast_timeout());
    let events = EventBus::new(config.event_capacity);
    let mut subscription = events.subscribe();
    let orchestrator = TransactionOrchestrator::new(
        Arc::new(registry),
        Arc::new(connect_secrets(config)?),
        Arc::new(resolver),
        Arc::new(UnavailableHardware),
        events,
    );

    let options = SubmitOptions {
        timeout: tx.timeout_ms.map(Duration::from_millis),
        sequencing: None,
    };
    let outcome = orchestrator
        .submit(&wallet.crypto, wallet.credentials(), intents, fee, tx.memo, options)
        .run()
        .await;

    if let Some(event) = subscription.try_recv() {
        println!("{}", serde_json::to_string_pretty(&event)?);
    }
    outcome?;
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = load_config(&cli)?;
    init_logging(config.log_format.parse::<LogFormat>()?, &config.log_level)?;
    let registry = config.registry()?;
    tracing::debug!(vault = %config.vault_path.display(), chains = config.chains.len(), "configuration loaded");

    match cli.command {
        Command::Vault { action } => vault_command(&config, action),
        Command::Address { wallet } => print_address(&config, &registry, &wallet).await,
        Command::Delegate {
            wallet,
            tx,
            validator,
            amount: raw,
        } => {
            submit(&config, registry, wallet, tx, |address, denom| {
                Ok(vec![Intent::Delegate {
                    delegator: address.to_string(),
                    validator,
                    amount: amount(&raw)?,
                    denom,
                }])
            })
            .await
        }
        Command::Undelegate {
            wallet,
            tx,
            validator,
            amount: raw,
        } => {
            submit(&config, registry, wallet, tx, |address, denom| {
                Ok(vec![Intent::Undelegate {
                    delegator: address.to_string(),
                    validator,
                    amount: amount(&raw)?,
                    denom,
                }])
            })
            .await
        }
        Command::Redelegate {
            wallet,
            tx,
            from_validator,
            to_validator,
            amount: raw,
        } => {
            submit(&config, registry, wallet, tx, |address, denom| {
                Ok(vec![Intent::Redelegate {
                    delegator: address.to_string(),
                    from_validator,
                    to_validator,
                    amount: amount(&raw)?,
                    denom,
                }])
            })
            .await
        }
        Command::WithdrawReward { wallet, tx, validator } => {
            submit(&config, registry, wallet, tx, |address, _| {
                Ok(validator
                    .into_iter()
                    .map(|validator| Intent::WithdrawReward {
                        delegator: address.to_string(),
                        validator,
                    })
                    .collect())
            })
            .await
        }
        Command::Send {
            wallet,
            tx,
            to,
            amount: raw,
        } => {
            submit(&config, registry, wallet, tx, |address, denom| {
                Ok(vec![Intent::Send {
                    from: address.to_string(),
                    to,
                    amount: amount(&raw)?,
                    denom,
                }])
            })
            .await
        }
    }
}
