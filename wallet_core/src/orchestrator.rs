//! Drives one submission through build, authorize, sign and broadcast.

use fbx_messages::{Fee, Sequencing, TransactionRequest};
use fbx_rpc::BroadcastResult;
use fbx_secrets::{RevealedSecret, SecretsClient};
use fbx_signer::{derivation_path, HardwareConnector, KeySource, SignerResolver};
use fbx_types::{Credentials, Intent, Registry};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU64, AtomicU8, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, info_span, warn, Instrument};

use crate::error::{ErrorPayload, TransactionError};
use crate::events::{EventBus, SuccessPayload, TransactionEvent};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[repr(u8)]
pub enum SubmissionState {
    Building = 0,
    Authorizing = 1,
    Signing = 2,
    Broadcasting = 3,
    Succeeded = 4,
    Failed = 5,
}

impl SubmissionState {
    fn from_u8(v: u8) -> Self {
        match v {
            0 => Self::Building,
            1 => Self::Authorizing,
            2 => Self::Signing,
            3 => Self::Broadcasting,
            4 => Self::Succeeded,
            _ => Self::Failed,
        }
    }
}

impl fmt::Display for SubmissionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Building => "building",
            Self::Authorizing => "authorizing",
            Self::Signing => "signing",
            Self::Broadcasting => "broadcasting",
            Self::Succeeded => "succeeded",
            Self::Failed => "failed",
        };
        f.write_str(s)
    }
}

/// Current stage, readable after the pipeline future has been dropped.
struct StageTracker(AtomicU8);

impl StageTracker {
    fn new() -> Self {
        Self(AtomicU8::new(SubmissionState::Building as u8))
    }

    fn enter(&self, state: SubmissionState) {
        debug!(stage = %state, "entering stage");
        self.0.store(state as u8, Ordering::SeqCst);
    }

    fn get(&self) -> SubmissionState {
        SubmissionState::from_u8(self.0.load(Ordering::SeqCst))
    }
}

#[derive(Debug, Clone, Default)]
pub struct SubmitOptions {
    /// Deadline for the whole pipeline; expiry fails the submission as
    /// cancelled.
    pub timeout: Option<Duration>,
    /// Sign against this account position instead of querying the chain.
    pub sequencing: Option<Sequencing>,
}

/// The pipeline's shared collaborators.
pub struct TransactionOrchestrator {
    registry: Arc<Registry>,
    secrets: Arc<SecretsClient>,
    resolver: Arc<SignerResolver>,
    hardware: Arc<dyn HardwareConnector>,
    events: EventBus,
    next_id: AtomicU64,
}

impl TransactionOrchestrator {
    pub fn new(
        registry: Arc<Registry>,
        secrets: Arc<SecretsClient>,
        resolver: Arc<SignerResolver>,
        hardware: Arc<dyn HardwareConnector>,
        events: EventBus,
    ) -> Self {
        Self {
            registry,
            secrets,
            resolver,
            hardware,
            events,
            next_id: AtomicU64::new(1),
        }
    }

    pub fn events(&self) -> &EventBus {
        &self.events
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Prepare a submission. Nothing runs until [`Submission::run`].
    pub fn submit(
        &self,
        crypto: &str,
        credentials: Credentials,
        intents: Vec<Intent>,
        fee: Fee,
        memo: impl Into<String>,
        options: SubmitOptions,
    ) -> Submission {
        Submission {
            id: self.next_id.fetch_add(1, Ordering::Relaxed),
            crypto: crypto.to_string(),
            credentials,
            intents,
            fee,
            memo: memo.into(),
            options,
            registry: self.registry.clone(),
            secrets: self.secrets.clone(),
            resolver: self.resolver.clone(),
            hardware: self.hardware.clone(),
            events: self.events.clone(),
        }
    }
}

/// One transaction attempt. Consumed by [`Submission::run`]; never retried.
pub struct Submission {
    id: u64,
    crypto: String,
    credentials: Credentials,
    intents: Vec<Intent>,
    fee: Fee,
    memo: String,
    options: SubmitOptions,
    registry: Arc<Registry>,
    secrets: Arc<SecretsClient>,
    resolver: Arc<SignerResolver>,
    hardware: Arc<dyn HardwareConnector>,
    events: EventBus,
}

impl fmt::Debug for Submission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Submission")
            .field("id", &self.id)
            .field("crypto", &self.crypto)
            .field("credentials", &self.credentials)
            .finish_non_exhaustive()
    }
}

struct Pipeline {
    crypto: String,
    credentials: Credentials,
    intents: Vec<Intent>,
    fee: Fee,
    memo: String,
    sequencing: Option<Sequencing>,
    registry: Arc<Registry>,
    secrets: Arc<SecretsClient>,
    resolver: Arc<SignerResolver>,
    hardware: Arc<dyn HardwareConnector>,
}

impl Submission {
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Run to completion and publish exactly one terminal event.
    pub async fn run(self) -> Result<BroadcastResult, TransactionError> {
        let Submission {
            id,
            crypto,
            credentials,
            intents,
            fee,
            memo,
            options,
            registry,
            secrets,
            resolver,
            hardware,
            events,
        } = self;
        let span = info_span!(
            "submission",
            id,
            crypto = %crypto,
            wallet_id = %credentials.wallet_id
        );
        let pipeline = Pipeline {
            crypto,
            credentials,
            intents,
            fee,
            memo,
            sequencing: options.sequencing,
            registry,
            secrets,
            resolver,
            hardware,
        };

        async move {
            let stage = StageTracker::new();
            let outcome = match options.timeout {
                Some(deadline) => tokio::time::timeout(deadline, pipeline.execute(&stage))
                    .await
                    .unwrap_or(Err(TransactionError::Cancelled)),
                None => pipeline.execute(&stage).await,
            };

            let event = match &outcome {
                Ok(result) => {
                    info!(hash = %result.hash, "transaction succeeded");
                    TransactionEvent::TransactionSuccess(SuccessPayload {
                        submission_id: id,
                        result: result.clone(),
                    })
                }
                Err(err) => {
                    let failed_at = stage.get();
                    info!(stage = %failed_at, kind = ?err.kind(), error = %err, "transaction failed");
                    TransactionEvent::TransactionFail(ErrorPayload {
                        submission_id: id,
                        kind: err.kind(),
                        stage: failed_at,
                        message: err.to_string(),
                    })
                }
            };
            if events.publish(event) == 0 {
                debug!("no event subscribers");
            }
            outcome
        }
        .instrument(span)
        .await
    }
}

impl Pipeline {
    async fn execute(self, stage: &StageTracker) -> Result<BroadcastResult, TransactionError> {
        stage.enter(SubmissionState::Building);
        let entry = self.registry.lookup(&self.crypto)?;
        let mut request = TransactionRequest::build(&entry.ecosystem, self.intents, self.fee, self.memo)?;
        if let Some(sequencing) = self.sequencing {
            request = request.with_sequencing(sequencing);
        }

        stage.enter(SubmissionState::Authorizing);
        let Credentials {
            wallet_id,
            account_index,
            unlock_password,
            security_password,
        } = self.credentials;
        let secret = self
            .secrets
            .reveal_mnemonic(&wallet_id, &unlock_password, security_password.as_ref())
            .await?;
        drop(unlock_password);
        drop(security_password);

        stage.enter(SubmissionState::Signing);
        let key_source = match secret {
            RevealedSecret::Mnemonic(mnemonic) => KeySource::Mnemonic(mnemonic),
            RevealedSecret::HardwareWallet => {
                debug!("wallet is hardware-backed, opening device");
                KeySource::Hardware(self.hardware.open().await?)
            }
        };
        let signer = self
            .resolver
            .resolve(key_source, derivation_path(entry.coin_type, account_index), entry)
            .await?;
        let client = self.resolver.connect(signer, entry)?;

        let tx = client.sign(&request).await.inspect_err(|err| {
            warn!(error = %err, "signing failed");
        })?;

        stage.enter(SubmissionState::Broadcasting);
        let result = client.broadcast(&tx).await.inspect_err(|err| {
            warn!(error = %err, "broadcast failed");
        })?;
        stage.enter(SubmissionState::Succeeded);
        Ok(result)
    }
}
