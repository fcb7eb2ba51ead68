//! `RemoteModel`: the scoring service as a `RiskModel`.
//!
//! Each prediction POSTs the normalized `ModelInput` as JSON to the
//! configured endpoint. The request future is driven by a runtime owned by
//! the model and raced against the caller's `CancelToken`; when the token
//! flips the future is dropped. Connection tasks live on the runtime's
//! single worker thread, which closes the abandoned connection.

use std::future::Future;
use std::time::Duration;

use reqwest::Client;
use tokio::runtime::{self, Runtime};
use tracing::{debug, warn};

use hdp_config::RemoteConfig;
use hdp_contracts::{
    cancel::CancelToken,
    error::{HdpError, HdpResult},
    model::{ModelInput, ModelOutput},
};
use hdp_core::RiskModel;

use crate::verify::ResponseVerifier;

/// How often a pending request re-checks its cancel token.
const CANCEL_POLL_INTERVAL: Duration = Duration::from_millis(25);

/// Slack on top of the HTTP timeout before the request is dropped outright.
const DEADLINE_GRACE: Duration = Duration::from_millis(250);

struct Endpoint {
    client: Client,
    url: String,
    timeout_ms: u64,
    verifier: ResponseVerifier,
}

impl Endpoint {
    /// One request/response exchange.
    async fn call(&self, input: &ModelInput) -> HdpResult<ModelOutput> {
        let response = self
            .client
            .post(&self.url)
            .json(input)
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(HdpError::RemoteStatus {
                status: status.as_u16(),
            });
        }

        let body: serde_json::Value = response.json().await.map_err(|e| {
            if e.is_timeout() {
                HdpError::Timeout {
                    after_ms: self.timeout_ms,
                }
            } else {
                HdpError::MalformedResponse {
                    reason: format!("body is not JSON: {e}"),
                }
            }
        })?;

        let verified = self.verifier.verify(&body)?;

        debug!(
            url = %self.url,
            risk_prediction = verified.risk_prediction,
            risk_probability = verified.risk_probability,
            "remote model responded"
        );

        Ok(ModelOutput {
            score: verified.risk_probability,
            factors: verified.factors,
        })
    }

    fn classify(&self, e: reqwest::Error) -> HdpError {
        if e.is_timeout() {
            HdpError::Timeout {
                after_ms: self.timeout_ms,
            }
        } else {
            HdpError::Transport {
                reason: e.to_string(),
            }
        }
    }
}

/// Resolves once `cancel` is set.
async fn cancelled(cancel: &CancelToken) {
    let mut ticker = tokio::time::interval(CANCEL_POLL_INTERVAL);
    loop {
        ticker.tick().await;
        if cancel.is_cancelled() {
            return;
        }
    }
}

/// The remote scoring service.
///
/// Shareable across threads: concurrent callers each drive their own
/// request on the shared runtime.
pub struct RemoteModel {
    endpoint: Endpoint,
    runtime: Runtime,
    timeout: Duration,
}

impl RemoteModel {
    /// Build a client for `config.endpoint()`.
    ///
    /// Does not contact the service. `enabled` is the caller's concern.
    pub fn from_config(config: &RemoteConfig) -> HdpResult<Self> {
        let timeout = config.timeout();
        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(timeout)
            .build()
            .map_err(|e| HdpError::ConfigError {
                reason: format!("failed to build HTTP client: {e}"),
            })?;

        let runtime = runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .enable_all()
            .thread_name("hdp-remote")
            .build()
            .map_err(|e| HdpError::ConfigError {
                reason: format!("failed to start HTTP runtime: {e}"),
            })?;

        Ok(Self {
            endpoint: Endpoint {
                client,
                url: config.endpoint(),
                timeout_ms: config.timeout_ms,
                verifier: ResponseVerifier::new()?,
            },
            runtime,
            timeout,
        })
    }

    pub fn url(&self) -> &str {
        &self.endpoint.url
    }

    /// Drive `request` until it finishes, `cancel` is set, or the deadline
    /// passes. The losing futures are dropped.
    fn race<F>(&self, request: F, cancel: &CancelToken) -> HdpResult<ModelOutput>
    where
        F: Future<Output = HdpResult<ModelOutput>>,
    {
        let deadline = self.timeout + DEADLINE_GRACE;

        self.runtime.block_on(async {
            tokio::select! {
                result = request => result,
                () = cancelled(cancel) => {
                    debug!(url = %self.endpoint.url, "remote request aborted after cancellation");
                    Err(HdpError::Cancelled)
                }
                () = tokio::time::sleep(deadline) => {
                    warn!(url = %self.endpoint.url, "remote request overran its deadline");
                    Err(HdpError::Timeout {
                        after_ms: self.endpoint.timeout_ms,
                    })
                }
            }
        })
    }
}

impl RiskModel for RemoteModel {
    fn name(&self) -> &str {
        "remote"
    }

    fn predict(&self, input: &ModelInput, cancel: &CancelToken) -> HdpResult<ModelOutput> {
        if cancel.is_cancelled() {
            return Err(HdpError::Cancelled);
        }
        self.race(self.endpoint.call(input), cancel)
    }
}
