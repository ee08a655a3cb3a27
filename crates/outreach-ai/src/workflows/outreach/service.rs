use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};

use super::capabilities::{
    AnalysisError, ClientDataSource, ComposeError, DataSourceError, InventoryMatcher, MatchError,
    MessageComposer, ProfileAnalyzer,
};
use super::contract::{validate_sms, ContractViolation};
use super::domain::{ClientId, OutreachResult, PipelineStep};
use super::policy::CallPolicy;

/// Runs one outreach pass for a client: fetch, analyze, match, compose,
/// assemble. The step order is fixed; the only branch is whether the match
/// step produced candidates. Holds no mutable state, so one instance can
/// serve concurrent invocations.
pub struct ClientOutreachService<S, P, M, C> {
    store: Arc<S>,
    analyzer: Arc<P>,
    matcher: Arc<M>,
    composer: Arc<C>,
    policy: CallPolicy,
}

impl<S, P, M, C> ClientOutreachService<S, P, M, C>
where
    S: ClientDataSource + 'static,
    P: ProfileAnalyzer + 'static,
    M: InventoryMatcher + 'static,
    C: MessageComposer + 'static,
{
    pub fn new(store: Arc<S>, analyzer: Arc<P>, matcher: Arc<M>, composer: Arc<C>) -> Self {
        Self::with_policy(store, analyzer, matcher, composer, CallPolicy::default())
    }

    pub fn with_policy(
        store: Arc<S>,
        analyzer: Arc<P>,
        matcher: Arc<M>,
        composer: Arc<C>,
        policy: CallPolicy,
    ) -> Self {
        Self {
            store,
            analyzer,
            matcher,
            composer,
            policy,
        }
    }

    pub fn policy(&self) -> &CallPolicy {
        &self.policy
    }

    /// Processes one client end to end. Returns either a complete
    /// three-field result or the first terminal failure; never a partial
    /// shape. Dropping the returned future aborts at the next step boundary.
    pub async fn process_client(
        &self,
        client_id: &ClientId,
    ) -> Result<OutreachResult, OutreachError> {
        if client_id.is_blank() {
            return Err(OutreachError::ClientNotFound(client_id.clone()));
        }

        let record = self
            .call(PipelineStep::Fetch, || self.store.fetch(client_id))
            .await?
            .ok_or_else(|| OutreachError::ClientNotFound(client_id.clone()))?;

        let profile = self
            .call(PipelineStep::Analyze, || self.analyzer.analyze(&record))
            .await?;

        let candidates = self
            .call(PipelineStep::Match, || self.matcher.rank(&profile))
            .await?;
        let best = candidates.first();

        let message = self
            .call(PipelineStep::Compose, || {
                self.composer.compose(&profile, best)
            })
            .await?;

        validate_sms(&message)?;

        info!(
            client = %client_id,
            inventory_found = best.is_some(),
            "outreach pipeline complete"
        );

        Ok(OutreachResult {
            summary: profile.summary(),
            message,
            inventory_found: !candidates.is_empty(),
        })
    }

    /// Applies the call policy to one boundary call: a per-attempt timeout
    /// and bounded retries with exponential backoff in between.
    async fn call<T, E, Fut>(
        &self,
        step: PipelineStep,
        mut operation: impl FnMut() -> Fut,
    ) -> Result<T, OutreachError>
    where
        Fut: Future<Output = Result<T, E>>,
        E: Into<CapabilityError>,
    {
        let mut attempt: u32 = 0;
        loop {
            let failure = match tokio::time::timeout(self.policy.timeout, operation()).await {
                Ok(Ok(value)) => {
                    debug!(step = step.label(), attempt, "capability call succeeded");
                    return Ok(value);
                }
                Ok(Err(err)) => err.into(),
                Err(_) => CapabilityError::TimedOut {
                    budget: self.policy.timeout,
                },
            };

            if attempt >= self.policy.max_retries {
                return Err(OutreachError::Capability {
                    step,
                    source: failure,
                });
            }

            let delay = self.policy.backoff(attempt);
            warn!(
                step = step.label(),
                attempt,
                delay_ms = delay.as_millis() as u64,
                error = %failure,
                "capability call failed; retrying"
            );
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            attempt += 1;
        }
    }
}

/// Terminal failure of one orchestration call.
#[derive(Debug, thiserror::Error)]
pub enum OutreachError {
    #[error("no client record for identifier '{0}'")]
    ClientNotFound(ClientId),
    #[error("{} step failed after exhausting retries: {source}", .step.label())]
    Capability {
        step: PipelineStep,
        source: CapabilityError,
    },
    #[error(transparent)]
    Contract(#[from] ContractViolation),
}

impl OutreachError {
    /// Stable discriminator surfaced to HTTP callers.
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::ClientNotFound(_) => "client_not_found",
            Self::Capability { .. } => "upstream_failure",
            Self::Contract(_) => "contract_violation",
        }
    }
}

/// Underlying cause of a failed boundary call.
#[derive(Debug, thiserror::Error)]
pub enum CapabilityError {
    #[error(transparent)]
    DataSource(#[from] DataSourceError),
    #[error(transparent)]
    Analysis(#[from] AnalysisError),
    #[error(transparent)]
    Match(#[from] MatchError),
    #[error(transparent)]
    Compose(#[from] ComposeError),
    #[error("call exceeded its {}ms budget", .budget.as_millis())]
    TimedOut { budget: Duration },
}
