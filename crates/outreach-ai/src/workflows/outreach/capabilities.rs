use async_trait::async_trait;

use super::domain::{ClientId, ClientProfile, ClientRecord, InventoryCandidate};

/// Source of raw client records. Reads must be side-effect free so the
/// orchestrator can retry them.
#[async_trait]
pub trait ClientDataSource: Send + Sync {
    async fn fetch(&self, client_id: &ClientId) -> Result<Option<ClientRecord>, DataSourceError>;
}

/// Maps a raw record to the normalized profile the rest of the pipeline
/// consumes.
#[async_trait]
pub trait ProfileAnalyzer: Send + Sync {
    async fn analyze(&self, record: &ClientRecord) -> Result<ClientProfile, AnalysisError>;
}

/// Ranks available inventory for a profile, best first. An empty list is a
/// valid outcome ("no match"), never an error. Tie-breaking between equally
/// suitable candidates is this capability's concern.
#[async_trait]
pub trait InventoryMatcher: Send + Sync {
    async fn rank(&self, profile: &ClientProfile)
        -> Result<Vec<InventoryCandidate>, MatchError>;
}

/// Produces the outbound SMS text: concrete values when a candidate is
/// given, a conversational follow-up when none is.
#[async_trait]
pub trait MessageComposer: Send + Sync {
    async fn compose(
        &self,
        profile: &ClientProfile,
        candidate: Option<&InventoryCandidate>,
    ) -> Result<String, ComposeError>;
}

#[derive(Debug, thiserror::Error)]
pub enum DataSourceError {
    #[error("client store unavailable: {0}")]
    Unavailable(String),
    #[error("client record malformed: {0}")]
    Malformed(String),
}

#[derive(Debug, thiserror::Error)]
pub enum AnalysisError {
    #[error("client record is missing required field '{field}'")]
    MissingField { field: &'static str },
    #[error("profile analysis failed: {0}")]
    Failed(String),
}

#[derive(Debug, thiserror::Error)]
pub enum MatchError {
    #[error("inventory lookup failed: {0}")]
    Unavailable(String),
}

#[derive(Debug, thiserror::Error)]
pub enum ComposeError {
    #[error("message composition failed: {0}")]
    Failed(String),
}
