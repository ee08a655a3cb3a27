use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Opaque identifier for a client, understood by the data source.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ClientId(pub String);

impl ClientId {
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Display for ClientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Raw client data as returned by the data source. Owned by the single
/// orchestration call that fetched it and discarded when the call ends.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientRecord {
    pub client_id: ClientId,
    pub full_name: String,
    pub email: Option<String>,
    pub gross_monthly_income: Option<u32>,
    pub credit_score: Option<u16>,
    pub budget_min: Option<u32>,
    pub budget_max: Option<u32>,
    pub desired_move_in: Option<NaiveDate>,
    pub bedrooms: u8,
    pub bathrooms: u8,
    pub preferred_areas: Vec<String>,
    pub notes: Option<String>,
}

/// Qualifying concerns surfaced during profile analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskFactor {
    LowCreditScore,
    RentToIncomeStretch,
    UnverifiedIncome,
}

impl RiskFactor {
    pub const fn label(self) -> &'static str {
        match self {
            Self::LowCreditScore => "low credit score",
            Self::RentToIncomeStretch => "rent-to-income stretch",
            Self::UnverifiedIncome => "unverified income",
        }
    }
}

/// Normalized view of a client consumed by matching and composition.
/// Produced once per orchestration call and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientProfile {
    pub client_id: ClientId,
    pub first_name: String,
    pub bedrooms_needed: u8,
    pub bathrooms_needed: u8,
    pub budget_ceiling: u32,
    pub target_area: String,
    pub move_in_by: Option<NaiveDate>,
    pub risk_factors: Vec<RiskFactor>,
}

impl ClientProfile {
    /// Human-readable rendering used for the result's `summary` field.
    pub fn summary(&self) -> String {
        let mut summary = format!(
            "{} is looking for a {}bd/{}ba in {} with a budget up to ${}",
            self.first_name,
            self.bedrooms_needed,
            self.bathrooms_needed,
            self.target_area,
            self.budget_ceiling
        );
        if let Some(move_in) = self.move_in_by {
            summary.push_str(&format!(", moving in by {move_in}"));
        }
        if self.risk_factors.is_empty() {
            summary.push_str("; no qualifying concerns.");
        } else {
            let concerns: Vec<&str> = self.risk_factors.iter().map(|f| f.label()).collect();
            summary.push_str(&format!("; qualifying concerns: {}.", concerns.join(", ")));
        }
        summary
    }
}

/// A ranked property match produced by the inventory matcher.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventoryCandidate {
    pub unit_name: String,
    pub address: String,
    pub area: String,
    pub bedrooms: u8,
    pub bathrooms: u8,
    pub rent_min: u32,
    pub rent_max: u32,
    pub available_on: Option<NaiveDate>,
    pub move_in_special: Option<String>,
    pub net_effective_rent: Option<u32>,
}

impl InventoryCandidate {
    pub fn rent_range_label(&self) -> String {
        if self.rent_min == self.rent_max {
            format!("${}", self.rent_min)
        } else {
            format!("${}-${}", self.rent_min, self.rent_max)
        }
    }
}

/// Terminal output of one orchestration call. Exactly these three fields,
/// always present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutreachResult {
    pub summary: String,
    pub message: String,
    pub inventory_found: bool,
}

/// Boundary steps of the pipeline, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineStep {
    Fetch,
    Analyze,
    Match,
    Compose,
}

impl PipelineStep {
    pub const fn ordered() -> [Self; 4] {
        [Self::Fetch, Self::Analyze, Self::Match, Self::Compose]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Fetch => "fetch",
            Self::Analyze => "analyze",
            Self::Match => "match",
            Self::Compose => "compose",
        }
    }
}
