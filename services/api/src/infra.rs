use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::NaiveDate;
use metrics_exporter_prometheus::PrometheusHandle;
use outreach_ai::workflows::outreach::capabilities::{
    AnalysisError, ClientDataSource, ComposeError, DataSourceError, InventoryMatcher, MatchError,
    MessageComposer, ProfileAnalyzer,
};
use outreach_ai::workflows::outreach::domain::{
    ClientId, ClientProfile, ClientRecord, InventoryCandidate, RiskFactor,
};
use outreach_ai::workflows::outreach::MAX_SMS_CHARS;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Seeded, mutex-guarded client store backing the default server wiring and
/// the CLI demo.
#[derive(Default, Clone)]
pub(crate) struct InMemoryClientStore {
    records: Arc<Mutex<HashMap<ClientId, ClientRecord>>>,
}

impl InMemoryClientStore {
    pub(crate) fn insert(&self, record: ClientRecord) {
        let mut guard = self.records.lock().expect("client store mutex poisoned");
        guard.insert(record.client_id.clone(), record);
    }

    pub(crate) fn with_seed_data() -> Self {
        let store = Self::default();
        for record in seed_clients() {
            store.insert(record);
        }
        store
    }
}

#[async_trait]
impl ClientDataSource for InMemoryClientStore {
    async fn fetch(&self, client_id: &ClientId) -> Result<Option<ClientRecord>, DataSourceError> {
        let guard = self.records.lock().expect("client store mutex poisoned");
        Ok(guard.get(client_id).cloned())
    }
}

/// Normalizes raw records into the profile the matcher and composer consume.
#[derive(Debug, Default, Clone, Copy)]
pub(crate) struct HeuristicProfileAnalyzer;

const LOW_CREDIT_FLOOR: u16 = 620;
const RENT_TO_INCOME_CAP: f64 = 0.35;

#[async_trait]
impl ProfileAnalyzer for HeuristicProfileAnalyzer {
    async fn analyze(&self, record: &ClientRecord) -> Result<ClientProfile, AnalysisError> {
        let first_name = record
            .full_name
            .split_whitespace()
            .next()
            .unwrap_or("there")
            .to_string();

        let budget_ceiling = record
            .budget_max
            .or(record.budget_min)
            .or_else(|| record.gross_monthly_income.map(|income| income / 3))
            .ok_or(AnalysisError::MissingField { field: "budget" })?;

        let target_area = record
            .preferred_areas
            .first()
            .cloned()
            .unwrap_or_else(|| "your area".to_string());

        let mut risk_factors = Vec::new();
        if matches!(record.credit_score, Some(score) if score < LOW_CREDIT_FLOOR) {
            risk_factors.push(RiskFactor::LowCreditScore);
        }
        match record.gross_monthly_income {
            Some(income) => {
                if f64::from(budget_ceiling) > f64::from(income) * RENT_TO_INCOME_CAP {
                    risk_factors.push(RiskFactor::RentToIncomeStretch);
                }
            }
            None => risk_factors.push(RiskFactor::UnverifiedIncome),
        }

        Ok(ClientProfile {
            client_id: record.client_id.clone(),
            first_name,
            bedrooms_needed: record.bedrooms,
            bathrooms_needed: record.bathrooms,
            budget_ceiling,
            target_area,
            move_in_by: record.desired_move_in,
            risk_factors,
        })
    }
}

/// One advertised unit in the reference inventory.
#[derive(Debug, Clone)]
pub(crate) struct InventoryListing {
    pub(crate) unit_name: String,
    pub(crate) address: String,
    pub(crate) area: String,
    pub(crate) bedrooms: u8,
    pub(crate) bathrooms: u8,
    pub(crate) rent_min: u32,
    pub(crate) rent_max: u32,
    pub(crate) available_on: Option<NaiveDate>,
    pub(crate) move_in_special: Option<MoveInSpecial>,
}

/// Concession applied over a 12-month lease when computing net effective
/// rent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum MoveInSpecial {
    WeeksFree(u8),
    AmountOff(u32),
}

impl MoveInSpecial {
    fn annual_discount(self, monthly_rent: u32) -> u32 {
        match self {
            MoveInSpecial::WeeksFree(weeks) => monthly_rent * u32::from(weeks) * 12 / 52,
            MoveInSpecial::AmountOff(amount) => amount,
        }
    }

    fn label(self) -> String {
        match self {
            MoveInSpecial::WeeksFree(weeks) => format!("{weeks} weeks free"),
            MoveInSpecial::AmountOff(amount) => format!("${amount} off move-in"),
        }
    }
}

/// Net effective monthly rent over a 12-month lease.
pub(crate) fn net_effective_rent(monthly_rent: u32, special: Option<MoveInSpecial>) -> u32 {
    let annual = monthly_rent * 12;
    let discount = special
        .map(|s| s.annual_discount(monthly_rent))
        .unwrap_or(0)
        .min(annual);
    (annual - discount) / 12
}

/// Filters and scores the inventory for a profile. Equal scores keep the
/// listing's discovery order (the sort is stable), which is the documented
/// tie-break.
#[derive(Default, Clone)]
pub(crate) struct ScoringInventoryMatcher {
    listings: Arc<Vec<InventoryListing>>,
}

impl ScoringInventoryMatcher {
    pub(crate) fn new(listings: Vec<InventoryListing>) -> Self {
        Self {
            listings: Arc::new(listings),
        }
    }

    pub(crate) fn with_seed_data() -> Self {
        Self::new(seed_listings())
    }

    fn score(profile: &ClientProfile, listing: &InventoryListing) -> Option<i64> {
        if listing.bedrooms != profile.bedrooms_needed {
            return None;
        }
        if listing.bathrooms < profile.bathrooms_needed {
            return None;
        }
        if let (Some(move_in), Some(available)) = (profile.move_in_by, listing.available_on) {
            if available > move_in {
                return None;
            }
        }

        let effective_rent = net_effective_rent(listing.rent_min, listing.move_in_special);
        if effective_rent > profile.budget_ceiling {
            return None;
        }

        let mut score: i64 = 0;
        if listing.area.eq_ignore_ascii_case(&profile.target_area) {
            score += 40;
        }
        let headroom = i64::from(profile.budget_ceiling - effective_rent) / 10;
        score += headroom.min(30);
        if listing.move_in_special.is_some() {
            score += 15;
        }
        Some(score)
    }

    fn to_candidate(listing: &InventoryListing) -> InventoryCandidate {
        InventoryCandidate {
            unit_name: listing.unit_name.clone(),
            address: listing.address.clone(),
            area: listing.area.clone(),
            bedrooms: listing.bedrooms,
            bathrooms: listing.bathrooms,
            rent_min: listing.rent_min,
            rent_max: listing.rent_max,
            available_on: listing.available_on,
            move_in_special: listing.move_in_special.map(MoveInSpecial::label),
            net_effective_rent: listing
                .move_in_special
                .map(|special| net_effective_rent(listing.rent_min, Some(special))),
        }
    }
}

#[async_trait]
impl InventoryMatcher for ScoringInventoryMatcher {
    async fn rank(
        &self,
        profile: &ClientProfile,
    ) -> Result<Vec<InventoryCandidate>, MatchError> {
        let mut scored: Vec<(i64, InventoryCandidate)> = self
            .listings
            .iter()
            .filter_map(|listing| {
                Self::score(profile, listing).map(|score| (score, Self::to_candidate(listing)))
            })
            .collect();
        scored.sort_by(|a, b| b.0.cmp(&a.0));
        Ok(scored.into_iter().map(|(_, candidate)| candidate).collect())
    }
}

/// Deterministic SMS templates for the match and no-match paths. Every
/// rendering stays within the 160 character bound.
#[derive(Debug, Default, Clone, Copy)]
pub(crate) struct TemplateMessageComposer;

#[async_trait]
impl MessageComposer for TemplateMessageComposer {
    async fn compose(
        &self,
        profile: &ClientProfile,
        candidate: Option<&InventoryCandidate>,
    ) -> Result<String, ComposeError> {
        Ok(match candidate {
            Some(unit) => compose_match(profile, unit),
            None => compose_no_match(profile),
        })
    }
}

fn compose_match(profile: &ClientProfile, unit: &InventoryCandidate) -> String {
    const CLOSER: &str = " Want to take a look?";

    let mut body = format!(
        "Hi {}! I have a unit for you: {}bd/{}ba at {} in {} for {}/mo.",
        profile.first_name,
        unit.bedrooms,
        unit.bathrooms,
        unit.unit_name,
        unit.area,
        unit.rent_range_label(),
    );

    if let Some(special) = &unit.move_in_special {
        let note = format!(" {special} right now.");
        if body.chars().count() + note.chars().count() + CLOSER.chars().count() <= MAX_SMS_CHARS {
            body.push_str(&note);
        }
    }
    if body.chars().count() + CLOSER.chars().count() <= MAX_SMS_CHARS {
        body.push_str(CLOSER);
    }

    clamp_sms(body)
}

fn compose_no_match(profile: &ClientProfile) -> String {
    clamp_sms(format!(
        "Hi {}! Nothing in {} matches your {}bd/{}ba search under ${} today. Want me to widen the area or revisit the budget?",
        profile.first_name,
        profile.target_area,
        profile.bedrooms_needed,
        profile.bathrooms_needed,
        profile.budget_ceiling,
    ))
}

fn clamp_sms(message: String) -> String {
    if message.chars().count() <= MAX_SMS_CHARS {
        message
    } else {
        message.chars().take(MAX_SMS_CHARS).collect()
    }
}

fn seed_clients() -> Vec<ClientRecord> {
    vec![
        ClientRecord {
            client_id: ClientId("691481".to_string()),
            full_name: "Jordan Avery".to_string(),
            email: Some("jordan.avery@example.com".to_string()),
            gross_monthly_income: Some(7_400),
            credit_score: Some(705),
            budget_min: Some(2_100),
            budget_max: Some(2_350),
            desired_move_in: NaiveDate::from_ymd_opt(2026, 9, 1),
            bedrooms: 2,
            bathrooms: 2,
            preferred_areas: vec!["Lombard".to_string(), "Villa Park".to_string()],
            notes: Some("Prefers in-unit laundry; touring weekends only".to_string()),
        },
        ClientRecord {
            client_id: ClientId("714205".to_string()),
            full_name: "Priya Natarajan".to_string(),
            email: Some("priya.n@example.com".to_string()),
            gross_monthly_income: Some(5_200),
            credit_score: Some(580),
            budget_min: None,
            budget_max: Some(2_000),
            desired_move_in: NaiveDate::from_ymd_opt(2026, 10, 1),
            bedrooms: 3,
            bathrooms: 2,
            preferred_areas: vec!["Naperville".to_string()],
            notes: None,
        },
    ]
}

fn seed_listings() -> Vec<InventoryListing> {
    vec![
        InventoryListing {
            unit_name: "Apex 41".to_string(),
            address: "41 E St Charles Rd, Lombard, IL 60148".to_string(),
            area: "Lombard".to_string(),
            bedrooms: 2,
            bathrooms: 2,
            rent_min: 2_234,
            rent_max: 2_318,
            available_on: NaiveDate::from_ymd_opt(2026, 8, 15),
            move_in_special: None,
        },
        InventoryListing {
            unit_name: "Grove Court".to_string(),
            address: "210 W Lake St, Addison, IL 60101".to_string(),
            area: "Addison".to_string(),
            bedrooms: 2,
            bathrooms: 2,
            rent_min: 2_150,
            rent_max: 2_150,
            available_on: NaiveDate::from_ymd_opt(2026, 8, 1),
            move_in_special: Some(MoveInSpecial::AmountOff(500)),
        },
        InventoryListing {
            unit_name: "Atwater Row".to_string(),
            address: "5026 Zion Rd, Lombard, IL 60148".to_string(),
            area: "Lombard".to_string(),
            bedrooms: 1,
            bathrooms: 1,
            rent_min: 1_385,
            rent_max: 1_560,
            available_on: NaiveDate::from_ymd_opt(2026, 8, 10),
            move_in_special: Some(MoveInSpecial::WeeksFree(2)),
        },
        InventoryListing {
            unit_name: "Quinn on Thirty".to_string(),
            address: "6302 Greenbelt Ave, Naperville, IL 60540".to_string(),
            area: "Naperville".to_string(),
            bedrooms: 2,
            bathrooms: 2,
            rent_min: 2_600,
            rent_max: 2_750,
            available_on: NaiveDate::from_ymd_opt(2026, 9, 15),
            move_in_special: None,
        },
    ]
}
