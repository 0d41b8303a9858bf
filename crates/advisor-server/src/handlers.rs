//! HTTP Handlers

use axum::{
    Json,
    extract::{Path, State},
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use risk_advisor::policy::{POLICY_TABLE, POLICY_VERSION, PolicyRow};
use risk_advisor::questionnaire::{FACTOR_TABLE, FactorSpec};
use risk_advisor::store::Assessment;
use risk_advisor::questionnaire::history_adjustment;
use risk_advisor::{
    InstrumentFilter, InstrumentRecord, PortfolioPosition, ProfileScorer, QuestionnaireResponse,
    Recommendation, RiskProfile, RiskReport, Sector, TradeRecord,
};

use crate::error::ApiError;
use crate::extract::{AppJson, AppQuery};
use crate::state::AppState;

type ApiResult<T> = Result<Json<T>, ApiError>;

// ============================================================================
// Request / Response Types
// ============================================================================

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub catalog_store: String,
    pub catalog_available: bool,
    pub instruments: usize,
}

#[derive(Serialize)]
pub struct PolicyResponse {
    pub version: &'static str,
    pub rows: &'static [PolicyRow],
}

#[derive(Serialize)]
pub struct QuestionnaireSchema {
    pub factors: &'static [FactorSpec],
}

#[derive(Debug, Default, Deserialize)]
pub struct CatalogQuery {
    pub sector: Option<String>,
    pub min_risk: Option<u8>,
    pub max_risk: Option<u8>,
}

#[derive(Debug, Deserialize)]
pub struct ScoreRequest {
    #[serde(default)]
    pub user_id: Option<String>,
    pub answers: QuestionnaireResponse,
    /// Past trades; a history heavy in volatile names raises the score
    #[serde(default)]
    pub trading_history: Vec<TradeRecord>,
}

#[derive(Serialize)]
pub struct ScoreResponse {
    pub profile: RiskProfile,
    /// Unrounded weighted questionnaire score
    pub weighted_score: Decimal,
    /// Points added for the trading history (0-2)
    pub history_adjustment: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assessment_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RankRequest {
    pub risk_score: u8,
}

#[derive(Serialize)]
pub struct RankResponse {
    pub profile: RiskProfile,
    pub recommendations: Vec<Recommendation>,
}

/// A holding as the dashboard sends it; weights are derived server-side
#[derive(Debug, Deserialize)]
pub struct PositionInput {
    pub symbol: String,
    #[serde(default)]
    pub quantity: Decimal,
    #[serde(default)]
    pub cost_basis: Decimal,
    pub current_value: Decimal,
}

#[derive(Debug, Deserialize)]
pub struct PortfolioRequest {
    pub risk_score: u8,
    #[serde(default)]
    pub positions: Vec<PositionInput>,
    #[serde(default)]
    pub cash: Decimal,
}

impl PortfolioRequest {
    fn into_parts(self) -> Result<(RiskProfile, Vec<PortfolioPosition>), ApiError> {
        let profile = RiskProfile::for_score(self.risk_score)?;
        let positions = self
            .positions
            .into_iter()
            .map(|p| PortfolioPosition::new(p.symbol, p.quantity, p.cost_basis, p.current_value))
            .collect();
        let positions = PortfolioPosition::weigh(positions, self.cash)?;
        Ok((profile, positions))
    }
}

#[derive(Serialize)]
pub struct AnalyzeResponse {
    #[serde(flatten)]
    pub report: RiskReport,
    pub messages: Vec<String>,
}

#[derive(Serialize)]
pub struct RecommendResponse {
    pub report: RiskReport,
    pub recommendations: Vec<Recommendation>,
}

// ============================================================================
// Handlers
// ============================================================================

/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let catalog_available = state.catalog.health_check().await;
    let instruments = match state.catalog.snapshot().await {
        Ok(catalog) => catalog.len(),
        Err(e) => {
            tracing::warn!("Catalog snapshot unavailable: {}", e);
            0
        }
    };

    Json(HealthResponse {
        status: if catalog_available { "healthy" } else { "degraded" },
        version: env!("CARGO_PKG_VERSION"),
        catalog_store: state.catalog.name().to_string(),
        catalog_available,
        instruments,
    })
}

pub async fn policy() -> Json<PolicyResponse> {
    Json(PolicyResponse {
        version: POLICY_VERSION,
        rows: &POLICY_TABLE,
    })
}

pub async fn questionnaire() -> Json<QuestionnaireSchema> {
    Json(QuestionnaireSchema {
        factors: &FACTOR_TABLE,
    })
}

/// Catalog listing, optionally filtered by sector and rating range
pub async fn list_catalog(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<CatalogQuery>,
) -> ApiResult<Vec<InstrumentRecord>> {
    let mut filter = InstrumentFilter::new();
    if let Some(sector) = query.sector.as_deref() {
        filter = filter.in_sectors([sector.parse::<Sector>()?]);
    }
    if query.min_risk.is_some() || query.max_risk.is_some() {
        let min = query.min_risk.unwrap_or(1);
        let max = query.max_risk.unwrap_or(10);
        if min > max {
            return Err(ApiError::BadRequest(format!("min_risk {min} exceeds max_risk {max}")));
        }
        filter = filter.with_risk_range(min..=max);
    }

    let catalog = state.catalog.snapshot().await?;
    Ok(Json(catalog.filter(&filter).cloned().collect()))
}

pub async fn get_instrument(
    State(state): State<AppState>,
    Path(symbol): Path<String>,
) -> ApiResult<InstrumentRecord> {
    Ok(Json(state.catalog.instrument(&symbol).await?))
}

/// Score a questionnaire; archive it when a user id is given
pub async fn score_profile(
    State(state): State<AppState>,
    AppJson(payload): AppJson<ScoreRequest>,
) -> ApiResult<ScoreResponse> {
    let weighted_score = ProfileScorer::new().weighted_score(&payload.answers)?;
    let profile = state
        .advisor
        .score_with_history(&payload.answers, &payload.trading_history)?;

    let assessment_id = match payload.user_id {
        Some(user_id) => {
            let assessment = Assessment::new(user_id, payload.answers, profile.clone());
            let id = assessment.id.to_string();
            state.profiles.record(assessment).await?;
            Some(id)
        }
        None => None,
    };

    tracing::info!(score = profile.score, band = %profile.band, "Scored questionnaire");

    Ok(Json(ScoreResponse {
        profile,
        weighted_score,
        history_adjustment: history_adjustment(&payload.trading_history),
        assessment_id,
    }))
}

pub async fn latest_profile(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> ApiResult<Assessment> {
    Ok(Json(state.profiles.latest(&user_id).await?))
}

pub async fn profile_history(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> ApiResult<Vec<Assessment>> {
    Ok(Json(state.profiles.history(&user_id).await?))
}

pub async fn rank_candidates(
    State(state): State<AppState>,
    AppJson(payload): AppJson<RankRequest>,
) -> ApiResult<RankResponse> {
    let profile = RiskProfile::for_score(payload.risk_score)?;
    let catalog = state.catalog.snapshot().await?;
    let recommendations = state.advisor.rank(&profile, &catalog);

    Ok(Json(RankResponse {
        profile,
        recommendations,
    }))
}

pub async fn analyze_portfolio(
    State(state): State<AppState>,
    AppJson(payload): AppJson<PortfolioRequest>,
) -> ApiResult<AnalyzeResponse> {
    let (profile, positions) = payload.into_parts()?;
    let catalog = state.catalog.snapshot().await?;
    let report = state.advisor.analyze(&profile, &positions, &catalog)?;

    Ok(Json(AnalyzeResponse {
        messages: report.messages(),
        report,
    }))
}

pub async fn recommend(
    State(state): State<AppState>,
    AppJson(payload): AppJson<PortfolioRequest>,
) -> ApiResult<RecommendResponse> {
    let (profile, positions) = payload.into_parts()?;
    let catalog = state.catalog.snapshot().await?;
    let set = state.advisor.recommend(&profile, &positions, &catalog)?;

    tracing::debug!(
        score = profile.score,
        positions = positions.len(),
        recommendations = set.recommendations.len(),
        "Generated recommendations"
    );

    Ok(Json(RecommendResponse {
        report: set.report,
        recommendations: set.recommendations,
    }))
}
