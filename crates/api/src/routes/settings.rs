//! Administrator-facing settings endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use domain::{BonusConfig, ReferralPolicy};
use engine::SettingsProvider;
use serde::{Deserialize, Serialize};
use store::RecordStore;

use crate::error::ApiError;
use crate::routes::orders::AppState;

#[derive(Serialize)]
pub struct SettingsResponse {
    pub purchase_bonus_rate: f64,
    pub referral_commission_rate: f64,
    pub referral_policy: ReferralPolicy,
    pub low_stock_threshold: u32,
}

#[derive(Deserialize)]
pub struct UpdateSettingsRequest {
    pub purchase_bonus_rate: f64,
    pub referral_commission_rate: f64,
    #[serde(default)]
    pub referral_policy: ReferralPolicy,
    pub low_stock_threshold: u32,
}

/// GET /settings — current bonus rates and low-stock threshold.
#[tracing::instrument(skip(state))]
pub async fn get<S: RecordStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
) -> Json<SettingsResponse> {
    let config = state.settings.bonus_config().await;
    let threshold = state.settings.low_stock_threshold().await;

    Json(SettingsResponse {
        purchase_bonus_rate: config.purchase_bonus_rate,
        referral_commission_rate: config.referral_commission_rate,
        referral_policy: config.referral_policy,
        low_stock_threshold: threshold,
    })
}

/// PUT /settings — replace bonus rates and low-stock threshold.
#[tracing::instrument(skip(state, req))]
pub async fn update<S: RecordStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Json(req): Json<UpdateSettingsRequest>,
) -> Result<Json<SettingsResponse>, ApiError> {
    if req.purchase_bonus_rate < 0.0 || req.referral_commission_rate < 0.0 {
        return Err(ApiError::BadRequest(
            "rates must be non-negative".to_string(),
        ));
    }

    state.settings.set_bonus_config(BonusConfig {
        purchase_bonus_rate: req.purchase_bonus_rate,
        referral_commission_rate: req.referral_commission_rate,
        referral_policy: req.referral_policy,
    });
    state.settings.set_low_stock_threshold(req.low_stock_threshold);

    tracing::info!(
        purchase_bonus_rate = req.purchase_bonus_rate,
        referral_commission_rate = req.referral_commission_rate,
        low_stock_threshold = req.low_stock_threshold,
        "settings updated"
    );

    Ok(Json(SettingsResponse {
        purchase_bonus_rate: req.purchase_bonus_rate,
        referral_commission_rate: req.referral_commission_rate,
        referral_policy: req.referral_policy,
        low_stock_threshold: req.low_stock_threshold,
    }))
}
