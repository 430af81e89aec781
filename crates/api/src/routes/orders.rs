//! Order lifecycle endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use common::OrderId;
use domain::{Order, OrderStatus};
use engine::{
    BulkOperation, BulkSummary, FulfillmentEngine, InMemoryNotificationGateway, InMemorySettings,
    TransitionOutcome,
};
use serde::{Deserialize, Serialize};
use store::RecordStore;

use crate::error::ApiError;

/// Shared application state accessible from all handlers.
pub struct AppState<S: RecordStore + Clone> {
    pub engine: FulfillmentEngine<S, InMemoryNotificationGateway, InMemorySettings>,
    pub settings: InMemorySettings,
    pub store: S,
}

// -- Request types --

#[derive(Deserialize)]
pub struct UpdateStatusRequest {
    pub status: OrderStatus,
}

#[derive(Deserialize)]
pub struct BulkRequest {
    pub order_ids: Vec<String>,
    pub operation: BulkOperation,
}

// -- Response types --

#[derive(Serialize)]
pub struct OrderResponse {
    pub id: String,
    pub user_id: String,
    pub status: String,
    pub items: Vec<OrderItemResponse>,
    pub total_cents: i64,
    pub version: u64,
}

#[derive(Serialize)]
pub struct OrderItemResponse {
    pub product_id: String,
    pub color: Option<String>,
    pub size: Option<String>,
    pub quantity: u32,
    pub unit_price_cents: i64,
}

#[derive(Serialize)]
pub struct TransitionResponse {
    pub order_id: String,
    pub status: String,
    pub bonus_credited: Option<i64>,
    pub points_debited: Option<i64>,
    pub commission: Option<CommissionResponse>,
    pub warnings: Vec<String>,
}

#[derive(Serialize)]
pub struct CommissionResponse {
    pub referrer_id: String,
    pub amount: i64,
    pub total_referrals: u32,
}

impl From<TransitionOutcome> for TransitionResponse {
    fn from(outcome: TransitionOutcome) -> Self {
        Self {
            order_id: outcome.order_id.to_string(),
            status: outcome.status.to_string(),
            bonus_credited: outcome.bonus_credited,
            points_debited: outcome.points_debited,
            commission: outcome.commission.map(|c| CommissionResponse {
                referrer_id: c.referrer_id.to_string(),
                amount: c.amount,
                total_referrals: c.total_referrals,
            }),
            warnings: outcome.warnings.iter().map(|w| w.to_string()).collect(),
        }
    }
}

fn order_response(order: &Order) -> OrderResponse {
    let items = order
        .items
        .iter()
        .map(|item| OrderItemResponse {
            product_id: item.product_id.to_string(),
            color: item.variant.as_ref().map(|v| v.color.clone()),
            size: item.variant.as_ref().map(|v| v.size.clone()),
            quantity: item.quantity,
            unit_price_cents: item.unit_price.cents(),
        })
        .collect();

    OrderResponse {
        id: order.id.to_string(),
        user_id: order.user_id.to_string(),
        status: order.status.to_string(),
        items,
        total_cents: order.total.cents(),
        version: order.version,
    }
}

fn parse_order_id(id: &str) -> Result<OrderId, ApiError> {
    let uuid = uuid::Uuid::parse_str(id)
        .map_err(|e| ApiError::BadRequest(format!("Invalid order id: {e}")))?;
    Ok(OrderId::from_uuid(uuid))
}

// -- Handlers --

/// GET /orders — list all order records.
#[tracing::instrument(skip(state))]
pub async fn list<S: RecordStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
) -> Result<Json<Vec<OrderResponse>>, ApiError> {
    let orders = state.store.list_orders().await?;
    Ok(Json(orders.iter().map(order_response).collect()))
}

/// GET /orders/:id — load an order by ID.
#[tracing::instrument(skip(state))]
pub async fn get<S: RecordStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
) -> Result<Json<OrderResponse>, ApiError> {
    let order_id = parse_order_id(&id)?;
    let order = state
        .store
        .get_order(order_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Order {id} not found")))?;

    Ok(Json(order_response(&order)))
}

/// POST /orders/:id/approve — approve a pending order.
#[tracing::instrument(skip(state))]
pub async fn approve<S: RecordStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
) -> Result<Json<TransitionResponse>, ApiError> {
    let order_id = parse_order_id(&id)?;
    let outcome = state.engine.approve(order_id).await?;
    Ok(Json(outcome.into()))
}

/// POST /orders/:id/reject — reject a pending order.
#[tracing::instrument(skip(state))]
pub async fn reject<S: RecordStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
) -> Result<Json<TransitionResponse>, ApiError> {
    let order_id = parse_order_id(&id)?;
    let outcome = state.engine.reject(order_id).await?;
    Ok(Json(outcome.into()))
}

/// POST /orders/:id/status — progress an order to shipped or delivered.
#[tracing::instrument(skip(state, req))]
pub async fn update_status<S: RecordStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
    Json(req): Json<UpdateStatusRequest>,
) -> Result<Json<TransitionResponse>, ApiError> {
    let order_id = parse_order_id(&id)?;
    let outcome = state.engine.update_status(order_id, req.status).await?;
    Ok(Json(outcome.into()))
}

/// DELETE /orders/:id — delete a reconciled (terminal) order.
#[tracing::instrument(skip(state))]
pub async fn remove<S: RecordStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
) -> Result<axum::http::StatusCode, ApiError> {
    let order_id = parse_order_id(&id)?;
    state.engine.delete(order_id).await?;
    Ok(axum::http::StatusCode::NO_CONTENT)
}

/// POST /orders/bulk — apply an operation to a list of orders.
#[tracing::instrument(skip(state, req))]
pub async fn bulk<S: RecordStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Json(req): Json<BulkRequest>,
) -> Result<Json<BulkSummary>, ApiError> {
    let mut order_ids = Vec::with_capacity(req.order_ids.len());
    for id in &req.order_ids {
        order_ids.push(parse_order_id(id)?);
    }

    let summary = state.engine.run_bulk(&order_ids, req.operation).await;
    Ok(Json(summary))
}
