//! Party order handlers, mounted under `/api/party`.
//!
//! POST   /addPartyOrder           - create an order (party not checked)
//! DELETE /deletePartyOrder/:id    - remove an order
//! GET    /getPartyViseOrdersInfo  - orders for one party (?partyId=)
//! PUT    /updatePartyOrder/:id    - overwrite an order

use std::sync::Arc;

use axum::{
    extract::{Path, Query},
    Extension, Json,
};
use ledger_core::models::{OrderSummary, OrderUpdated, PartyOrder, Record};
use ledger_core::requests::{NewPartyOrder, PartyOrderUpdate};
use ledger_core::LedgerService;
use serde::{Deserialize, Serialize};

use super::Removed;
use crate::error::AppError;
use crate::extract::JsonBody;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PartyOrderSaved {
    pub success: bool,
    pub save_party_order: Record<PartyOrder>,
}

#[derive(Debug, Serialize)]
pub struct OrderEnvelope {
    pub order: OrderUpdated,
}

#[derive(Debug, Serialize)]
pub struct PartyOrders {
    #[serde(rename = "PartyOrder")]
    pub party_order: Vec<OrderSummary>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartyIdQuery {
    pub party_id: Option<String>,
}

pub async fn add_party_order(
    Extension(service): Extension<Arc<dyn LedgerService>>,
    JsonBody(req): JsonBody<NewPartyOrder>,
) -> Result<Json<PartyOrderSaved>, AppError> {
    let saved = service.add_party_order(req).await?;
    Ok(Json(PartyOrderSaved {
        success: true,
        save_party_order: saved,
    }))
}

pub async fn delete_party_order(
    Extension(service): Extension<Arc<dyn LedgerService>>,
    Path(id): Path<String>,
) -> Result<Json<Removed>, AppError> {
    service
        .delete_party_order(&id)
        .await
        .map_err(AppError::unhandled_store)?;
    Ok(Json(Removed {
        message: "Order removed successfully!",
    }))
}

pub async fn get_party_vise_orders_info(
    Extension(service): Extension<Arc<dyn LedgerService>>,
    Query(query): Query<PartyIdQuery>,
) -> Result<Json<PartyOrders>, AppError> {
    let party_id = query.party_id.unwrap_or_default();
    let party_order = service
        .list_orders_for_party(&party_id)
        .await
        .map_err(AppError::unhandled_store)?;
    Ok(Json(PartyOrders { party_order }))
}

pub async fn update_party_order(
    Extension(service): Extension<Arc<dyn LedgerService>>,
    Path(id): Path<String>,
    JsonBody(req): JsonBody<PartyOrderUpdate>,
) -> Result<Json<OrderEnvelope>, AppError> {
    let order = service
        .update_party_order(&id, req)
        .await
        .map_err(AppError::unhandled_store)?;
    Ok(Json(OrderEnvelope { order }))
}
