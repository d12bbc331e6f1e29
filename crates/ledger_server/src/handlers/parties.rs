//! Party handlers, mounted under `/api/party`.
//!
//! POST   /addParty            - create a party
//! DELETE /deleteParty/:id     - remove a party (orders are kept)
//! PUT    /updateParty/:id     - overwrite a party
//! GET    /getPartyInfo/:id    - single party projection
//! GET    /getAllParties       - list all parties, newest first
//! GET    /searchPartyByName   - case-insensitive name search (?partyName=)

use std::sync::Arc;

use axum::{
    extract::{Path, Query},
    Extension, Json,
};
use ledger_core::models::{Party, PartyInfo, PartyUpdated, Record};
use ledger_core::requests::{NewParty, PartyUpdate};
use ledger_core::LedgerService;
use serde::{Deserialize, Serialize};

use super::Removed;
use crate::error::AppError;
use crate::extract::JsonBody;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PartySaved {
    pub success: bool,
    pub save_party: Record<Party>,
}

/// `{ "party": … }` wrapper shared by update and info responses.
#[derive(Debug, Serialize)]
pub struct PartyEnvelope<T> {
    pub party: T,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartyNameQuery {
    pub party_name: Option<String>,
}

pub async fn add_party(
    Extension(service): Extension<Arc<dyn LedgerService>>,
    JsonBody(req): JsonBody<NewParty>,
) -> Result<Json<PartySaved>, AppError> {
    let saved = service.add_party(req).await?;
    Ok(Json(PartySaved {
        success: true,
        save_party: saved,
    }))
}

pub async fn delete_party(
    Extension(service): Extension<Arc<dyn LedgerService>>,
    Path(id): Path<String>,
) -> Result<Json<Removed>, AppError> {
    service
        .delete_party(&id)
        .await
        .map_err(AppError::unhandled_store)?;
    Ok(Json(Removed {
        message: "Party removed successfully!",
    }))
}

pub async fn update_party(
    Extension(service): Extension<Arc<dyn LedgerService>>,
    Path(id): Path<String>,
    JsonBody(req): JsonBody<PartyUpdate>,
) -> Result<Json<PartyEnvelope<PartyUpdated>>, AppError> {
    let party = service
        .update_party(&id, req)
        .await
        .map_err(AppError::unhandled_store)?;
    Ok(Json(PartyEnvelope { party }))
}

pub async fn get_party_info(
    Extension(service): Extension<Arc<dyn LedgerService>>,
    Path(id): Path<String>,
) -> Result<Json<PartyEnvelope<PartyInfo>>, AppError> {
    let party = service
        .get_party_info(&id)
        .await
        .map_err(AppError::unhandled_store)?;
    Ok(Json(PartyEnvelope { party }))
}

pub async fn get_all_parties(
    Extension(service): Extension<Arc<dyn LedgerService>>,
) -> Result<Json<Vec<Record<Party>>>, AppError> {
    Ok(Json(service.list_parties().await?))
}

pub async fn search_party_by_name(
    Extension(service): Extension<Arc<dyn LedgerService>>,
    Query(query): Query<PartyNameQuery>,
) -> Result<Json<Vec<Record<Party>>>, AppError> {
    let needle = query.party_name.unwrap_or_default();
    Ok(Json(service.search_parties_by_name(&needle).await?))
}
