//! Item handlers, mounted under `/api/item`.
//!
//! POST   /addItem            - create an item
//! DELETE /deleteItem/:id     - remove an item
//! PUT    /updateItem/:id     - overwrite an item
//! GET    /getItems           - list all items, newest first
//! GET    /searchItemByName   - case-insensitive name search (?itemName=)

use std::sync::Arc;

use axum::{
    extract::{Path, Query},
    Extension, Json,
};
use ledger_core::models::{Item, ItemUpdated, Record};
use ledger_core::requests::{ItemUpdate, NewItem};
use ledger_core::LedgerService;
use serde::{Deserialize, Serialize};

use super::Removed;
use crate::error::AppError;
use crate::extract::JsonBody;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemSaved {
    pub success: bool,
    pub save_item: Record<Item>,
}

#[derive(Debug, Serialize)]
pub struct ItemEnvelope {
    pub item: ItemUpdated,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemNameQuery {
    pub item_name: Option<String>,
}

pub async fn add_item(
    Extension(service): Extension<Arc<dyn LedgerService>>,
    JsonBody(req): JsonBody<NewItem>,
) -> Result<Json<ItemSaved>, AppError> {
    let saved = service.add_item(req).await?;
    Ok(Json(ItemSaved {
        success: true,
        save_item: saved,
    }))
}

pub async fn delete_item(
    Extension(service): Extension<Arc<dyn LedgerService>>,
    Path(id): Path<String>,
) -> Result<Json<Removed>, AppError> {
    service
        .delete_item(&id)
        .await
        .map_err(AppError::unhandled_store)?;
    Ok(Json(Removed {
        message: "Item removed successfully!",
    }))
}

pub async fn update_item(
    Extension(service): Extension<Arc<dyn LedgerService>>,
    Path(id): Path<String>,
    JsonBody(req): JsonBody<ItemUpdate>,
) -> Result<Json<ItemEnvelope>, AppError> {
    let item = service
        .update_item(&id, req)
        .await
        .map_err(AppError::unhandled_store)?;
    Ok(Json(ItemEnvelope { item }))
}

pub async fn get_items(
    Extension(service): Extension<Arc<dyn LedgerService>>,
) -> Result<Json<Vec<Record<Item>>>, AppError> {
    Ok(Json(service.list_items().await?))
}

pub async fn search_item_by_name(
    Extension(service): Extension<Arc<dyn LedgerService>>,
    Query(query): Query<ItemNameQuery>,
) -> Result<Json<Vec<Record<Item>>>, AppError> {
    let needle = query.item_name.unwrap_or_default();
    Ok(Json(service.search_items_by_name(&needle).await?))
}
