//! Router construction for the ledger server.

use std::any::Any;
use std::sync::Arc;

use axum::{
    response::{IntoResponse, Response},
    routing::{delete, get, post, put},
    Extension, Router,
};
use ledger_core::LedgerService;
use tower::ServiceBuilder;
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::{self, CorsLayer},
    trace::TraceLayer,
};

use crate::error::AppError;
use crate::handlers::{health, items, parties, party_orders};

/// Build the full axum router with all routes and middleware.
pub fn build_router(service: Arc<dyn LedgerService>) -> Router {
    let item_routes = Router::new()
        .route("/addItem", post(items::add_item))
        .route("/deleteItem/:id", delete(items::delete_item))
        .route("/updateItem/:id", put(items::update_item))
        .route("/getItems", get(items::get_items))
        .route("/searchItemByName", get(items::search_item_by_name));

    let party_routes = Router::new()
        .route("/addParty", post(parties::add_party))
        .route("/deleteParty/:id", delete(parties::delete_party))
        .route("/updateParty/:id", put(parties::update_party))
        .route("/getPartyInfo/:id", get(parties::get_party_info))
        .route("/getAllParties", get(parties::get_all_parties))
        .route("/searchPartyByName", get(parties::search_party_by_name))
        // Party orders
        .route("/addPartyOrder", post(party_orders::add_party_order))
        .route(
            "/deletePartyOrder/:id",
            delete(party_orders::delete_party_order),
        )
        .route(
            "/getPartyViseOrdersInfo",
            get(party_orders::get_party_vise_orders_info),
        )
        .route(
            "/updatePartyOrder/:id",
            put(party_orders::update_party_order),
        );

    Router::new()
        .route("/health", get(health::health))
        .nest("/api/item", item_routes)
        .nest("/api/party", party_routes)
        .layer(Extension(service))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(
                    CorsLayer::new()
                        .allow_origin(cors::Any)
                        .allow_methods(cors::Any)
                        .allow_headers(cors::Any),
                )
                .layer(CatchPanicLayer::custom(handle_panic)),
        )
}

/// Last-resort handler: a panicking request answers `500 {"error": …}`.
fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let message = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "Unknown panic message".to_string()
    };
    AppError::Unhandled(message).into_response()
}
