use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};

use crate::app::services::AppServices;
use crate::middleware;

pub mod accounts;
pub mod ledger;
pub mod system;

/// Router for every endpoint.
///
/// Everything registered before the `route_layer` call is scoped to the
/// calling customer; account creation and health checks are not.
pub fn router(services: Arc<AppServices>) -> Router {
    Router::new()
        .route(
            "/account",
            get(accounts::get_account)
                .put(accounts::update_account)
                .delete(accounts::delete_account),
        )
        .route("/statement", get(ledger::statement))
        .route("/statement/date", get(ledger::statement_by_date))
        .route("/deposit", post(ledger::deposit))
        .route("/withdraw", post(ledger::withdraw))
        .route("/balance", get(ledger::balance))
        .route_layer(axum::middleware::from_fn_with_state(
            services,
            middleware::customer_middleware,
        ))
        .route("/account", post(accounts::create_account))
        .route("/health", get(system::health))
}
