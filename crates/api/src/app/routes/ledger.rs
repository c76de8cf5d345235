use std::sync::Arc;

use axum::{extract::Extension, http::StatusCode, response::IntoResponse, Json};

use crate::app::dto;
use crate::app::errors::ApiError;
use crate::app::extract::{ApiJson, ApiQuery};
use crate::app::services::AppServices;
use crate::context::CustomerContext;

pub async fn statement(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(customer): Extension<CustomerContext>,
) -> Result<impl IntoResponse, ApiError> {
    let ops = services.statement(customer.tax_id())?;
    Ok(Json(ops))
}

/// GET /statement/date?date=2024-03-15
///
/// Matches on the UTC calendar day each operation was recorded on. A missing
/// or unrecognizable date matches nothing and yields `[]`.
pub async fn statement_by_date(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(customer): Extension<CustomerContext>,
    ApiQuery(query): ApiQuery<dto::StatementDateQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let day = dto::parse_date(query.date.as_deref());
    let ops = services.statement_on(customer.tax_id(), day)?;
    Ok(Json(ops))
}

pub async fn deposit(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(customer): Extension<CustomerContext>,
    ApiJson(body): ApiJson<dto::DepositRequest>,
) -> Result<StatusCode, ApiError> {
    services.deposit(customer.tax_id(), body.amount, body.description)?;
    Ok(StatusCode::CREATED)
}

pub async fn withdraw(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(customer): Extension<CustomerContext>,
    ApiJson(body): ApiJson<dto::WithdrawRequest>,
) -> Result<StatusCode, ApiError> {
    services.withdraw(customer.tax_id(), body.amount)?;
    Ok(StatusCode::CREATED)
}

pub async fn balance(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(customer): Extension<CustomerContext>,
) -> Result<impl IntoResponse, ApiError> {
    let balance = services.balance(customer.tax_id())?;
    Ok(Json(balance))
}
