use std::sync::Arc;

use axum::{extract::Extension, http::StatusCode, response::IntoResponse, Json};

use crate::app::dto;
use crate::app::errors::ApiError;
use crate::app::extract::ApiJson;
use crate::app::services::AppServices;
use crate::context::CustomerContext;

pub async fn create_account(
    Extension(services): Extension<Arc<AppServices>>,
    ApiJson(body): ApiJson<dto::CreateAccountRequest>,
) -> Result<StatusCode, ApiError> {
    services.open_account(&body.tax_id, &body.display_name)?;
    Ok(StatusCode::CREATED)
}

pub async fn get_account(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(customer): Extension<CustomerContext>,
) -> Result<impl IntoResponse, ApiError> {
    let account = services.account(customer.tax_id())?;
    Ok(Json(account))
}

pub async fn update_account(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(customer): Extension<CustomerContext>,
    ApiJson(body): ApiJson<dto::UpdateAccountRequest>,
) -> Result<StatusCode, ApiError> {
    services.rename_account(customer.tax_id(), &body.display_name)?;
    Ok(StatusCode::NO_CONTENT)
}

/// Responds with every account that remains after the deletion.
pub async fn delete_account(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(customer): Extension<CustomerContext>,
) -> Result<impl IntoResponse, ApiError> {
    let remaining = services.close_account(customer.tax_id())?;
    Ok(Json(remaining))
}
