use chrono::NaiveDate;
use serde::Deserialize;

use finapi_accounts::Amount;

// -------------------------
// Request DTOs
// -------------------------

#[derive(Debug, Deserialize)]
pub struct CreateAccountRequest {
    #[serde(alias = "taxId", alias = "cpf")]
    pub tax_id: String,
    #[serde(alias = "displayName", alias = "name")]
    pub display_name: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateAccountRequest {
    #[serde(alias = "displayName", alias = "name")]
    pub display_name: String,
}

#[derive(Debug, Deserialize)]
pub struct DepositRequest {
    pub description: Option<String>,
    pub amount: Amount,
}

#[derive(Debug, Deserialize)]
pub struct WithdrawRequest {
    pub amount: Amount,
}

#[derive(Debug, Deserialize)]
pub struct StatementDateQuery {
    pub date: Option<String>,
}

// -------------------------
// Parsing helpers
// -------------------------

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"];

/// Parse a calendar day from the `date` query parameter.
///
/// `None` when the parameter is absent or not a recognizable day; such a
/// query matches no operations.
pub fn parse_date(s: Option<&str>) -> Option<NaiveDate> {
    let s = s?.trim();
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
}
