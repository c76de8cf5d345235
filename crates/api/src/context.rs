/// Customer context for a request.
///
/// Inserted by [`crate::middleware::customer_middleware`] once the tax
/// identifier from the request headers resolves to an existing account.
/// Presence of a matching identifier is the only proof of ownership.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomerContext {
    tax_id: String,
}

impl CustomerContext {
    pub fn new(tax_id: impl Into<String>) -> Self {
        Self { tax_id: tax_id.into() }
    }

    pub fn tax_id(&self) -> &str {
        &self.tax_id
    }
}
