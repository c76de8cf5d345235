use serde::Serialize;

use finapi_core::{AccountId, Entity};

use crate::ledger::Ledger;

/// A named account, keyed by its tax identifier, owning exactly one ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Account {
    id: AccountId,
    tax_id: String,
    display_name: String,
    #[serde(rename = "statement")]
    ledger: Ledger,
}

impl Account {
    /// Open a new account with a fresh identifier and an empty ledger.
    pub fn open(tax_id: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            id: AccountId::new(),
            tax_id: tax_id.into(),
            display_name: display_name.into(),
            ledger: Ledger::new(),
        }
    }

    pub fn id_typed(&self) -> AccountId {
        self.id
    }

    pub fn tax_id(&self) -> &str {
        &self.tax_id
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    /// Replace the display name; the ledger is untouched.
    pub fn rename(&mut self, display_name: impl Into<String>) {
        self.display_name = display_name.into();
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn ledger_mut(&mut self) -> &mut Ledger {
        &mut self.ledger
    }
}

impl Entity for Account {
    type Id = AccountId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn rename_keeps_identity_and_ledger() {
        let mut account = Account::open("111", "Ada");
        account.ledger_mut().deposit(10, None, Utc::now());
        let id = *Entity::id(&account);

        account.rename("Ada Lovelace");

        assert_eq!(account.display_name(), "Ada Lovelace");
        assert_eq!(account.id_typed(), id);
        assert_eq!(account.ledger().balance(), 10);
    }

    #[test]
    fn json_shape() {
        let account = Account::open("111", "Ada");
        let json = serde_json::to_value(&account).unwrap();

        assert_eq!(json["id"], account.id_typed().to_string());
        assert_eq!(json["tax_id"], "111");
        assert_eq!(json["display_name"], "Ada");
        assert_eq!(json["statement"], serde_json::json!([]));
    }
}
