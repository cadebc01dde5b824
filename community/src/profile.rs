//! What other attendees may see of an account.

use serde::Serialize;
use village_store::account::{AccountRecord, AccountStore};
use village_store::{StoreError, Visibility};
use village_types::AccountId;

/// Public identity of an account. Never carries the access code or phone.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PublicProfile {
    pub id: AccountId,
    pub email: String,
    pub identity_url: String,
}

impl From<&AccountRecord> for PublicProfile {
    fn from(account: &AccountRecord) -> Self {
        Self {
            id: account.id.clone(),
            email: account.email.to_string(),
            identity_url: account.identity_url.clone(),
        }
    }
}

/// Contact fields a group member chose to reveal; hidden ones are `None`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ContactCard {
    pub phone: Option<String>,
    pub email: Option<String>,
    pub identity_url: Option<String>,
}

impl ContactCard {
    pub fn new(visibility: Visibility, phone: &str, account: Option<&AccountRecord>) -> Self {
        Self {
            phone: visibility.show_phone.then(|| phone.to_string()),
            email: account
                .filter(|_| visibility.show_email)
                .map(|a| a.email.to_string()),
            identity_url: account
                .filter(|_| visibility.show_linkedin)
                .map(|a| a.identity_url.clone()),
        }
    }
}

pub(crate) fn lookup_profile(
    accounts: &dyn AccountStore,
    id: &AccountId,
) -> Result<Option<PublicProfile>, StoreError> {
    Ok(accounts.find_by_id(id)?.as_ref().map(PublicProfile::from))
}

/// Trim an optional free-text field, dropping it when blank.
pub(crate) fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use village_types::{AccessCode, Email, Timestamp};

    fn account() -> AccountRecord {
        AccountRecord::new_verified(
            Email::new("ann@example.com"),
            "https://linkedin.com/in/ann",
            AccessCode::new("YC25-AAAAAA"),
            Timestamp::new(1),
        )
    }

    #[test]
    fn card_reveals_only_chosen_fields() {
        let acct = account();
        let card = ContactCard::new(
            Visibility {
                show_phone: false,
                show_email: true,
                show_linkedin: false,
            },
            "555",
            Some(&acct),
        );
        assert_eq!(card.phone, None);
        assert_eq!(card.email.as_deref(), Some("ann@example.com"));
        assert_eq!(card.identity_url, None);

        let hidden = ContactCard::new(Visibility::default(), "555", Some(&acct));
        assert_eq!(hidden, ContactCard::default());
    }

    #[test]
    fn profile_omits_secrets() {
        let json = serde_json::to_value(PublicProfile::from(&account())).unwrap();
        assert!(json.get("access_code").is_none());
        assert_eq!(json["email"], "ann@example.com");
    }

    #[test]
    fn blank_optional_fields_become_absent() {
        assert_eq!(non_blank(Some("  ".into())), None);
        assert_eq!(non_blank(Some(" KL 123 ".into())), Some("KL 123".into()));
        assert_eq!(non_blank(None), None);
    }
}
