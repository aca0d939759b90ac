use serde::Deserialize;
use uuid::Uuid;

/// Role of a user within a business, using the backend's numeric encoding.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "u8")]
pub enum BusinessRole {
    #[default]
    None,
    Owner,
    Employee,
}

impl From<u8> for BusinessRole {
    fn from(value: u8) -> Self {
        match value {
            1 => Self::Owner,
            2 => Self::Employee,
            _ => Self::None,
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BusinessSummary {
    pub id: Uuid,
    #[serde(default)]
    pub name: String,
}

/// One membership entry as returned by the BusinessUser module.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetailedBusiness {
    pub business: BusinessSummary,
    #[serde(default)]
    pub role: BusinessRole,
}

/// Resolves the caller's role in the currently selected business.
///
/// Pure function over the membership list; no selection or an id that is not
/// in the list resolves to `BusinessRole::None`.
#[must_use]
pub fn role_in_business(memberships: &[DetailedBusiness], selected: Option<Uuid>) -> BusinessRole {
    selected
        .and_then(|id| memberships.iter().find(|m| m.business.id == id))
        .map_or(BusinessRole::None, |m| m.role)
}
