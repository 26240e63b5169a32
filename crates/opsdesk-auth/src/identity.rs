//! Session identity and the presentation-oriented user view.

use opsdesk_api::UserRecord;
use serde::{Deserialize, Serialize};

/// Minimal authenticated-user reference.
///
/// Replaced wholesale on sign-in, cleared wholesale on sign-out; the id is
/// always the string form of whatever the backend sent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionIdentity {
    pub id: String,
    pub email: String,
}

/// Presentation fields derived from the backend user record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub avatar_url: String,
}

/// Presentation-enriched user view.
///
/// `profile.email` always matches the session identity's email; both views
/// are built from the same [`UserRecord`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthUserView {
    pub profile: UserProfile,
    pub role: String,
}

/// Derive a generated-avatar URL from the user's name.
///
/// Pure derivation, computed on demand rather than stored, so it can never
/// go stale when names change.
pub fn avatar_url(first_name: &str, last_name: &str) -> String {
    let name = format!("{} {}", first_name.trim(), last_name.trim());
    let query = url::form_urlencoded::Serializer::new(String::new())
        .append_pair("name", name.trim())
        .append_pair("background", "random")
        .finish();
    format!("https://ui-avatars.com/api/?{}", query)
}

impl From<&UserRecord> for SessionIdentity {
    fn from(record: &UserRecord) -> Self {
        Self {
            id: record.id.to_string(),
            email: record.email.clone(),
        }
    }
}

impl From<&UserRecord> for AuthUserView {
    fn from(record: &UserRecord) -> Self {
        Self {
            profile: UserProfile {
                first_name: record.first_name.clone(),
                last_name: record.last_name.clone(),
                email: record.email.clone(),
                avatar_url: avatar_url(&record.first_name, &record.last_name),
            },
            role: record.role.clone(),
        }
    }
}
