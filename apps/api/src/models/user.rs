use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identity as yielded by the auth provider, or minted locally for guest
/// mode. Cloud callers pass their provider `uid`; guests get a synthetic
/// one that only ever maps to the local store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub uid: String,
    pub display_name: Option<String>,
    pub email: Option<String>,
    #[serde(rename = "photoURL")]
    pub photo_url: Option<String>,
    #[serde(default)]
    pub is_guest: bool,
}

impl UserProfile {
    /// Mints a synthetic guest identity with a random uid.
    pub fn guest() -> Self {
        UserProfile {
            uid: format!("guest-{}", Uuid::new_v4()),
            display_name: Some("Guest".to_string()),
            email: None,
            photo_url: None,
            is_guest: true,
        }
    }
}
