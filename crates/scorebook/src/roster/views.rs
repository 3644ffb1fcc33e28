use ledger::{IdSet, User};
use serde::Serialize;

/// A user as seen by clients: everything except the password hash.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicUser {
    pub user_id: String,
    pub email: String,
    pub username: String,
    pub display_name: String,
    pub team_ids: IdSet,
}

impl From<&User> for PublicUser {
    fn from(user: &User) -> Self {
        Self {
            user_id: user.user_id.clone(),
            email: user.email.clone(),
            username: user.username.clone(),
            display_name: user.display_name.clone(),
            team_ids: user.team_ids.clone(),
        }
    }
}
