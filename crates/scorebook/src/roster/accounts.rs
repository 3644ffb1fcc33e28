use std::sync::LazyLock;

use ledger::{IdSet, Snapshot, User};
use regex::Regex;

use super::{new_id, PublicUser, Roster, MIN_PASSWORD_LEN};
use crate::error::{Error, Result};

/// Registration input. Every field is optional here so the roster decides what
/// "missing" means; values are trimmed before validation.
#[derive(Debug, Clone, Default)]
pub struct NewAccount {
    pub email: Option<String>,
    pub password: Option<String>,
    pub username: Option<String>,
    pub display_name: Option<String>,
}

impl Roster {
    pub async fn register(&self, account: NewAccount) -> Result<PublicUser> {
        let email = trimmed(account.email).to_lowercase();
        let password = trimmed(account.password);
        let username = trimmed(account.username);
        let display_name = Some(trimmed(account.display_name))
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| username.clone());

        if email.is_empty() || password.is_empty() || username.is_empty() {
            return Err(Error::validation(
                "email, password and username are required",
            ));
        }
        if !is_valid_email(&email) {
            return Err(Error::validation("invalid email format"));
        }
        if password.chars().count() < MIN_PASSWORD_LEN {
            return Err(Error::validation(format!(
                "password must be at least {MIN_PASSWORD_LEN} characters"
            )));
        }

        // Cheap rejection before paying for a hash; repeated under the write lock
        self.read(|graph| check_unique(graph, &email, &username))?;
        let password_hash = self.hash_password(password).await?;

        self.mutate(|graph| {
            check_unique(graph, &email, &username)?;
            let user = User {
                user_id: new_id(),
                email,
                password_hash,
                username,
                display_name,
                team_ids: IdSet::new(),
            };
            tracing::info!(user_id = %user.user_id, username = %user.username, "Account registered");
            let view = PublicUser::from(&user);
            graph.users.insert(user.user_id.clone(), user);
            Ok(view)
        })
        .await
    }

    /// Check an email/password pair. Never mutates.
    pub async fn login(&self, email: Option<String>, password: Option<String>) -> Result<PublicUser> {
        let email = trimmed(email).to_lowercase();
        let password = trimmed(password);
        if email.is_empty() || password.is_empty() {
            return Err(Error::validation("email and password required"));
        }

        let (user, hash) = self.read(|graph| {
            graph
                .users
                .values()
                .find(|user| user.email.to_lowercase() == email)
                .map(|user| (PublicUser::from(user), user.password_hash.clone()))
                .ok_or_else(Error::invalid_credentials)
        })?;

        if verify_hash(password, hash).await? {
            Ok(user)
        } else {
            Err(Error::invalid_credentials())
        }
    }

    /// The password guard run ahead of every authenticated operation.
    ///
    /// A missing or blank password is a validation error; a wrong password or
    /// an unknown user is an auth error.
    pub async fn verify_password(&self, user_id: &str, password: Option<&str>) -> Result<()> {
        let password = password.map(str::trim).unwrap_or_default();
        if password.is_empty() {
            return Err(Error::validation("password is required in request body"));
        }

        let hash = self.read(|graph| {
            graph
                .users
                .get(user_id)
                .map(|user| user.password_hash.clone())
                .ok_or_else(Error::invalid_password)
        })?;

        if verify_hash(password.to_string(), hash).await? {
            Ok(())
        } else {
            Err(Error::invalid_password())
        }
    }

    pub async fn change_password(&self, user_id: &str, new_password: Option<String>) -> Result<()> {
        let new_password = trimmed(new_password);
        if new_password.is_empty() {
            return Err(Error::validation("newPassword is required"));
        }
        if new_password.chars().count() < MIN_PASSWORD_LEN {
            return Err(Error::validation(format!(
                "newPassword must be at least {MIN_PASSWORD_LEN} characters"
            )));
        }

        let password_hash = self.hash_password(new_password).await?;
        self.mutate(|graph| {
            let user = graph.users.get_mut(user_id).ok_or_else(Error::user_not_found)?;
            user.password_hash = password_hash;
            tracing::info!(user_id = %user_id, "Password changed");
            Ok(())
        })
        .await
    }

    pub async fn change_display_name(
        &self,
        user_id: &str,
        display_name: Option<String>,
    ) -> Result<PublicUser> {
        let display_name = trimmed(display_name);
        if display_name.is_empty() {
            return Err(Error::validation("displayName is required"));
        }

        self.mutate(|graph| {
            let user = graph.users.get_mut(user_id).ok_or_else(Error::user_not_found)?;
            user.display_name = display_name;
            Ok(PublicUser::from(&*user))
        })
        .await
    }

    /// Remove the account record.
    ///
    /// Teams owned by the account are left in place with a dangling owner.
    pub async fn delete_account(&self, user_id: &str) -> Result<()> {
        self.mutate(|graph| {
            let user = graph.users.remove(user_id).ok_or_else(Error::user_not_found)?;
            if !user.team_ids.is_empty() {
                tracing::warn!(
                    user_id = %user_id,
                    orphaned_teams = user.team_ids.len(),
                    "Account deleted with teams still attached"
                );
            } else {
                tracing::info!(user_id = %user_id, "Account deleted");
            }
            Ok(())
        })
        .await
    }

    pub fn public_user(&self, user_id: &str) -> Result<PublicUser> {
        self.read(|graph| {
            graph
                .users
                .get(user_id)
                .map(PublicUser::from)
                .ok_or_else(Error::user_not_found)
        })
    }

    async fn hash_password(&self, password: String) -> Result<String> {
        let cost = self.hash_cost;
        tokio::task::spawn_blocking(move || bcrypt::hash(password, cost))
            .await
            .map_err(|e| Error::Internal(format!("hash task failed: {e}")))?
            .map_err(|e| Error::Internal(format!("password hashing failed: {e}")))
    }
}

/// Compare against a stored hash. A malformed hash is a mismatch, not a failure.
async fn verify_hash(password: String, hash: String) -> Result<bool> {
    tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash).unwrap_or(false))
        .await
        .map_err(|e| Error::Internal(format!("verify task failed: {e}")))
}

fn check_unique(graph: &Snapshot, email: &str, username: &str) -> Result<()> {
    if graph.users.values().any(|user| user.email.to_lowercase() == email) {
        return Err(Error::Conflict("email already in use".to_string()));
    }
    if graph.users.values().any(|user| user.username == username) {
        return Err(Error::Conflict("username already in use".to_string()));
    }
    Ok(())
}

fn trimmed(value: Option<String>) -> String {
    value.map(|v| v.trim().to_string()).unwrap_or_default()
}

/// `local@domain.tld`: one `@`, no whitespace, and a dot inside the domain.
static EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("email pattern compiles")
});

fn is_valid_email(email: &str) -> bool {
    EMAIL.is_match(email)
}
