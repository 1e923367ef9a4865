use std::sync::Arc;

use crate::database::Database;
use crate::error::{AppError, AppResult};
use crate::models::User;
use crate::validation::{NewUser, UserPatch};

use super::is_unique_violation;

/// Wallet-based identity: verification, registration, profile updates.
/// Addresses are case-folded here so the store only ever sees lowercase.
#[derive(Clone)]
pub struct UserService {
    db: Arc<Database>,
}

impl UserService {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// Looks up a wallet; absence is a normal outcome, not an error.
    pub async fn verify_user(&self, wallet_address: &str) -> AppResult<Option<User>> {
        let user = self.db.find_user(&wallet_address.to_lowercase()).await?;
        Ok(user)
    }

    /// Registers a wallet. A second registration for the same address is an
    /// explicit conflict, driven by the users primary key.
    pub async fn create_user(&self, mut new_user: NewUser) -> AppResult<User> {
        new_user.wallet_address = new_user.wallet_address.to_lowercase();

        match self.db.insert_user(&new_user).await {
            Ok(user) => {
                tracing::info!(wallet = %user.wallet_address, "user registered");
                Ok(user)
            }
            Err(err) if is_unique_violation(&err) => Err(AppError::UserAlreadyExists),
            Err(err) => Err(err.into()),
        }
    }

    /// Merges the provided fields over the existing row. Never creates a row:
    /// an unknown wallet is a 404.
    pub async fn update_user(&self, wallet_address: &str, patch: UserPatch) -> AppResult<User> {
        let wallet = wallet_address.to_lowercase();
        let mut user = self
            .db
            .find_user(&wallet)
            .await?
            .ok_or(AppError::UserNotFound)?;

        if let Some(username) = patch.username {
            user.username = Some(username);
        }
        if let Some(bio) = patch.bio {
            user.bio = Some(bio);
        }
        if let Some(url) = patch.profile_pic_url {
            user.profile_pic_url = Some(url);
        }

        let saved = self.db.save_user(&user).await?;
        Ok(saved)
    }
}
