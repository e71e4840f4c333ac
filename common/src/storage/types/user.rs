use crate::{error::AppError, storage::db::SurrealDbClient, stored_object};
use async_trait::async_trait;
use axum_session_auth::Authentication;
use surrealdb::{engine::any::Any, Surreal};
use tracing::{info, warn};
use uuid::Uuid;

use super::system_settings::SystemSettings;

stored_object!(User, "users", {
    username: String,
    password: String,
    #[serde(default)]
    anonymous: bool
});

#[async_trait]
impl Authentication<User, String, Surreal<Any>> for User {
    async fn load_user(userid: String, db: Option<&Surreal<Any>>) -> Result<User, anyhow::Error> {
        let db = db.ok_or_else(|| anyhow::anyhow!("No database handle for session auth"))?;
        let user: Option<User> = db.select((Self::table_name(), userid.as_str())).await?;
        user.ok_or_else(|| anyhow::anyhow!("User {userid} not found"))
    }

    fn is_authenticated(&self) -> bool {
        !self.anonymous
    }

    fn is_active(&self) -> bool {
        !self.anonymous
    }

    fn is_anonymous(&self) -> bool {
        self.anonymous
    }
}

impl User {
    /// Registers a new user.
    ///
    /// Returns `Ok(None)` when the username is already taken. The password is
    /// hashed with argon2 inside the database and never stored as given.
    pub async fn create_new(
        username: String,
        password: String,
        db: &SurrealDbClient,
    ) -> Result<Option<Self>, AppError> {
        let settings = SystemSettings::get_current(db).await?;
        if !settings.registrations_enabled {
            return Err(AppError::Auth("Registration is not allowed".into()));
        }

        if Self::find_by_username(&username, db).await?.is_some() {
            info!(%username, "Registration rejected, username already exists");
            return Ok(None);
        }

        let id = Uuid::new_v4().to_string();

        let created: Result<Option<User>, surrealdb::Error> = db
            .client
            .query(
                "CREATE type::thing('users', $id) SET
                    username = $username,
                    password = crypto::argon2::generate($password),
                    anonymous = false,
                    created_at = time::now(),
                    updated_at = time::now()",
            )
            .bind(("id", id))
            .bind(("username", username.clone()))
            .bind(("password", password))
            .await?
            .take(0);

        match created {
            Ok(user) => Ok(user),
            // A concurrent registration may win the unique index between the
            // lookup and the insert.
            Err(err) => {
                if Self::find_by_username(&username, db).await?.is_some() {
                    warn!(%username, "Registration lost race on unique username");
                    Ok(None)
                } else {
                    Err(AppError::from(err))
                }
            }
        }
    }

    /// Returns the user when the credentials match, `None` otherwise.
    pub async fn authenticate(
        username: &str,
        password: &str,
        db: &SurrealDbClient,
    ) -> Result<Option<Self>, AppError> {
        let user: Option<User> = db
            .client
            .query(
                "SELECT * FROM type::table($table)
                WHERE username = $username
                AND crypto::argon2::compare(password, $password)
                LIMIT 1",
            )
            .bind(("table", Self::table_name()))
            .bind(("username", username.to_owned()))
            .bind(("password", password.to_owned()))
            .await?
            .take(0)?;

        Ok(user)
    }

    pub async fn find_by_username(
        username: &str,
        db: &SurrealDbClient,
    ) -> Result<Option<Self>, AppError> {
        let user: Option<User> = db
            .client
            .query("SELECT * FROM type::table($table) WHERE username = $username LIMIT 1")
            .bind(("table", Self::table_name()))
            .bind(("username", username.to_owned()))
            .await?
            .take(0)?;

        Ok(user)
    }
}
