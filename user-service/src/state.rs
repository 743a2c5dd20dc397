//! Application state management

use std::sync::Arc;

use crate::{
    config::Config,
    database,
    error::Result,
    middleware::{CredentialVerifier, SharedSecretVerifier},
    repository::{InMemoryUserRepository, PgUserRepository, UserRepository},
};

/// Application state shared across handlers
///
/// Cloning is cheap; every field is reference counted.
#[derive(Clone)]
pub struct AppState {
    config: Arc<Config>,
    users: Arc<dyn UserRepository>,
    verifier: Arc<dyn CredentialVerifier>,
}

impl AppState {
    /// Create a new builder for AppState
    pub fn builder() -> AppStateBuilder {
        AppStateBuilder::new()
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// User persistence backend
    pub fn users(&self) -> &dyn UserRepository {
        self.users.as_ref()
    }

    /// Credential check for guarded routes
    pub fn verifier(&self) -> &dyn CredentialVerifier {
        self.verifier.as_ref()
    }
}

/// Builder for AppState
#[derive(Default)]
pub struct AppStateBuilder {
    config: Option<Config>,
    users: Option<Arc<dyn UserRepository>>,
    verifier: Option<Arc<dyn CredentialVerifier>>,
}

impl AppStateBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the configuration
    pub fn config(mut self, config: Config) -> Self {
        self.config = Some(config);
        self
    }

    /// Use an explicit repository instead of the one the config describes
    pub fn users(mut self, users: Arc<dyn UserRepository>) -> Self {
        self.users = Some(users);
        self
    }

    /// Use an explicit credential verifier
    pub fn verifier(mut self, verifier: Arc<dyn CredentialVerifier>) -> Self {
        self.verifier = Some(verifier);
        self
    }

    /// Build the AppState, connecting to the database as needed
    ///
    /// - No repository given and `[database]` configured: connect to
    ///   PostgreSQL and create the schema, failing fast on error
    /// - No repository and no `[database]`: in-memory storage
    /// - No verifier given: shared secret from `[auth] delete_token`
    pub async fn build(self) -> Result<AppState> {
        let config = self.config.unwrap_or_default();

        let users: Arc<dyn UserRepository> = match (self.users, &config.database) {
            (Some(users), _) => users,
            (None, Some(db_config)) => {
                let pool = database::create_pool(db_config).await?;
                database::ensure_schema(&pool).await?;
                Arc::new(PgUserRepository::new(pool))
            }
            (None, None) => {
                tracing::warn!("No database configured; users are kept in memory");
                Arc::new(InMemoryUserRepository::new())
            }
        };

        let verifier = self.verifier.unwrap_or_else(|| {
            let verifier = SharedSecretVerifier::new(config.auth.delete_token.clone());
            if !verifier.is_configured() {
                tracing::warn!("No delete token configured; DELETE /user/{{id}} rejects all requests");
            }
            Arc::new(verifier)
        });

        Ok(AppState {
            config: Arc::new(config),
            users,
            verifier,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AuthConfig;

    #[tokio::test]
    async fn test_build_without_database_uses_memory() {
        let state = AppState::builder().build().await.unwrap();
        assert_eq!(state.users().count().await.unwrap(), 0);
        assert!(state.users().ping().await.is_ok());
    }

    #[tokio::test]
    async fn test_verifier_comes_from_auth_config() {
        let config = Config {
            auth: AuthConfig {
                delete_token: Some("open-sesame".to_string()),
            },
            ..Config::default()
        };

        let state = AppState::builder().config(config).build().await.unwrap();
        assert!(state.verifier().verify("open-sesame").is_ok());
        assert!(state.verifier().verify("nope").is_err());
    }
}
