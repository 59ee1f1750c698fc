//! Auth service.

use async_trait::async_trait;
use mockall::automock;
use tracing::{info, warn};
use uuid::Uuid;

use crate::{
    auth::{
        ApiTokenVersion, AuthServiceError, IssuedApiToken, format_api_token,
        generate_api_token_secret,
        models::{AdminRecord, AdminUuid, NewApiToken},
        parse_api_token,
        repository::PgAuthRepository,
        token_verifier, verifiers_match,
    },
    database::Db,
};

#[derive(Debug, Clone)]
pub struct PgAuthService {
    db: Db,
    repository: PgAuthRepository,
}

impl PgAuthService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgAuthRepository::new(),
        }
    }

    /// Create an admin and issue their first API token.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is blank or the database insert fails.
    #[tracing::instrument(name = "auth.service.create_admin", skip(self), err)]
    pub async fn create_admin(
        &self,
        name: &str,
    ) -> Result<(AdminRecord, IssuedApiToken), AuthServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let admin = self
            .repository
            .create_admin(&mut tx, AdminUuid::new(), name.trim())
            .await?;

        let issued = self.insert_api_token(&mut tx, admin.uuid).await?;

        tx.commit().await?;

        info!(admin_uuid = %admin.uuid, "created admin");

        Ok((admin, issued))
    }

    /// Issue an additional API token for an existing admin.
    ///
    /// # Errors
    ///
    /// Returns [`AuthServiceError::AdminNotFound`] for unknown admins.
    pub async fn issue_api_token(
        &self,
        admin: AdminUuid,
    ) -> Result<IssuedApiToken, AuthServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let issued = self.insert_api_token(&mut tx, admin).await?;

        tx.commit().await?;

        Ok(issued)
    }

    /// Revoke an API token by id.
    ///
    /// Returns `false` if no active token matched.
    ///
    /// # Errors
    ///
    /// Returns an error if the database update fails.
    pub async fn revoke_api_token(&self, token_uuid: Uuid) -> Result<bool, AuthServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let rows_affected = self.repository.revoke_api_token(&mut tx, token_uuid).await?;

        tx.commit().await?;

        Ok(rows_affected > 0)
    }

    async fn insert_api_token(
        &self,
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        admin: AdminUuid,
    ) -> Result<IssuedApiToken, AuthServiceError> {
        let token_uuid = Uuid::now_v7();
        let version = ApiTokenVersion::V1;
        let secret = generate_api_token_secret();
        let token = format_api_token(token_uuid, version, &secret);

        let metadata = self
            .repository
            .create_api_token(
                tx,
                NewApiToken {
                    uuid: token_uuid,
                    admin_uuid: admin,
                    version,
                    token_hash: token_verifier(&token_uuid, version, &admin, &secret),
                },
            )
            .await?;

        Ok(IssuedApiToken { token, metadata })
    }
}

#[async_trait]
impl AuthService for PgAuthService {
    async fn authenticate_bearer(&self, bearer_token: &str) -> Result<AdminUuid, AuthServiceError> {
        let parsed_token = parse_api_token(bearer_token).map_err(|_| AuthServiceError::NotFound)?;

        let mut tx = self.db.begin_transaction().await?;

        let token = self
            .repository
            .find_active_api_token(&mut tx, parsed_token.token_uuid, parsed_token.version)
            .await?
            .ok_or(AuthServiceError::NotFound)?;

        let verifier = token_verifier(
            &parsed_token.token_uuid,
            parsed_token.version,
            &token.admin_uuid,
            &parsed_token.secret,
        );

        if token.version != parsed_token.version || !verifiers_match(&token.token_hash, &verifier)
        {
            return Err(AuthServiceError::NotFound);
        }

        // Last-used tracking must not fail an otherwise valid request.
        if let Err(error) = self
            .repository
            .touch_api_token(&mut tx, parsed_token.token_uuid)
            .await
        {
            warn!(%error, "failed to record api token use");
        }

        tx.commit().await?;

        Ok(token.admin_uuid)
    }
}

#[automock]
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Resolve a raw bearer token to the admin that owns it.
    async fn authenticate_bearer(&self, bearer_token: &str) -> Result<AdminUuid, AuthServiceError>;
}
