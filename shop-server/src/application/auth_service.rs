use std::sync::Arc;

use tracing::instrument;

use crate::data::user_repository::UserRepository;
use crate::domain::{error::DomainError, user::User};
use crate::infrastructure::security::{JwtKeys, hash_password, verify_password};

#[derive(Clone)]
pub struct AuthService<R: UserRepository + 'static> {
    repo: Arc<R>,
    keys: JwtKeys,
}

impl<R> AuthService<R>
where
    R: UserRepository + 'static,
{
    pub fn new(repo: Arc<R>, keys: JwtKeys) -> Self {
        Self { repo, keys }
    }

    pub fn keys(&self) -> &JwtKeys {
        &self.keys
    }

    #[instrument(skip(self, password))]
    pub async fn register(
        &self,
        name: String,
        email: String,
        password: String,
    ) -> Result<(User, String), DomainError> {
        let email = email.to_lowercase();
        if self.repo.find_by_email(&email).await?.is_some() {
            return Err(DomainError::DuplicateUser(email));
        }

        let hash =
            hash_password(&password).map_err(|err| DomainError::Internal(err.to_string()))?;
        let user = self.repo.create(User::new(name, email, hash)).await?;

        let token = self
            .keys
            .generate_token(user.id, &user.email)
            .map_err(|err| DomainError::Internal(err.to_string()))?;
        Ok((user, token))
    }

    #[instrument(skip(self, password))]
    pub async fn login(&self, email: &str, password: &str) -> Result<(User, String), DomainError> {
        // Unknown email and bad password collapse into the same error so the
        // response never reveals which one was wrong.
        let user = self
            .repo
            .find_by_email(&email.to_lowercase())
            .await?
            .ok_or(DomainError::InvalidCredentials)?;

        let valid = verify_password(password, &user.password_hash)
            .map_err(|_| DomainError::InvalidCredentials)?;
        if !valid {
            return Err(DomainError::InvalidCredentials);
        }

        let token = self
            .keys
            .generate_token(user.id, &user.email)
            .map_err(|err| DomainError::Internal(err.to_string()))?;
        Ok((user, token))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::memory::{MemStore, MemUserRepository};

    fn service() -> (AuthService<MemUserRepository>, Arc<MemStore>) {
        let store = Arc::new(MemStore::default());
        let repo = Arc::new(MemUserRepository(Arc::clone(&store)));
        (
            AuthService::new(repo, JwtKeys::new("test-secret".into())),
            store,
        )
    }

    #[tokio::test]
    async fn second_registration_with_same_email_is_rejected() {
        let (service, store) = service();

        service
            .register("Alice".into(), "alice@example.com".into(), "pw1".into())
            .await
            .unwrap();
        let err = service
            .register("Alice Again".into(), "Alice@Example.com".into(), "pw2".into())
            .await
            .unwrap_err();

        assert!(matches!(err, DomainError::DuplicateUser(_)));
        assert_eq!(store.users.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn login_token_claims_match_stored_user() {
        let (service, _store) = service();
        let (registered, _) = service
            .register("Alice".into(), "alice@example.com".into(), "hunter2".into())
            .await
            .unwrap();

        let (user, token) = service.login("alice@example.com", "hunter2").await.unwrap();
        assert_eq!(user.id, registered.id);

        let claims = service.keys().verify_token(&token).unwrap();
        assert_eq!(claims.sub, registered.id.to_string());
        assert_eq!(claims.email, "alice@example.com");
    }

    #[tokio::test]
    async fn wrong_password_and_unknown_email_return_the_same_error() {
        let (service, _store) = service();
        service
            .register("Alice".into(), "alice@example.com".into(), "hunter2".into())
            .await
            .unwrap();

        let bad_password = service
            .login("alice@example.com", "wrong")
            .await
            .unwrap_err();
        let unknown_email = service.login("bob@example.com", "hunter2").await.unwrap_err();

        assert!(matches!(bad_password, DomainError::InvalidCredentials));
        assert!(matches!(unknown_email, DomainError::InvalidCredentials));
    }

    #[tokio::test]
    async fn registration_stores_a_hash_not_the_password() {
        let (service, store) = service();
        service
            .register("Alice".into(), "alice@example.com".into(), "hunter2".into())
            .await
            .unwrap();

        let users = store.users.lock().unwrap();
        assert_ne!(users[0].password_hash, "hunter2");
        assert!(!users[0].password_hash.contains("hunter2"));
    }
}
