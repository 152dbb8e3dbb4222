use std::sync::Arc;

use domains::{validate, AppError, NewUser, Result, User, UserRepository};
use serde_json::Value;

use crate::{read_failure, write_failure};

#[derive(Clone)]
pub struct UserService {
    repo: Arc<dyn UserRepository>,
}

impl UserService {
    pub fn new(repo: Arc<dyn UserRepository>) -> Self {
        Self { repo }
    }

    #[tracing::instrument(name = "users.create", skip_all)]
    pub async fn create(&self, payload: &Value) -> Result<User> {
        let new_user = validate::<NewUser>(payload).map_err(AppError::ValidationFailed)?;
        let user = self.repo.create_user(new_user).await.map_err(write_failure)?;
        tracing::info!(user_id = %user.id, "user created");
        Ok(user)
    }

    #[tracing::instrument(name = "users.list", skip_all)]
    pub async fn list(&self) -> Result<Vec<User>> {
        self.repo.list_users().await.map_err(read_failure)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domains::{MockUserRepository, StorageError, UserId};
    use serde_json::json;

    #[tokio::test]
    async fn invalid_payload_never_reaches_the_repository() {
        let mut repo = MockUserRepository::new();
        repo.expect_create_user().never();
        let service = UserService::new(Arc::new(repo));

        let err = service.create(&json!({ "email": "x@y.io" })).await.unwrap_err();
        assert!(matches!(err, AppError::ValidationFailed(v) if v.touches("name")));
    }

    #[tokio::test]
    async fn creates_user_from_valid_payload() {
        let mut repo = MockUserRepository::new();
        repo.expect_create_user()
            .withf(|u| u.name == "Carla" && u.email == "carla@example.com")
            .times(1)
            .returning(|u| {
                Ok(User {
                    id: UserId::new(1),
                    name: u.name,
                    email: u.email,
                })
            });
        let service = UserService::new(Arc::new(repo));

        let user = service
            .create(&json!({ "name": "Carla", "email": "carla@example.com" }))
            .await
            .unwrap();
        assert_eq!(user.id, UserId::new(1));
    }

    #[tokio::test]
    async fn list_failure_is_a_read_failure() {
        let mut repo = MockUserRepository::new();
        repo.expect_list_users()
            .returning(|| Err(StorageError::Query("relation \"users\" does not exist".into())));
        let service = UserService::new(Arc::new(repo));

        let err = tokio_test::assert_err!(service.list().await);
        assert!(matches!(
            err,
            AppError::StorageFailure { access: domains::Access::Read, .. }
        ));
    }
}
