use std::sync::Arc;

use serde_json::Value;
use tokio::sync::Mutex;
use tracing::{info, instrument};

use crate::data::user_repository::UserRepository;
use crate::domain::error::ApiError;
use crate::domain::user::{self, User, UserPatch};
use crate::domain::validation;

/// Implements the resource lifecycle over an injected store. Stateless per
/// request: every operation rebuilds its view of the collection from the
/// store. Mutations hold `write_lock` across the whole load-mutate-save
/// cycle so two racing writers cannot overwrite each other's changes.
#[derive(Clone)]
pub struct UserService<R: UserRepository + 'static> {
    repo: Arc<R>,
    write_lock: Arc<Mutex<()>>,
}

impl<R> UserService<R>
where
    R: UserRepository + 'static,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self {
            repo,
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    pub async fn list(&self) -> Vec<User> {
        self.repo.load().await
    }

    pub async fn get(&self, id: u64) -> Result<User, ApiError> {
        self.repo
            .load()
            .await
            .into_iter()
            .find(|u| u.id == id)
            .ok_or(ApiError::UserNotFound(id))
    }

    #[instrument(skip(self, payload))]
    pub async fn create(&self, payload: Value) -> Result<User, ApiError> {
        let report = validation::validate(&payload, false);
        if !report.valid {
            return Err(ApiError::Validation(report.errors));
        }

        let _guard = self.write_lock.lock().await;
        let mut users = self.repo.load().await;

        // Full-mode validation guarantees name and email are present.
        let patch = UserPatch::from_payload(&payload);
        let name = patch.name.unwrap_or_default();
        let email = patch.email.unwrap_or_default();

        let normalized = user::normalize_email(&email);
        if users.iter().any(|u| u.email.eq_ignore_ascii_case(&normalized)) {
            return Err(ApiError::EmailTaken);
        }

        let record = User::new(user::next_id(&users), &name, &email, patch.age);
        users.push(record.clone());
        if !self.repo.save(&users).await {
            return Err(ApiError::SaveFailed("could not save user"));
        }

        info!(user_id = record.id, email = %record.email, "user created");
        Ok(record)
    }

    #[instrument(skip(self, payload))]
    pub async fn update(&self, id: u64, payload: Value) -> Result<User, ApiError> {
        let _guard = self.write_lock.lock().await;
        let mut users = self.repo.load().await;
        let idx = users
            .iter()
            .position(|u| u.id == id)
            .ok_or(ApiError::UserNotFound(id))?;

        let report = validation::validate(&payload, true);
        if !report.valid {
            return Err(ApiError::Validation(report.errors));
        }

        let patch = UserPatch::from_payload(&payload);
        if let Some(email) = &patch.email {
            let normalized = user::normalize_email(email);
            if users
                .iter()
                .any(|u| u.id != id && u.email.eq_ignore_ascii_case(&normalized))
            {
                return Err(ApiError::EmailTakenByOther);
            }
        }

        users[idx].apply(patch);
        let record = users[idx].clone();
        if !self.repo.save(&users).await {
            return Err(ApiError::SaveFailed("could not save the update"));
        }

        info!(user_id = id, "user updated");
        Ok(record)
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: u64) -> Result<User, ApiError> {
        let _guard = self.write_lock.lock().await;
        let mut users = self.repo.load().await;
        let idx = users
            .iter()
            .position(|u| u.id == id)
            .ok_or(ApiError::UserNotFound(id))?;

        let removed = users.remove(idx);
        if !self.repo.save(&users).await {
            return Err(ApiError::DeleteFailed);
        }

        info!(user_id = id, "user deleted");
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::user_repository::InMemoryUserRepository;
    use async_trait::async_trait;
    use serde_json::json;

    /// Store whose writes always fail, for exercising persistence errors.
    struct RejectingStore {
        seed: Vec<User>,
    }

    #[async_trait]
    impl UserRepository for RejectingStore {
        async fn load(&self) -> Vec<User> {
            self.seed.clone()
        }

        async fn save(&self, _users: &[User]) -> bool {
            false
        }
    }

    fn service() -> UserService<InMemoryUserRepository> {
        UserService::new(Arc::new(InMemoryUserRepository::default()))
    }

    #[tokio::test]
    async fn create_assigns_ids_from_one_past_the_max() {
        let svc = service();

        let ana = svc
            .create(json!({ "name": "Ana Ruiz", "email": "ana@example.com" }))
            .await
            .unwrap();
        let bo = svc
            .create(json!({ "name": "Bo Liu", "email": "bo@example.com" }))
            .await
            .unwrap();
        assert_eq!(ana.id, 1);
        assert_eq!(bo.id, 2);

        // Freeing the highest id makes it assignable again.
        svc.delete(2).await.unwrap();
        let cy = svc
            .create(json!({ "name": "Cy Okafor", "email": "cy@example.com" }))
            .await
            .unwrap();
        assert_eq!(cy.id, 2);
    }

    #[tokio::test]
    async fn create_normalizes_and_fills_server_side_fields() {
        let svc = service();
        let user = svc
            .create(json!({ "name": "  Ana Ruiz ", "email": "ANA@Example.com" }))
            .await
            .unwrap();

        assert_eq!(user.name, "Ana Ruiz");
        assert_eq!(user.email, "ana@example.com");
        assert_eq!(user.age, None);
        assert!(user.active);
        assert!(user.updated_at.is_none());
    }

    #[tokio::test]
    async fn create_rejects_duplicate_email_case_insensitively() {
        let svc = service();
        svc.create(json!({ "name": "Ana Ruiz", "email": "ANA@Example.com" }))
            .await
            .unwrap();

        let err = svc
            .create(json!({ "name": "Xa Yi", "email": "ana@example.com" }))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::EmailTaken));
    }

    #[tokio::test]
    async fn create_collects_all_validation_errors() {
        let svc = service();
        let err = svc.create(json!({ "age": 300 })).await.unwrap_err();

        match err {
            ApiError::Validation(errors) => assert_eq!(errors.len(), 3),
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn create_surfaces_a_failed_save() {
        let svc = UserService::new(Arc::new(RejectingStore { seed: Vec::new() }));
        let err = svc
            .create(json!({ "name": "Ana Ruiz", "email": "ana@example.com" }))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::SaveFailed(_)));
    }

    #[tokio::test]
    async fn get_returns_the_created_record_and_is_idempotent() {
        let svc = service();
        let created = svc
            .create(json!({ "name": "Ana Ruiz", "email": "ana@example.com", "age": 30 }))
            .await
            .unwrap();

        let first = svc.get(created.id).await.unwrap();
        let second = svc.get(created.id).await.unwrap();
        assert_eq!(
            serde_json::to_value(&first).unwrap(),
            serde_json::to_value(&second).unwrap()
        );
        assert_eq!(first.name, "Ana Ruiz");
        assert_eq!(first.age, Some(30));
    }

    #[tokio::test]
    async fn get_unknown_id_is_not_found() {
        let err = service().get(999).await.unwrap_err();
        assert!(matches!(err, ApiError::UserNotFound(999)));
    }

    #[tokio::test]
    async fn update_changes_only_supplied_fields_and_stamps_updated_at() {
        let svc = service();
        let created = svc
            .create(json!({ "name": "Ana Ruiz", "email": "ana@example.com" }))
            .await
            .unwrap();

        let updated = svc.update(created.id, json!({ "age": 30 })).await.unwrap();

        assert_eq!(updated.name, "Ana Ruiz");
        assert_eq!(updated.email, "ana@example.com");
        assert_eq!(updated.age, Some(30));
        assert_eq!(updated.created_at, created.created_at);
        assert!(updated.updated_at.is_some());
    }

    #[tokio::test]
    async fn update_with_out_of_range_age_leaves_the_record_unchanged() {
        let svc = service();
        let created = svc
            .create(json!({ "name": "Ana Ruiz", "email": "ana@example.com" }))
            .await
            .unwrap();

        let err = svc.update(created.id, json!({ "age": 150 })).await.unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));

        let current = svc.get(created.id).await.unwrap();
        assert_eq!(current.age, None);
        assert!(current.updated_at.is_none());
    }

    #[tokio::test]
    async fn update_rejects_another_users_email_but_allows_reasserting_own() {
        let svc = service();
        svc.create(json!({ "name": "Ana Ruiz", "email": "ana@example.com" }))
            .await
            .unwrap();
        let bo = svc
            .create(json!({ "name": "Bo Liu", "email": "bo@example.com" }))
            .await
            .unwrap();

        let err = svc
            .update(bo.id, json!({ "email": "ANA@example.com" }))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::EmailTakenByOther));

        let ok = svc
            .update(bo.id, json!({ "email": "BO@example.com" }))
            .await
            .unwrap();
        assert_eq!(ok.email, "bo@example.com");
    }

    #[tokio::test]
    async fn update_checks_existence_before_validating() {
        let err = service().update(42, json!({ "age": 900 })).await.unwrap_err();
        assert!(matches!(err, ApiError::UserNotFound(42)));
    }

    #[tokio::test]
    async fn delete_removes_the_record_and_returns_it() {
        let svc = service();
        let created = svc
            .create(json!({ "name": "Ana Ruiz", "email": "ana@example.com" }))
            .await
            .unwrap();

        let removed = svc.delete(created.id).await.unwrap();
        assert_eq!(removed.id, created.id);

        let err = svc.get(created.id).await.unwrap_err();
        assert!(matches!(err, ApiError::UserNotFound(_)));
    }

    #[tokio::test]
    async fn delete_surfaces_a_failed_save_as_delete_failed() {
        let svc = UserService::new(Arc::new(RejectingStore {
            seed: vec![User::new(1, "Ana Ruiz", "ana@example.com", None)],
        }));

        let err = svc.delete(1).await.unwrap_err();
        assert!(matches!(err, ApiError::DeleteFailed));
    }
}
