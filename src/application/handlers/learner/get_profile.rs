//! GetProfileHandler - Query handler that auto-provisions user profiles.

use std::sync::Arc;

use crate::domain::catalog::CatalogError;
use crate::domain::foundation::AuthenticatedUser;
use crate::domain::learner::User;
use crate::ports::UserRepository;

/// Query carrying the validated identity claims of the caller.
#[derive(Debug, Clone)]
pub struct GetProfileQuery {
    pub caller: AuthenticatedUser,
}

/// Handler returning the caller's profile.
///
/// Profiles mirror identity-provider claims and are created lazily: the
/// first authenticated contact writes the mirror row. There is no user
/// signup flow anywhere in this service.
pub struct GetProfileHandler {
    users: Arc<dyn UserRepository>,
}

impl GetProfileHandler {
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self { users }
    }

    pub async fn handle(&self, query: GetProfileQuery) -> Result<User, CatalogError> {
        if let Some(user) = self.users.find_by_id(&query.caller.id).await? {
            return Ok(user);
        }

        let user = User::from_claims(
            query.caller.id,
            query.caller.display_name.unwrap_or_default(),
            query.caller.email,
            query.caller.image_url,
        );
        self.users.upsert(&user).await?;

        tracing::info!(user_id = %user.id, "user profile auto-provisioned");
        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::test_support::InMemoryUserRepository;
    use crate::domain::foundation::{UserId, UserRole};

    fn caller() -> AuthenticatedUser {
        AuthenticatedUser {
            id: UserId::new("user_new").unwrap(),
            email: "new@example.com".to_string(),
            display_name: Some("Newcomer".to_string()),
            image_url: None,
            role: UserRole::Student,
        }
    }

    #[tokio::test]
    async fn first_contact_creates_profile() {
        let repo = Arc::new(InMemoryUserRepository::new());
        let handler = GetProfileHandler::new(repo.clone());

        let user = handler.handle(GetProfileQuery { caller: caller() }).await.unwrap();

        assert_eq!(user.name, "Newcomer");
        assert!(repo.get(&user.id).is_some());
    }

    #[tokio::test]
    async fn existing_profile_is_returned_unchanged() {
        let mut existing = User::from_claims(
            UserId::new("user_new").unwrap(),
            "Original Name",
            "new@example.com",
            None,
        );
        existing.enroll(crate::domain::foundation::CourseId::new());
        let repo = Arc::new(InMemoryUserRepository::with(vec![existing]));
        let handler = GetProfileHandler::new(repo);

        let user = handler.handle(GetProfileQuery { caller: caller() }).await.unwrap();

        // Stored profile wins over fresh claims.
        assert_eq!(user.name, "Original Name");
        assert_eq!(user.enrolled_courses.len(), 1);
    }

    #[tokio::test]
    async fn blank_display_name_falls_back() {
        let repo = Arc::new(InMemoryUserRepository::new());
        let handler = GetProfileHandler::new(repo);
        let mut anon = caller();
        anon.display_name = None;

        let user = handler.handle(GetProfileQuery { caller: anon }).await.unwrap();
        assert_eq!(user.name, "User");
    }
}
