//! BecomeEducatorHandler - Command handler for role promotion.

use std::sync::Arc;

use crate::domain::catalog::CatalogError;
use crate::domain::foundation::UserId;
use crate::ports::IdentityAdmin;

/// Command to promote the caller to educator.
#[derive(Debug, Clone)]
pub struct BecomeEducatorCommand {
    pub user_id: UserId,
}

/// Handler that assigns the educator role at the identity provider.
///
/// The role lives in provider metadata, not local storage; it shows up
/// in the caller's claims on their next token.
pub struct BecomeEducatorHandler {
    identity: Arc<dyn IdentityAdmin>,
}

impl BecomeEducatorHandler {
    pub fn new(identity: Arc<dyn IdentityAdmin>) -> Self {
        Self { identity }
    }

    pub async fn handle(&self, cmd: BecomeEducatorCommand) -> Result<(), CatalogError> {
        self.identity.assign_educator_role(&cmd.user_id).await?;
        tracing::info!(user_id = %cmd.user_id, "educator role assigned");
        Ok(())
    }
}
