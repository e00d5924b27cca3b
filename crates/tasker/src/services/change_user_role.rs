use serde::{Deserialize, Serialize};
use tracing::info;

use blocks_core::{DomainResult, UseCase};

use crate::ports::UserRepository;
use crate::user::UserId;
use crate::value_objects::UserRole;

use super::not_found;

#[derive(Debug, Clone, Deserialize)]
pub struct ChangeUserRoleRequest {
    pub user_id: String,
    pub new_role: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChangeUserRoleResponse {
    pub user_id: UserId,
    pub previous_role: UserRole,
    pub new_role: UserRole,
}

/// Changes a user's role.
///
/// Failure modes, in the order they are checked: malformed id or unknown role
/// (validation), unknown user (`NOT_FOUND`), unchanged role (`ROLE_ALREADY_SET`),
/// concurrent modification (`CONCURRENT_MODIFICATION`).
pub struct ChangeUserRoleService<R> {
    users: R,
}

impl<R: UserRepository> ChangeUserRoleService<R> {
    pub fn new(users: R) -> Self {
        Self { users }
    }
}

impl<R: UserRepository> UseCase<ChangeUserRoleRequest, DomainResult<ChangeUserRoleResponse>>
    for ChangeUserRoleService<R>
{
    fn execute(&self, request: ChangeUserRoleRequest) -> DomainResult<ChangeUserRoleResponse> {
        let user_id: UserId = request.user_id.parse()?;
        let new_role = UserRole::parse(&request.new_role)?;

        let mut user = self
            .users
            .find_by_id(&user_id)?
            .ok_or_else(|| not_found("User", user_id))?;

        let previous_role = user.role();
        user.change_role(new_role)?;
        self.users.save(&mut user)?;

        info!(%user_id, %previous_role, %new_role, "user role changed");
        Ok(ChangeUserRoleResponse {
            user_id,
            previous_role,
            new_role,
        })
    }
}
