// User administration endpoints: accounts, roles, permissions.

use crate::client::BackofficeClient;
use crate::error::Error;
use crate::types::{
    ActiveFlag, PermissionDto, RoleAssignment, RoleCreate, RoleDto, UserCreate, UserDto,
    UserUpdate,
};

impl BackofficeClient {
    // ── Accounts ────────────────────────────────────────────────────

    pub async fn list_users(&self) -> Result<Vec<UserDto>, Error> {
        self.get("api/users").await
    }

    pub async fn get_user(&self, id: i64) -> Result<UserDto, Error> {
        self.get(&format!("api/users/{id}")).await
    }

    pub async fn create_user(&self, body: &UserCreate) -> Result<UserDto, Error> {
        self.post("api/users", body).await
    }

    pub async fn update_user(&self, id: i64, body: &UserUpdate) -> Result<UserDto, Error> {
        self.put(&format!("api/users/{id}"), body).await
    }

    pub async fn delete_user(&self, id: i64) -> Result<(), Error> {
        self.delete(&format!("api/users/{id}")).await
    }

    pub async fn set_user_role(&self, id: i64, role_id: i64) -> Result<UserDto, Error> {
        self.put(&format!("api/users/{id}/role"), &RoleAssignment { role_id })
            .await
    }

    pub async fn set_user_active(&self, id: i64, is_active: bool) -> Result<UserDto, Error> {
        self.put(&format!("api/users/{id}/status"), &ActiveFlag { is_active })
            .await
    }

    // ── Roles ───────────────────────────────────────────────────────

    pub async fn list_roles(&self) -> Result<Vec<RoleDto>, Error> {
        self.get("api/users/roles").await
    }

    pub async fn create_role(&self, body: &RoleCreate) -> Result<RoleDto, Error> {
        self.post("api/users/roles", body).await
    }

    pub async fn update_role(&self, id: i64, body: &RoleCreate) -> Result<RoleDto, Error> {
        self.put(&format!("api/users/roles/{id}"), body).await
    }

    pub async fn delete_role(&self, id: i64) -> Result<(), Error> {
        self.delete(&format!("api/users/roles/{id}")).await
    }

    // ── Permissions ─────────────────────────────────────────────────

    pub async fn list_permissions(&self) -> Result<Vec<PermissionDto>, Error> {
        self.get("api/users/permissions").await
    }
}
