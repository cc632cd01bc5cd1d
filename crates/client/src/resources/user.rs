//! Users, roles and the privileges roles grant

use serde::{Deserialize, Serialize};

use vxsdk_common::{
    Collection, CollectionQuery, Description, Email, FilterKey, Id, Name, Password,
    PrivilegeScope, Result,
};

use super::resource_data;
use crate::handle::{ensure_known, Handle};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserData {
    pub id: Id,
    pub name: Name,
    pub first_name: Name,
    pub last_name: Name,
    pub email: Email,
    pub domain: Name,
    pub must_change_password: bool,
    pub is_locked: bool,
}

resource_data!(UserData, "users");

pub type User = Handle<UserData>;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RoleData {
    pub id: Id,
    pub name: Name,
    pub description: Description,
}

resource_data!(RoleData, "roles");

pub type Role = Handle<RoleData>;

/// A single permission, owned by a role
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PrivilegeData {
    pub id: Id,
    pub name: Name,
    pub is_granted: bool,
    pub scope: PrivilegeScope,
}

resource_data!(PrivilegeData, "privileges");

pub type Privilege = Handle<PrivilegeData>;

/// Filters accepted by [`User::roles`] and [`Role::users`]
pub const MEMBERSHIP_FILTERS: &[FilterKey] = &[FilterKey::Id, FilterKey::Name];

/// Filters accepted by [`Role::privileges`]
pub const PRIVILEGE_FILTERS: &[FilterKey] = &[FilterKey::Name];

impl UserData {
    pub fn full_name(&self) -> String {
        match (self.first_name.is_empty(), self.last_name.is_empty()) {
            (true, true) => self.name.to_string(),
            (false, true) => self.first_name.to_string(),
            (true, false) => self.last_name.to_string(),
            (false, false) => format!("{} {}", self.first_name, self.last_name),
        }
    }
}

impl Handle<UserData> {
    pub async fn set_first_name(&mut self, first_name: &str) -> Result<()> {
        let first_name = Name::for_field("firstName", first_name)?;
        self.update("firstName", first_name, |d, v| d.first_name = v).await
    }

    pub async fn set_last_name(&mut self, last_name: &str) -> Result<()> {
        let last_name = Name::for_field("lastName", last_name)?;
        self.update("lastName", last_name, |d, v| d.last_name = v).await
    }

    pub async fn set_email(&mut self, email: &str) -> Result<()> {
        let email = Email::for_field("email", email)?;
        self.update("email", email, |d, v| d.email = v).await
    }

    /// Change the password. The server applies its password policy and
    /// reports violations with the matching password result code.
    pub async fn set_password(&mut self, password: &str) -> Result<()> {
        let password = Password::for_field("password", password)?;
        self.update("password", password, |_, _| {}).await
    }

    pub async fn roles(&self, query: &CollectionQuery) -> Result<Collection<Handle<RoleData>>> {
        self.related("roles", query, MEMBERSHIP_FILTERS).await
    }

    pub async fn add_role(&mut self, role_id: &str) -> Result<()> {
        self.link("roles", role_id).await
    }

    pub async fn remove_role(&mut self, role_id: &str) -> Result<()> {
        self.unlink("roles", role_id).await
    }
}

impl Handle<RoleData> {
    pub async fn set_name(&mut self, name: &str) -> Result<()> {
        let name = Name::for_field("name", name)?;
        self.update("name", name, |d, v| d.name = v).await
    }

    pub async fn set_description(&mut self, description: &str) -> Result<()> {
        let description = Description::for_field("description", description)?;
        self.update("description", description, |d, v| d.description = v).await
    }

    pub async fn privileges(&self, query: &CollectionQuery) -> Result<Collection<Handle<PrivilegeData>>> {
        self.owned_collection(query, PRIVILEGE_FILTERS).await
    }

    pub async fn privilege(&self, id: &str) -> Result<Handle<PrivilegeData>> {
        self.owned(id).await
    }

    /// Users holding this role
    pub async fn users(&self, query: &CollectionQuery) -> Result<Collection<Handle<UserData>>> {
        self.related("users", query, MEMBERSHIP_FILTERS).await
    }
}

impl Handle<PrivilegeData> {
    pub async fn set_granted(&mut self, granted: bool) -> Result<()> {
        self.update("isGranted", granted, |d, v| d.is_granted = v).await
    }

    pub async fn set_scope(&mut self, scope: PrivilegeScope) -> Result<()> {
        let scope = ensure_known("scope", scope)?;
        self.update("scope", scope, |d, v| d.scope = v).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::testing::seeded;
    use serde_json::json;
    use vxsdk_common::ResultCode;

    #[tokio::test]
    async fn test_role_membership() {
        let (mock, mut user) = seeded::<UserData>(
            "users/u1",
            json!({"name": "jdoe", "firstName": "Jane", "lastName": "Doe"}),
        )
        .await;
        assert_eq!(user.full_name(), "Jane Doe");
        mock.insert("roles/admin", json!({"name": "Administrators"}));

        user.add_role("admin").await.unwrap();
        let roles = user.roles(&CollectionQuery::new()).await.unwrap();
        assert_eq!(roles.items[0].name, "Administrators");

        user.remove_role("admin").await.unwrap();
        assert!(mock.linked_ids("users/u1", "roles").is_empty());
    }

    #[tokio::test]
    async fn test_password_not_kept_locally() {
        let (mock, mut user) = seeded::<UserData>("users/u2", json!({"name": "ops"})).await;
        user.set_password("N3w-secret!").await.unwrap();

        let sent = mock.last_request().unwrap();
        assert_eq!(sent.body.unwrap()["password"], "N3w-secret!");
        assert!(!format!("{:?}", user.data()).contains("N3w-secret!"));
    }

    #[tokio::test]
    async fn test_privileges_under_role() {
        let (mock, role) = seeded::<RoleData>("roles/r1", json!({"name": "Operators"})).await;
        mock.insert(
            "roles/r1/privileges/p1",
            json!({"name": "viewLive", "isGranted": false, "scope": "site"}),
        );

        let mut privilege = role.privilege("p1").await.unwrap();
        assert_eq!(privilege.path(), "roles/r1/privileges/p1");
        privilege.set_granted(true).await.unwrap();
        assert_eq!(mock.get("roles/r1/privileges/p1").unwrap()["isGranted"], true);

        let err = privilege.set_scope(PrivilegeScope::Unknown).await.unwrap_err();
        assert_eq!(err.code(), ResultCode::InvalidValue);
        assert_eq!(privilege.scope, PrivilegeScope::Site);

        let listed = role.privileges(&CollectionQuery::new()).await.unwrap();
        assert_eq!(listed.total_count, 1);
    }
}
