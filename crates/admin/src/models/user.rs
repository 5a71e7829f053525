//! Shop user as seen by the back-office.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use shop_core::{InvalidStatus, UserId, UserRole};

/// A user row on the admin users page and API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminUserRow {
    pub id: UserId,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub roles: Vec<UserRole>,
    pub blocked: bool,
    pub orders_count: i64,
    pub created_at: DateTime<Utc>,
}

impl AdminUserRow {
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.roles.contains(&UserRole::Admin)
    }

    /// Full name, else email, else phone, else the id.
    #[must_use]
    pub fn display_name(&self) -> String {
        let name = [self.first_name.as_deref(), self.last_name.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" ");
        if !name.is_empty() {
            return name;
        }
        self.email
            .clone()
            .or_else(|| self.phone.clone())
            .unwrap_or_else(|| self.id.to_string())
    }

    /// Flash message after the blocked flag was flipped.
    #[must_use]
    pub fn blocked_message(&self) -> String {
        let name = self.display_name();
        if self.blocked {
            format!("User \"{name}\" is now blocked and cannot login!")
        } else {
            format!("User \"{name}\" is now active and can login.")
        }
    }

    /// Roles with `admin` added or removed.
    #[must_use]
    pub fn roles_with_admin(&self, admin: bool) -> Vec<UserRole> {
        let mut roles: Vec<UserRole> = self
            .roles
            .iter()
            .copied()
            .filter(|role| *role != UserRole::Admin)
            .collect();
        if admin {
            roles.insert(0, UserRole::Admin);
        }
        if roles.is_empty() {
            roles.push(UserRole::Customer);
        }
        roles
    }
}

/// Partial update of a user from the API.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserUpdate {
    pub blocked: Option<bool>,
    pub roles: Option<Vec<String>>,
}

impl UserUpdate {
    /// Parsed, de-duplicated roles.
    ///
    /// # Errors
    ///
    /// Returns a message naming the first unknown role, or complaining about
    /// an empty list.
    pub fn parsed_roles(&self) -> Result<Option<Vec<UserRole>>, String> {
        let Some(raw) = &self.roles else {
            return Ok(None);
        };
        let mut roles = Vec::with_capacity(raw.len());
        for value in raw {
            let role: UserRole = value.parse().map_err(|e: InvalidStatus| e.to_string())?;
            if !roles.contains(&role) {
                roles.push(role);
            }
        }
        if roles.is_empty() {
            return Err("roles must not be empty".to_string());
        }
        Ok(Some(roles))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn user() -> AdminUserRow {
        AdminUserRow {
            id: UserId::generate(),
            email: Some("ani@shop.am".to_owned()),
            phone: None,
            first_name: Some("Ani".to_owned()),
            last_name: Some("Petrosyan".to_owned()),
            roles: vec![UserRole::Customer],
            blocked: false,
            orders_count: 2,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_display_name_fallbacks() {
        let mut user = user();
        assert_eq!(user.display_name(), "Ani Petrosyan");
        user.first_name = None;
        user.last_name = Some(" ".to_owned());
        assert_eq!(user.display_name(), "ani@shop.am");
        user.email = None;
        user.phone = Some("+37499111111".to_owned());
        assert_eq!(user.display_name(), "+37499111111");
    }

    #[test]
    fn test_blocked_messages() {
        let mut user = user();
        user.blocked = true;
        assert_eq!(
            user.blocked_message(),
            "User \"Ani Petrosyan\" is now blocked and cannot login!"
        );
        user.blocked = false;
        assert_eq!(
            user.blocked_message(),
            "User \"Ani Petrosyan\" is now active and can login."
        );
    }

    #[test]
    fn test_roles_with_admin() {
        let user = user();
        assert_eq!(
            user.roles_with_admin(true),
            vec![UserRole::Admin, UserRole::Customer]
        );

        let admin = AdminUserRow {
            roles: vec![UserRole::Admin],
            ..user
        };
        assert!(admin.is_admin());
        assert_eq!(admin.roles_with_admin(false), vec![UserRole::Customer]);
    }

    #[test]
    fn test_parsed_roles() {
        let update = UserUpdate {
            blocked: None,
            roles: Some(vec!["admin".to_owned(), "ADMIN".to_owned(), "customer".to_owned()]),
        };
        assert_eq!(
            update.parsed_roles().unwrap(),
            Some(vec![UserRole::Admin, UserRole::Customer])
        );

        let unknown = UserUpdate {
            blocked: None,
            roles: Some(vec!["root".to_owned()]),
        };
        assert!(unknown.parsed_roles().unwrap_err().contains("root"));

        let empty = UserUpdate {
            blocked: Some(true),
            roles: Some(Vec::new()),
        };
        assert!(empty.parsed_roles().is_err());
        assert_eq!(UserUpdate::default().parsed_roles().unwrap(), None);
    }
}
