//! Request actors and role-based capability checks.
//!
//! The caller identifies itself with `X-Actor-Id` and `X-Actor-Role` headers.
//! Capability checks live here so handlers stay thin and the rules are
//! testable without HTTP plumbing.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Admin,
    Staff,
    Client,
}

impl Role {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "admin" => Some(Role::Admin),
            "staff" => Some(Role::Staff),
            "client" => Some(Role::Client),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Staff => "staff",
            Role::Client => "client",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Actor {
    pub id: String,
    pub role: Role,
}

impl Actor {
    /// Order lifecycle mutations, payments and invoicing are back-office
    /// operations. Clients get read access only.
    pub fn can_manage_orders(&self) -> bool {
        matches!(self.role, Role::Admin | Role::Staff)
    }
}
