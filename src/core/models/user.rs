//! User models for the storefront
//!
//! A user carries exactly one role from a closed set. Role strings coming from
//! cookies, configuration or request bodies are parsed case-insensitively and
//! anything outside the set is rejected at that boundary.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// User role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum UserRole {
    /// Shopper, self-registered
    Customer,
    /// Seller with a studio dashboard
    Artist,
    /// Back-office administrator
    Admin,
    /// Administrator of administrators
    SuperAdmin,
}

impl UserRole {
    /// Every role, lowest privilege first
    pub const ALL: [UserRole; 4] = [
        UserRole::Customer,
        UserRole::Artist,
        UserRole::Admin,
        UserRole::SuperAdmin,
    ];

    /// Canonical serialized form
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Customer => "customer",
            UserRole::Artist => "artist",
            UserRole::Admin => "admin",
            UserRole::SuperAdmin => "super-admin",
        }
    }

    /// Page a user of this role is sent to after login or on a role mismatch
    pub fn landing_page(&self) -> &'static str {
        match self {
            UserRole::Customer => "/account/dashboard",
            UserRole::Artist => "/artist/dashboard",
            UserRole::Admin => "/dashboard",
            UserRole::SuperAdmin => "/super-admin/dashboard",
        }
    }

    /// Whether a user holding `self` may issue an invitation for `target`
    pub fn can_invite(&self, target: UserRole) -> bool {
        match self {
            UserRole::SuperAdmin => target != UserRole::Customer,
            UserRole::Admin => target == UserRole::Artist,
            UserRole::Customer | UserRole::Artist => false,
        }
    }

    /// Roles only obtainable through an invitation
    pub fn is_invitable(&self) -> bool {
        *self != UserRole::Customer
    }

    pub fn is_staff(&self) -> bool {
        matches!(self, UserRole::Admin | UserRole::SuperAdmin)
    }

    /// Compare against a role name the way every guard does
    pub fn matches_name(&self, name: &str) -> bool {
        name.parse::<UserRole>().is_ok_and(|role| role == *self)
    }

    fn default_permissions(&self) -> Option<Vec<String>> {
        let permissions: &[&str] = match self {
            UserRole::Admin => &["manage_users", "manage_products", "view_reports"],
            UserRole::SuperAdmin => &[
                "manage_users",
                "manage_products",
                "view_reports",
                "manage_admins",
                "manage_settings",
            ],
            UserRole::Customer | UserRole::Artist => return None,
        };
        Some(permissions.iter().map(|p| p.to_string()).collect())
    }
}

/// Landing page for an optional role; no role goes home
pub fn landing_page(role: Option<UserRole>) -> &'static str {
    role.map_or("/", |role| role.landing_page())
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let folded: String = s
            .chars()
            .filter(|c| !matches!(c, '-' | '_' | ' '))
            .flat_map(char::to_lowercase)
            .collect();

        match folded.as_str() {
            "customer" => Ok(UserRole::Customer),
            "artist" => Ok(UserRole::Artist),
            "admin" => Ok(UserRole::Admin),
            "superadmin" => Ok(UserRole::SuperAdmin),
            _ => Err(format!("Invalid user role: {}", s)),
        }
    }
}

impl Serialize for UserRole {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for UserRole {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// User status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserStatus {
    Active,
    Inactive,
    Suspended,
    /// Awaiting email verification
    Pending,
}

impl UserStatus {
    /// Whether a user in this status may hold a session
    pub fn can_sign_in(&self) -> bool {
        matches!(self, UserStatus::Active | UserStatus::Pending)
    }
}

impl FromStr for UserStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "active" => Ok(UserStatus::Active),
            "inactive" => Ok(UserStatus::Inactive),
            "suspended" => Ok(UserStatus::Suspended),
            "pending" => Ok(UserStatus::Pending),
            _ => Err(format!("Invalid user status: {}", s)),
        }
    }
}

/// Past order shown on a customer's account
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderSummary {
    pub id: String,
    pub total: f64,
    pub status: String,
    pub placed_at: DateTime<Utc>,
}

/// Sales figures shown on an artist's dashboard
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SalesStats {
    pub total_sales: u64,
    pub revenue: f64,
    pub artworks: u32,
}

/// User account
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub name: String,
    /// Email address (unique, case-insensitive)
    pub email: String,
    pub role: UserRole,
    pub status: UserStatus,
    pub join_date: DateTime<Utc>,
    #[serde(default)]
    pub email_verified: bool,
    #[serde(default)]
    pub last_login: Option<DateTime<Utc>>,
    /// Argon2 hash; stripped before the user is written into a cookie
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password_hash: Option<String>,
    /// Customers only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub orders: Option<Vec<OrderSummary>>,
    /// Artists only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sales: Option<SalesStats>,
    /// Admins and super-admins only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub permissions: Option<Vec<String>>,
}

impl User {
    /// Create an active user with the role-specific fields initialised
    pub fn new(name: impl Into<String>, email: impl Into<String>, role: UserRole) -> Self {
        let mut user = Self {
            id: Uuid::new_v4(),
            name: name.into(),
            email: email.into(),
            role,
            status: UserStatus::Active,
            join_date: Utc::now(),
            email_verified: false,
            last_login: None,
            password_hash: None,
            orders: None,
            sales: None,
            permissions: None,
        };
        user.reset_role_fields();
        user
    }

    pub fn with_password_hash(mut self, hash: String) -> Self {
        self.password_hash = Some(hash);
        self
    }

    pub fn with_status(mut self, status: UserStatus) -> Self {
        self.status = status;
        self
    }

    /// Copy without credentials, safe to hand to a client
    pub fn public(&self) -> Self {
        Self {
            password_hash: None,
            ..self.clone()
        }
    }

    /// Identity and role only, sized for a cookie; the rest lives in the directory
    pub fn session_claim(&self) -> Self {
        Self {
            id: self.id,
            name: self.name.clone(),
            email: self.email.clone(),
            role: self.role,
            status: self.status,
            join_date: self.join_date,
            email_verified: self.email_verified,
            last_login: None,
            password_hash: None,
            orders: None,
            sales: None,
            permissions: None,
        }
    }

    pub fn has_email(&self, email: &str) -> bool {
        self.email.eq_ignore_ascii_case(email.trim())
    }

    pub(crate) fn reset_role_fields(&mut self) {
        self.orders = (self.role == UserRole::Customer).then(Vec::new);
        self.sales = (self.role == UserRole::Artist).then(SalesStats::default);
        self.permissions = self.role.default_permissions();
    }
}
