//! User entity representing a registered SaleHunter account.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::token::ExpiringToken;

/// How the user signed up
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SignInMethod {
    #[default]
    Email,
    Google,
    Facebook,
}

impl SignInMethod {
    /// Numeric tag persisted in the `sign_in_method` column
    pub fn tag(self) -> i8 {
        match self {
            SignInMethod::Email => 0,
            SignInMethod::Google => 1,
            SignInMethod::Facebook => 2,
        }
    }

    pub fn from_tag(tag: i8) -> Option<Self> {
        match tag {
            0 => Some(SignInMethod::Email),
            1 => Some(SignInMethod::Google),
            2 => Some(SignInMethod::Facebook),
            _ => None,
        }
    }
}

/// Authorization role carried in access tokens
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum UserRole {
    #[default]
    Customer,
    Admin,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Customer => "Customer",
            UserRole::Admin => "Admin",
        }
    }

    /// Unknown role names fall back to `Customer`
    pub fn parse(value: &str) -> Self {
        match value {
            "Admin" => UserRole::Admin,
            _ => UserRole::Customer,
        }
    }
}

/// Account classification shown on profiles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AccountType {
    #[serde(rename = "User Account")]
    User,
    #[serde(rename = "Seller Account")]
    Seller,
}

impl AccountType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountType::User => "User Account",
            AccountType::Seller => "Seller Account",
        }
    }
}

/// User entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Database identity; 0 until persisted
    pub id: i64,

    pub name: String,

    /// Unique, compared case-sensitively
    pub email: String,

    pub phone_number: Option<String>,

    pub password_hash: String,

    pub profile_image_url: Option<String>,

    pub last_login_at: Option<DateTime<Utc>>,

    pub sign_in_method: SignInMethod,

    pub role: UserRole,

    pub is_active: bool,

    /// Current refresh token (hash + expiry)
    pub refresh_token: Option<ExpiringToken>,

    /// Pending password reset (hash + expiry)
    pub password_reset: Option<ExpiringToken>,

    /// The store this user owns, if any
    pub store_id: Option<i64>,

    pub created_at: DateTime<Utc>,

    pub updated_at: Option<DateTime<Utc>>,
}

impl User {
    /// Creates a new active customer signed up by email
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        phone_number: Option<String>,
        password_hash: String,
    ) -> Self {
        Self {
            id: 0,
            name: name.into(),
            email: email.into(),
            phone_number,
            password_hash,
            profile_image_url: None,
            last_login_at: None,
            sign_in_method: SignInMethod::Email,
            role: UserRole::Customer,
            is_active: true,
            refresh_token: None,
            password_reset: None,
            store_id: None,
            created_at: Utc::now(),
            updated_at: None,
        }
    }

    fn touch(&mut self) {
        self.updated_at = Some(Utc::now());
    }

    /// Replaces the refresh token; any previous one stops working
    pub fn set_refresh_token(&mut self, token: ExpiringToken) {
        self.refresh_token = Some(token);
        self.touch();
    }

    pub fn clear_refresh_token(&mut self) {
        self.refresh_token = None;
        self.touch();
    }

    pub fn set_password_reset(&mut self, token: ExpiringToken) {
        self.password_reset = Some(token);
        self.touch();
    }

    /// Stores a new password hash and invalidates any pending reset
    pub fn change_password(&mut self, password_hash: String) {
        self.password_hash = password_hash;
        self.password_reset = None;
        self.touch();
    }

    pub fn record_login(&mut self) {
        self.last_login_at = Some(Utc::now());
        self.touch();
    }

    pub fn activate(&mut self) {
        self.is_active = true;
        self.touch();
    }

    pub fn deactivate(&mut self) {
        self.is_active = false;
        self.touch();
    }

    pub fn rename(&mut self, name: String) {
        self.name = name;
        self.touch();
    }

    pub fn set_phone_number(&mut self, phone_number: String) {
        self.phone_number = Some(phone_number);
        self.touch();
    }

    pub fn set_profile_image(&mut self, url: String) {
        self.profile_image_url = Some(url);
        self.touch();
    }

    pub fn has_store(&self) -> bool {
        self.store_id.is_some()
    }

    pub fn account_type(&self) -> AccountType {
        if self.has_store() {
            AccountType::Seller
        } else {
            AccountType::User
        }
    }
}
