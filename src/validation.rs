// Request DTOs and the checks that gate them. Every rule runs before any
// service or store call; a failed DTO never leaves partial state behind.
//
// Required fields deserialize as `Option` so that a missing field surfaces as
// a field error in the standard body instead of a serde rejection.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use std::fmt;

/// `0x` prefix (either case) followed by exactly 40 hex digits. No checksum
/// validation; case-folding happens later, in the services.
static ETH_ADDRESS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^0[xX][0-9a-fA-F]{40}$").unwrap());

static HTTP_URL: Lazy<Regex> = Lazy::new(|| Regex::new(r"^https?://\S+$").unwrap());

static USERNAME_CHARS: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Za-z0-9_]+$").unwrap());

pub const MAX_CONTENT_LEN: usize = 280;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

/// Accumulates every violated field, not just the first one found.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationError {
    pub errors: Vec<FieldError>,
}

impl ValidationError {
    pub fn new() -> Self {
        Self { errors: Vec::new() }
    }

    pub fn single(field: &'static str, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.push(field, message);
        errors
    }

    pub fn push(&mut self, field: &'static str, message: impl Into<String>) {
        self.errors.push(FieldError {
            field,
            message: message.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    fn into_result<T>(self, value: T) -> Result<T, ValidationError> {
        if self.is_empty() {
            Ok(value)
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let joined = self
            .errors
            .iter()
            .map(|e| e.message.as_str())
            .collect::<Vec<_>>()
            .join("; ");
        write!(f, "{}", joined)
    }
}

pub fn is_ethereum_address(value: &str) -> bool {
    ETH_ADDRESS.is_match(value)
}

fn check_wallet(errors: &mut ValidationError, field: &'static str, value: &Option<String>) {
    match value {
        Some(v) if is_ethereum_address(v) => {}
        Some(_) => errors.push(field, format!("{} must be a valid Ethereum address", field)),
        None => errors.push(field, format!("{} is required", field)),
    }
}

fn check_content(errors: &mut ValidationError, field: &'static str, value: &Option<String>) {
    let Some(v) = value else {
        errors.push(field, format!("{} is required", field));
        return;
    };
    let len = v.chars().count();
    if len < 1 || len > MAX_CONTENT_LEN {
        errors.push(
            field,
            format!("{} must be between 1 and {} characters", field, MAX_CONTENT_LEN),
        );
    }
    if v.contains('\n') {
        errors.push(field, format!("{} cannot contain newlines", field));
    }
}

fn check_username(errors: &mut ValidationError, value: &str, min_len: usize) {
    let len = v_len(value);
    if len < min_len || len > 32 {
        errors.push(
            "username",
            format!("username must be between {} and 32 characters", min_len),
        );
    } else if !USERNAME_CHARS.is_match(value) {
        errors.push(
            "username",
            "username can only contain letters, numbers, and underscores",
        );
    }
}

fn v_len(value: &str) -> usize {
    value.chars().count()
}

// --- auth ---

#[derive(Debug, Deserialize)]
pub struct VerifyUserDto {
    pub wallet: Option<String>,
}

impl VerifyUserDto {
    pub fn validate(self) -> Result<String, ValidationError> {
        let mut errors = ValidationError::new();
        check_wallet(&mut errors, "wallet", &self.wallet);
        errors.into_result(self.wallet.unwrap_or_default())
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateUserDto {
    pub wallet_address: Option<String>,
    pub username: Option<String>,
    pub bio: Option<String>,
    pub profile_pic_url: Option<String>,
}

/// Validated registration payload.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub wallet_address: String,
    pub username: Option<String>,
    pub bio: Option<String>,
    pub profile_pic_url: Option<String>,
}

impl CreateUserDto {
    pub fn validate(self) -> Result<NewUser, ValidationError> {
        let mut errors = ValidationError::new();
        check_wallet(&mut errors, "wallet_address", &self.wallet_address);
        if let Some(username) = &self.username {
            check_username(&mut errors, username, 1);
        }
        errors.into_result(NewUser {
            wallet_address: self.wallet_address.unwrap_or_default(),
            username: self.username,
            bio: self.bio,
            profile_pic_url: self.profile_pic_url,
        })
    }
}

// --- users ---

#[derive(Debug, Deserialize)]
pub struct UpdateUserDto {
    pub username: Option<String>,
    pub bio: Option<String>,
    pub profile_pic_url: Option<String>,
}

/// Partial profile update; only present fields are merged over the row.
#[derive(Debug, Clone)]
pub struct UserPatch {
    pub username: Option<String>,
    pub bio: Option<String>,
    pub profile_pic_url: Option<String>,
}

impl UpdateUserDto {
    pub fn validate(self) -> Result<UserPatch, ValidationError> {
        let mut errors = ValidationError::new();
        if let Some(username) = &self.username {
            check_username(&mut errors, username, 3);
        }
        if let Some(bio) = &self.bio {
            if v_len(bio) > MAX_CONTENT_LEN {
                errors.push(
                    "bio",
                    format!("bio must be at most {} characters", MAX_CONTENT_LEN),
                );
            }
        }
        if let Some(url) = &self.profile_pic_url {
            if !HTTP_URL.is_match(url) {
                errors.push("profile_pic_url", "profile_pic_url must be a valid URL");
            }
        }
        errors.into_result(UserPatch {
            username: self.username,
            bio: self.bio,
            profile_pic_url: self.profile_pic_url,
        })
    }
}

// --- posts ---

#[derive(Debug, Deserialize)]
pub struct CreatePostDto {
    pub content: Option<String>,
    pub wallet_address: Option<String>,
}

/// Validated post payload.
#[derive(Debug, Clone)]
pub struct NewPost {
    pub wallet_address: String,
    pub content: String,
}

impl CreatePostDto {
    pub fn validate(self) -> Result<NewPost, ValidationError> {
        let mut errors = ValidationError::new();
        check_content(&mut errors, "content", &self.content);
        check_wallet(&mut errors, "wallet_address", &self.wallet_address);
        errors.into_result(NewPost {
            wallet_address: self.wallet_address.unwrap_or_default(),
            content: self.content.unwrap_or_default(),
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct LikePostDto {
    pub wallet_address: Option<String>,
}

impl LikePostDto {
    pub fn validate(self) -> Result<String, ValidationError> {
        let mut errors = ValidationError::new();
        check_wallet(&mut errors, "wallet_address", &self.wallet_address);
        errors.into_result(self.wallet_address.unwrap_or_default())
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateCommentDto {
    pub wallet_address: Option<String>,
    pub content: Option<String>,
}

/// Validated comment payload; the post id comes from the route path.
#[derive(Debug, Clone)]
pub struct NewComment {
    pub wallet_address: String,
    pub content: String,
}

impl CreateCommentDto {
    pub fn validate(self) -> Result<NewComment, ValidationError> {
        let mut errors = ValidationError::new();
        check_wallet(&mut errors, "wallet_address", &self.wallet_address);
        check_content(&mut errors, "content", &self.content);
        errors.into_result(NewComment {
            wallet_address: self.wallet_address.unwrap_or_default(),
            content: self.content.unwrap_or_default(),
        })
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct PaginationDto {
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

/// Validated pagination with defaults applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: i64,
    pub limit: i64,
}

impl PageRequest {
    /// Saturates instead of overflowing: an absurdly deep page is a valid
    /// request for rows that do not exist, so it gets an empty page, never a
    /// panic or a negative offset.
    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.limit)
    }
}

impl PaginationDto {
    pub fn validate(self) -> Result<PageRequest, ValidationError> {
        let mut errors = ValidationError::new();
        let page = self.page.unwrap_or(1);
        let limit = self.limit.unwrap_or(10);
        if page < 1 {
            errors.push("page", "page must be at least 1");
        }
        if limit < 1 {
            errors.push("limit", "limit must be at least 1");
        }
        errors.into_result(PageRequest { page, limit })
    }
}
