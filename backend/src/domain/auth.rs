//! Authentication primitives and the authorization gate.
//!
//! Keep inbound payload parsing outside the handlers by exposing constructors
//! that validate raw inputs before a service talks to a port. The gate
//! functions compose left to right: resolve an identity first, then apply
//! zero or more role/ownership checks; the first failure short-circuits.

use std::fmt;

use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use base64::Engine as _;
use zeroize::Zeroizing;

use super::identity::{Identity, IdentityId};
use super::Error;

/// Domain error returned when login payload values are invalid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginValidationError {
    /// Username was missing or blank once trimmed.
    EmptyUsername,
    /// Password was blank.
    EmptyPassword,
}

impl fmt::Display for LoginValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyUsername => write!(f, "username must not be empty"),
            Self::EmptyPassword => write!(f, "password must not be empty"),
        }
    }
}

impl std::error::Error for LoginValidationError {}

/// Validated login credentials used by the credential verifier.
///
/// ## Invariants
/// - `username` is trimmed and must not be empty after trimming.
/// - `password` is required to be non-empty but retains caller-provided
///   whitespace to avoid surprising credential comparisons.
///
/// # Examples
/// ```
/// use backend::domain::LoginCredentials;
///
/// let creds = LoginCredentials::try_from_parts("alice", "password").unwrap();
/// assert_eq!(creds.username(), "alice");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    username: String,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    /// Construct credentials from raw username/password inputs.
    pub fn try_from_parts(username: &str, password: &str) -> Result<Self, LoginValidationError> {
        let normalized = username.trim();
        if normalized.is_empty() {
            return Err(LoginValidationError::EmptyUsername);
        }
        if password.is_empty() {
            return Err(LoginValidationError::EmptyPassword);
        }
        Ok(Self {
            username: normalized.to_owned(),
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Username string suitable for identity lookups.
    pub fn username(&self) -> &str {
        self.username.as_str()
    }

    /// Password string provided by the caller.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

/// Failures while decoding an `Authorization: Basic` header value.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BasicAuthError {
    /// The header did not use the `Basic` scheme.
    #[error("authorization scheme is not Basic")]
    WrongScheme,
    /// The payload was not valid base64 or not valid UTF-8.
    #[error("authorization payload is not valid base64 text")]
    UndecodablePayload,
    /// The decoded payload had no `:` separator.
    #[error("authorization payload is missing the ':' separator")]
    MissingSeparator,
    /// The decoded username or password failed validation.
    #[error(transparent)]
    Invalid(#[from] LoginValidationError),
}

/// Decode a `Basic <base64(user:pass)>` header value into credentials.
///
/// # Examples
/// ```
/// use backend::domain::parse_basic_header;
///
/// let creds = parse_basic_header("Basic YWxpY2U6c2VjcmV0").unwrap();
/// assert_eq!(creds.username(), "alice");
/// assert_eq!(creds.password(), "secret");
/// ```
pub fn parse_basic_header(value: &str) -> Result<LoginCredentials, BasicAuthError> {
    let (scheme, payload) = value
        .split_once(' ')
        .ok_or(BasicAuthError::WrongScheme)?;
    if !scheme.eq_ignore_ascii_case("Basic") {
        return Err(BasicAuthError::WrongScheme);
    }
    let decoded = BASE64_STANDARD
        .decode(payload.trim())
        .map_err(|_| BasicAuthError::UndecodablePayload)?;
    let text = Zeroizing::new(
        String::from_utf8(decoded).map_err(|_| BasicAuthError::UndecodablePayload)?,
    );
    let (username, password) = text
        .split_once(':')
        .ok_or(BasicAuthError::MissingSeparator)?;
    Ok(LoginCredentials::try_from_parts(username, password)?)
}

/// Require an upstream resolver to have produced an identity.
pub fn require_authenticated(identity: Option<Identity>) -> Result<Identity, Error> {
    identity.ok_or_else(|| Error::unauthorized("you are not authenticated"))
}

/// Require the caller to hold the admin role.
pub fn require_admin(identity: &Identity) -> Result<(), Error> {
    if identity.is_admin {
        Ok(())
    } else {
        Err(Error::forbidden(
            "you are not authorized to perform this operation",
        ))
    }
}

/// Require the caller to be the recorded owner, or an admin.
///
/// Ownership is compared by stable identifier equality, never by any
/// formatted representation.
pub fn require_owner_or_admin(identity: &Identity, owner: &IdentityId) -> Result<(), Error> {
    if identity.is_admin || identity.id == *owner {
        Ok(())
    } else {
        Err(Error::forbidden(
            "you are not authorized to perform this operation",
        ))
    }
}

/// Require the caller to be the recorded owner; the admin role does not
/// bypass this check.
///
/// Comment edits use this strict form deliberately, in contrast to
/// dish-level admin operations.
pub fn require_owner(identity: &Identity, owner: &IdentityId) -> Result<(), Error> {
    if identity.id == *owner {
        Ok(())
    } else {
        Err(Error::forbidden(
            "only the author may modify this resource",
        ))
    }
}
