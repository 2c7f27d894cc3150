//! User data model.
//!
//! A user is a document keyed by its identifier with a single opaque 8-bit
//! counter. Values are built per request, either from a decoded create body
//! or from a lookup key, and only reach the store through the repository
//! port.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Path segment of the request introspection endpoint.
pub const YOURSELF_SEGMENT: &str = "yourself";

/// Path segment of the interactive API documentation.
pub const DOCS_SEGMENT: &str = "docs";

/// Identifiers [`UserId`] refuses because fixed endpoints own the matching
/// single-segment paths, so `GET /{uuid}` could never return such a user.
pub const RESERVED_USER_IDS: [&str; 2] = [YOURSELF_SEGMENT, DOCS_SEGMENT];

/// Validation errors returned when constructing a [`UserId`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserValidationError {
    /// The identifier is the empty string.
    EmptyId,
    /// The identifier contains the document path separator `/`.
    InvalidId,
    /// The identifier is one of [`RESERVED_USER_IDS`].
    ReservedId,
}

impl fmt::Display for UserValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyId => write!(f, "user id must not be empty"),
            Self::InvalidId => write!(f, "user id must not contain '/'"),
            Self::ReservedId => write!(f, "user id is reserved for a fixed endpoint"),
        }
    }
}

impl std::error::Error for UserValidationError {}

/// Stable user identifier, used verbatim as the document key.
///
/// Identifiers are either supplied by the client or allocated by the
/// service; no format beyond a usable document key is imposed, so values
/// such as `a1` are accepted alongside canonical UUID strings. Names in
/// [`RESERVED_USER_IDS`] are refused.
///
/// # Examples
/// ```
/// use users_backend::domain::UserId;
///
/// let id = UserId::new("a1").expect("valid id");
/// assert_eq!(id.as_ref(), "a1");
/// assert!(UserId::new("").is_err());
/// assert!(UserId::new("yourself").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserId(String);

impl UserId {
    /// Validate and construct a [`UserId`] from borrowed input.
    pub fn new(id: impl AsRef<str>) -> Result<Self, UserValidationError> {
        Self::from_owned(id.as_ref().to_owned())
    }

    /// Identifier rendered from a UUID in hyphenated lowercase form.
    pub fn from_uuid(id: Uuid) -> Self {
        Self(id.hyphenated().to_string())
    }

    fn from_owned(id: String) -> Result<Self, UserValidationError> {
        if id.is_empty() {
            return Err(UserValidationError::EmptyId);
        }
        if id.contains('/') {
            return Err(UserValidationError::InvalidId);
        }
        if RESERVED_USER_IDS.contains(&id.as_str()) {
            return Err(UserValidationError::ReservedId);
        }
        Ok(Self(id))
    }
}

impl AsRef<str> for UserId {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<UserId> for String {
    fn from(value: UserId) -> Self {
        value.0
    }
}

impl TryFrom<String> for UserId {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_owned(value)
    }
}

/// Application user.
///
/// Serialised as `{"uuid": string, "count": int8}` both on the wire and in
/// the document store. A stored document without `count` reads as zero.
///
/// ## Invariants
/// - `id` is a valid [`UserId`] and never changes once the user is stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "uuid")]
    id: UserId,
    #[serde(default)]
    count: i8,
}

impl User {
    /// Build a new [`User`] from validated components.
    pub fn new(id: UserId, count: i8) -> Self {
        Self { id, count }
    }

    /// Stable user identifier.
    pub fn id(&self) -> &UserId {
        &self.id
    }

    /// Opaque counter carried with the user.
    pub fn count(&self) -> i8 {
        self.count
    }
}

/// Decoded body of a create request.
///
/// Both fields are optional on the wire: a missing or empty `uuid` asks the
/// service to allocate one, and a missing `count` defaults to zero. Unknown
/// fields are ignored.
///
/// # Examples
/// ```
/// use users_backend::domain::NewUser;
///
/// let draft: NewUser = serde_json::from_str("{}").expect("empty body decodes");
/// assert!(draft.requested_id().is_none());
/// assert_eq!(draft.count, 0);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewUser {
    /// Client-supplied identifier, if any.
    #[serde(default)]
    pub uuid: Option<String>,
    /// Initial counter value.
    #[serde(default)]
    pub count: i8,
}

impl NewUser {
    /// Identifier requested by the client, treating an empty string as absent.
    pub fn requested_id(&self) -> Option<&str> {
        self.uuid.as_deref().filter(|id| !id.is_empty())
    }

    /// Bind the draft to an identifier, producing the user to store.
    pub fn into_user(self, id: UserId) -> User {
        User::new(id, self.count)
    }
}
