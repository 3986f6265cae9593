//! Scope selectors.
//!
//! A [`TypeId`] pairs a [`ScopeType`] with a numeric id and is what request
//! middleware hands to the resolver ("run mode"). The resolver only ever
//! reads it through [`TypeId::unpack`].

use crate::{ConfigError, ScopeError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Breadth of a resolution query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScopeType {
    /// No scope supplied; falls back to the default website.
    Absent = 0,
    Default = 1,
    Website = 2,
    Group = 3,
    Store = 4,
}

impl ScopeType {
    pub fn with_id(self, id: u32) -> TypeId {
        TypeId::new(self, id)
    }

    fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(ScopeType::Absent),
            1 => Some(ScopeType::Default),
            2 => Some(ScopeType::Website),
            3 => Some(ScopeType::Group),
            4 => Some(ScopeType::Store),
            _ => None,
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            ScopeType::Absent => "absent",
            ScopeType::Default => "default",
            ScopeType::Website => "website",
            ScopeType::Group => "group",
            ScopeType::Store => "store",
        }
    }
}

impl fmt::Display for ScopeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A (scope, id) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TypeId {
    scope: ScopeType,
    id: u32,
}

impl TypeId {
    pub const fn new(scope: ScopeType, id: u32) -> Self {
        Self { scope, id }
    }

    pub const fn absent() -> Self {
        Self::new(ScopeType::Absent, 0)
    }

    pub const fn default_scope() -> Self {
        Self::new(ScopeType::Default, 0)
    }

    pub const fn unpack(self) -> (ScopeType, u32) {
        (self.scope, self.id)
    }

    pub const fn scope(self) -> ScopeType {
        self.scope
    }

    pub const fn id(self) -> u32 {
        self.id
    }

    /// Pack into a single integer: scope in the high 32 bits, id in the low.
    pub const fn pack(self) -> u64 {
        ((self.scope as u64) << 32) | self.id as u64
    }

    /// Inverse of [`TypeId::pack`]. `None` for an unknown scope value.
    pub fn from_packed(packed: u64) -> Option<Self> {
        let scope = u8::try_from(packed >> 32).ok().and_then(ScopeType::from_u8)?;
        Some(Self::new(scope, packed as u32))
    }
}

impl Default for TypeId {
    fn default() -> Self {
        Self::absent()
    }
}

impl fmt::Display for TypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.scope {
            ScopeType::Absent | ScopeType::Default => write!(f, "{}", self.scope),
            _ => write!(f, "{}:{}", self.scope, self.id),
        }
    }
}

impl FromStr for TypeId {
    type Err = ScopeError;

    /// Parses `absent`, `default`, `website:<id>`, `group:<id>`, `store:<id>`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |reason: &str| {
            ScopeError::Config(ConfigError::InvalidValue {
                field: "scope".to_string(),
                value: s.to_string(),
                reason: reason.to_string(),
            })
        };

        let (name, id) = match s.split_once(':') {
            Some((name, id)) => (name, Some(id)),
            None => (s, None),
        };

        let scope = match name.trim().to_ascii_lowercase().as_str() {
            "absent" => ScopeType::Absent,
            "default" => ScopeType::Default,
            "website" => ScopeType::Website,
            "group" => ScopeType::Group,
            "store" => ScopeType::Store,
            _ => return Err(invalid("unknown scope")),
        };

        match (scope, id) {
            (ScopeType::Absent | ScopeType::Default, None) => Ok(TypeId::new(scope, 0)),
            (ScopeType::Absent | ScopeType::Default, Some(_)) => {
                Err(invalid("scope takes no id"))
            }
            (_, None) => Err(invalid("scope requires an id")),
            (_, Some(id)) => id
                .trim()
                .parse::<u32>()
                .map(|id| TypeId::new(scope, id))
                .map_err(|_| invalid("id must be an unsigned integer")),
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
