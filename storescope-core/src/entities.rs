//! Website, Group and Store records.
//!
//! Records are plain immutable values. Everything that needs more than one
//! record at a time (referential checks, default resolution) lives in
//! [`crate::validate`] or in the service crate.

use crate::{ScopeResult, ValidationError};
use serde::{Deserialize, Serialize};

// ============================================================================
// IDENTITY TYPES
// ============================================================================

pub type WebsiteId = u32;
pub type GroupId = u32;
pub type StoreId = u32;

/// Store id reserved for the admin store view.
pub const ADMIN_STORE_ID: StoreId = 0;

/// Entity type discriminator used in errors and log fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityType {
    Website,
    Group,
    Store,
}

/// Common behavior of the three hierarchy records.
///
/// Collections and the service's upsert path are generic over this trait so
/// the three kinds share one implementation.
pub trait Entity: Clone + Send + Sync + 'static {
    /// Natural ordering key used when a collection is sorted.
    type SortKey: Ord;

    fn entity_type() -> EntityType;

    /// Primary key.
    fn id(&self) -> u32;

    /// Unique code, for kinds that carry one.
    fn code(&self) -> Option<&str> {
        None
    }

    /// Checks that only need this single record.
    fn validate(&self) -> ScopeResult<()>;

    fn sort_key(&self) -> Self::SortKey;
}

fn validate_code(entity_type: EntityType, id: u32, code: &str) -> ScopeResult<()> {
    if code.is_empty() {
        return Err(ValidationError::EmptyCode { entity_type, id }.into());
    }
    Ok(())
}

// ============================================================================
// RECORDS
// ============================================================================

/// Top-level tenant grouping. Owns a default [`Group`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Website {
    pub website_id: WebsiteId,
    pub code: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub sort_order: u32,
    pub default_group_id: GroupId,
    #[serde(default)]
    pub is_default: bool,
}

/// Intermediate grouping within a website. Owns a default [`Store`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    pub group_id: GroupId,
    pub website_id: WebsiteId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub root_category_id: u32,
    pub default_store_id: StoreId,
}

/// The narrowest operational unit a request is bound to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Store {
    pub store_id: StoreId,
    pub code: String,
    pub website_id: WebsiteId,
    pub group_id: GroupId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub sort_order: u32,
    #[serde(default)]
    pub is_active: bool,
}

impl Website {
    pub fn new(website_id: WebsiteId, code: impl Into<String>, default_group_id: GroupId) -> Self {
        Self {
            website_id,
            code: code.into(),
            name: None,
            sort_order: 0,
            default_group_id,
            is_default: false,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_sort_order(mut self, sort_order: u32) -> Self {
        self.sort_order = sort_order;
        self
    }

    pub fn with_default(mut self, is_default: bool) -> Self {
        self.is_default = is_default;
        self
    }
}

impl Group {
    pub fn new(group_id: GroupId, website_id: WebsiteId, default_store_id: StoreId) -> Self {
        Self {
            group_id,
            website_id,
            name: String::new(),
            root_category_id: 0,
            default_store_id,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_root_category(mut self, root_category_id: u32) -> Self {
        self.root_category_id = root_category_id;
        self
    }
}

impl Store {
    pub fn new(
        store_id: StoreId,
        code: impl Into<String>,
        website_id: WebsiteId,
        group_id: GroupId,
    ) -> Self {
        Self {
            store_id,
            code: code.into(),
            website_id,
            group_id,
            name: String::new(),
            sort_order: 0,
            is_active: false,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_sort_order(mut self, sort_order: u32) -> Self {
        self.sort_order = sort_order;
        self
    }

    pub fn with_active(mut self, is_active: bool) -> Self {
        self.is_active = is_active;
        self
    }

    /// True for the admin store view (store id 0).
    pub fn is_admin(&self) -> bool {
        self.store_id == ADMIN_STORE_ID
    }
}

impl Entity for Website {
    type SortKey = (u32, WebsiteId, GroupId);

    fn entity_type() -> EntityType {
        EntityType::Website
    }

    fn id(&self) -> u32 {
        self.website_id
    }

    fn code(&self) -> Option<&str> {
        Some(&self.code)
    }

    fn validate(&self) -> ScopeResult<()> {
        validate_code(EntityType::Website, self.website_id, &self.code)
    }

    fn sort_key(&self) -> Self::SortKey {
        (self.sort_order, self.website_id, self.default_group_id)
    }
}

impl Entity for Group {
    type SortKey = (WebsiteId, StoreId, GroupId);

    fn entity_type() -> EntityType {
        EntityType::Group
    }

    fn id(&self) -> u32 {
        self.group_id
    }

    // Groups carry no code; everything else is a cross-entity check.
    fn validate(&self) -> ScopeResult<()> {
        Ok(())
    }

    fn sort_key(&self) -> Self::SortKey {
        (self.website_id, self.default_store_id, self.group_id)
    }
}

impl Entity for Store {
    type SortKey = (WebsiteId, GroupId, u32, StoreId);

    fn entity_type() -> EntityType {
        EntityType::Store
    }

    fn id(&self) -> u32 {
        self.store_id
    }

    fn code(&self) -> Option<&str> {
        Some(&self.code)
    }

    fn validate(&self) -> ScopeResult<()> {
        validate_code(EntityType::Store, self.store_id, &self.code)
    }

    fn sort_key(&self) -> Self::SortKey {
        (self.website_id, self.group_id, self.sort_order, self.store_id)
    }
}

// ============================================================================
// TESTS
// ============================================================================
