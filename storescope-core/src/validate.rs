//! Cross-entity hierarchy validation.
//!
//! [`validate_hierarchy`] is the single acceptance gate for a candidate
//! Website/Group/Store triple. It is pure and reports the first violation,
//! checking websites, then groups, then stores, then the default-website
//! cardinality.

use crate::{
    EntityType, GroupCollection, ScopeResult, StoreCollection, ValidationError,
    WebsiteCollection,
};

/// Check every referential invariant of the hierarchy.
///
/// An entirely empty triple is valid.
pub fn validate_hierarchy(
    websites: &WebsiteCollection,
    groups: &GroupCollection,
    stores: &StoreCollection,
) -> ScopeResult<()> {
    websites.validate()?;
    for website in websites {
        let group = groups
            .by_id(website.default_group_id)
            .ok_or(ValidationError::MissingReference {
                entity_type: EntityType::Website,
                id: website.website_id,
                target: EntityType::Group,
                target_id: website.default_group_id,
            })?;
        if group.website_id != website.website_id {
            return Err(ValidationError::ReferenceMismatch {
                entity_type: EntityType::Website,
                id: website.website_id,
                target: EntityType::Group,
                target_id: group.group_id,
                owner: EntityType::Website,
                owner_id: group.website_id,
                expected_owner_id: website.website_id,
            }
            .into());
        }
    }

    groups.validate()?;
    for group in groups {
        if websites.by_id(group.website_id).is_none() {
            return Err(ValidationError::MissingReference {
                entity_type: EntityType::Group,
                id: group.group_id,
                target: EntityType::Website,
                target_id: group.website_id,
            }
            .into());
        }
        let store = stores
            .by_id(group.default_store_id)
            .ok_or(ValidationError::MissingReference {
                entity_type: EntityType::Group,
                id: group.group_id,
                target: EntityType::Store,
                target_id: group.default_store_id,
            })?;
        if store.group_id != group.group_id {
            return Err(ValidationError::ReferenceMismatch {
                entity_type: EntityType::Group,
                id: group.group_id,
                target: EntityType::Store,
                target_id: store.store_id,
                owner: EntityType::Group,
                owner_id: store.group_id,
                expected_owner_id: group.group_id,
            }
            .into());
        }
    }

    stores.validate()?;
    for store in stores {
        if websites.by_id(store.website_id).is_none() {
            return Err(ValidationError::MissingReference {
                entity_type: EntityType::Store,
                id: store.store_id,
                target: EntityType::Website,
                target_id: store.website_id,
            }
            .into());
        }
        let group = groups
            .by_id(store.group_id)
            .ok_or(ValidationError::MissingReference {
                entity_type: EntityType::Store,
                id: store.store_id,
                target: EntityType::Group,
                target_id: store.group_id,
            })?;
        if group.website_id != store.website_id {
            return Err(ValidationError::ReferenceMismatch {
                entity_type: EntityType::Store,
                id: store.store_id,
                target: EntityType::Group,
                target_id: group.group_id,
                owner: EntityType::Website,
                owner_id: group.website_id,
                expected_owner_id: store.website_id,
            }
            .into());
        }
    }

    validate_default_website(websites)
}

/// Exactly one default website once any website exists.
pub fn validate_default_website(websites: &WebsiteCollection) -> ScopeResult<()> {
    if websites.is_empty() {
        return Ok(());
    }
    let defaults: Vec<u32> = websites
        .iter()
        .filter(|w| w.is_default)
        .map(|w| w.website_id)
        .collect();
    match defaults.len() {
        0 => Err(ValidationError::NoDefaultWebsite.into()),
        1 => Ok(()),
        _ => Err(ValidationError::TooManyDefaultWebsites { ids: defaults }.into()),
    }
}

// ============================================================================
// TESTS
// ============================================================================
