//! Hierarchy sources.
//!
//! A [`HierarchySource`] supplies the raw records for a load. Database
//! adapters implement it elsewhere; this module ships an in-memory
//! [`StaticSource`] and a file-backed [`YamlSource`].
//!
//! YAML documents have three optional top-level lists:
//!
//! ```yaml
//! websites:
//!   - { website_id: 1, code: euro, default_group_id: 1, is_default: true }
//! groups:
//!   - { group_id: 1, website_id: 1, default_store_id: 1 }
//! stores:
//!   - { store_id: 1, code: de, website_id: 1, group_id: 1, is_active: true }
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use storescope_core::{ConfigError, Group, ScopeError, ScopeResult, Store, Website};

/// Supplier of hierarchy records, queried synchronously by
/// [`crate::Service::options`]. Any error aborts that load.
pub trait HierarchySource: Send + Sync {
    fn select_websites(&self) -> ScopeResult<Vec<Website>>;

    fn select_groups(&self) -> ScopeResult<Vec<Group>>;

    fn select_stores(&self) -> ScopeResult<Vec<Store>>;

    /// All three kinds at once. Override when one round trip can serve
    /// everything.
    fn select_all(&self) -> ScopeResult<StaticSource> {
        Ok(StaticSource {
            websites: self.select_websites()?,
            groups: self.select_groups()?,
            stores: self.select_stores()?,
        })
    }
}

/// Records held in memory.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StaticSource {
    pub websites: Vec<Website>,
    pub groups: Vec<Group>,
    pub stores: Vec<Store>,
}

impl StaticSource {
    pub fn new(websites: Vec<Website>, groups: Vec<Group>, stores: Vec<Store>) -> Self {
        Self {
            websites,
            groups,
            stores,
        }
    }

    /// Decode a YAML hierarchy document.
    pub fn from_yaml_str(content: &str) -> ScopeResult<Self> {
        serde_yaml::from_str(content).map_err(|e| {
            ScopeError::Config(ConfigError::Parse {
                reason: e.to_string(),
            })
        })
    }
}

impl HierarchySource for StaticSource {
    fn select_websites(&self) -> ScopeResult<Vec<Website>> {
        Ok(self.websites.clone())
    }

    fn select_groups(&self) -> ScopeResult<Vec<Group>> {
        Ok(self.groups.clone())
    }

    fn select_stores(&self) -> ScopeResult<Vec<Store>> {
        Ok(self.stores.clone())
    }

    fn select_all(&self) -> ScopeResult<StaticSource> {
        Ok(self.clone())
    }
}

/// A YAML hierarchy document on disk, re-read on every load.
#[derive(Debug, Clone)]
pub struct YamlSource {
    path: PathBuf,
}

impl YamlSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> ScopeResult<StaticSource> {
        let content = std::fs::read_to_string(&self.path).map_err(|e| {
            ScopeError::Config(ConfigError::Io {
                path: self.path.display().to_string(),
                reason: e.to_string(),
            })
        })?;
        StaticSource::from_yaml_str(&content)
    }
}

impl HierarchySource for YamlSource {
    fn select_websites(&self) -> ScopeResult<Vec<Website>> {
        Ok(self.read()?.websites)
    }

    fn select_groups(&self) -> ScopeResult<Vec<Group>> {
        Ok(self.read()?.groups)
    }

    fn select_stores(&self) -> ScopeResult<Vec<Store>> {
        Ok(self.read()?.stores)
    }

    fn select_all(&self) -> ScopeResult<StaticSource> {
        self.read()
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{with_source, Service};
    use std::io::Write;

    const DOCUMENT: &str = r#"
websites:
  - { website_id: 1, code: euro, name: Europe, default_group_id: 1, is_default: true }
groups:
  - { group_id: 1, website_id: 1, name: DACH, default_store_id: 1 }
stores:
  - { store_id: 1, code: de, website_id: 1, group_id: 1, is_active: true }
  - { store_id: 2, code: at, website_id: 1, group_id: 1, sort_order: 20 }
"#;

    #[test]
    fn test_static_source_from_yaml_str() {
        let source = StaticSource::from_yaml_str(DOCUMENT).unwrap();
        assert_eq!(source.websites.len(), 1);
        assert_eq!(source.websites[0].name.as_deref(), Some("Europe"));
        assert_eq!(source.groups[0].name, "DACH");
        assert_eq!(source.stores.len(), 2);
        assert!(!source.stores[1].is_active);
    }

    #[test]
    fn test_empty_document_is_empty_source() {
        let source = StaticSource::from_yaml_str("{}").unwrap();
        assert_eq!(source, StaticSource::default());
    }

    #[test]
    fn test_yaml_rejects_unknown_top_level_key() {
        let err = StaticSource::from_yaml_str("tenants: []\n").unwrap_err();
        assert!(matches!(err, ScopeError::Config(ConfigError::Parse { .. })));
    }

    #[test]
    fn test_yaml_rejects_missing_required_field() {
        let err = StaticSource::from_yaml_str("stores:\n  - { store_id: 1, code: de }\n")
            .unwrap_err();
        assert!(matches!(err, ScopeError::Config(ConfigError::Parse { .. })));
    }

    #[test]
    fn test_yaml_source_loads_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(DOCUMENT.as_bytes()).unwrap();

        let service = Service::default();
        service
            .options([with_source(YamlSource::new(file.path()))])
            .unwrap();
        assert_eq!(service.default_store_view().unwrap().code, "de");
        assert_eq!(service.stores().unwrap().len(), 2);
    }

    #[test]
    fn test_yaml_source_missing_file() {
        let source = YamlSource::new("/nonexistent/storescope/hierarchy.yaml");
        let err = source.select_all().unwrap_err();
        assert!(matches!(err, ScopeError::Config(ConfigError::Io { .. })));

        let service = Service::default();
        assert!(service.options([with_source(source)]).is_err());
        assert!(service.websites().unwrap().is_empty());
    }
}
