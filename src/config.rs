//! Configuration for batch runs.
//!
//! Read from `.teifix.yaml` in the working directory, or from a file given
//! on the command line. Command line flags override what the file says.
//!
//! ```yaml
//! transforms: [head, teiheader]
//! extensions: [xml, tei]
//! jobs: 4
//! fail_fast: false
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::batch::has_extension;
use crate::error::Error;
use crate::registry::{Category, Registry};

/// Name of the configuration file picked up from the working directory.
pub const DEFAULT_CONFIG_FILE: &str = ".teifix.yaml";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Transformation categories to enable. Empty means all of them.
    pub transforms: Vec<String>,
    /// File extensions picked up when walking directories.
    pub extensions: Vec<String>,
    /// Number of parallel jobs (0 = one per CPU).
    pub jobs: usize,
    /// Stop at the first file that fails.
    pub fail_fast: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            transforms: Vec::new(),
            extensions: vec!["xml".to_string()],
            jobs: 0,
            fail_fast: false,
        }
    }
}

impl Config {
    /// Parse configuration from YAML.
    pub fn from_yaml(yaml: &str) -> Result<Self, Error> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Load configuration from a file.
    pub fn load(path: &Path) -> Result<Self, Error> {
        let yaml = std::fs::read_to_string(path)?;
        Self::from_yaml(&yaml)
    }

    /// Load the configuration file from `dir` if there is one, the defaults
    /// otherwise.
    pub fn discover(dir: &Path) -> Result<Self, Error> {
        let path = dir.join(DEFAULT_CONFIG_FILE);
        if path.is_file() {
            log::debug!("loading configuration from {}", path.display());
            Self::load(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// The enabled categories, checked against the known ones.
    pub fn categories(&self) -> Result<Vec<Category>, Error> {
        if self.transforms.is_empty() {
            return Ok(Category::ALL.to_vec());
        }
        self.transforms.iter().map(|name| name.parse()).collect()
    }

    /// A registry with the enabled categories.
    pub fn registry(&self) -> Result<Registry, Error> {
        Ok(Registry::from_categories(self.categories()?))
    }

    /// Whether a path has one of the configured extensions.
    pub fn matches_extension(&self, path: &Path) -> bool {
        has_extension(path, &self.extensions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::from_yaml("{}").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.categories().unwrap(), Category::ALL.to_vec());
    }

    #[test]
    fn test_from_yaml() {
        let config = Config::from_yaml(
            "transforms: [head, TeiHeader]\nextensions: [.tei]\njobs: 2\nfail_fast: true\n",
        )
        .unwrap();
        assert_eq!(
            config.categories().unwrap(),
            vec![Category::Head, Category::TeiHeader]
        );
        assert_eq!(config.jobs, 2);
        assert!(config.fail_fast);
        assert!(config.matches_extension(Path::new("corpus/a.TEI")));
        assert!(!config.matches_extension(Path::new("corpus/a.xml")));
    }

    #[test]
    fn test_unknown_field_is_rejected() {
        assert!(matches!(
            Config::from_yaml("transform: [head]"),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn test_unknown_category_is_rejected() {
        let config = Config::from_yaml("transforms: [lists]").unwrap();
        assert!(matches!(
            config.registry(),
            Err(Error::UnknownCategory(name)) if name == "lists"
        ));
    }

    #[test]
    fn test_discover_without_file() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(Config::discover(dir.path()).unwrap(), Config::default());
    }
}
