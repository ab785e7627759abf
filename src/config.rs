//! Configuration parsing (`[tool.vendy]` in `pyproject.toml`).
//!
//! ## Example
//!
//! ```toml
//! [tool.vendy]
//! target = "mypkg"
//! packages = ["six==1.16.0", "requests==2.25.1"]
//! file_white_list = ["__init__.py", "vendor.txt"]
//! drop_dir = ["bin"]
//!
//! [tool.vendy.library_dirnames]
//! typing-extensions = "typing_extensions"
//!
//! [tool.vendy.hardcoded_license_urls]
//! webencodings = "https://github.com/SimonSapin/python-webencodings/raw/master/LICENSE"
//! ```

use serde::Deserialize;
use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

/// Patterns removed after every install, on top of `remove_all`.
const ALWAYS_REMOVE: [&str; 2] = ["*.dist-info", "*.egg-info"];

/// Name of the vendor directory inside the target package.
pub const VENDOR_DIRNAME: &str = "_vendor";

#[derive(Deserialize, Debug, Default, Clone)]
pub struct VendyConfig {
    pub target: Option<String>,
    #[serde(default)]
    pub packages: Vec<String>,
    #[serde(default)]
    pub file_white_list: Vec<String>,
    #[serde(default)]
    pub library_dirnames: HashMap<String, String>,
    #[serde(default)]
    pub hardcoded_license_urls: HashMap<String, String>,
    #[serde(default)]
    pub extra_stubs_needed: HashMap<String, Vec<String>>,
    #[serde(default)]
    pub remove_all: Vec<String>,
    #[serde(default)]
    pub drop_dir: Vec<String>,
    pub patches_dir: Option<PathBuf>,

    /// Directory holding `pyproject.toml`. Filled in by [`load_config`].
    #[serde(skip)]
    pub root: PathBuf,
}

#[derive(Deserialize, Debug, Default)]
struct PyProject {
    #[serde(default)]
    tool: ToolTable,
}

#[derive(Deserialize, Debug, Default)]
struct ToolTable {
    vendy: Option<toml::Value>,
}

impl VendyConfig {
    /// Build a config rooted at `root` with everything else defaulted.
    pub fn new(root: impl Into<PathBuf>, target: &str, packages: &[&str]) -> Self {
        Self {
            target: Some(target.to_string()),
            packages: packages.iter().map(|p| p.to_string()).collect(),
            root: root.into(),
            ..Default::default()
        }
    }

    pub fn target(&self) -> &str {
        self.target.as_deref().unwrap_or_default()
    }

    pub fn vendor_dir(&self) -> PathBuf {
        self.root.join(self.target()).join(VENDOR_DIRNAME)
    }

    pub fn patches_dir(&self) -> PathBuf {
        match &self.patches_dir {
            Some(dir) => self.root.join(dir),
            None => self.vendor_dir().join("_patches"),
        }
    }

    /// Glob patterns to delete after install.
    pub fn remove_patterns(&self) -> Vec<String> {
        self.remove_all
            .iter()
            .cloned()
            .chain(ALWAYS_REMOVE.iter().map(|p| p.to_string()))
            .collect()
    }

    pub fn is_whitelisted(&self, name: &str) -> bool {
        self.file_white_list.iter().any(|f| f == name)
    }

    /// Show `path` relative to the project root when possible.
    pub fn display_path<'a>(&self, path: &'a Path) -> std::path::Display<'a> {
        path.strip_prefix(&self.root).unwrap_or(path).display()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// File unreadable or not valid TOML
    Invalid,
    /// No `[tool.vendy]` table
    NotConfigured,
    /// `target` missing or empty
    MissingTarget,
    /// `packages` missing or empty
    NoPackages,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self {
            ConfigError::Invalid => "pyproject.toml invalid or misformatted",
            ConfigError::NotConfigured => "pyproject.toml not configured",
            ConfigError::MissingTarget => "'target' field missing",
            ConfigError::NoPackages => "no packages to vendor",
        };
        write!(f, "Error reading configuration file: {}", reason)
    }
}

impl std::error::Error for ConfigError {}

/// Parse the contents of a `pyproject.toml` and validate the vendy table.
pub fn parse_config(content: &str, root: &Path) -> Result<VendyConfig, ConfigError> {
    let pyproject: PyProject = toml::from_str(content).map_err(|_| ConfigError::Invalid)?;

    let table = match pyproject.tool.vendy {
        Some(toml::Value::Table(t)) if !t.is_empty() => t,
        _ => return Err(ConfigError::NotConfigured),
    };

    let mut config: VendyConfig = toml::Value::Table(table)
        .try_into()
        .map_err(|_| ConfigError::Invalid)?;
    config.root = root.to_path_buf();

    if config.target().is_empty() {
        return Err(ConfigError::MissingTarget);
    }
    if config.packages.is_empty() {
        return Err(ConfigError::NoPackages);
    }

    Ok(config)
}

pub fn load_config(path: &Path) -> Result<VendyConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(|_| ConfigError::Invalid)?;

    let root = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => std::env::current_dir().map_err(|_| ConfigError::Invalid)?,
    };

    parse_config(&content, &root)
}

#[cfg(test)]
mod tests {
    use super::*;

    const FULL: &str = r#"
[project]
name = "host"

[tool.vendy]
target = "host"
packages = ["six==1.16.0", "typing-extensions==4.1.1"]
file_white_list = ["__init__.py"]
remove_all = ["*/tests"]
drop_dir = ["bin"]

[tool.vendy.library_dirnames]
typing-extensions = "typing_extensions"

[tool.vendy.hardcoded_license_urls]
webencodings = "https://example.org/LICENSE"

[tool.vendy.extra_stubs_needed]
six = ["six.__init__", "six.moves"]
"#;

    #[test]
    fn test_parse_full_config() {
        let config = parse_config(FULL, Path::new("/proj")).unwrap();
        assert_eq!(config.target(), "host");
        assert_eq!(config.packages.len(), 2);
        assert_eq!(config.vendor_dir(), Path::new("/proj/host/_vendor"));
        assert_eq!(
            config.library_dirnames.get("typing-extensions").unwrap(),
            "typing_extensions"
        );
        assert_eq!(config.extra_stubs_needed["six"].len(), 2);
        assert!(config.is_whitelisted("__init__.py"));
        assert!(!config.is_whitelisted("six.py"));
    }

    #[test]
    fn test_remove_patterns_always_include_metadata() {
        let config = parse_config(FULL, Path::new("/proj")).unwrap();
        assert_eq!(
            config.remove_patterns(),
            vec!["*/tests", "*.dist-info", "*.egg-info"]
        );
    }

    #[test]
    fn test_patches_dir_default_and_override() {
        let mut config = VendyConfig::new("/proj", "host", &["six"]);
        assert_eq!(config.patches_dir(), Path::new("/proj/host/_vendor/_patches"));
        config.patches_dir = Some(PathBuf::from("patches"));
        assert_eq!(config.patches_dir(), Path::new("/proj/patches"));
    }

    #[test]
    fn test_invalid_toml() {
        let err = parse_config("[tool.vendy\n", Path::new(".")).unwrap_err();
        assert_eq!(err, ConfigError::Invalid);
    }

    #[test]
    fn test_missing_table() {
        let err = parse_config("[project]\nname = \"x\"\n", Path::new(".")).unwrap_err();
        assert_eq!(err, ConfigError::NotConfigured);
        assert_eq!(
            err.to_string(),
            "Error reading configuration file: pyproject.toml not configured"
        );
    }

    #[test]
    fn test_missing_target() {
        let err = parse_config("[tool.vendy]\npackages = [\"six\"]\n", Path::new(".")).unwrap_err();
        assert_eq!(err, ConfigError::MissingTarget);
    }

    #[test]
    fn test_no_packages() {
        let err = parse_config("[tool.vendy]\ntarget = \"host\"\n", Path::new(".")).unwrap_err();
        assert_eq!(err, ConfigError::NoPackages);
    }

    #[test]
    fn test_wrong_field_type_is_invalid() {
        let err = parse_config(
            "[tool.vendy]\ntarget = \"host\"\npackages = \"six\"\n",
            Path::new("."),
        )
        .unwrap_err();
        assert_eq!(err, ConfigError::Invalid);
    }
}
