//! Type stub generation for vendored libraries.
//!
//! Each vendored library gets a `.pyi` re-export stub so type checkers
//! resolve `<target>._vendor.<lib>` to the real package:
//!
//! ```text
//! _vendor/six.pyi            from six import *
//! _vendor/six/moves.pyi      from six.moves import *     (extra_stubs_needed)
//! ```

use crate::config::VendyConfig;
use crate::vendor::detect_vendored_libs;
use anyhow::{Context, Result};
use colored::*;
use std::fs;
use std::path::PathBuf;

/// Stub file path (relative to the vendor directory) and the module it re-exports.
pub fn stub_for_selector(selector: &str) -> (PathBuf, String) {
    let mut path: PathBuf = selector.split('.').collect();
    path.set_extension("pyi");
    let module = selector.strip_suffix(".__init__").unwrap_or(selector);
    (path, module.to_string())
}

pub fn update_stubs(config: &VendyConfig) -> Result<Vec<PathBuf>> {
    let vendor_dir = config.vendor_dir();
    let vendored_libs = detect_vendored_libs(config)?;

    println!("{} Add mypy stubs", "📝".blue());

    let mut written = Vec::new();
    for lib in &vendored_libs {
        let stubs: Vec<(PathBuf, String)> = match config.extra_stubs_needed.get(lib) {
            Some(selectors) => selectors.iter().map(|s| stub_for_selector(s)).collect(),
            None => vec![(PathBuf::from(format!("{}.pyi", lib)), lib.clone())],
        };

        for (relative, module) in stubs {
            let path = vendor_dir.join(relative);
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(&path, format!("from {} import *", module))
                .with_context(|| format!("Failed to write stub {}", path.display()))?;
            written.push(path);
        }
    }

    println!("   {} Wrote {} stubs", "✓".green(), written.len());
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stub_for_selector() {
        assert_eq!(
            stub_for_selector("six.moves"),
            (PathBuf::from("six").join("moves.pyi"), "six.moves".to_string())
        );
        assert_eq!(
            stub_for_selector("six.__init__"),
            (PathBuf::from("six").join("__init__.pyi"), "six".to_string())
        );
    }

    #[test]
    fn test_update_stubs() -> Result<()> {
        let tmp = tempfile::tempdir()?;
        let mut config = VendyConfig::new(tmp.path(), "host", &["six", "packaging"]);
        config.extra_stubs_needed.insert(
            "packaging".to_string(),
            vec!["packaging.__init__".to_string(), "packaging.version".to_string()],
        );

        let vendor = config.vendor_dir();
        fs::create_dir_all(vendor.join("packaging"))?;
        fs::write(vendor.join("six.py"), "")?;

        let written = update_stubs(&config)?;

        assert_eq!(written.len(), 3);
        assert_eq!(fs::read_to_string(vendor.join("six.pyi"))?, "from six import *");
        assert_eq!(
            fs::read_to_string(vendor.join("packaging").join("__init__.pyi"))?,
            "from packaging import *"
        );
        assert_eq!(
            fs::read_to_string(vendor.join("packaging").join("version.pyi"))?,
            "from packaging.version import *"
        );
        // Generated stubs are not detected as libraries on the next run
        assert_eq!(detect_vendored_libs(&config)?, vec!["packaging", "six"]);
        Ok(())
    }
}
