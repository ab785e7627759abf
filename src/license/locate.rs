//! Library names and license destinations.

use crate::config::VendyConfig;
use std::path::PathBuf;

/// Reconstruct the library name from a distribution name by dropping the version.
///
/// Keeps hyphen-separated segments up to the first one starting with a digit:
/// `typing-extensions-4.1.1` -> `typing-extensions`.
pub fn libname_from_dir(dirname: &str) -> String {
    dirname
        .split('-')
        .take_while(|part| !part.starts_with(|c: char| c.is_ascii_digit()))
        .collect::<Vec<_>>()
        .join("-")
}

/// Pick where a license file for `libname` lands inside the vendor directory.
///
/// Priority: existing `<libname>/` dir, existing lower-cased dir, the
/// `library_dirnames` mapping, then `<libname>.<filename>` next to the
/// single-module libraries.
pub fn license_destination(config: &VendyConfig, libname: &str, filename: &str) -> PathBuf {
    let vendor_dir = config.vendor_dir();

    let normal = vendor_dir.join(libname);
    if normal.is_dir() {
        return normal.join(filename);
    }

    let lowercase = vendor_dir.join(libname.to_lowercase());
    if lowercase.is_dir() {
        return lowercase.join(filename);
    }

    if let Some(dirname) = config.library_dirnames.get(libname) {
        return vendor_dir.join(dirname).join(filename);
    }

    vendor_dir.join(format!("{}.{}", libname, filename))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_libname_simple() {
        assert_eq!(libname_from_dir("six-1.16.0"), "six");
        assert_eq!(libname_from_dir("requests-2.25.1"), "requests");
    }

    #[test]
    fn test_libname_hyphenated() {
        assert_eq!(libname_from_dir("typing-extensions-4.1.1"), "typing-extensions");
        assert_eq!(libname_from_dir("typing-extensions-4.0.0"), "typing-extensions");
    }

    #[test]
    fn test_libname_from_archive_filename() {
        assert_eq!(libname_from_dir("six-1.16.0.tar.gz"), "six");
        assert_eq!(libname_from_dir("webencodings-0.5.1.zip"), "webencodings");
    }

    #[test]
    fn test_libname_without_version() {
        assert_eq!(libname_from_dir("attrs"), "attrs");
    }

    #[test]
    fn test_destination_existing_dir() -> anyhow::Result<()> {
        let tmp = tempfile::tempdir()?;
        let config = VendyConfig::new(tmp.path(), "host", &["six"]);
        fs::create_dir_all(config.vendor_dir().join("six"))?;

        assert_eq!(
            license_destination(&config, "six", "LICENSE"),
            config.vendor_dir().join("six").join("LICENSE")
        );
        Ok(())
    }

    #[test]
    fn test_destination_lowercase_dir() -> anyhow::Result<()> {
        let tmp = tempfile::tempdir()?;
        let config = VendyConfig::new(tmp.path(), "host", &["Jinja2"]);
        fs::create_dir_all(config.vendor_dir().join("jinja2"))?;

        let dest = license_destination(&config, "Jinja2", "LICENSE.rst");
        // Case-insensitive filesystems already hit the first rule
        assert!(
            dest == config.vendor_dir().join("jinja2").join("LICENSE.rst")
                || dest == config.vendor_dir().join("Jinja2").join("LICENSE.rst")
        );
        Ok(())
    }

    #[test]
    fn test_destination_mapped_dirname() -> anyhow::Result<()> {
        let tmp = tempfile::tempdir()?;
        let mut config = VendyConfig::new(tmp.path(), "host", &["setuptools"]);
        config
            .library_dirnames
            .insert("setuptools".to_string(), "pkg_resources".to_string());

        assert_eq!(
            license_destination(&config, "setuptools", "LICENSE"),
            config.vendor_dir().join("pkg_resources").join("LICENSE")
        );
        Ok(())
    }

    #[test]
    fn test_destination_fallback_for_single_module() -> anyhow::Result<()> {
        let tmp = tempfile::tempdir()?;
        let config = VendyConfig::new(tmp.path(), "host", &["typing-extensions"]);
        fs::create_dir_all(config.vendor_dir())?;

        assert_eq!(
            license_destination(&config, "typing-extensions", "LICENSE"),
            config.vendor_dir().join("typing-extensions.LICENSE")
        );
        Ok(())
    }
}
