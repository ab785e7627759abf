//! License collection driver and URL fallback.

use super::archive::extract_license;
use super::locate::{libname_from_dir, license_destination};
use super::types::LicenseError;
use crate::config::VendyConfig;
use crate::pip;
use anyhow::{Context, Result};
use colored::*;
use std::fs;
use std::path::{Path, PathBuf};

/// Scratch directory for downloaded sdists, inside the vendor directory.
pub const TMP_DIRNAME: &str = "__tmp__";

/// Resolve the fallback URL and destination for a distribution with no
/// embedded license.
pub fn fallback_source(
    config: &VendyConfig,
    sdist_name: &str,
) -> Result<(String, PathBuf), LicenseError> {
    let libname = libname_from_dir(sdist_name);
    let url = config
        .hardcoded_license_urls
        .get(&libname)
        .ok_or_else(|| LicenseError::NoLicenseSource(libname.clone()))?;

    let filename = url.rsplit('/').next().unwrap_or(url);
    let dest = license_destination(config, &libname, filename);
    Ok((url.clone(), dest))
}

fn fetch(url: &str) -> Result<Vec<u8>, LicenseError> {
    let http_error = |e| LicenseError::Http {
        url: url.to_string(),
        source: Box::new(e),
    };

    let mut response = ureq::get(url).call().map_err(http_error)?;
    response.body_mut().read_to_vec().map_err(http_error)
}

/// Download the configured license for `sdist_name`.
pub fn license_fallback(config: &VendyConfig, sdist_name: &str) -> Result<PathBuf, LicenseError> {
    let (url, dest) = fallback_source(config, sdist_name)?;

    println!("   {} Downloading {}", "⬇".blue(), url);
    let contents = fetch(&url)?;

    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&dest, contents)?;
    Ok(dest)
}

/// Extract the licenses of one sdist, downloading one if none is embedded.
pub fn collect_license(config: &VendyConfig, sdist: &Path) -> Result<(), LicenseError> {
    if extract_license(config, sdist)? {
        return Ok(());
    }

    let sdist_name = sdist
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    println!(
        "   {} License not found in {}, will download",
        "!".yellow(),
        sdist_name
    );
    license_fallback(config, &sdist_name)?;
    Ok(())
}

/// Download every configured package as an sdist and collect its licenses.
pub fn download_licenses(config: &VendyConfig) -> Result<()> {
    println!("{} Downloading licenses", "📜".blue());

    let tmp_dir = config.vendor_dir().join(TMP_DIRNAME);
    pip::run_pip(
        pip::download_args(&tmp_dir, &config.packages),
        "Downloading source distributions...",
    )?;

    let mut sdists: Vec<PathBuf> = fs::read_dir(&tmp_dir)
        .with_context(|| format!("Failed to read {}", tmp_dir.display()))?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<Result<_, _>>()?;
    sdists.sort();

    for sdist in &sdists {
        collect_license(config, sdist)
            .with_context(|| format!("Failed to collect license from {}", sdist.display()))?;
    }

    fs::remove_dir_all(&tmp_dir)
        .with_context(|| format!("Failed to remove {}", tmp_dir.display()))?;
    Ok(())
}
