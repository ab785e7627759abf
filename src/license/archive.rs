//! License discovery inside source distributions.
//!
//! Both tar (plain, gzip, bzip2, xz) and zip sdists are scanned member by
//! member. A member counts as a license when its name contains `LICENSE` or
//! `COPYING`; members under a `/test` path are fixtures and are skipped.

use super::locate::{libname_from_dir, license_destination};
use super::types::{Compression, LicenseError, LicenseMember, SdistKind};
use crate::config::VendyConfig;
use colored::*;
use std::collections::BTreeSet;
use std::fs::{self, File};
use std::io::{self, BufReader, Read};
use std::path::{Path, PathBuf};

impl SdistKind {
    pub fn from_path(path: &Path) -> Result<Self, LicenseError> {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_lowercase())
            .unwrap_or_default();

        let kind = if name.ends_with(".zip") {
            SdistKind::Zip
        } else if name.ends_with(".tar.gz") || name.ends_with(".tgz") {
            SdistKind::Tar(Compression::Gzip)
        } else if name.ends_with(".tar.bz2") || name.ends_with(".tbz2") {
            SdistKind::Tar(Compression::Bzip2)
        } else if name.ends_with(".tar.xz") || name.ends_with(".txz") {
            SdistKind::Tar(Compression::Xz)
        } else if name.ends_with(".tar") {
            SdistKind::Tar(Compression::None)
        } else {
            return Err(LicenseError::UnsupportedArchive(path.to_path_buf()));
        };

        Ok(kind)
    }
}

pub fn is_license_name(name: &str) -> bool {
    name.contains("LICENSE") || name.contains("COPYING")
}

/// Normal path components of an archive member, ignoring `./` and empty segments.
fn components(name: &str) -> impl Iterator<Item = &str> {
    name.split('/').filter(|part| !part.is_empty() && *part != ".")
}

/// Top-level directory of a member, `None` for members at the archive root.
pub fn top_level_dir(name: &str) -> Option<&str> {
    let mut parts = components(name);
    let first = parts.next()?;
    parts.next().map(|_| first)
}

fn file_name(name: &str) -> &str {
    components(name).last().unwrap_or(name)
}

#[derive(Default)]
struct MemberScan {
    top_levels: BTreeSet<String>,
    licenses: Vec<LicenseMember>,
}

impl MemberScan {
    fn visit<F>(&mut self, name: &str, read: F) -> io::Result<()>
    where
        F: FnOnce() -> io::Result<Vec<u8>>,
    {
        if let Some(first) = components(name).next() {
            self.top_levels.insert(first.to_string());
        }

        if !is_license_name(name) {
            return Ok(());
        }

        // html5lib and distlib ship license fixtures in their test suites
        if name.contains("/test") {
            println!("   {} Ignoring {}", "-".dimmed(), name);
            return Ok(());
        }

        self.licenses.push(LicenseMember {
            name: name.to_string(),
            contents: read()?,
        });
        Ok(())
    }

    fn finish(self, archive: &Path) -> Result<Vec<LicenseMember>, LicenseError> {
        if self.licenses.is_empty() {
            return Ok(self.licenses);
        }

        if let Some(member) = self
            .licenses
            .iter()
            .find(|m| top_level_dir(&m.name).is_none())
        {
            return Err(LicenseError::UnsupportedLayout {
                archive: archive.to_path_buf(),
                detail: format!("license file '{}' is at the archive root", member.name),
            });
        }

        if self.top_levels.len() > 1 {
            let entries: Vec<_> = self.top_levels.into_iter().collect();
            return Err(LicenseError::UnsupportedLayout {
                archive: archive.to_path_buf(),
                detail: format!("multiple top-level entries: {}", entries.join(", ")),
            });
        }

        Ok(self.licenses)
    }
}

fn decoder(file: File, compression: Compression) -> Box<dyn Read> {
    let reader = BufReader::new(file);
    match compression {
        Compression::None => Box::new(reader),
        Compression::Gzip => Box::new(flate2::read::GzDecoder::new(reader)),
        Compression::Bzip2 => Box::new(bzip2::read::BzDecoder::new(reader)),
        Compression::Xz => Box::new(xz2::read::XzDecoder::new(reader)),
    }
}

fn scan_tar(reader: impl Read, scan: &mut MemberScan) -> io::Result<()> {
    let mut archive = tar::Archive::new(reader);
    for entry in archive.entries()? {
        let mut entry = entry?;
        if !entry.header().entry_type().is_file() {
            continue;
        }
        let name = entry.path()?.to_string_lossy().into_owned();
        scan.visit(&name, || {
            let mut contents = Vec::new();
            entry.read_to_end(&mut contents)?;
            Ok(contents)
        })?;
    }
    Ok(())
}

fn scan_zip(file: File, scan: &mut MemberScan) -> io::Result<()> {
    let mut archive = zip::ZipArchive::new(BufReader::new(file)).map_err(io::Error::other)?;
    for i in 0..archive.len() {
        let mut entry = archive.by_index(i).map_err(io::Error::other)?;
        if entry.is_dir() {
            continue;
        }
        let name = entry.name().to_string();
        scan.visit(&name, || {
            let mut contents = Vec::new();
            entry.read_to_end(&mut contents)?;
            Ok(contents)
        })?;
    }
    Ok(())
}

/// Read every license member of `sdist` into memory.
pub fn find_licenses(sdist: &Path) -> Result<Vec<LicenseMember>, LicenseError> {
    let kind = SdistKind::from_path(sdist)?;
    let file = File::open(sdist)?;

    let mut scan = MemberScan::default();
    match kind {
        SdistKind::Zip => scan_zip(file, &mut scan)?,
        SdistKind::Tar(compression) => scan_tar(decoder(file, compression), &mut scan)?,
    }

    scan.finish(sdist)
}

/// Where `member` should be written, based on its top-level directory.
pub fn member_destination(config: &VendyConfig, member: &LicenseMember) -> PathBuf {
    let dirname = top_level_dir(&member.name).unwrap_or_default();
    let libname = libname_from_dir(dirname);
    license_destination(config, &libname, file_name(&member.name))
}

/// Copy every embedded license of `sdist` into the vendor tree.
///
/// Returns `false` when the archive has no license members, in which case the
/// caller falls back to a configured URL.
pub fn extract_license(config: &VendyConfig, sdist: &Path) -> Result<bool, LicenseError> {
    let members = find_licenses(sdist)?;

    for member in &members {
        let dest = member_destination(config, member);
        println!(
            "   {} Extracting {} into {}",
            "+".green(),
            member.name,
            config.display_path(&dest)
        );
        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&dest, &member.contents)?;
    }

    Ok(!members.is_empty())
}
