//! License collection for vendored libraries.
//!
//! Every configured package is downloaded as a source distribution and its
//! embedded `LICENSE`/`COPYING` files are copied next to the vendored code:
//!
//! - `_vendor/<lib>/LICENSE` when the library is a package directory
//! - `_vendor/<lib>.LICENSE` when it is a single module
//!
//! Distributions without an embedded license fall back to the
//! `hardcoded_license_urls` table in the configuration.

mod archive;
mod download;
mod locate;
mod types;

pub use archive::{extract_license, find_licenses, is_license_name, member_destination, top_level_dir};
pub use download::{TMP_DIRNAME, collect_license, download_licenses, fallback_source, license_fallback};
pub use locate::{libname_from_dir, license_destination};
pub use types::{Compression, LicenseError, LicenseMember, SdistKind};
