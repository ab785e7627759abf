use std::path::PathBuf;

/// A license or copying file found inside a source distribution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LicenseMember {
    /// Full member path inside the archive, e.g. `six-1.16.0/LICENSE`
    pub name: String,
    pub contents: Vec<u8>,
}

/// How a source distribution is packed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SdistKind {
    Tar(Compression),
    Zip,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Compression {
    None,
    Gzip,
    Bzip2,
    Xz,
}

/// Error type for license collection
#[derive(Debug)]
pub enum LicenseError {
    /// Archive extension is neither tar nor zip
    UnsupportedArchive(PathBuf),
    /// License file sits at the archive root, or the archive has several top-level directories
    UnsupportedLayout { archive: PathBuf, detail: String },
    /// No embedded license and no fallback URL configured
    NoLicenseSource(String),
    /// Fallback download failed
    Http { url: String, source: Box<ureq::Error> },
    /// IO error
    IoError(std::io::Error),
}

impl std::fmt::Display for LicenseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LicenseError::UnsupportedArchive(path) => {
                write!(f, "unsupported sdist type: {}", path.display())
            }
            LicenseError::UnsupportedLayout { archive, detail } => {
                write!(f, "unsupported sdist layout in {}: {}", archive.display(), detail)
            }
            LicenseError::NoLicenseSource(lib) => write!(f, "License not found for '{}'", lib),
            LicenseError::Http { url, .. } => write!(f, "Failed to download {}", url),
            LicenseError::IoError(_) => write!(f, "IO error"),
        }
    }
}

impl std::error::Error for LicenseError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LicenseError::Http { source, .. } => Some(source.as_ref()),
            LicenseError::IoError(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for LicenseError {
    fn from(e: std::io::Error) -> Self {
        LicenseError::IoError(e)
    }
}
