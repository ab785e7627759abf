//! Import rewriting for vendored libraries.
//!
//! After packages are installed into `<target>/_vendor`, their sources still
//! import each other as top-level modules. This module rewrites those imports
//! so they resolve through the vendored location:
//!
//! ```text
//! import six                 ->  from mypkg._vendor import six
//! from six.moves import x    ->  from mypkg._vendor.six.moves import x
//! from pkg_resources.extern  ->  from mypkg._vendor
//! ```
//!
//! Rules are applied per library in detection order. Each library's rule is a
//! single left-to-right pass, so its own output is never rescanned, and text
//! already pointing at `<target>._vendor` never matches another library's rule.
//! A library whose name is a prefix of another (`pkg`, `pkg_extra`) therefore
//! cannot corrupt the other's imports.

use anyhow::{Context, Result};
use regex::{Captures, NoExpand, Regex};
use std::fs;
use std::path::Path;
use walkdir::WalkDir;

use crate::config::{VENDOR_DIRNAME, VendyConfig};

/// Extension of files the rewriter touches.
pub const SOURCE_EXTENSION: &str = "py";

/// Compiled substitution rules for one target package.
pub struct ImportRewriter {
    target: String,
    extern_shim: Regex,
    relative_extern: Regex,
    libs: Vec<LibRules>,
}

struct LibRules {
    name: String,
    // Anchored at line starts without consuming the previous line's newline,
    // so adjacent statements all match in one pass.
    statement: Regex,
}

impl ImportRewriter {
    pub fn new(target: &str, vendored_libs: &[String]) -> Result<Self> {
        let mut libs = Vec::with_capacity(vendored_libs.len());
        for lib in vendored_libs {
            let escaped = regex::escape(lib);
            let pattern = format!(
                r"(?m)^(\s*)(?:import {lib}(\n)|from {lib}(\.|\s+))",
                lib = escaped
            );
            libs.push(LibRules {
                name: lib.clone(),
                statement: Regex::new(&pattern)
                    .with_context(|| format!("Invalid import pattern for '{}'", lib))?,
            });
        }

        Ok(Self {
            target: target.to_string(),
            extern_shim: Regex::new(r"pkg_resources\.extern")?,
            relative_extern: Regex::new(r"from \.extern")?,
            libs,
        })
    }

    /// Rewrite one source text.
    pub fn rewrite(&self, text: &str) -> String {
        let vendored = format!("{}.{}", self.target, VENDOR_DIRNAME);
        let from_vendored = format!("from {}", vendored);

        let text = self.extern_shim.replace_all(text, NoExpand(&vendored));
        let mut text = self
            .relative_extern
            .replace_all(&text, NoExpand(&from_vendored))
            .into_owned();

        for lib in &self.libs {
            text = lib
                .statement
                .replace_all(&text, |caps: &Captures| match (caps.get(2), caps.get(3)) {
                    (Some(newline), _) => format!(
                        "{}from {} import {}{}",
                        &caps[1],
                        vendored,
                        lib.name,
                        newline.as_str()
                    ),
                    (None, Some(sep)) => {
                        format!("{}from {}.{}{}", &caps[1], vendored, lib.name, sep.as_str())
                    }
                    (None, None) => caps[0].to_string(),
                })
                .into_owned();
        }

        text
    }

    pub fn rewrite_file(&self, path: &Path) -> Result<()> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let rewritten = self.rewrite(&text);
        fs::write(path, rewritten)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(())
    }

    /// Rewrite every source file under `dir`, recursively.
    pub fn rewrite_tree(&self, dir: &Path) -> Result<usize> {
        let mut count = 0;
        for entry in WalkDir::new(dir).sort_by_file_name() {
            let entry = entry.with_context(|| format!("Failed to walk {}", dir.display()))?;
            if entry.file_type().is_file() && is_source_file(entry.path()) {
                self.rewrite_file(entry.path())?;
                count += 1;
            }
        }
        Ok(count)
    }
}

fn is_source_file(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == SOURCE_EXTENSION)
}

/// Rewrite imports of `vendored_libs` in every source file under `package_dir`.
pub fn rewrite_imports(package_dir: &Path, vendored_libs: &[String], target: &str) -> Result<usize> {
    ImportRewriter::new(target, vendored_libs)?.rewrite_tree(package_dir)
}

/// Rewrite the whole vendor directory.
///
/// Subdirectories are walked recursively; top-level files named in
/// `file_white_list` are left alone.
pub fn rewrite_vendor_tree(config: &VendyConfig, vendored_libs: &[String]) -> Result<usize> {
    let vendor_dir = config.vendor_dir();
    let patches_dir = config.patches_dir();
    let rewriter = ImportRewriter::new(config.target(), vendored_libs)?;

    let mut entries: Vec<_> = fs::read_dir(&vendor_dir)
        .with_context(|| format!("Failed to read {}", vendor_dir.display()))?
        .collect::<Result<_, _>>()?;
    entries.sort_by_key(|e| e.file_name());

    let mut count = 0;
    for entry in entries {
        let path = entry.path();
        if path.is_dir() {
            if path == patches_dir {
                continue;
            }
            count += rewriter.rewrite_tree(&path)?;
        } else if !config.is_whitelisted(&entry.file_name().to_string_lossy())
            && is_source_file(&path)
        {
            rewriter.rewrite_file(&path)?;
            count += 1;
        }
    }

    Ok(count)
}
