//! # vendy - Vendor Python packages into your project
//!
//! vendy installs third-party packages into `<target>/_vendor`, rewrites their
//! imports to resolve through the vendored location, and collects a license
//! file for every vendored dependency.
//!
//! ## Quick Start
//!
//! ```toml
//! # pyproject.toml
//! [tool.vendy]
//! target = "mypkg"
//! packages = ["six==1.16.0"]
//! ```
//!
//! ```bash
//! vendy              # vendor, rewrite imports, collect licenses
//! vendy update-stubs # same, then write .pyi stubs
//! ```
//!
//! ## Module Organization
//!
//! - [`config`] - Configuration parsing (`[tool.vendy]`)
//! - [`vendor`] - Clean, install, detect and patch
//! - [`rewrite`] - Import rewriting
//! - [`license`] - License discovery and fallback download
//! - [`stubs`] - Type stub generation

/// Configuration parsing (`pyproject.toml`).
pub mod config;

/// License collection from source distributions.
pub mod license;

/// `pip` invocation.
pub mod pip;

/// Import rewriting for vendored libraries.
pub mod rewrite;

/// Type stub generation.
pub mod stubs;

/// Vendor directory pipeline.
pub mod vendor;
