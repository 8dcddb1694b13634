//! List the exported functions and methods of Go packages.
//!
//! The crate is split into a pure core and the plumbing around it. The core
//! ([`visibility`] and [`render`]) decides which declarations are exported and renders
//! their signatures; it works on the owned declaration model in [`ast`] and holds no
//! configuration. The [`loader`] turns package arguments into parsed files, and
//! [`listing`] ties both together.
//!
//! ```no_run
//! use gofuncs::{LoadConfig, Renderer, list_exported_signatures, load_packages};
//!
//! let config = LoadConfig::from_env();
//! for package in load_packages(&config, &["./"])? {
//! 	for file in &package.files {
//! 		for line in list_exported_signatures(file, &Renderer::default())? {
//! 			println!("{line}");
//! 		}
//! 	}
//! }
//! # Ok::<(), gofuncs::Error>(())
//! ```

/// Owned view of Go declarations and type expressions.
pub mod ast;

/// Error types of the listing core.
pub mod error;

/// Per-file and per-package listings.
pub mod listing;

/// Locating, filtering and parsing Go source files.
pub mod loader;

/// Signature and type-expression rendering.
pub mod render;

/// Export rule for declarations.
pub mod visibility;

pub use crate::error::{Error, Result};
pub use crate::listing::{ListEntry, PackageListing, list_exported_names, list_exported_signatures, list_package};
pub use crate::loader::{LoadConfig, LoadError, Package, load_packages, parse_build_tags};
pub use crate::render::Renderer;
pub use crate::visibility::{is_exported, is_upper};
