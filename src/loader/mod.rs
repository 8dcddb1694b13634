//! Loading of Go packages from disk.
//!
//! Arguments resolve to directories (see [`target::resolve`]), directories to buildable
//! files (file-name suffixes, build constraints, test inclusion), and files to parsed
//! [`SourceFile`]s grouped by their package clause.

mod config;
mod constraint;
mod error;
pub mod parse;
pub mod target;

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, trace};

pub use self::config::{LoadConfig, parse_build_tags};
pub use self::error::LoadError;
use self::target::Target;
use crate::ast::SourceFile;

/// A package: the parsed files of one directory sharing a package clause.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Package {
	/// Name from the `package` clause.
	pub name: String,
	/// Directory holding the files.
	pub dir: PathBuf,
	/// Parsed files, sorted by name with non-test files first.
	pub files: Vec<SourceFile>,
}

/// Load every package named by `args`, in argument order.
///
/// A directory yields its package and, when tests are included, its external `_test`
/// package right after it.
pub fn load_packages<S: AsRef<str>>(config: &LoadConfig, args: &[S]) -> Result<Vec<Package>, LoadError> {
	let mut packages = Vec::new();
	for arg in args {
		let arg = arg.as_ref();
		let targets = target::resolve(arg, config)?;
		let wildcard = targets.len() != 1 || arg.ends_with("...");
		for target in targets {
			match target {
				Target::Dir(dir) => match load_dir(&dir, config) {
					Ok(loaded) => packages.extend(loaded),
					// Wildcards match directories that may hold only excluded files.
					Err(LoadError::NoGoFiles(dir)) if wildcard => {
						debug!(dir = %dir.display(), "no buildable files under wildcard");
					}
					Err(err) => return Err(err),
				},
				Target::File(path) => packages.push(load_file(&path, config)?),
			}
		}
	}
	Ok(packages)
}

/// Load the package (and external test package) of one directory.
pub fn load_dir(dir: &Path, config: &LoadConfig) -> Result<Vec<Package>, LoadError> {
	let mut names: Vec<String> = Vec::new();
	for entry in fs::read_dir(dir).map_err(|err| LoadError::io(dir, err))? {
		let entry = entry.map_err(|err| LoadError::io(dir, err))?;
		let path = entry.path();
		if !path.is_file() {
			continue;
		}
		if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
			names.push(name.to_string());
		}
	}

	// Non-test files sort before test files, each group by name.
	names.sort_by(|a, b| is_test_file(a).cmp(&is_test_file(b)).then_with(|| a.cmp(b)));

	let mut primary: Option<Package> = None;
	let mut external: BTreeMap<String, Package> = BTreeMap::new();

	for name in names {
		if !wants_file(&name, config) {
			trace!(file = %name, "skipping by name");
			continue;
		}
		let path = dir.join(&name);
		let Some(file) = read_source(&path, config)? else {
			continue;
		};

		let is_test = is_test_file(&name);
		match &mut primary {
			Some(pkg) if pkg.name == file.package => pkg.files.push(file),
			Some(pkg) if is_test && file.package == format!("{}_test", pkg.name) => {
				external
					.entry(file.package.clone())
					.or_insert_with(|| Package {
						name: file.package.clone(),
						dir: dir.to_path_buf(),
						files: Vec::new(),
					})
					.files
					.push(file);
			}
			Some(pkg) => {
				return Err(LoadError::MultiplePackages {
					dir: dir.to_path_buf(),
					first: pkg.name.clone(),
					second: file.package,
				});
			}
			None => {
				primary = Some(Package {
					name: file.package.clone(),
					dir: dir.to_path_buf(),
					files: vec![file],
				});
			}
		}
	}

	let primary = primary.ok_or_else(|| LoadError::NoGoFiles(dir.to_path_buf()))?;
	debug!(package = %primary.name, dir = %dir.display(), files = primary.files.len(), "loaded package");

	let mut packages = vec![primary];
	packages.extend(external.into_values());
	Ok(packages)
}

/// Load a single file as its own package, ignoring name rules but honoring build constraints.
fn load_file(path: &Path, config: &LoadConfig) -> Result<Package, LoadError> {
	let file = read_source(path, config)?.ok_or_else(|| LoadError::NoGoFiles(path.to_path_buf()))?;
	Ok(Package {
		name: file.package.clone(),
		dir: path.parent().map(Path::to_path_buf).unwrap_or_default(),
		files: vec![file],
	})
}

/// Read and parse a file, or `None` when its build constraints exclude it.
fn read_source(path: &Path, config: &LoadConfig) -> Result<Option<SourceFile>, LoadError> {
	let text = fs::read_to_string(path).map_err(|err| LoadError::io(path, err))?;
	if !constraint::matches_header(path, &text, config)? {
		trace!(file = %path.display(), "excluded by build constraint");
		return Ok(None);
	}
	parse::parse_source(path, &text).map(Some)
}

fn wants_file(name: &str, config: &LoadConfig) -> bool {
	if !name.ends_with(".go") || name.starts_with('_') || name.starts_with('.') {
		return false;
	}
	if is_test_file(name) && !config.include_tests() {
		return false;
	}
	constraint::matches_file_name(name, config)
}

fn is_test_file(name: &str) -> bool {
	name.ends_with("_test.go")
}

#[cfg(test)]
mod tests {
	use pretty_assertions::assert_eq;

	use super::*;

	fn write(dir: &Path, name: &str, body: &str) {
		fs::write(dir.join(name), body).unwrap();
	}

	fn linux() -> LoadConfig {
		LoadConfig::from_env().with_goos("linux").with_goarch("amd64")
	}

	fn file_names(pkg: &Package) -> Vec<String> {
		pkg.files
			.iter()
			.map(|f| f.path.file_name().unwrap().to_string_lossy().into_owned())
			.collect()
	}

	#[test]
	fn selects_files_by_name_and_constraint() {
		let dir = tempfile::tempdir().unwrap();
		write(dir.path(), "b.go", "package lib\n");
		write(dir.path(), "a.go", "package lib\n");
		write(dir.path(), "sys_windows.go", "package lib\n");
		write(dir.path(), "gen.go", "//go:build ignore\n\npackage main\n");
		write(dir.path(), "_scratch.go", "package other\n");
		write(dir.path(), "notes.txt", "not go");
		write(dir.path(), "lib_test.go", "package lib\n");

		let packages = load_dir(dir.path(), &linux()).unwrap();
		assert_eq!(packages.len(), 1);
		assert_eq!(packages[0].name, "lib");
		assert_eq!(file_names(&packages[0]), vec!["a.go", "b.go"]);
	}

	#[test]
	fn includes_tests_and_external_test_package() {
		let dir = tempfile::tempdir().unwrap();
		write(dir.path(), "lib.go", "package lib\n");
		write(dir.path(), "lib_test.go", "package lib\n");
		write(dir.path(), "api_test.go", "package lib_test\n");

		let packages = load_dir(dir.path(), &linux().with_include_tests(true)).unwrap();
		assert_eq!(packages.len(), 2);
		assert_eq!(file_names(&packages[0]), vec!["lib.go", "lib_test.go"]);
		assert_eq!(packages[1].name, "lib_test");
		assert_eq!(file_names(&packages[1]), vec!["api_test.go"]);
	}

	#[test]
	fn user_tags_enable_files() {
		let dir = tempfile::tempdir().unwrap();
		write(dir.path(), "lib.go", "package lib\n");
		write(dir.path(), "extra.go", "//go:build integration\n\npackage lib\n");

		let without = load_dir(dir.path(), &linux()).unwrap();
		assert_eq!(file_names(&without[0]), vec!["lib.go"]);

		let with = load_dir(dir.path(), &linux().with_tags(parse_build_tags("integration"))).unwrap();
		assert_eq!(file_names(&with[0]), vec!["extra.go", "lib.go"]);
	}

	#[test]
	fn conflicting_packages_are_an_error() {
		let dir = tempfile::tempdir().unwrap();
		write(dir.path(), "a.go", "package a\n");
		write(dir.path(), "b.go", "package b\n");

		let err = load_dir(dir.path(), &linux()).unwrap_err();
		assert!(matches!(err, LoadError::MultiplePackages { .. }), "{err}");
	}

	#[test]
	fn empty_directory_has_no_go_files() {
		let dir = tempfile::tempdir().unwrap();
		let err = load_dir(dir.path(), &linux()).unwrap_err();
		assert!(matches!(err, LoadError::NoGoFiles(_)), "{err}");
	}

	#[test]
	fn wildcard_skips_directories_without_buildable_files() {
		let dir = tempfile::tempdir().unwrap();
		write(dir.path(), "root.go", "package root\n");
		fs::create_dir(dir.path().join("win")).unwrap();
		write(&dir.path().join("win"), "only_windows.go", "package win\n");

		let arg = format!("{}/...", dir.path().display());
		let packages = load_packages(&linux(), &[arg]).unwrap();
		assert_eq!(packages.len(), 1);
		assert_eq!(packages[0].name, "root");
	}
}
