//! Resolution of package arguments to directories or files on disk.

use std::fs;
use std::path::{Path, PathBuf};

use semver::Version;
use tracing::{debug, trace};

use super::config::LoadConfig;
use super::error::LoadError;

/// A resolved package argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
	/// A directory holding one package (plus its external test package).
	Dir(PathBuf),
	/// A single `.go` file listed on its own.
	File(PathBuf),
}

/// Resolve one command-line argument.
///
/// Accepts directories, `.go` files, `dir/...` wildcards, and import paths found under
/// `$GOROOT/src`, `$GOPATH/src` or the module cache (`path` or `path@version`). A wildcard
/// expands to every directory below its root holding at least one `.go` file.
pub fn resolve(arg: &str, config: &LoadConfig) -> Result<Vec<Target>, LoadError> {
	if let Some(root) = arg.strip_suffix("/...").or_else(|| (arg == "...").then_some(".")) {
		let root = resolve_dir(root, config)?;
		let mut dirs = Vec::new();
		walk_package_dirs(&root, &mut dirs)?;
		debug!(arg, packages = dirs.len(), "expanded wildcard");
		return Ok(dirs.into_iter().map(Target::Dir).collect());
	}

	let path = Path::new(arg);
	if arg.ends_with(".go") && path.is_file() {
		return Ok(vec![Target::File(path.to_path_buf())]);
	}

	Ok(vec![Target::Dir(resolve_dir(arg, config)?)])
}

fn resolve_dir(arg: &str, config: &LoadConfig) -> Result<PathBuf, LoadError> {
	let path = Path::new(arg);
	if path.is_dir() {
		trace!(arg, "resolved as local directory");
		return Ok(path.to_path_buf());
	}
	if is_local_path(arg) {
		return Err(LoadError::TargetNotFound(arg.to_string()));
	}

	let (import_path, version) = match arg.split_once('@') {
		Some((import_path, version)) => (import_path, Some(version)),
		None => (arg, None),
	};

	if version.is_none() {
		let roots = [config.goroot(), config.gopath()];
		for root in roots.into_iter().flatten() {
			let dir = root.join("src").join(import_path);
			if dir.is_dir() {
				debug!(arg, dir = %dir.display(), "resolved under source root");
				return Ok(dir);
			}
		}
	}

	if let Some(cache) = config.gomodcache()
		&& let Some(dir) = find_in_module_cache(cache, import_path, version)?
	{
		debug!(arg, dir = %dir.display(), "resolved in module cache");
		return Ok(dir);
	}

	Err(LoadError::TargetNotFound(arg.to_string()))
}

fn is_local_path(arg: &str) -> bool {
	arg == "." || arg == ".." || arg.starts_with("./") || arg.starts_with("../") || Path::new(arg).is_absolute()
}

/// Locate the directory of `import_path` inside the module cache.
///
/// The module may be any prefix of the import path; the longest prefix with a cached
/// version wins. Without an explicit version the highest semver is chosen.
pub(crate) fn find_in_module_cache(cache: &Path, import_path: &str, version: Option<&str>) -> Result<Option<PathBuf>, LoadError> {
	let segments: Vec<&str> = import_path.split('/').filter(|s| !s.is_empty()).collect();
	for split in (1..=segments.len()).rev() {
		let module = segments[..split].join("/");
		let rest = &segments[split..];

		let module_dir = match version {
			Some(version) => {
				let dir = cache.join(format!("{}@{version}", escape_module_path(&module)));
				dir.is_dir().then_some(dir)
			}
			None => latest_cached_version(cache, &module)?,
		};

		if let Some(module_dir) = module_dir {
			let dir = rest.iter().fold(module_dir, |dir, segment| dir.join(segment));
			if dir.is_dir() {
				return Ok(Some(dir));
			}
		}
	}
	Ok(None)
}

/// Highest cached version directory of `module`, e.g. `golang.org/x/text@v0.14.0`.
fn latest_cached_version(cache: &Path, module: &str) -> Result<Option<PathBuf>, LoadError> {
	let escaped = escape_module_path(module);
	let (parent, leaf) = match escaped.rsplit_once('/') {
		Some((parent, leaf)) => (cache.join(parent), leaf.to_string()),
		None => (cache.to_path_buf(), escaped.clone()),
	};
	if !parent.is_dir() {
		return Ok(None);
	}

	let prefix = format!("{leaf}@");
	let mut found: Vec<(Version, PathBuf)> = Vec::new();
	for entry in fs::read_dir(&parent).map_err(|err| LoadError::io(&parent, err))? {
		let entry = entry.map_err(|err| LoadError::io(&parent, err))?;
		let path = entry.path();
		let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
			continue;
		};
		let Some(raw) = name.strip_prefix(&prefix) else {
			continue;
		};
		// Go versions carry a leading `v`.
		match Version::parse(raw.strip_prefix('v').unwrap_or(raw)) {
			Ok(version) if path.is_dir() => found.push((version, path)),
			Ok(_) => {}
			Err(err) => trace!(dir = %path.display(), %err, "skipping unparsable module version"),
		}
	}

	found.sort_by(|(a, _), (b, _)| b.cmp(a));
	Ok(found.into_iter().next().map(|(_, path)| path))
}

/// Module cache paths encode upper-case letters as `!` plus the lower-case letter.
pub(crate) fn escape_module_path(module: &str) -> String {
	let mut out = String::with_capacity(module.len());
	for ch in module.chars() {
		if ch.is_ascii_uppercase() {
			out.push('!');
			out.push(ch.to_ascii_lowercase());
		} else {
			out.push(ch);
		}
	}
	out
}

/// Collect `root` and its descendants that hold `.go` files, skipping `testdata`, `vendor`
/// and directories starting with `.` or `_`. Symlinked directories are not followed.
fn walk_package_dirs(root: &Path, out: &mut Vec<PathBuf>) -> Result<(), LoadError> {
	let mut entries: Vec<(PathBuf, fs::FileType)> = Vec::new();
	for entry in fs::read_dir(root).map_err(|err| LoadError::io(root, err))? {
		let entry = entry.map_err(|err| LoadError::io(root, err))?;
		let file_type = entry.file_type().map_err(|err| LoadError::io(entry.path(), err))?;
		entries.push((entry.path(), file_type));
	}
	entries.sort_by(|(a, _), (b, _)| a.cmp(b));

	if entries
		.iter()
		.any(|(p, _)| p.is_file() && p.extension().is_some_and(|ext| ext == "go"))
	{
		out.push(root.to_path_buf());
	}

	for (path, file_type) in entries {
		if !file_type.is_dir() {
			if file_type.is_symlink() && path.is_dir() {
				trace!(dir = %path.display(), "not following symlinked directory");
			}
			continue;
		}
		let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
			continue;
		};
		if name.starts_with('.') || name.starts_with('_') || name == "testdata" || name == "vendor" {
			continue;
		}
		walk_package_dirs(&path, out)?;
	}
	Ok(())
}
