//! Shared fixtures for integration tests.

use std::fs;

use gofuncs::LoadConfig;
use tempfile::TempDir;

/// Write `files` into a fresh temporary directory.
pub fn create_test_package(files: &[(&str, &str)]) -> TempDir {
	let dir = tempfile::tempdir().expect("tempdir");
	for (name, body) in files {
		let path = dir.path().join(name);
		if let Some(parent) = path.parent() {
			fs::create_dir_all(parent).expect("create parent");
		}
		fs::write(path, body).expect("write fixture");
	}
	dir
}

/// A configuration pinned to linux/amd64 that never consults GOPATH or the module cache.
pub fn linux_config() -> LoadConfig {
	LoadConfig::from_env()
		.with_goos("linux")
		.with_goarch("amd64")
		.with_cgo(true)
		.with_goroot(None)
		.with_gopath(None)
		.with_gomodcache(None)
}
