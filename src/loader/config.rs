use std::env;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::process::{Command as ProcessCommand, Stdio};

use tracing::debug;

/// Operating systems recognized in file-name suffixes and build tags.
pub(crate) const KNOWN_OS: &[&str] = &[
	"aix", "android", "darwin", "dragonfly", "freebsd", "hurd", "illumos", "ios", "js", "linux", "nacl", "netbsd",
	"openbsd", "plan9", "solaris", "wasip1", "windows", "zos",
];

/// Architectures recognized in file-name suffixes and build tags.
pub(crate) const KNOWN_ARCH: &[&str] = &[
	"386", "amd64", "amd64p32", "arm", "armbe", "arm64", "arm64be", "loong64", "mips", "mipsle", "mips64",
	"mips64le", "mips64p32", "mips64p32le", "ppc", "ppc64", "ppc64le", "riscv", "riscv64", "s390", "s390x", "sparc",
	"sparc64", "wasm",
];

const UNIX_OS: &[&str] = &[
	"aix", "android", "darwin", "dragonfly", "freebsd", "hurd", "illumos", "ios", "linux", "netbsd", "openbsd",
	"solaris",
];

/// Configuration for turning package arguments into parsed files.
///
/// The listing core never sees this; it only decides which files reach it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadConfig {
	/// Extra build tags satisfied by `//go:build` lines.
	tags: Vec<String>,
	/// Whether `_test.go` files are loaded.
	include_tests: bool,
	/// Target operating system.
	goos: String,
	/// Target architecture.
	goarch: String,
	/// Whether the `cgo` tag is satisfied.
	cgo_enabled: bool,
	/// Go installation root, searched for standard library packages.
	goroot: Option<PathBuf>,
	/// First `GOPATH` entry, searched under `src/`.
	gopath: Option<PathBuf>,
	/// Module download cache.
	gomodcache: Option<PathBuf>,
}

impl Default for LoadConfig {
	fn default() -> Self {
		Self::from_env()
	}
}

impl LoadConfig {
	/// Configuration derived from `GOOS`, `GOARCH`, `CGO_ENABLED`, `GOROOT`, `GOPATH` and
	/// `GOMODCACHE`, falling back to the host platform and `~/go`. Without `GOROOT` the
	/// root reported by `go env GOROOT` is used, when a `go` binary is on the path.
	pub fn from_env() -> Self {
		let goos = non_empty_var("GOOS").unwrap_or_else(|| host_goos().to_string());
		let goarch = non_empty_var("GOARCH").unwrap_or_else(|| host_goarch().to_string());
		let cgo_enabled = non_empty_var("CGO_ENABLED").is_none_or(|value| value != "0");
		let goroot = non_empty_var("GOROOT")
			.map(PathBuf::from)
			.or_else(|| go_env("go", "GOROOT"));
		let gopath = env::var_os("GOPATH")
			.and_then(|value| env::split_paths(&value).find(|p| !p.as_os_str().is_empty()))
			.or_else(|| dirs::home_dir().map(|home| home.join("go")));
		let gomodcache = non_empty_var("GOMODCACHE")
			.map(PathBuf::from)
			.or_else(|| gopath.as_ref().map(|p| p.join("pkg").join("mod")));

		Self {
			tags: Vec::new(),
			include_tests: false,
			goos,
			goarch,
			cgo_enabled,
			goroot,
			gopath,
			gomodcache,
		}
	}

	/// Adds build tags to the satisfied set.
	pub fn with_tags<I, S>(mut self, tags: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.tags.extend(tags.into_iter().map(Into::into));
		self
	}

	/// Enables or disables loading of `_test.go` files.
	pub fn with_include_tests(mut self, include_tests: bool) -> Self {
		self.include_tests = include_tests;
		self
	}

	/// Sets the target operating system.
	pub fn with_goos(mut self, goos: impl Into<String>) -> Self {
		self.goos = goos.into();
		self
	}

	/// Sets the target architecture.
	pub fn with_goarch(mut self, goarch: impl Into<String>) -> Self {
		self.goarch = goarch.into();
		self
	}

	/// Enables or disables the `cgo` tag.
	pub fn with_cgo(mut self, enabled: bool) -> Self {
		self.cgo_enabled = enabled;
		self
	}

	/// Sets the Go installation root.
	pub fn with_goroot(mut self, goroot: Option<PathBuf>) -> Self {
		self.goroot = goroot;
		self
	}

	/// Sets the `GOPATH` directory.
	pub fn with_gopath(mut self, gopath: Option<PathBuf>) -> Self {
		self.gopath = gopath;
		self
	}

	/// Sets the module cache directory.
	pub fn with_gomodcache(mut self, gomodcache: Option<PathBuf>) -> Self {
		self.gomodcache = gomodcache;
		self
	}

	/// Whether `_test.go` files are loaded.
	pub fn include_tests(&self) -> bool {
		self.include_tests
	}

	/// Go installation root, if known.
	pub fn goroot(&self) -> Option<&Path> {
		self.goroot.as_deref()
	}

	/// `GOPATH` directory, if known.
	pub fn gopath(&self) -> Option<&Path> {
		self.gopath.as_deref()
	}

	/// Module cache directory, if known.
	pub fn gomodcache(&self) -> Option<&Path> {
		self.gomodcache.as_deref()
	}

	/// Whether a build tag is satisfied under this configuration.
	pub fn satisfies(&self, tag: &str) -> bool {
		if tag == self.goos || tag == self.goarch || tag == "gc" {
			return true;
		}
		if tag == "cgo" {
			return self.cgo_enabled;
		}
		if tag == "unix" {
			return UNIX_OS.contains(&self.goos.as_str());
		}
		// GOOS values that imply another one.
		match (self.goos.as_str(), tag) {
			("android", "linux") | ("illumos", "solaris") | ("ios", "darwin") => return true,
			_ => {}
		}
		if is_release_tag(tag) {
			return true;
		}
		self.tags.iter().any(|t| t == tag)
	}
}

/// Split a comma-separated tag list, trimming whitespace and dropping empty entries.
pub fn parse_build_tags(tags: &str) -> Vec<String> {
	tags.split(',')
		.map(str::trim)
		.filter(|tag| !tag.is_empty())
		.map(str::to_string)
		.collect()
}

/// Every `go1.N` release tag is satisfied.
fn is_release_tag(tag: &str) -> bool {
	tag.strip_prefix("go1.")
		.is_some_and(|minor| !minor.is_empty() && minor.bytes().all(|b| b.is_ascii_digit()))
}

fn non_empty_var(name: &str) -> Option<String> {
	env::var(name).ok().filter(|value| !value.is_empty())
}

/// Ask the Go toolchain at `program` for an environment value via `go env <key>`.
pub(crate) fn go_env(program: impl AsRef<OsStr>, key: &str) -> Option<PathBuf> {
	let program = program.as_ref();
	let output = match ProcessCommand::new(program).args(["env", key]).stderr(Stdio::null()).output() {
		Ok(output) if output.status.success() => output,
		Ok(output) => {
			debug!(program = ?program, key, status = %output.status, "go env failed");
			return None;
		}
		Err(err) => {
			debug!(program = ?program, key, %err, "go toolchain not available");
			return None;
		}
	};
	let value = String::from_utf8_lossy(&output.stdout).trim().to_string();
	if value.is_empty() {
		return None;
	}
	debug!(key, %value, "read from go env");
	Some(PathBuf::from(value))
}

fn host_goos() -> &'static str {
	match env::consts::OS {
		"macos" => "darwin",
		other => other,
	}
}

fn host_goarch() -> &'static str {
	match env::consts::ARCH {
		"x86_64" => "amd64",
		"x86" => "386",
		"aarch64" => "arm64",
		"powerpc64" => "ppc64",
		"loongarch64" => "loong64",
		"wasm32" => "wasm",
		other => other,
	}
}
