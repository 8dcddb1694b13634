use std::path::PathBuf;

use thiserror::Error;

/// Failures while locating, selecting or parsing Go source files.
#[derive(Debug, Error)]
pub enum LoadError {
	/// Failed to perform IO on a path.
	#[error("failed to read '{}': {source}", path.display())]
	Io {
		/// Path being read.
		path: PathBuf,
		/// Underlying error.
		#[source]
		source: std::io::Error,
	},
	/// A package argument matched nothing on disk.
	#[error("cannot find package \"{0}\" in the working directory, GOROOT, GOPATH or the module cache")]
	TargetNotFound(String),
	/// A directory holds no buildable Go files for the current configuration.
	#[error("no buildable Go source files in {}", .0.display())]
	NoGoFiles(PathBuf),
	/// Files of one directory declare different packages.
	#[error("found packages {first} and {second} in {}", dir.display())]
	MultiplePackages {
		/// Directory being loaded.
		dir: PathBuf,
		/// First package name seen.
		first: String,
		/// Conflicting package name.
		second: String,
	},
	/// A malformed `//go:build` or `// +build` line.
	#[error("{}:{line}: invalid build constraint: {message}", path.display())]
	Constraint {
		/// File carrying the constraint.
		path: PathBuf,
		/// 1-based line of the constraint.
		line: usize,
		/// What went wrong.
		message: String,
	},
	/// The Go grammar could not be loaded into the parser.
	#[error("failed to load Go grammar: {0}")]
	Grammar(String),
	/// The parser produced no tree or a tree with syntax errors.
	#[error("{}:{line}:{column}: syntax error", path.display())]
	Syntax {
		/// File that failed to parse.
		path: PathBuf,
		/// 1-based line of the first error node.
		line: usize,
		/// 1-based column of the first error node.
		column: usize,
	},
	/// A file without a `package` clause.
	#[error("{}: expected 'package' clause", .0.display())]
	MissingPackageClause(PathBuf),
}

impl LoadError {
	pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
		Self::Io {
			path: path.into(),
			source,
		}
	}
}
