//! Build constraints: file-name suffixes, `//go:build` expressions and `// +build` lines.

use std::path::Path;

use once_cell::sync::Lazy;
use regex::Regex;

use super::config::{KNOWN_ARCH, KNOWN_OS, LoadConfig};
use super::error::LoadError;

static GO_BUILD: Lazy<Regex> = Lazy::new(|| Regex::new(r"^//go:build(?:\s+(.*))?$").unwrap());
static PLUS_BUILD: Lazy<Regex> = Lazy::new(|| Regex::new(r"^//\s*\+build(?:\s+(.*))?$").unwrap());

/// Whether a file name passes the `_GOOS`, `_GOARCH` and `_GOOS_GOARCH` suffix rules.
///
/// The part before the first `_` is ignored, so `linux.go` always matches while
/// `file_linux.go` only matches on Linux.
pub(crate) fn matches_file_name(name: &str, config: &LoadConfig) -> bool {
	let stem = name.strip_suffix(".go").unwrap_or(name);
	let Some(idx) = stem.find('_') else {
		return true;
	};
	let mut parts: Vec<&str> = stem[idx..].split('_').collect();
	if parts.last() == Some(&"test") {
		parts.pop();
	}

	let n = parts.len();
	if n >= 2 && KNOWN_OS.contains(&parts[n - 2]) && KNOWN_ARCH.contains(&parts[n - 1]) {
		return config.satisfies(parts[n - 2]) && config.satisfies(parts[n - 1]);
	}
	if n >= 1 && (KNOWN_OS.contains(&parts[n - 1]) || KNOWN_ARCH.contains(&parts[n - 1])) {
		return config.satisfies(parts[n - 1]);
	}
	true
}

/// Whether the constraints in the header of `source` are satisfied.
///
/// Only comments before the `package` clause count. A `//go:build` line takes precedence
/// over `// +build` lines; every `// +build` line must hold otherwise.
pub(crate) fn matches_header(path: &Path, source: &str, config: &LoadConfig) -> Result<bool, LoadError> {
	let mut go_build: Option<(usize, &str)> = None;
	let mut plus_build: Vec<(usize, &str)> = Vec::new();
	let mut in_block = false;

	for (idx, raw) in source.lines().enumerate() {
		let line = raw.trim();
		if in_block {
			if line.contains("*/") {
				in_block = false;
			}
			continue;
		}
		if line.is_empty() {
			continue;
		}
		if line.starts_with("/*") {
			in_block = !line.contains("*/");
			continue;
		}
		if !line.starts_with("//") {
			break;
		}

		if let Some(caps) = GO_BUILD.captures(line) {
			if go_build.is_none() {
				go_build = Some((idx + 1, caps.get(1).map_or("", |m| m.as_str())));
			}
		} else if let Some(caps) = PLUS_BUILD.captures(line) {
			plus_build.push((idx + 1, caps.get(1).map_or("", |m| m.as_str())));
		}
	}

	if let Some((line, text)) = go_build {
		let expr = Expr::parse(text).map_err(|message| LoadError::Constraint {
			path: path.to_path_buf(),
			line,
			message,
		})?;
		return Ok(expr.eval(config));
	}

	Ok(plus_build.iter().all(|(_, text)| plus_build_line(text, config)))
}

/// `// +build a,b !c` is `(a && b) || !c`.
fn plus_build_line(text: &str, config: &LoadConfig) -> bool {
	text.split_whitespace().any(|option| {
		option.split(',').all(|term| match term.strip_prefix('!') {
			Some(tag) => !config.satisfies(tag),
			None => config.satisfies(term),
		})
	})
}

/// A parsed `//go:build` expression.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Expr {
	Tag(String),
	Not(Box<Expr>),
	And(Box<Expr>, Box<Expr>),
	Or(Box<Expr>, Box<Expr>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token<'a> {
	Tag(&'a str),
	Not,
	And,
	Or,
	Open,
	Close,
}

impl Expr {
	fn parse(text: &str) -> Result<Self, String> {
		let tokens = tokenize(text)?;
		let mut parser = ExprParser { tokens, pos: 0 };
		let expr = parser.or()?;
		if let Some(token) = parser.tokens.get(parser.pos) {
			return Err(format!("unexpected {token:?}"));
		}
		Ok(expr)
	}

	fn eval(&self, config: &LoadConfig) -> bool {
		match self {
			Self::Tag(tag) => config.satisfies(tag),
			Self::Not(inner) => !inner.eval(config),
			Self::And(lhs, rhs) => lhs.eval(config) && rhs.eval(config),
			Self::Or(lhs, rhs) => lhs.eval(config) || rhs.eval(config),
		}
	}
}

fn tokenize(text: &str) -> Result<Vec<Token<'_>>, String> {
	let mut tokens = Vec::new();
	let mut rest = text.trim_start();
	while let Some(ch) = rest.chars().next() {
		let (token, len) = match ch {
			'!' => (Token::Not, 1),
			'(' => (Token::Open, 1),
			')' => (Token::Close, 1),
			'&' if rest.starts_with("&&") => (Token::And, 2),
			'|' if rest.starts_with("||") => (Token::Or, 2),
			c if is_tag_char(c) => {
				let len = rest.find(|c: char| !is_tag_char(c)).unwrap_or(rest.len());
				(Token::Tag(&rest[..len]), len)
			}
			c => return Err(format!("unexpected character {c:?}")),
		};
		tokens.push(token);
		rest = rest[len..].trim_start();
	}
	if tokens.is_empty() {
		return Err("empty expression".to_string());
	}
	Ok(tokens)
}

fn is_tag_char(c: char) -> bool {
	c.is_alphanumeric() || c == '_' || c == '.'
}

struct ExprParser<'a> {
	tokens: Vec<Token<'a>>,
	pos: usize,
}

impl ExprParser<'_> {
	fn or(&mut self) -> Result<Expr, String> {
		let mut lhs = self.and()?;
		while self.eat(&Token::Or) {
			let rhs = self.and()?;
			lhs = Expr::Or(Box::new(lhs), Box::new(rhs));
		}
		Ok(lhs)
	}

	fn and(&mut self) -> Result<Expr, String> {
		let mut lhs = self.not()?;
		while self.eat(&Token::And) {
			let rhs = self.not()?;
			lhs = Expr::And(Box::new(lhs), Box::new(rhs));
		}
		Ok(lhs)
	}

	fn not(&mut self) -> Result<Expr, String> {
		if self.eat(&Token::Not) {
			return Ok(Expr::Not(Box::new(self.not()?)));
		}
		if self.eat(&Token::Open) {
			let inner = self.or()?;
			if !self.eat(&Token::Close) {
				return Err("missing )".to_string());
			}
			return Ok(inner);
		}
		match self.tokens.get(self.pos) {
			Some(Token::Tag(tag)) => {
				self.pos += 1;
				Ok(Expr::Tag((*tag).to_string()))
			}
			Some(token) => Err(format!("unexpected {token:?}")),
			None => Err("unexpected end of expression".to_string()),
		}
	}

	fn eat(&mut self, expected: &Token<'_>) -> bool {
		if self.tokens.get(self.pos) == Some(expected) {
			self.pos += 1;
			true
		} else {
			false
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn linux() -> LoadConfig {
		LoadConfig::from_env().with_goos("linux").with_goarch("amd64").with_cgo(true)
	}

	fn header(source: &str, config: &LoadConfig) -> bool {
		matches_header(Path::new("x.go"), source, config).unwrap()
	}

	#[test]
	fn file_name_suffixes() {
		let config = linux();
		assert!(matches_file_name("reader.go", &config));
		assert!(matches_file_name("linux.go", &config));
		assert!(matches_file_name("windows.go", &config));
		assert!(matches_file_name("sys_linux.go", &config));
		assert!(matches_file_name("sys_linux_amd64.go", &config));
		assert!(matches_file_name("sys_linux_test.go", &config));
		assert!(matches_file_name("sys_amd64.go", &config));
		assert!(matches_file_name("some_helper.go", &config));
		assert!(!matches_file_name("sys_windows.go", &config));
		assert!(!matches_file_name("sys_linux_arm64.go", &config));
		assert!(!matches_file_name("sys_arm64_test.go", &config));
	}

	#[test]
	fn go_build_expressions() {
		let config = linux().with_tags(["integration"]);
		assert!(header("//go:build linux\n\npackage x\n", &config));
		assert!(header("//go:build linux && (amd64 || arm64)\n\npackage x\n", &config));
		assert!(header("//go:build !windows\npackage x\n", &config));
		assert!(header("//go:build integration\npackage x\n", &config));
		assert!(!header("//go:build ignore\n\npackage main\n", &config));
		assert!(!header("//go:build darwin || windows\npackage x\n", &config));
		assert!(!header("//go:build !(linux && cgo)\npackage x\n", &config));
	}

	#[test]
	fn go_build_wins_over_plus_build() {
		let config = linux();
		let src = "//go:build linux\n// +build windows\n\npackage x\n";
		assert!(header(src, &config));
	}

	#[test]
	fn plus_build_lines() {
		let config = linux();
		assert!(header("// +build linux,amd64 darwin\n\npackage x\n", &config));
		assert!(!header("// +build linux\n// +build windows\n\npackage x\n", &config));
		assert!(!header("// +build !linux\n\npackage x\n", &config));
	}

	#[test]
	fn constraints_after_package_clause_are_ignored() {
		let config = linux();
		let src = "// Copyright notice.\n\n/* block\n   comment */\npackage x\n\n//go:build windows\n";
		assert!(header(src, &config));
	}

	#[test]
	fn malformed_expression_is_an_error() {
		let err = matches_header(Path::new("bad.go"), "//go:build linux &&\npackage x\n", &linux()).unwrap_err();
		assert!(matches!(err, LoadError::Constraint { line: 1, .. }), "{err}");

		let err = matches_header(Path::new("bad.go"), "//go:build (linux\npackage x\n", &linux()).unwrap_err();
		assert!(err.to_string().contains("missing )"), "{err}");
	}
}
