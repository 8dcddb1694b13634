//! Per-file and per-package listings of exported functions and methods.

use std::path::PathBuf;

use serde::Serialize;

use crate::ast::{FuncDecl, SourceFile};
use crate::error::Result;
use crate::loader::Package;
use crate::render::Renderer;
use crate::visibility::{is_exported, single_receiver_field};

/// Bare names of the exported declarations of `file`, in source order.
///
/// Methods are listed by their method name only.
pub fn list_exported_names(file: &SourceFile) -> Result<Vec<String>> {
	Ok(exported_decls(file, None)?
		.into_iter()
		.map(|(decl, _)| decl.name.clone())
		.collect())
}

/// Rendered signatures of the exported declarations of `file`, in source order.
///
/// Declarations that render to an empty string (unnamed receivers) are omitted.
pub fn list_exported_signatures(file: &SourceFile, renderer: &Renderer) -> Result<Vec<String>> {
	Ok(exported_decls(file, Some(renderer))?
		.into_iter()
		.filter_map(|(_, signature)| signature)
		.collect())
}

/// Exported declarations of `file` in source order, each paired with its signature when a
/// renderer is given. Rendered declarations with an empty signature are dropped.
fn exported_decls<'a>(file: &'a SourceFile, renderer: Option<&Renderer>) -> Result<Vec<(&'a FuncDecl, Option<String>)>> {
	let mut out = Vec::new();
	for decl in file.funcs() {
		if !is_exported(decl)? {
			continue;
		}
		match renderer {
			Some(renderer) => {
				let signature = renderer.render_decl(decl)?;
				if !signature.is_empty() {
					out.push((decl, Some(signature)));
				}
			}
			None => out.push((decl, None)),
		}
	}
	Ok(out)
}

/// Exported declarations of one package.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PackageListing {
	/// Package name from the `package` clause.
	pub package: String,
	/// Directory the package was loaded from.
	pub dir: PathBuf,
	/// Exported entries, file by file in load order.
	pub entries: Vec<ListEntry>,
}

impl PackageListing {
	/// Output lines: signatures when rendered, bare names otherwise.
	pub fn lines(&self) -> impl Iterator<Item = &str> {
		self.entries
			.iter()
			.map(|entry| entry.signature.as_deref().unwrap_or(entry.name.as_str()))
	}
}

/// One exported function or method.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListEntry {
	/// Function or method name.
	pub name: String,
	/// Rendered receiver type, for methods.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub receiver: Option<String>,
	/// Full signature, in verbose listings.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub signature: Option<String>,
	/// File declaring the entry.
	pub file: PathBuf,
	/// 1-based line of the declaration.
	pub line: usize,
}

/// Build the listing of a loaded package.
///
/// With `verbose` each entry carries its signature, and unnamed-receiver entries are dropped
/// the same way [`list_exported_signatures`] drops them.
pub fn list_package(package: &Package, renderer: &Renderer, verbose: bool) -> Result<PackageListing> {
	let mut entries = Vec::new();
	for file in &package.files {
		for (decl, signature) in exported_decls(file, verbose.then_some(renderer))? {
			entries.push(ListEntry {
				name: decl.name.clone(),
				receiver: receiver_type(decl, renderer)?,
				signature,
				file: file.path.clone(),
				line: decl.line,
			});
		}
	}

	Ok(PackageListing {
		package: package.name.clone(),
		dir: package.dir.clone(),
		entries,
	})
}

fn receiver_type(decl: &FuncDecl, renderer: &Renderer) -> Result<Option<String>> {
	let Some(receiver) = &decl.receiver else {
		return Ok(None);
	};
	let field = single_receiver_field(decl, receiver)?;
	let ty = renderer.render_type(&field.ty).map_err(|err| err.in_decl(&decl.name))?;
	Ok(Some(ty))
}
