//! Bridge from a tree-sitter Go parse to the declaration model.

use std::path::Path;

use tree_sitter::{Node, Parser, Tree};

use super::error::LoadError;
use crate::ast::{Decl, Field, FieldList, FuncDecl, SourceFile, TypeExpr};

/// Parse Go source text into a [`SourceFile`].
pub fn parse_source(path: &Path, text: &str) -> Result<SourceFile, LoadError> {
	let tree = parse_tree(text)?;
	let root = tree.root_node();
	if root.has_error() {
		let (line, column) = first_error(root).unwrap_or((1, 1));
		return Err(LoadError::Syntax {
			path: path.to_path_buf(),
			line,
			column,
		});
	}

	Bridge { text }.source_file(path, root)
}

fn parse_tree(text: &str) -> Result<Tree, LoadError> {
	let mut parser = Parser::new();
	parser
		.set_language(&tree_sitter_go::LANGUAGE.into())
		.map_err(|err| LoadError::Grammar(err.to_string()))?;
	parser
		.parse(text, None)
		.ok_or_else(|| LoadError::Grammar("tree-sitter parse returned None".to_string()))
}

/// Position (1-based line and column) of the first error or missing node.
fn first_error(node: Node<'_>) -> Option<(usize, usize)> {
	if node.is_error() || node.is_missing() {
		let pos = node.start_position();
		return Some((pos.row + 1, pos.column + 1));
	}
	let mut cursor = node.walk();
	let children: Vec<Node<'_>> = node.children(&mut cursor).collect();
	children.into_iter().filter(|c| c.has_error()).find_map(first_error)
}

struct Bridge<'a> {
	text: &'a str,
}

impl<'a> Bridge<'a> {
	fn source_file(&self, path: &Path, root: Node<'_>) -> Result<SourceFile, LoadError> {
		let mut package = None;
		let mut decls = Vec::new();

		let mut cursor = root.walk();
		for child in root.named_children(&mut cursor) {
			match child.kind() {
				"package_clause" => {
					package = child.named_child(0).map(|name| self.node_text(name).to_string());
				}
				"function_declaration" | "method_declaration" => decls.push(Decl::Func(self.func_decl(child))),
				"comment" => {}
				kind => decls.push(Decl::Other {
					kind: kind.to_string(),
					line: line_of(child),
				}),
			}
		}

		let package = package.ok_or_else(|| LoadError::MissingPackageClause(path.to_path_buf()))?;
		Ok(SourceFile {
			path: path.to_path_buf(),
			package,
			decls,
		})
	}

	fn func_decl(&self, node: Node<'_>) -> FuncDecl {
		let name = node
			.child_by_field_name("name")
			.map(|n| self.node_text(n).to_string())
			.unwrap_or_default();

		FuncDecl {
			name,
			receiver: node.child_by_field_name("receiver").map(|n| self.field_list(n)),
			type_params: node.child_by_field_name("type_parameters").map(|n| self.field_list(n)),
			params: node
				.child_by_field_name("parameters")
				.map(|n| self.field_list(n))
				.unwrap_or_default(),
			results: node.child_by_field_name("result").map(|n| self.results(n)),
			line: line_of(node),
		}
	}

	/// A result is either a parenthesized list or a single bare type.
	fn results(&self, node: Node<'_>) -> FieldList {
		if node.kind() == "parameter_list" {
			self.field_list(node)
		} else {
			FieldList::new(vec![Field::unnamed(self.type_expr(node))])
		}
	}

	fn field_list(&self, node: Node<'_>) -> FieldList {
		let mut fields = Vec::new();
		let mut cursor = node.walk();
		for child in node.named_children(&mut cursor) {
			let field = match child.kind() {
				"parameter_declaration" | "type_parameter_declaration" => Field {
					names: self.names(child),
					ty: self.field_type(child),
				},
				"variadic_parameter_declaration" => Field {
					names: self.names(child),
					ty: TypeExpr::Ellipsis(Box::new(self.field_type(child))),
				},
				"comment" => continue,
				kind => Field::unnamed(TypeExpr::Unsupported { kind: kind.to_string() }),
			};
			fields.push(field);
		}
		FieldList::new(fields)
	}

	fn names(&self, node: Node<'_>) -> Vec<String> {
		let mut cursor = node.walk();
		node.children_by_field_name("name", &mut cursor)
			.map(|n| self.node_text(n).to_string())
			.collect()
	}

	fn field_type(&self, node: Node<'_>) -> TypeExpr {
		match node.child_by_field_name("type") {
			Some(ty) => self.type_expr(ty),
			None => TypeExpr::Unsupported {
				kind: format!("{} without type", node.kind()),
			},
		}
	}

	fn type_expr(&self, node: Node<'_>) -> TypeExpr {
		match node.kind() {
			"type_identifier" | "identifier" | "package_identifier" | "field_identifier" => {
				TypeExpr::Ident(self.node_text(node).to_string())
			}
			"qualified_type" => TypeExpr::Selector {
				pkg: Box::new(self.field_or_unsupported(node, "package")),
				name: self.field_text(node, "name"),
			},
			"selector_expression" => TypeExpr::Selector {
				pkg: Box::new(self.field_or_unsupported(node, "operand")),
				name: self.field_text(node, "field"),
			},
			"pointer_type" => TypeExpr::Pointer(Box::new(self.first_named(node))),
			"parenthesized_type" => TypeExpr::Paren(Box::new(self.first_named(node))),
			"slice_type" => TypeExpr::Array {
				len: None,
				elem: Box::new(self.field_or_unsupported(node, "element")),
			},
			"array_type" => TypeExpr::Array {
				len: Some(Box::new(self.field_or_unsupported(node, "length"))),
				elem: Box::new(self.field_or_unsupported(node, "element")),
			},
			"int_literal" | "float_literal" | "imaginary_literal" | "rune_literal" => {
				TypeExpr::BasicLit(self.node_text(node).to_string())
			}
			"map_type" => TypeExpr::Map {
				key: Box::new(self.field_or_unsupported(node, "key")),
				value: Box::new(self.field_or_unsupported(node, "value")),
			},
			"function_type" => TypeExpr::Func {
				params: node
					.child_by_field_name("parameters")
					.map(|n| self.field_list(n))
					.unwrap_or_default(),
				results: node.child_by_field_name("result").map(|n| self.results(n)),
			},
			"generic_type" => TypeExpr::Generic {
				base: Box::new(self.field_or_unsupported(node, "type")),
				args: node
					.child_by_field_name("type_arguments")
					.map(|args| self.type_arguments(args))
					.unwrap_or_default(),
			},
			"channel_type" => TypeExpr::Chan(normalize_space(self.node_text(node))),
			"type_constraint" | "type_elem" if node.named_child_count() == 1 => self.first_named(node),
			"interface_type" | "struct_type" | "negated_type" | "type_constraint" | "type_elem" | "union_type" => {
				TypeExpr::Literal(normalize_space(self.node_text(node)))
			}
			kind => TypeExpr::Unsupported { kind: kind.to_string() },
		}
	}

	fn type_arguments(&self, node: Node<'_>) -> Vec<TypeExpr> {
		let mut cursor = node.walk();
		let args: Vec<Node<'_>> = node.named_children(&mut cursor).filter(|n| n.kind() != "comment").collect();
		args.into_iter().map(|n| self.type_expr(n)).collect()
	}

	fn first_named(&self, node: Node<'_>) -> TypeExpr {
		match node.named_child(0) {
			Some(inner) => self.type_expr(inner),
			None => TypeExpr::Unsupported {
				kind: format!("empty {}", node.kind()),
			},
		}
	}

	fn field_or_unsupported(&self, node: Node<'_>, field: &str) -> TypeExpr {
		match node.child_by_field_name(field) {
			Some(child) => self.type_expr(child),
			None => TypeExpr::Unsupported {
				kind: format!("{} without {field}", node.kind()),
			},
		}
	}

	fn field_text(&self, node: Node<'_>, field: &str) -> String {
		node.child_by_field_name(field)
			.map(|n| self.node_text(n).to_string())
			.unwrap_or_default()
	}

	fn node_text(&self, node: Node<'_>) -> &'a str {
		&self.text[node.start_byte()..node.end_byte()]
	}
}

fn line_of(node: Node<'_>) -> usize {
	node.start_position().row + 1
}

/// Collapse every whitespace run to a single space.
fn normalize_space(text: &str) -> String {
	text.split_whitespace().collect::<Vec<_>>().join(" ")
}
