//! Owned view of the Go declarations the listing operates on.
//!
//! The loader produces these from a tree-sitter parse; tests build them by hand. Nothing in
//! the crate mutates them once built.

use std::path::PathBuf;

/// A parsed Go source file with its top-level declarations in source order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
	/// Path the file was read from.
	pub path: PathBuf,
	/// Name from the `package` clause.
	pub package: String,
	/// Top-level declarations, in the order they appear in the file.
	pub decls: Vec<Decl>,
}

impl SourceFile {
	/// Iterate over the function and method declarations of this file.
	pub fn funcs(&self) -> impl Iterator<Item = &FuncDecl> {
		self.decls.iter().filter_map(|decl| match decl {
			Decl::Func(func) => Some(func),
			Decl::Other { .. } => None,
		})
	}
}

/// A top-level declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decl {
	/// A function or method definition.
	Func(FuncDecl),
	/// Any other declaration (`import`, `type`, `var`, `const`).
	Other {
		/// Grammar node kind, e.g. `type_declaration`.
		kind: String,
		/// 1-based line of the declaration.
		line: usize,
	},
}

/// A function or method definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FuncDecl {
	/// Function or method name.
	pub name: String,
	/// Receiver list for methods; `None` for free functions.
	pub receiver: Option<FieldList>,
	/// Type parameters (`[T any]`), when the function is generic.
	pub type_params: Option<FieldList>,
	/// Parameter list.
	pub params: FieldList,
	/// Result list; `None` when the function returns nothing.
	pub results: Option<FieldList>,
	/// 1-based line of the `func` keyword.
	pub line: usize,
}

impl FuncDecl {
	/// Free function with the given parameters and results.
	pub fn new(name: impl Into<String>, params: FieldList, results: Option<FieldList>) -> Self {
		Self {
			name: name.into(),
			receiver: None,
			type_params: None,
			params,
			results,
			line: 0,
		}
	}

	/// Attach a receiver list, turning the declaration into a method.
	pub fn with_receiver(mut self, receiver: FieldList) -> Self {
		self.receiver = Some(receiver);
		self
	}

	/// Attach a type parameter list.
	pub fn with_type_params(mut self, type_params: FieldList) -> Self {
		self.type_params = Some(type_params);
		self
	}

	/// Record the source line.
	pub fn at_line(mut self, line: usize) -> Self {
		self.line = line;
		self
	}
}

/// A grouped list of fields, as used for parameters, results, receivers and type parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldList {
	/// Fields in declaration order.
	pub fields: Vec<Field>,
}

impl FieldList {
	/// Build a list from its fields.
	pub fn new(fields: Vec<Field>) -> Self {
		Self { fields }
	}

	/// Number of fields (not names) in the list.
	pub fn len(&self) -> usize {
		self.fields.len()
	}

	/// Whether the list has no fields.
	pub fn is_empty(&self) -> bool {
		self.fields.is_empty()
	}
}

/// Zero or more names sharing one type, e.g. `a, b int`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
	/// Bound names; empty for unnamed parameters and results.
	pub names: Vec<String>,
	/// Type shared by every name.
	pub ty: TypeExpr,
}

impl Field {
	/// A field with names.
	pub fn named<I, S>(names: I, ty: TypeExpr) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		Self {
			names: names.into_iter().map(Into::into).collect(),
			ty,
		}
	}

	/// A field with no names.
	pub fn unnamed(ty: TypeExpr) -> Self {
		Self { names: Vec::new(), ty }
	}
}

/// Syntactic description of a Go type.
///
/// The set is closed: anything the bridge does not recognize is carried as
/// [`TypeExpr::Unsupported`] so rendering fails loudly instead of guessing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeExpr {
	/// `int`, `Reader`, a constant used as an array length.
	Ident(String),
	/// `pkg.Name`.
	Selector {
		/// Package side of the selector.
		pkg: Box<TypeExpr>,
		/// Selected name.
		name: String,
	},
	/// `*T`.
	Pointer(Box<TypeExpr>),
	/// `[N]T` or `[]T`.
	Array {
		/// Length expression; `None` for slices.
		len: Option<Box<TypeExpr>>,
		/// Element type.
		elem: Box<TypeExpr>,
	},
	/// `...T` in the last parameter position.
	Ellipsis(Box<TypeExpr>),
	/// `func(params) results`.
	Func {
		/// Parameter list.
		params: FieldList,
		/// Result list, if any.
		results: Option<FieldList>,
	},
	/// `map[K]V`.
	Map {
		/// Key type.
		key: Box<TypeExpr>,
		/// Value type.
		value: Box<TypeExpr>,
	},
	/// A literal, only used for array lengths.
	BasicLit(String),
	/// `Name[A, B]`, an instantiated generic type.
	Generic {
		/// Generic type being instantiated.
		base: Box<TypeExpr>,
		/// Type arguments.
		args: Vec<TypeExpr>,
	},
	/// `(T)`.
	Paren(Box<TypeExpr>),
	/// Inline `interface{...}`, `struct{...}` or constraint text, whitespace-normalized.
	Literal(String),
	/// `chan T`, `<-chan T`, `chan<- T`. Recognized but not renderable.
	Chan(String),
	/// A shape outside the supported set.
	Unsupported {
		/// Grammar node kind that produced it.
		kind: String,
	},
}

impl TypeExpr {
	/// Identifier type.
	pub fn ident(name: impl Into<String>) -> Self {
		Self::Ident(name.into())
	}

	/// `pkg.name`.
	pub fn selector(pkg: impl Into<String>, name: impl Into<String>) -> Self {
		Self::Selector {
			pkg: Box::new(Self::ident(pkg)),
			name: name.into(),
		}
	}

	/// `*elem`.
	pub fn pointer(elem: TypeExpr) -> Self {
		Self::Pointer(Box::new(elem))
	}

	/// `[]elem`.
	pub fn slice(elem: TypeExpr) -> Self {
		Self::Array {
			len: None,
			elem: Box::new(elem),
		}
	}

	/// `[len]elem`.
	pub fn array(len: TypeExpr, elem: TypeExpr) -> Self {
		Self::Array {
			len: Some(Box::new(len)),
			elem: Box::new(elem),
		}
	}

	/// `...elem`.
	pub fn ellipsis(elem: TypeExpr) -> Self {
		Self::Ellipsis(Box::new(elem))
	}

	/// `map[key]value`.
	pub fn map(key: TypeExpr, value: TypeExpr) -> Self {
		Self::Map {
			key: Box::new(key),
			value: Box::new(value),
		}
	}
}
