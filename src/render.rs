//! Rendering of Go declarations and type expressions back into source-like text.

use crate::ast::{FieldList, FuncDecl, TypeExpr};
use crate::error::{Error, Result};
use crate::visibility::single_receiver_field;

/// Converts declarations and type expressions into canonical signature text.
///
/// A renderer holds no state besides its formatting switches, so one value can be shared by
/// every file of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Renderer {
	/// Render variadic parameters as `...T` instead of their bare element type.
	variadic_ellipsis: bool,
}

impl Default for Renderer {
	fn default() -> Self {
		Self::new()
	}
}

impl Renderer {
	/// Renderer that keeps the `...` of variadic parameters.
	pub fn new() -> Self {
		Self { variadic_ellipsis: true }
	}

	/// Keep (`true`) or drop (`false`) the `...` marker of variadic parameters.
	///
	/// Dropping it renders `func f(xs ...int)` as `func f(xs int)`.
	pub fn with_variadic_ellipsis(mut self, enabled: bool) -> Self {
		self.variadic_ellipsis = enabled;
		self
	}

	/// Render a type expression.
	///
	/// Channel types and shapes outside the supported set fail with
	/// [`Error::UnsupportedType`].
	pub fn render_type(&self, ty: &TypeExpr) -> Result<String> {
		let text = match ty {
			TypeExpr::Ident(name) | TypeExpr::BasicLit(name) | TypeExpr::Literal(name) => name.clone(),
			TypeExpr::Selector { pkg, name } => format!("{}.{name}", self.render_type(pkg)?),
			TypeExpr::Pointer(elem) => format!("*{}", self.render_type(elem)?),
			TypeExpr::Array { len, elem } => {
				let len = match len {
					Some(len) => self.render_type(len)?,
					None => String::new(),
				};
				format!("[{len}]{}", self.render_type(elem)?)
			}
			TypeExpr::Ellipsis(elem) => {
				let elem = self.render_type(elem)?;
				if self.variadic_ellipsis { format!("...{elem}") } else { elem }
			}
			TypeExpr::Func { params, results } => {
				format!("func{}{}", self.render_params(params)?, self.render_results(results.as_ref())?)
			}
			TypeExpr::Map { key, value } => {
				format!("map[{}]{}", self.render_type(key)?, self.render_type(value)?)
			}
			TypeExpr::Generic { base, args } => {
				let args = args.iter().map(|arg| self.render_type(arg)).collect::<Result<Vec<_>>>()?;
				format!("{}[{}]", self.render_type(base)?, args.join(", "))
			}
			TypeExpr::Paren(inner) => format!("({})", self.render_type(inner)?),
			TypeExpr::Chan(text) => {
				return Err(Error::UnsupportedType {
					kind: format!("channel `{text}`"),
				});
			}
			TypeExpr::Unsupported { kind } => {
				return Err(Error::UnsupportedType {
					kind: format!("syntax node `{kind}`"),
				});
			}
		};
		Ok(text)
	}

	/// Render the fields of a list without surrounding delimiters: `a, b string, n int`.
	///
	/// Grouped names share one type, which is printed once after the last name.
	pub fn render_fields(&self, list: &FieldList) -> Result<String> {
		let mut out = String::new();
		for (i, field) in list.fields.iter().enumerate() {
			if i > 0 {
				out.push_str(", ");
			}
			if !field.names.is_empty() {
				out.push_str(&field.names.join(", "));
				out.push(' ');
			}
			out.push_str(&self.render_type(&field.ty)?);
		}
		Ok(out)
	}

	/// Render a parameter list including its parentheses.
	pub fn render_params(&self, params: &FieldList) -> Result<String> {
		Ok(format!("({})", self.render_fields(params)?))
	}

	/// Render a result list: empty when absent, otherwise a leading space followed by the
	/// fields, parenthesized only when there is more than one field.
	pub fn render_results(&self, results: Option<&FieldList>) -> Result<String> {
		let Some(results) = results else {
			return Ok(String::new());
		};
		let fields = self.render_fields(results)?;
		if results.len() > 1 { Ok(format!(" ({fields})")) } else { Ok(format!(" {fields}")) }
	}

	/// Render a full declaration, e.g. `func (r *Reader) Read(p []byte) (n int, err error)`.
	///
	/// Returns an empty string for a receiver without a name; such entries are interface
	/// method specifications and callers skip them.
	pub fn render_decl(&self, decl: &FuncDecl) -> Result<String> {
		let mut out = String::from("func ");

		if let Some(receiver) = &decl.receiver {
			let field = single_receiver_field(decl, receiver)?;
			let name = match field.names.as_slice() {
				[] => return Ok(String::new()),
				[name] => name,
				names => {
					return Err(Error::MalformedReceiverField {
						decl: decl.name.clone(),
						names: names.to_vec(),
					});
				}
			};
			let ty = self.render_type(&field.ty).map_err(|err| err.in_decl(&decl.name))?;
			out.push_str(&format!("({name} {ty}) "));
		}

		out.push_str(&decl.name);
		self.render_signature(decl, &mut out).map_err(|err| err.in_decl(&decl.name))?;
		Ok(out)
	}

	fn render_signature(&self, decl: &FuncDecl, out: &mut String) -> Result<()> {
		if let Some(type_params) = decl.type_params.as_ref().filter(|tp| !tp.is_empty()) {
			out.push('[');
			out.push_str(&self.render_fields(type_params)?);
			out.push(']');
		}
		out.push_str(&self.render_params(&decl.params)?);
		out.push_str(&self.render_results(decl.results.as_ref())?);
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use pretty_assertions::assert_eq;

	use super::*;
	use crate::ast::Field;

	fn params(fields: Vec<Field>) -> FieldList {
		FieldList::new(fields)
	}

	fn render(ty: TypeExpr) -> String {
		Renderer::default().render_type(&ty).unwrap()
	}

	#[test]
	fn renders_basic_shapes() {
		assert_eq!(render(TypeExpr::ident("int")), "int");
		assert_eq!(render(TypeExpr::selector("unicode", "SpecialCase")), "unicode.SpecialCase");
		assert_eq!(render(TypeExpr::slice(TypeExpr::pointer(TypeExpr::ident("X")))), "[]*X");
		assert_eq!(
			render(TypeExpr::pointer(TypeExpr::map(TypeExpr::ident("string"), TypeExpr::slice(TypeExpr::ident("int"))))),
			"*map[string][]int"
		);
		assert_eq!(render(TypeExpr::array(TypeExpr::BasicLit("16".into()), TypeExpr::ident("byte"))), "[16]byte");
		assert_eq!(render(TypeExpr::array(TypeExpr::ident("Size"), TypeExpr::ident("byte"))), "[Size]byte");
	}

	#[test]
	fn renders_function_types() {
		let callback = TypeExpr::Func {
			params: params(vec![Field::unnamed(TypeExpr::ident("string"))]),
			results: Some(params(vec![Field::unnamed(TypeExpr::ident("bool"))])),
		};
		assert_eq!(render(callback), "func(string) bool");

		let multi = TypeExpr::Func {
			params: FieldList::default(),
			results: Some(params(vec![
				Field::unnamed(TypeExpr::ident("int")),
				Field::unnamed(TypeExpr::ident("error")),
			])),
		};
		assert_eq!(render(multi), "func() (int, error)");

		let bare = TypeExpr::Func {
			params: FieldList::default(),
			results: None,
		};
		assert_eq!(render(bare), "func()");
	}

	#[test]
	fn renders_generics_and_literals() {
		let generic = TypeExpr::Generic {
			base: Box::new(TypeExpr::selector("maps", "Map")),
			args: vec![TypeExpr::ident("K"), TypeExpr::slice(TypeExpr::ident("V"))],
		};
		assert_eq!(render(generic), "maps.Map[K, []V]");
		assert_eq!(render(TypeExpr::Literal("interface{}".into())), "interface{}");
		assert_eq!(render(TypeExpr::Paren(Box::new(TypeExpr::ident("T")))), "(T)");
	}

	#[test]
	fn variadic_marker_is_configurable() {
		let ty = TypeExpr::ellipsis(TypeExpr::ident("int"));
		assert_eq!(Renderer::default().render_type(&ty).unwrap(), "...int");
		assert_eq!(Renderer::default().with_variadic_ellipsis(false).render_type(&ty).unwrap(), "int");
	}

	#[test]
	fn grouped_names_share_one_type() {
		let list = params(vec![Field::named(["a", "b"], TypeExpr::ident("string"))]);
		assert_eq!(Renderer::default().render_fields(&list).unwrap(), "a, b string");

		let mixed = params(vec![
			Field::named(["a", "b"], TypeExpr::ident("string")),
			Field::named(["n"], TypeExpr::ident("int")),
		]);
		assert_eq!(Renderer::default().render_params(&mixed).unwrap(), "(a, b string, n int)");
	}

	#[test]
	fn result_parentheses_depend_on_field_count() {
		let r = Renderer::default();
		assert_eq!(r.render_results(None).unwrap(), "");

		let one = params(vec![Field::unnamed(TypeExpr::ident("string"))]);
		assert_eq!(r.render_results(Some(&one)).unwrap(), " string");

		let two = params(vec![
			Field::unnamed(TypeExpr::ident("int")),
			Field::unnamed(TypeExpr::ident("error")),
		]);
		assert_eq!(r.render_results(Some(&two)).unwrap(), " (int, error)");
	}

	#[test]
	fn renders_free_function() {
		let decl = FuncDecl::new(
			"Join",
			params(vec![
				Field::named(["a"], TypeExpr::slice(TypeExpr::ident("string"))),
				Field::named(["sep"], TypeExpr::ident("string")),
			]),
			Some(params(vec![Field::unnamed(TypeExpr::ident("string"))])),
		);
		assert_eq!(Renderer::default().render_decl(&decl).unwrap(), "func Join(a []string, sep string) string");
	}

	#[test]
	fn renders_method_with_named_results() {
		let decl = FuncDecl::new(
			"Read",
			params(vec![Field::named(["p"], TypeExpr::slice(TypeExpr::ident("byte")))]),
			Some(params(vec![
				Field::named(["n"], TypeExpr::ident("int")),
				Field::named(["err"], TypeExpr::ident("error")),
			])),
		)
		.with_receiver(params(vec![Field::named(["r"], TypeExpr::pointer(TypeExpr::ident("Reader")))]));
		assert_eq!(
			Renderer::default().render_decl(&decl).unwrap(),
			"func (r *Reader) Read(p []byte) (n int, err error)"
		);
	}

	#[test]
	fn renders_type_parameters() {
		let decl = FuncDecl::new(
			"Keys",
			params(vec![Field::named(["m"], TypeExpr::map(TypeExpr::ident("K"), TypeExpr::ident("V")))]),
			Some(params(vec![Field::unnamed(TypeExpr::slice(TypeExpr::ident("K")))])),
		)
		.with_type_params(params(vec![
			Field::named(["K"], TypeExpr::ident("comparable")),
			Field::named(["V"], TypeExpr::ident("any")),
		]));
		assert_eq!(Renderer::default().render_decl(&decl).unwrap(), "func Keys[K comparable, V any](m map[K]V) []K");
	}

	#[test]
	fn unnamed_receiver_renders_empty() {
		let decl = FuncDecl::new("Close", FieldList::default(), Some(params(vec![Field::unnamed(TypeExpr::ident("error"))])))
			.with_receiver(params(vec![Field::unnamed(TypeExpr::ident("Closer"))]));
		assert_eq!(Renderer::default().render_decl(&decl).unwrap(), "");
	}

	#[test]
	fn receiver_with_two_names_is_malformed() {
		let decl = FuncDecl::new("Foo", FieldList::default(), None)
			.with_receiver(params(vec![Field::named(["a", "b"], TypeExpr::ident("T"))]));
		let err = Renderer::default().render_decl(&decl).unwrap_err();
		assert!(matches!(err, Error::MalformedReceiverField { .. }), "{err}");
	}

	#[test]
	fn channels_abort_rendering() {
		let decl = FuncDecl::new(
			"Drain",
			params(vec![Field::named(["c"], TypeExpr::Chan("<-chan int".into()))]),
			None,
		);
		let err = Renderer::default().render_decl(&decl).unwrap_err();
		assert_eq!(err.to_string(), "in Drain: unsupported type: channel `<-chan int`");

		let nested = TypeExpr::slice(TypeExpr::Chan("chan int".into()));
		assert!(Renderer::default().render_type(&nested).is_err());
	}

	#[test]
	fn unknown_shapes_abort_rendering() {
		let ty = TypeExpr::Unsupported {
			kind: "binary_expression".into(),
		};
		let err = Renderer::default().render_type(&TypeExpr::array(ty, TypeExpr::ident("int"))).unwrap_err();
		assert!(matches!(err, Error::UnsupportedType { .. }), "{err}");
	}
}
