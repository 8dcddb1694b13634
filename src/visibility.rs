//! Export rule for function and method declarations.

use crate::ast::{Field, FieldList, FuncDecl};
use crate::error::{Error, Result};
use crate::render::Renderer;

/// Whether `name` starts with an upper-case letter, ignoring one leading `*`.
///
/// Case is decided by Unicode, so `Ärger` is upper and `ärger` is not.
pub fn is_upper(name: &str) -> bool {
	let name = name.strip_prefix('*').unwrap_or(name);
	name.chars().next().is_some_and(char::is_uppercase)
}

/// Whether a declaration belongs to the package's exported surface.
///
/// Free functions are exported when their name is upper. Methods additionally require the
/// rendered receiver type to be upper, so `func (t *thing) Do()` is not exported.
pub fn is_exported(decl: &FuncDecl) -> Result<bool> {
	let Some(receiver) = &decl.receiver else {
		return Ok(is_upper(&decl.name));
	};

	let field = single_receiver_field(decl, receiver)?;
	let receiver_type = Renderer::default().render_type(&field.ty).map_err(|err| err.in_decl(&decl.name))?;
	Ok(is_upper(&receiver_type) && is_upper(&decl.name))
}

/// The only field of a receiver list, or a malformed-receiver error.
pub(crate) fn single_receiver_field<'a>(decl: &FuncDecl, receiver: &'a FieldList) -> Result<&'a Field> {
	match receiver.fields.as_slice() {
		[field] => Ok(field),
		fields => Err(Error::MalformedReceiver {
			decl: decl.name.clone(),
			fields: fields.len(),
		}),
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::ast::TypeExpr;

	fn method(receiver: TypeExpr, name: &str) -> FuncDecl {
		FuncDecl::new(name, FieldList::default(), None).with_receiver(FieldList::new(vec![Field::named(["r"], receiver)]))
	}

	#[test]
	fn upper_rule_strips_one_star() {
		assert!(is_upper("Foo"));
		assert!(is_upper("*Foo"));
		assert!(!is_upper("foo"));
		assert!(!is_upper("*foo"));
		assert!(!is_upper("**Foo"));
		assert!(!is_upper("_Foo"));
		assert!(!is_upper(""));
		assert!(!is_upper("*"));
	}

	#[test]
	fn upper_rule_is_unicode_aware() {
		assert!(is_upper("Ärger"));
		assert!(is_upper("Δ"));
		assert!(!is_upper("ärger"));
		assert!(!is_upper("δ"));
		assert!(!is_upper("世界"));
	}

	#[test]
	fn free_functions_follow_their_name() {
		assert!(is_exported(&FuncDecl::new("Join", FieldList::default(), None)).unwrap());
		assert!(!is_exported(&FuncDecl::new("split", FieldList::default(), None)).unwrap());
	}

	#[test]
	fn methods_need_upper_receiver_and_name() {
		let upper = TypeExpr::ident("MyType");
		let lower = TypeExpr::ident("myType");
		assert!(is_exported(&method(upper.clone(), "Foo")).unwrap());
		assert!(is_exported(&method(TypeExpr::pointer(upper.clone()), "Foo")).unwrap());
		assert!(!is_exported(&method(TypeExpr::pointer(lower.clone()), "Foo")).unwrap());
		assert!(!is_exported(&method(TypeExpr::pointer(upper), "foo")).unwrap());
		assert!(!is_exported(&method(lower, "foo")).unwrap());
	}

	#[test]
	fn generic_receivers_use_the_base_name() {
		let receiver = TypeExpr::pointer(TypeExpr::Generic {
			base: Box::new(TypeExpr::ident("List")),
			args: vec![TypeExpr::ident("T")],
		});
		assert!(is_exported(&method(receiver, "Push")).unwrap());
	}

	#[test]
	fn receiver_must_hold_one_field() {
		let decl = FuncDecl::new("Foo", FieldList::default(), None).with_receiver(FieldList::default());
		let err = is_exported(&decl).unwrap_err();
		assert!(matches!(err, Error::MalformedReceiver { fields: 0, .. }), "{err}");

		let two = FieldList::new(vec![
			Field::named(["a"], TypeExpr::ident("A")),
			Field::named(["b"], TypeExpr::ident("B")),
		]);
		let decl = FuncDecl::new("Foo", FieldList::default(), None).with_receiver(two);
		let err = is_exported(&decl).unwrap_err();
		assert_eq!(err.to_string(), "strange receiver for Foo: expected 1 field, found 2");
	}

	#[test]
	fn channel_receiver_is_fatal() {
		let err = is_exported(&method(TypeExpr::Chan("chan int".into()), "Foo")).unwrap_err();
		assert!(matches!(err, Error::InDeclaration { .. }), "{err}");
	}
}
