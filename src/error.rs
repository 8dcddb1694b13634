use thiserror::Error;

use crate::loader::LoadError;

/// Errors that abort a listing run.
#[derive(Debug, Error)]
pub enum Error {
	/// A receiver list that does not hold exactly one field.
	#[error("strange receiver for {decl}: expected 1 field, found {fields}")]
	MalformedReceiver {
		/// Declaration carrying the receiver.
		decl: String,
		/// Number of fields found.
		fields: usize,
	},
	/// A receiver field that binds more than one name.
	#[error("strange receiver field for {decl}: names {names:?}")]
	MalformedReceiverField {
		/// Declaration carrying the receiver.
		decl: String,
		/// Names bound by the field.
		names: Vec<String>,
	},
	/// A type expression the renderer does not support.
	#[error("unsupported type: {kind}")]
	UnsupportedType {
		/// Description of the offending shape.
		kind: String,
	},
	/// An error raised while handling a named declaration.
	#[error("in {decl}: {source}")]
	InDeclaration {
		/// Declaration being rendered.
		decl: String,
		/// Underlying failure.
		#[source]
		source: Box<Error>,
	},
	/// Failed to locate, read or parse the requested packages.
	#[error(transparent)]
	Load(#[from] LoadError),
	/// Failed to encode JSON output.
	#[error("failed to encode listing: {0}")]
	Serialization(#[from] serde_json::Error),
}

impl Error {
	/// Attach the name of the declaration being processed.
	pub(crate) fn in_decl(self, decl: &str) -> Self {
		match self {
			// Receiver errors already name their declaration.
			Self::MalformedReceiver { .. } | Self::MalformedReceiverField { .. } | Self::InDeclaration { .. } => self,
			other => Self::InDeclaration {
				decl: decl.to_string(),
				source: Box::new(other),
			},
		}
	}
}

/// Result type returned by the gofuncs library.
pub type Result<T> = std::result::Result<T, Error>;
