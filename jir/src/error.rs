//! The errors of this crate.
//!
//! Reading fails with a [`ParseError`], patching fails with a [`PatchError`]. Neither is ever logged and dropped
//! inside this crate: what to do with a failed patch is up to the caller.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("line {line}: {kind}")]
pub struct ParseError {
	/// The 1-based line number the error was found on.
	pub line: usize,
	pub kind: ParseErrorKind,
}

impl ParseError {
	pub(crate) fn new(line: usize, kind: ParseErrorKind) -> ParseError {
		ParseError { line, kind }
	}
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseErrorKind {
	#[error("expected `.const [INDEX] = TAG VALUE`, got {0:?}")]
	BadConstant(String),
	#[error("unknown constant tag {0:?}")]
	UnknownConstantTag(String),
	#[error("bad string literal {0:?}")]
	BadString(String),
	#[error("constant [{0}] is declared more than once")]
	DuplicateConstant(u16),
	#[error("expected `.method ACCESS [NAME_INDEX] : [DESC_INDEX]`, got {0:?}")]
	BadMethodHeader(String),
	#[error("expected `.attribute [INDEX] .code stack INT locals INT`, got {0:?}")]
	BadCodeHeader(String),
	#[error("expected `LABEL: MNEMONIC OPERAND`, got {0:?}")]
	BadInstruction(String),
	#[error("a method can only have one code attribute")]
	DuplicateCode,
	#[error("method is never closed with `.end method`")]
	UnclosedMethod,
	#[error("code attribute is never closed with `.end code`")]
	UnclosedCode,
	#[error("unexpected {0:?} outside of its block")]
	Stray(String),
	#[error("method references constant [{0}], which isn't in the constant pool")]
	DanglingReference(u16),
}

/// Why [`patch`][crate::patch] failed. The input document is never changed when this is returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PatchError {
	#[error("failed to parse the input: {0}")]
	Parse(#[from] ParseError),
	#[error("no Utf8 constant {name:?} in the constant pool")]
	ConstantNotFound { name: String },
	#[error("no method has constant [{index}] as its name")]
	MethodNotFound { index: u16 },
	#[error("method body has {found} instruction(s), at least 2 are needed")]
	MalformedMethod { found: usize },
	#[error("method body doesn't start as expected: {reason}")]
	UnexpectedShape { reason: String },
	#[error("Utf8 constant {name:?} is declared more than once, at {indices:?}")]
	AmbiguousConstant { name: String, indices: Vec<u16> },
	#[error("{count} methods have constant [{index}] as their name")]
	AmbiguousMethod { index: u16, count: usize },
}
