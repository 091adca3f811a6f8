//! The parsed form of a disassembled class file.
//!
//! A [`Document`] owns everything: the constant pool, the method declarations and all the lines this crate doesn't
//! look into. Only method bodies can be changed, see [`MethodDeclaration::replace_prefix`].

use std::fmt::{Display, Formatter};
use crate::tree::method::MethodDeclaration;
use crate::tree::pool::{ConstantPool, ConstantPoolEntry};

pub mod code;
pub mod method;
pub mod pool;

/// How a line was terminated in the input.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum LineEnding {
	#[default]
	Lf,
	CrLf,
	/// The last line of an input not ending in a line break.
	None,
}

impl LineEnding {
	pub fn as_str(self) -> &'static str {
		match self {
			LineEnding::Lf => "\n",
			LineEnding::CrLf => "\r\n",
			LineEnding::None => "",
		}
	}
}

/// A line kept exactly as it was read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceLine {
	pub text: String,
	pub ending: LineEnding,
}

impl SourceLine {
	pub fn new(text: impl Into<String>, ending: LineEnding) -> SourceLine {
		SourceLine { text: text.into(), ending }
	}
}

impl Display for SourceLine {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}{}", self.text, self.ending.as_str())
	}
}

/// A top level entry of a [`Document`], in the order it appeared in the input.
#[derive(Debug, Clone, PartialEq)]
pub enum Item {
	/// A `.const` line. The entry itself lives in the [`ConstantPool`] of the document, under this index.
	Constant(u16),
	Method(MethodDeclaration),
	/// Anything else: the class header, fields, bootstrap methods, `.end class`, empty lines...
	Line(SourceLine),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Document {
	pool: ConstantPool,
	items: Vec<Item>,
}

impl Document {
	pub(crate) fn new(pool: ConstantPool, items: Vec<Item>) -> Document {
		Document { pool, items }
	}

	pub fn pool(&self) -> &ConstantPool {
		&self.pool
	}

	pub fn items(&self) -> &[Item] {
		&self.items
	}

	pub(crate) fn items_mut(&mut self) -> &mut [Item] {
		&mut self.items
	}

	/// All method declarations, in document order.
	pub fn methods(&self) -> impl Iterator<Item=&MethodDeclaration> {
		self.items.iter()
			.filter_map(|item| match item {
				Item::Method(method) => Some(method),
				_ => None,
			})
	}

	/// Resolves the name of a method through the constant pool, if it's a `Utf8` entry.
	pub fn method_name(&self, method: &MethodDeclaration) -> Option<&str> {
		self.pool.get(method.name_index())
			.and_then(ConstantPoolEntry::utf8)
	}
}

impl Display for Document {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		f.write_str(&crate::writer::write_string(self))
	}
}
