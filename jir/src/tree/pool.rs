use std::fmt::{Display, Formatter};
use std::str::FromStr;
use indexmap::IndexMap;
use indexmap::map::Entry;
use crate::tree::SourceLine;

/// The kind of a constant pool entry, as Krakatau spells it after the `=` of a `.const` line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConstantTag {
	Utf8,
	Int,
	Float,
	Long,
	Double,
	Class,
	String,
	MethodType,
	MethodHandle,
	Field,
	Method,
	InterfaceMethod,
	NameAndType,
	Dynamic,
	InvokeDynamic,
	Module,
	Package,
}

impl ConstantTag {
	const ALL: [ConstantTag; 17] = [
		ConstantTag::Utf8,
		ConstantTag::Int,
		ConstantTag::Float,
		ConstantTag::Long,
		ConstantTag::Double,
		ConstantTag::Class,
		ConstantTag::String,
		ConstantTag::MethodType,
		ConstantTag::MethodHandle,
		ConstantTag::Field,
		ConstantTag::Method,
		ConstantTag::InterfaceMethod,
		ConstantTag::NameAndType,
		ConstantTag::Dynamic,
		ConstantTag::InvokeDynamic,
		ConstantTag::Module,
		ConstantTag::Package,
	];

	pub fn as_str(self) -> &'static str {
		match self {
			ConstantTag::Utf8 => "Utf8",
			ConstantTag::Int => "Int",
			ConstantTag::Float => "Float",
			ConstantTag::Long => "Long",
			ConstantTag::Double => "Double",
			ConstantTag::Class => "Class",
			ConstantTag::String => "String",
			ConstantTag::MethodType => "MethodType",
			ConstantTag::MethodHandle => "MethodHandle",
			ConstantTag::Field => "Field",
			ConstantTag::Method => "Method",
			ConstantTag::InterfaceMethod => "InterfaceMethod",
			ConstantTag::NameAndType => "NameAndType",
			ConstantTag::Dynamic => "Dynamic",
			ConstantTag::InvokeDynamic => "InvokeDynamic",
			ConstantTag::Module => "Module",
			ConstantTag::Package => "Package",
		}
	}
}

impl Display for ConstantTag {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		f.write_str(self.as_str())
	}
}

impl FromStr for ConstantTag {
	type Err = ();

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		ConstantTag::ALL.into_iter()
			.find(|tag| tag.as_str() == s)
			.ok_or(())
	}
}

/// A single `.const [index] = Tag ...` line.
///
/// Only `Utf8` entries have their value decoded, all other kinds are opaque and only kept for writing.
#[derive(Debug, Clone, PartialEq)]
pub struct ConstantPoolEntry {
	index: u16,
	tag: ConstantTag,
	value: Option<String>,
	line: SourceLine,
}

impl ConstantPoolEntry {
	pub(crate) fn new(index: u16, tag: ConstantTag, value: Option<String>, line: SourceLine) -> ConstantPoolEntry {
		ConstantPoolEntry { index, tag, value, line }
	}

	pub fn index(&self) -> u16 {
		self.index
	}

	pub fn tag(&self) -> ConstantTag {
		self.tag
	}

	/// The decoded value, if this is a `Utf8` entry.
	pub fn utf8(&self) -> Option<&str> {
		match self.tag {
			ConstantTag::Utf8 => self.value.as_deref(),
			_ => None,
		}
	}

	pub fn line(&self) -> &SourceLine {
		&self.line
	}
}

/// The constant pool of a document, in the order the entries were declared.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ConstantPool(IndexMap<u16, ConstantPoolEntry>);

impl ConstantPool {
	/// Adds an entry, giving it back if its index is already taken.
	pub(crate) fn insert(&mut self, entry: ConstantPoolEntry) -> Result<(), ConstantPoolEntry> {
		match self.0.entry(entry.index) {
			Entry::Occupied(_) => Err(entry),
			Entry::Vacant(vacant) => {
				vacant.insert(entry);
				Ok(())
			},
		}
	}

	pub fn get(&self, index: u16) -> Option<&ConstantPoolEntry> {
		self.0.get(&index)
	}

	pub fn contains(&self, index: u16) -> bool {
		self.0.contains_key(&index)
	}

	/// Iterates the entries in document order.
	pub fn iter(&self) -> impl Iterator<Item=&ConstantPoolEntry> {
		self.0.values()
	}

	pub fn len(&self) -> usize {
		self.0.len()
	}

	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}
}
