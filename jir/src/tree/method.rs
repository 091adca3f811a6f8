use crate::tree::code::{CodeAttribute, CodeLine};
use crate::tree::SourceLine;

#[derive(Debug, Clone, PartialEq)]
pub enum MethodLine {
	Code(CodeAttribute),
	/// Other attributes of the method, like `.signature` or `.exceptions`.
	Line(SourceLine),
}

/// A `.method ACCESS [NAME] : [DESCRIPTOR]` block, up to and including `.end method`.
#[derive(Debug, Clone, PartialEq)]
pub struct MethodDeclaration {
	header: SourceLine,
	access_flags: String,
	name_index: u16,
	descriptor_index: u16,
	pub(crate) lines: Vec<MethodLine>,
	end: SourceLine,
}

impl MethodDeclaration {
	pub(crate) fn new(
		header: SourceLine,
		access_flags: String,
		name_index: u16,
		descriptor_index: u16,
		lines: Vec<MethodLine>,
		end: SourceLine,
	) -> MethodDeclaration {
		MethodDeclaration { header, access_flags, name_index, descriptor_index, lines, end }
	}

	/// The declaration line, never changed.
	pub fn header(&self) -> &SourceLine {
		&self.header
	}

	/// The access flags as written, for example `public static`. Might be empty.
	pub fn access_flags(&self) -> &str {
		&self.access_flags
	}

	pub fn name_index(&self) -> u16 {
		self.name_index
	}

	pub fn descriptor_index(&self) -> u16 {
		self.descriptor_index
	}

	pub fn lines(&self) -> &[MethodLine] {
		&self.lines
	}

	pub fn code(&self) -> Option<&CodeAttribute> {
		self.lines.iter()
			.find_map(|line| match line {
				MethodLine::Code(code) => Some(code),
				MethodLine::Line(_) => None,
			})
	}

	pub(crate) fn code_mut(&mut self) -> Option<&mut CodeAttribute> {
		self.lines.iter_mut()
			.find_map(|line| match line {
				MethodLine::Code(code) => Some(code),
				MethodLine::Line(_) => None,
			})
	}

	/// The lines of the code attribute, or nothing for methods without code.
	pub fn body(&self) -> &[CodeLine] {
		self.code().map_or(&[], CodeAttribute::body)
	}

	/// The stack and locals declaration line.
	pub fn attribute_header(&self) -> Option<&SourceLine> {
		self.code().map(CodeAttribute::header)
	}

	pub fn end(&self) -> &SourceLine {
		&self.end
	}
}
