use std::fmt::{Display, Formatter};
use crate::tree::{LineEnding, SourceLine};

/// An instruction without its label: the mnemonic and the rest of the line, if any.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instruction {
	pub mnemonic: String,
	pub operand: Option<String>,
}

impl Instruction {
	pub fn new(mnemonic: impl Into<String>) -> Instruction {
		Instruction { mnemonic: mnemonic.into(), operand: None }
	}

	pub fn with_operand(mnemonic: impl Into<String>, operand: impl Into<String>) -> Instruction {
		Instruction { mnemonic: mnemonic.into(), operand: Some(operand.into()) }
	}

	/// `iconst_1`, which pushes `true` for methods returning `boolean`.
	pub fn push_true() -> Instruction {
		Instruction::new("iconst_1")
	}
}

impl Display for Instruction {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		match &self.operand {
			Some(operand) => write!(f, "{} {operand}", self.mnemonic),
			None => f.write_str(&self.mnemonic),
		}
	}
}

/// The whitespace around the parts of an instruction line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Spacing {
	/// After the `:` of the label, or the indentation if there's no label.
	pub after_label: String,
	pub before_operand: String,
	pub trailing: String,
}

/// A line of the form `LABEL: MNEMONIC OPERAND`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstructionLine {
	pub label: Option<String>,
	pub instruction: Instruction,
	pub spacing: Spacing,
	pub ending: LineEnding,
}

impl InstructionLine {
	pub fn mnemonic(&self) -> &str {
		&self.instruction.mnemonic
	}

	pub fn operand(&self) -> Option<&str> {
		self.instruction.operand.as_deref()
	}

	/// Creates a line for `instruction` that looks exactly like this one, label included.
	pub fn replaced_with(&self, instruction: Instruction) -> InstructionLine {
		InstructionLine {
			label: self.label.clone(),
			instruction,
			spacing: self.spacing.clone(),
			ending: self.ending,
		}
	}
}

impl Display for InstructionLine {
	/// Writes the line without its line ending.
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		if let Some(label) = &self.label {
			write!(f, "{label}:")?;
		}
		write!(f, "{}{}", self.spacing.after_label, self.instruction.mnemonic)?;
		if let Some(operand) = &self.instruction.operand {
			write!(f, "{}{operand}", self.spacing.before_operand)?;
		}
		f.write_str(&self.spacing.trailing)
	}
}

#[derive(Debug, Clone, PartialEq)]
pub enum CodeLine {
	Instruction(InstructionLine),
	/// Label only lines, stack frames, `.catch`, switch tables, nested attributes...
	Line(SourceLine),
}

impl CodeLine {
	pub fn as_instruction(&self) -> Option<&InstructionLine> {
		match self {
			CodeLine::Instruction(instruction) => Some(instruction),
			CodeLine::Line(_) => None,
		}
	}
}

/// The `.code` attribute of a method, from its header line up to and including `.end code`.
#[derive(Debug, Clone, PartialEq)]
pub struct CodeAttribute {
	header: SourceLine,
	attribute_index: Option<u16>,
	stack: u16,
	locals: u16,
	pub(crate) body: Vec<CodeLine>,
	end: SourceLine,
}

impl CodeAttribute {
	pub(crate) fn new(
		header: SourceLine,
		attribute_index: Option<u16>,
		stack: u16,
		locals: u16,
		body: Vec<CodeLine>,
		end: SourceLine,
	) -> CodeAttribute {
		CodeAttribute { header, attribute_index, stack, locals, body, end }
	}

	/// The `.attribute [K] .code stack S locals L` line, never changed.
	pub fn header(&self) -> &SourceLine {
		&self.header
	}

	/// The constant pool index of the `Code` name, if the header is in the `.attribute` form.
	pub fn attribute_index(&self) -> Option<u16> {
		self.attribute_index
	}

	pub fn max_stack(&self) -> u16 {
		self.stack
	}

	pub fn max_locals(&self) -> u16 {
		self.locals
	}

	pub fn body(&self) -> &[CodeLine] {
		&self.body
	}

	pub fn instructions(&self) -> impl Iterator<Item=&InstructionLine> {
		self.body.iter().filter_map(CodeLine::as_instruction)
	}

	pub fn end(&self) -> &SourceLine {
		&self.end
	}
}

#[cfg(test)]
mod testing {
	use pretty_assertions::assert_eq;
	use crate::tree::LineEnding;
	use crate::tree::code::{Instruction, InstructionLine, Spacing};

	fn line(label: Option<&str>, after_label: &str, instruction: Instruction) -> InstructionLine {
		InstructionLine {
			label: label.map(str::to_owned),
			instruction,
			spacing: Spacing {
				after_label: after_label.to_owned(),
				before_operand: " ".to_owned(),
				trailing: " ".to_owned(),
			},
			ending: LineEnding::Lf,
		}
	}

	#[test]
	fn display() {
		let l = line(Some("L0"), "     ", Instruction::push_true());
		assert_eq!(l.to_string(), "L0:     iconst_1 ");

		let l = line(Some("L1234"), "  ", Instruction::with_operand("getfield", "[7]"));
		assert_eq!(l.to_string(), "L1234:  getfield [7] ");

		let l = line(None, "        ", Instruction::new("nop"));
		assert_eq!(l.to_string(), "        nop ");
	}

	#[test]
	fn replaced_keeps_layout() {
		let mut l = line(Some("L0"), "     ", Instruction::new("aload_0"));
		l.spacing.after_label = "\t".to_owned();
		l.spacing.trailing = String::new();
		l.ending = LineEnding::CrLf;

		let replaced = l.replaced_with(Instruction::with_operand("bipush", "42"));
		assert_eq!(replaced.to_string(), "L0:\tbipush 42");
		assert_eq!(replaced.ending, LineEnding::CrLf);
		assert_eq!(replaced.label.as_deref(), Some("L0"));
		assert_eq!(Instruction::with_operand("bipush", "42").to_string(), "bipush 42");
	}
}
