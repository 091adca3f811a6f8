//! Writing a [`Document`] back into the Krakatau assembly format.
//!
//! Every line that was read is written exactly as it was, including its whitespace and line ending. Only
//! instruction lines created by a rewrite get a new layout, see [`InstructionLine`].

use crate::tree::{Document, Item, SourceLine};
use crate::tree::code::{CodeAttribute, CodeLine, InstructionLine};
use crate::tree::method::{MethodDeclaration, MethodLine};

/// Writes the given document into a `String`.
pub fn write_string(document: &Document) -> String {
	let mut out = String::new();
	write(document, &mut out);
	out
}

/// Appends the given document to `out`.
pub fn write(document: &Document, out: &mut String) {
	for item in document.items() {
		match item {
			Item::Constant(index) => {
				// the reader only ever creates constant items together with their pool entry
				if let Some(entry) = document.pool().get(*index) {
					write_line(out, entry.line());
				}
			},
			Item::Method(method) => write_method(out, method),
			Item::Line(line) => write_line(out, line),
		}
	}
}

fn write_line(out: &mut String, line: &SourceLine) {
	out.push_str(&line.text);
	out.push_str(line.ending.as_str());
}

fn write_method(out: &mut String, method: &MethodDeclaration) {
	write_line(out, method.header());
	for line in method.lines() {
		match line {
			MethodLine::Code(code) => write_code(out, code),
			MethodLine::Line(line) => write_line(out, line),
		}
	}
	write_line(out, method.end());
}

fn write_code(out: &mut String, code: &CodeAttribute) {
	write_line(out, code.header());
	for line in code.body() {
		match line {
			CodeLine::Instruction(instruction) => write_instruction(out, instruction),
			CodeLine::Line(line) => write_line(out, line),
		}
	}
	write_line(out, code.end());
}

fn write_instruction(out: &mut String, instruction: &InstructionLine) {
	out.push_str(&instruction.to_string());
	out.push_str(instruction.ending.as_str());
}

#[cfg(test)]
mod testing {
	use pretty_assertions::assert_eq;
	use crate::error::ParseError;

	fn round_trip(input: &str) -> Result<(), ParseError> {
		let document = crate::reader::read(input)?;
		assert_eq!(super::write_string(&document), input);
		Ok(())
	}

	#[test]
	fn round_trip_untouched_lines() -> Result<(), ParseError> {
		round_trip("")?;
		round_trip("\n\n")?;
		round_trip(".version 52 0 \n.class public super [1] \n.end class")?;
		round_trip(".class [1]\r\n.method [2] : [3]\r\n    .code stack 0 locals 0\r\nL0:\treturn\r\n    .end code\r\n.end method\r\n.const [2] = Utf8 a\r\n.const [3] = Utf8 ()V\r\n")?;
		round_trip(concat!(
			".method public [1] : [2] \n",
			"    .attribute [3] .code stack 1 locals 2 \n",
			"L0:     iload_1 \n",
			"L1:     tableswitch 0 \n",
			"            L20 \n",
			"            default : L24 \n",
			"\n",
			"L20:    iconst_0   \n",
			"L21:    ireturn \n",
			"        .stack same \n",
			"L24:    iconst_1 \n",
			"L25:    ireturn \n",
			"L26:    \n",
			"    .end code \n",
			".end method \n",
			".const [1] = Utf8 \"with space\" \n",
			".const [2] = Utf8 (I)Z \n",
		))?;
		Ok(())
	}

	#[test]
	fn display_is_write_string() -> Result<(), ParseError> {
		let input = ".const [1] = Utf8 \"\\u00e4\" \n";
		let document = crate::reader::read(input)?;
		assert_eq!(document.to_string(), input);
		Ok(())
	}
}
