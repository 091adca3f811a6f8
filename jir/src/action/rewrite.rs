use crate::error::PatchError;
use crate::tree::code::{CodeAttribute, CodeLine, Instruction};
use crate::tree::method::MethodDeclaration;

/// The mnemonics of the instructions replaced by [`MethodDeclaration::replace_prefix`]: loading `this`, then
/// reading one of its fields.
pub const EXPECTED_PREFIX: [&str; 2] = ["aload_0", "getfield"];

impl MethodDeclaration {
	/// Replaces the first two instructions of the method body with `replacement`.
	///
	/// The body must start with `aload_0` and `getfield`, see [`EXPECTED_PREFIX`]. The new instruction takes over the
	/// label and layout of the `aload_0`. Everything after the `getfield` is kept as is, and so is the stack and locals
	/// declaration: a single push never needs more stack than the two instructions it replaces.
	///
	/// The method is only changed if this returns `Ok(())`.
	pub fn replace_prefix(&mut self, replacement: &Instruction) -> Result<(), PatchError> {
		let Some(code) = self.code_mut() else {
			return Err(PatchError::MalformedMethod { found: 0 });
		};
		code.replace_prefix(replacement)
	}
}

impl CodeAttribute {
	fn replace_prefix(&mut self, replacement: &Instruction) -> Result<(), PatchError> {
		let found = self.instructions().count();
		if found < EXPECTED_PREFIX.len() {
			return Err(PatchError::MalformedMethod { found });
		}

		let [CodeLine::Instruction(first), CodeLine::Instruction(second), rest @ ..] = self.body.as_slice() else {
			return Err(PatchError::UnexpectedShape {
				reason: "the code doesn't start with two instructions".to_owned(),
			});
		};

		for (line, expected) in [first, second].into_iter().zip(EXPECTED_PREFIX) {
			if line.mnemonic() != expected {
				return Err(PatchError::UnexpectedShape {
					reason: format!("expected `{expected}`, got `{}`", line.instruction),
				});
			}
		}

		// The label of the `aload_0` stays, but the one of the `getfield` goes away with it.
		if let Some(label) = &second.label {
			if let Some(line) = rest.iter().find(|line| mentions_label(line, label)) {
				return Err(PatchError::UnexpectedShape {
					reason: format!("label {label} of the removed `{}` is still used by {:?}", second.instruction, line_text(line)),
				});
			}
		}

		let new_line = first.replaced_with(replacement.clone());
		self.body.drain(..2);
		self.body.insert(0, CodeLine::Instruction(new_line));

		Ok(())
	}
}

fn mentions_label(line: &CodeLine, label: &str) -> bool {
	let text = match line {
		CodeLine::Instruction(instruction) => instruction.operand().unwrap_or_default(),
		CodeLine::Line(line) => line.text.as_str(),
	};
	text.split(|c: char| c.is_whitespace() || c == ':' || c == ',')
		.any(|token| token == label)
}

fn line_text(line: &CodeLine) -> String {
	match line {
		CodeLine::Instruction(instruction) => instruction.to_string(),
		CodeLine::Line(line) => line.text.clone(),
	}
}
