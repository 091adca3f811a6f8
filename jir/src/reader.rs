//! Reading the Krakatau assembly format into a [`Document`].
//!
//! The grammar understood here is line oriented:
//! ```text
//! constant-decl   ::= ".const [" INDEX "] = " TAG " " VALUE
//! method-decl     ::= ".method " ACCESS " [" NAME_INDEX "] : [" DESC_INDEX "]"
//! attribute-hdr   ::= "    .attribute [" ATTR_INDEX "] .code stack " INT " locals " INT
//! instruction     ::= LABEL ":" WS MNEMONIC (WS OPERAND)?
//! ```
//! A method runs up to `.end method`, a code attribute up to `.end code`. Lines this crate has no use for are kept
//! as they are, so that [`write_string`][crate::writer::write_string] can give back the exact input.

use log::trace;
use crate::error::{ParseError, ParseErrorKind};
use crate::lines::{self, RawLine};
use crate::tree::{Document, Item};
use crate::tree::code::{CodeAttribute, CodeLine, Instruction, InstructionLine, Spacing};
use crate::tree::method::{MethodDeclaration, MethodLine};
use crate::tree::pool::{ConstantPool, ConstantPoolEntry, ConstantTag};

/// Reads a whole disassembled class file.
///
/// ```
/// let input = "\
/// .class public super [1] \n\
/// .method public [3] : [4] \n\
/// .end method \n\
/// .const [3] = Utf8 isPremiumAccount \n\
/// .const [4] = Utf8 ()Z \n\
/// .end class \n\
/// ";
///
/// let document = jir::reader::read(input).unwrap();
///
/// assert_eq!(document.pool().len(), 2);
/// let method = document.methods().next().unwrap();
/// assert_eq!(document.method_name(method), Some("isPremiumAccount"));
/// assert_eq!(jir::writer::write_string(&document), input);
/// ```
pub fn read(input: &str) -> Result<Document, ParseError> {
	let mut lines = lines::split(input);

	let mut pool = ConstantPool::default();
	let mut items = Vec::new();
	// (line number, name index, descriptor index), checked once the whole pool is known
	let mut references = Vec::new();

	while let Some(line) = lines.next() {
		if line.is_directive(".const") {
			let entry = read_constant(line)?;
			let index = entry.index();
			pool.insert(entry)
				.map_err(|entry| ParseError::new(line.line_number, ParseErrorKind::DuplicateConstant(entry.index())))?;
			items.push(Item::Constant(index));
		} else if line.is_directive(".method") {
			let method = read_method(line, &mut lines)?;
			references.push((line.line_number, method.name_index(), method.descriptor_index()));
			items.push(Item::Method(method));
		} else if line.is_directive(".end method") || line.is_directive(".end code") {
			return Err(ParseError::new(line.line_number, ParseErrorKind::Stray(line.trimmed().to_owned())));
		} else {
			items.push(Item::Line(line.to_source_line()));
		}
	}

	for (line_number, name_index, descriptor_index) in references {
		for index in [name_index, descriptor_index] {
			if !pool.contains(index) {
				return Err(ParseError::new(line_number, ParseErrorKind::DanglingReference(index)));
			}
		}
	}

	trace!("read {} constants and {} lines", pool.len(), items.len());

	Ok(Document::new(pool, items))
}

/// Splits off the next whitespace separated token.
fn next_token(s: &str) -> Option<(&str, &str)> {
	let s = s.trim_start();
	if s.is_empty() {
		return None;
	}
	let end = s.find(char::is_whitespace).unwrap_or(s.len());
	Some(s.split_at(end))
}

/// Parses a constant pool reference like `[12]`.
fn parse_ref(token: &str) -> Option<u16> {
	token.strip_prefix('[')?
		.strip_suffix(']')?
		.parse()
		.ok()
}

fn read_constant(line: RawLine) -> Result<ConstantPoolEntry, ParseError> {
	let bad = || ParseError::new(line.line_number, ParseErrorKind::BadConstant(line.text.to_owned()));

	let rest = line.trimmed().strip_prefix(".const").ok_or_else(bad)?;
	let (index, rest) = next_token(rest).ok_or_else(bad)?;
	let index = parse_ref(index).ok_or_else(bad)?;
	let (equals, rest) = next_token(rest).ok_or_else(bad)?;
	if equals != "=" {
		return Err(bad());
	}
	let (tag, rest) = next_token(rest).ok_or_else(bad)?;
	let tag: ConstantTag = tag.parse()
		.map_err(|()| ParseError::new(line.line_number, ParseErrorKind::UnknownConstantTag(tag.to_owned())))?;

	let value = match tag {
		ConstantTag::Utf8 => {
			let raw = rest.trim();
			let value = decode_string(raw)
				.ok_or_else(|| ParseError::new(line.line_number, ParseErrorKind::BadString(raw.to_owned())))?;
			Some(value)
		},
		_ => None,
	};

	Ok(ConstantPoolEntry::new(index, tag, value, line.to_source_line()))
}

/// Decodes the value of a `Utf8` constant.
///
/// Krakatau writes simple values bare, everything else in quotes with backslash escapes, optionally prefixed by a
/// `b` if the value isn't valid modified UTF-8.
fn decode_string(raw: &str) -> Option<String> {
	let quoted = raw.strip_prefix('b')
		.filter(|rest| rest.starts_with(|c| c == '"' || c == '\''))
		.unwrap_or(raw);

	let Some(quote) = quoted.chars().next().filter(|c| *c == '"' || *c == '\'') else {
		return Some(raw.to_owned());
	};

	let inner = quoted.strip_prefix(quote)?.strip_suffix(quote)?;

	let mut out = String::with_capacity(inner.len());
	let mut chars = inner.chars();
	while let Some(c) = chars.next() {
		if c != '\\' {
			out.push(c);
			continue;
		}
		let escaped = match chars.next()? {
			'n' => '\n',
			'r' => '\r',
			't' => '\t',
			'0' => '\0',
			'\\' => '\\',
			'"' => '"',
			'\'' => '\'',
			'x' => hex_char(&mut chars, 2)?,
			'u' => hex_char(&mut chars, 4)?,
			'U' => hex_char(&mut chars, 8)?,
			_ => return None,
		};
		out.push(escaped);
	}
	Some(out)
}

fn hex_char(chars: &mut std::str::Chars, digits: usize) -> Option<char> {
	let hex: String = chars.take(digits).collect();
	if hex.len() != digits {
		return None;
	}
	u32::from_str_radix(&hex, 16).ok().and_then(char::from_u32)
}

fn read_method<'a>(header: RawLine<'a>, lines: &mut impl Iterator<Item=RawLine<'a>>) -> Result<MethodDeclaration, ParseError> {
	let bad = || ParseError::new(header.line_number, ParseErrorKind::BadMethodHeader(header.text.to_owned()));

	let rest = header.trimmed().strip_prefix(".method").ok_or_else(bad)?;
	let tokens: Vec<&str> = rest.split_whitespace().collect();
	let [access @ .., name, ":", descriptor] = tokens.as_slice() else {
		return Err(bad());
	};
	let name_index = parse_ref(name).ok_or_else(bad)?;
	let descriptor_index = parse_ref(descriptor).ok_or_else(bad)?;
	let access_flags = access.join(" ");

	let unclosed = || ParseError::new(header.line_number, ParseErrorKind::UnclosedMethod);

	let mut method_lines = Vec::new();
	let mut has_code = false;
	loop {
		let line = lines.next().ok_or_else(unclosed)?;

		if line.is_directive(".end method") {
			return Ok(MethodDeclaration::new(
				header.to_source_line(),
				access_flags,
				name_index,
				descriptor_index,
				method_lines,
				line.to_source_line(),
			));
		} else if line.is_directive(".method") {
			return Err(unclosed());
		} else if line.is_directive(".end code") {
			return Err(ParseError::new(line.line_number, ParseErrorKind::Stray(line.trimmed().to_owned())));
		} else if is_code_header(line) {
			if has_code {
				return Err(ParseError::new(line.line_number, ParseErrorKind::DuplicateCode));
			}
			has_code = true;
			method_lines.push(MethodLine::Code(read_code(line, lines)?));
		} else {
			method_lines.push(MethodLine::Line(line.to_source_line()));
		}
	}
}

fn is_code_header(line: RawLine) -> bool {
	let mut tokens = line.text.split_whitespace();
	match tokens.next() {
		Some(".code") => true,
		Some(".attribute") => tokens.nth(1) == Some(".code"),
		_ => false,
	}
}

fn read_code<'a>(header: RawLine<'a>, lines: &mut impl Iterator<Item=RawLine<'a>>) -> Result<CodeAttribute, ParseError> {
	let bad = || ParseError::new(header.line_number, ParseErrorKind::BadCodeHeader(header.text.to_owned()));

	let tokens: Vec<&str> = header.text.split_whitespace().collect();
	let (attribute_index, rest) = match tokens.as_slice() {
		[".attribute", index, rest @ ..] => (Some(parse_ref(index).ok_or_else(bad)?), rest),
		rest => (None, rest),
	};
	let [".code", "stack", stack, "locals", locals] = rest else {
		return Err(bad());
	};
	let stack = stack.parse().map_err(|_| bad())?;
	let locals = locals.parse().map_err(|_| bad())?;

	let unclosed = || ParseError::new(header.line_number, ParseErrorKind::UnclosedCode);

	let mut body = Vec::new();
	loop {
		let line = lines.next().ok_or_else(unclosed)?;

		if line.is_directive(".end code") {
			return Ok(CodeAttribute::new(header.to_source_line(), attribute_index, stack, locals, body, line.to_source_line()));
		} else if line.is_directive(".end method") || line.is_directive(".method") {
			return Err(unclosed());
		} else if let Some(instruction) = read_instruction(line)? {
			body.push(CodeLine::Instruction(instruction));
		} else {
			body.push(CodeLine::Line(line.to_source_line()));
		}
	}
}

fn is_label(s: &str) -> bool {
	!s.is_empty() && s.chars().all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}

/// Reads `LABEL: MNEMONIC OPERAND`, starting at the first column.
///
/// Gives `None` for lines that are not instructions, including label only lines like `L12:`.
fn read_instruction(line: RawLine) -> Result<Option<InstructionLine>, ParseError> {
	let text = line.text;
	if text.starts_with(|c: char| c.is_whitespace() || c == '.') {
		return Ok(None);
	}
	let Some((label, rest)) = text.split_once(':') else {
		return Ok(None);
	};
	if !is_label(label) {
		return Ok(None);
	}

	let body = rest.trim_start();
	if body.is_empty() {
		return Ok(None);
	}
	let after_label = &rest[..rest.len() - body.len()];

	let bad = || ParseError::new(line.line_number, ParseErrorKind::BadInstruction(text.to_owned()));

	if after_label.is_empty() {
		return Err(bad());
	}

	let mnemonic_end = body.find(char::is_whitespace).unwrap_or(body.len());
	let (mnemonic, after) = body.split_at(mnemonic_end);
	if !mnemonic.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
		return Err(bad());
	}

	let content = after.trim_end();
	let trailing = &after[content.len()..];

	let (before_operand, operand) = if content.is_empty() {
		(" ", None)
	} else {
		let operand = content.trim_start();
		(&content[..content.len() - operand.len()], Some(operand.to_owned()))
	};

	Ok(Some(InstructionLine {
		label: Some(label.to_owned()),
		instruction: Instruction {
			mnemonic: mnemonic.to_owned(),
			operand,
		},
		spacing: Spacing {
			after_label: after_label.to_owned(),
			before_operand: before_operand.to_owned(),
			trailing: trailing.to_owned(),
		},
		ending: line.ending,
	}))
}
