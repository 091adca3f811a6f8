use crate::tree::{LineEnding, SourceLine};

/// One line of the input, still borrowed, together with its 1-based line number.
#[derive(Debug, Clone, Copy)]
pub(crate) struct RawLine<'a> {
	pub(crate) line_number: usize,
	pub(crate) text: &'a str,
	pub(crate) ending: LineEnding,
}

impl RawLine<'_> {
	pub(crate) fn to_source_line(self) -> SourceLine {
		SourceLine::new(self.text, self.ending)
	}

	/// The text without surrounding whitespace. Krakatau writes a trailing space after most lines.
	pub(crate) fn trimmed(&self) -> &str {
		self.text.trim()
	}

	pub(crate) fn is_directive(&self, directive: &str) -> bool {
		let trimmed = self.trimmed();
		trimmed == directive || trimmed.strip_prefix(directive).is_some_and(|rest| rest.starts_with(char::is_whitespace))
	}
}

/// Splits the input into lines, keeping track of how each line was terminated.
///
/// Unlike [`str::lines`], a final line without a line break is reported with [`LineEnding::None`], so that
/// joining the lines again gives back exactly the input.
pub(crate) fn split(input: &str) -> impl Iterator<Item=RawLine<'_>> {
	input.split_inclusive('\n')
		.enumerate()
		.map(|(index, chunk)| {
			let (text, ending) = if let Some(text) = chunk.strip_suffix("\r\n") {
				(text, LineEnding::CrLf)
			} else if let Some(text) = chunk.strip_suffix('\n') {
				(text, LineEnding::Lf)
			} else {
				(chunk, LineEnding::None)
			};

			RawLine { line_number: index + 1, text, ending }
		})
}
