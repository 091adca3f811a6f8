use crate::action::MatchPolicy;
use crate::error::PatchError;
use crate::tree::{Document, Item};
use crate::tree::method::MethodDeclaration;

impl Document {
	/// The position in [`Document::items`] of the method named by the constant at `name_index`.
	fn method_position(&self, name_index: u16, policy: MatchPolicy) -> Result<usize, PatchError> {
		let mut positions = self.items().iter()
			.enumerate()
			.filter(|(_, item)| matches!(item, Item::Method(method) if method.name_index() == name_index))
			.map(|(position, _)| position);

		let first = positions.next()
			.ok_or(PatchError::MethodNotFound { index: name_index })?;

		if policy == MatchPolicy::Unique {
			let others = positions.count();
			if others > 0 {
				return Err(PatchError::AmbiguousMethod { index: name_index, count: others + 1 });
			}
		}

		Ok(first)
	}

	/// Finds the method whose name is the constant at `name_index`.
	///
	/// Methods sharing a name (overloads) are not told apart by their descriptor: [`MatchPolicy::FirstMatch`] takes
	/// the one declared first, [`MatchPolicy::Unique`] fails.
	pub fn find_method(&self, name_index: u16, policy: MatchPolicy) -> Result<&MethodDeclaration, PatchError> {
		let position = self.method_position(name_index, policy)?;
		match &self.items()[position] {
			Item::Method(method) => Ok(method),
			_ => Err(PatchError::MethodNotFound { index: name_index }),
		}
	}

	pub(crate) fn find_method_mut(&mut self, name_index: u16, policy: MatchPolicy) -> Result<&mut MethodDeclaration, PatchError> {
		let position = self.method_position(name_index, policy)?;
		match &mut self.items_mut()[position] {
			Item::Method(method) => Ok(method),
			_ => Err(PatchError::MethodNotFound { index: name_index }),
		}
	}
}

#[cfg(test)]
mod testing {
	use anyhow::Result;
	use pretty_assertions::assert_eq;
	use crate::action::MatchPolicy;
	use crate::error::PatchError;

	const INPUT: &str = "\
.class public super [1] \n\
.method public [2] : [5] \n\
.end method \n\
.method public static [3] : [5] \n\
.end method \n\
.method private [3] : [6] \n\
.end method \n\
.const [1] = Class [4] \n\
.const [2] = Utf8 <init> \n\
.const [3] = Utf8 isPremiumAccount \n\
.const [4] = Utf8 Account \n\
.const [5] = Utf8 ()Z \n\
.const [6] = Utf8 (I)Z \n\
.end class \n\
";

	#[test]
	fn finds_method_by_name_index() -> Result<()> {
		let document = crate::reader::read(INPUT)?;

		let method = document.find_method(2, MatchPolicy::FirstMatch)?;
		assert_eq!(method.access_flags(), "public");

		let method = document.find_method(3, MatchPolicy::FirstMatch)?;
		assert_eq!(method.access_flags(), "public static");
		assert_eq!(method.descriptor_index(), 5);
		Ok(())
	}

	#[test]
	fn descriptor_index_is_not_a_name() -> Result<()> {
		let document = crate::reader::read(INPUT)?;
		assert_eq!(
			document.find_method(5, MatchPolicy::FirstMatch).map(|_| ()),
			Err(PatchError::MethodNotFound { index: 5 })
		);
		assert_eq!(
			document.find_method(4, MatchPolicy::FirstMatch).map(|_| ()),
			Err(PatchError::MethodNotFound { index: 4 })
		);
		Ok(())
	}

	#[test]
	fn unique_rejects_overloads() -> Result<()> {
		let mut document = crate::reader::read(INPUT)?;
		assert_eq!(
			document.find_method_mut(3, MatchPolicy::Unique).map(|_| ()),
			Err(PatchError::AmbiguousMethod { index: 3, count: 2 })
		);
		assert!(document.find_method_mut(2, MatchPolicy::Unique).is_ok());
		Ok(())
	}
}
