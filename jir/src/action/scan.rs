use crate::action::MatchPolicy;
use crate::error::PatchError;
use crate::tree::Document;
use crate::tree::pool::ConstantPoolEntry;

impl Document {
	/// Finds the index of the `Utf8` constant with exactly the given value.
	///
	/// If the value is declared more than once, [`MatchPolicy::FirstMatch`] gives the entry declared first in the
	/// document, and [`MatchPolicy::Unique`] fails.
	pub fn find_utf8_constant(&self, value: &str, policy: MatchPolicy) -> Result<u16, PatchError> {
		let mut matches = self.pool().iter()
			.filter(|entry| entry.utf8() == Some(value))
			.map(ConstantPoolEntry::index);

		let first = matches.next()
			.ok_or_else(|| PatchError::ConstantNotFound { name: value.to_owned() })?;

		if policy == MatchPolicy::Unique {
			let others: Vec<u16> = matches.collect();
			if !others.is_empty() {
				let mut indices = vec![first];
				indices.extend(others);
				return Err(PatchError::AmbiguousConstant { name: value.to_owned(), indices });
			}
		}

		Ok(first)
	}
}

#[cfg(test)]
mod testing {
	use anyhow::Result;
	use pretty_assertions::assert_eq;
	use crate::action::MatchPolicy;
	use crate::error::PatchError;

	const POOL: &str = "\
.const [4] = Utf8 isPremiumAccount \n\
.const [2] = String [4] \n\
.const [9] = Utf8 \"isPremiumAccount\" \n\
.const [1] = Utf8 isPremium \n\
";

	#[test]
	fn finds_the_first_declared() -> Result<()> {
		let document = crate::reader::read(POOL)?;

		for _ in 0..3 {
			assert_eq!(document.find_utf8_constant("isPremiumAccount", MatchPolicy::FirstMatch), Ok(4));
		}
		assert_eq!(document.find_utf8_constant("isPremium", MatchPolicy::FirstMatch), Ok(1));
		Ok(())
	}

	#[test]
	fn first_in_document_order_not_lowest_index() -> Result<()> {
		let document = crate::reader::read(".const [8] = Utf8 a \n.const [3] = Utf8 a \n")?;
		assert_eq!(document.find_utf8_constant("a", MatchPolicy::FirstMatch), Ok(8));
		Ok(())
	}

	#[test]
	fn not_found() -> Result<()> {
		let document = crate::reader::read(POOL)?;
		assert_eq!(
			document.find_utf8_constant("isPremiumAccoun", MatchPolicy::FirstMatch),
			Err(PatchError::ConstantNotFound { name: "isPremiumAccoun".to_owned() })
		);
		// the String entry only refers to the name, it isn't one itself
		assert_eq!(
			document.find_utf8_constant("[4]", MatchPolicy::FirstMatch),
			Err(PatchError::ConstantNotFound { name: "[4]".to_owned() })
		);
		Ok(())
	}

	#[test]
	fn unique_rejects_duplicates() -> Result<()> {
		let document = crate::reader::read(POOL)?;
		assert_eq!(
			document.find_utf8_constant("isPremiumAccount", MatchPolicy::Unique),
			Err(PatchError::AmbiguousConstant { name: "isPremiumAccount".to_owned(), indices: vec![4, 9] })
		);
		assert_eq!(document.find_utf8_constant("isPremium", MatchPolicy::Unique), Ok(1));
		Ok(())
	}
}
