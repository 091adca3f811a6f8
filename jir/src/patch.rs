//! Finding a method by name and replacing the start of its body.
//!
//! A patch runs in three steps, each of which can fail:
//! 1. find the `Utf8` constant holding the method name ([`Document::find_utf8_constant`]),
//! 2. find the method named by that constant ([`Document::find_method`]),
//! 3. rewrite the start of its body ([`MethodDeclaration::replace_prefix`][crate::tree::method::MethodDeclaration::replace_prefix]).
//!
//! The steps work on a copy of the document. The copy is only handed out once all of them succeeded, so a failed
//! patch never leaves a half patched document behind.
//!
//! Patching an already patched document fails with [`PatchError::UnexpectedShape`], since its body no longer starts
//! with the field read.

use log::{debug, trace};
use crate::action::MatchPolicy;
use crate::error::PatchError;
use crate::tree::code::Instruction;
use crate::tree::Document;

/// Replaces the start of the method named `target_name` with `replacement`, taking the first match of each lookup.
pub fn patch(document: &Document, target_name: &str, replacement: &Instruction) -> Result<Document, PatchError> {
	Patch::new(target_name, replacement.clone()).apply(document)
}

/// A configured patch, that can be applied to many documents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Patch {
	target_name: String,
	replacement: Instruction,
	policy: MatchPolicy,
}

impl Patch {
	pub fn new(target_name: impl Into<String>, replacement: Instruction) -> Patch {
		Patch {
			target_name: target_name.into(),
			replacement,
			policy: MatchPolicy::default(),
		}
	}

	/// Makes the method return `true`, by replacing its start with `iconst_1`.
	pub fn return_true(target_name: impl Into<String>) -> Patch {
		Patch::new(target_name, Instruction::push_true())
	}

	pub fn with_policy(mut self, policy: MatchPolicy) -> Patch {
		self.policy = policy;
		self
	}

	pub fn target_name(&self) -> &str {
		&self.target_name
	}

	pub fn replacement(&self) -> &Instruction {
		&self.replacement
	}

	pub fn policy(&self) -> MatchPolicy {
		self.policy
	}

	/// Applies the patch, giving back the patched copy of `document`.
	pub fn apply(&self, document: &Document) -> Result<Document, PatchError> {
		let index = document.find_utf8_constant(&self.target_name, self.policy)?;
		debug!("found Utf8 constant [{index}] = {:?}", self.target_name);

		let mut patched = document.clone();
		let method = patched.find_method_mut(index, self.policy)?;
		debug!("found method {:?} [{}] : [{}]", method.access_flags(), method.name_index(), method.descriptor_index());

		method.replace_prefix(&self.replacement)?;
		debug!("replaced start of method body with `{}`", self.replacement);

		Ok(patched)
	}

	/// Reads `input`, applies the patch and writes the result.
	pub fn apply_str(&self, input: &str) -> Result<String, PatchError> {
		let document = crate::reader::read(input)?;
		trace!("read document with {} constants", document.pool().len());

		let patched = self.apply(&document)?;
		Ok(crate::writer::write_string(&patched))
	}
}

#[cfg(test)]
mod testing {
	use anyhow::Result;
	use pretty_assertions::assert_eq;
	use crate::action::MatchPolicy;
	use crate::error::PatchError;
	use crate::patch::Patch;
	use crate::tree::code::Instruction;

	fn input(name: &str) -> String {
		format!(concat!(
			".method public [1] : [2] \n",
			"    .attribute [3] .code stack 1 locals 1 \n",
			"L0:     aload_0 \n",
			"L1:     getfield [7] \n",
			"L4:     ireturn \n",
			"    .end code \n",
			".end method \n",
			".const [1] = Utf8 {} \n",
			".const [2] = Utf8 ()Z \n",
		), name)
	}

	#[test]
	fn patch_fn_equals_return_true() -> Result<()> {
		let document = crate::reader::read(&input("isPremiumAccount"))?;

		let a = crate::patch(&document, "isPremiumAccount", &Instruction::push_true())?;
		let b = Patch::return_true("isPremiumAccount").apply(&document)?;

		assert_eq!(a, b);
		assert_ne!(a, document);
		Ok(())
	}

	#[test]
	fn other_replacement() -> Result<()> {
		let patch = Patch::new("isPremiumAccount", Instruction::new("iconst_0"));
		let output = patch.apply_str(&input("isPremiumAccount"))?;
		assert!(output.contains("L0:     iconst_0 \nL4:     ireturn \n"), "{output}");
		Ok(())
	}

	#[test]
	fn parse_errors_are_reported() {
		let patch = Patch::return_true("isPremiumAccount");
		let result = patch.apply_str(".method public [1] : [2] \n");
		assert!(matches!(result, Err(PatchError::Parse(_))), "{result:?}");
	}

	#[test]
	fn policy() {
		let patch = Patch::return_true("a");
		assert_eq!(patch.policy(), MatchPolicy::FirstMatch);
		assert_eq!(patch.with_policy(MatchPolicy::Unique).policy(), MatchPolicy::Unique);
	}
}
