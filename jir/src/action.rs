pub(crate) mod locate;
pub(crate) mod rewrite;
pub(crate) mod scan;

/// What to do when a lookup finds more than one match.
///
/// Both the constant pool lookup and the method lookup follow this.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum MatchPolicy {
	/// Take the first match in document order.
	#[default]
	FirstMatch,
	/// Fail with [`PatchError::AmbiguousConstant`][crate::PatchError::AmbiguousConstant] or
	/// [`PatchError::AmbiguousMethod`][crate::PatchError::AmbiguousMethod].
	Unique,
}
