use std::fmt;

/// A plugin-local FormID.
///
/// FormIDs appear in conditions files as quoted hex strings of varying width
/// (`"1A"`, `"001A"`, `"00001A"` all name the same record). The merge map
/// keys them in canonical form — six hex digits, zero-padded, uppercase —
/// while replacement values are written back compact, without padding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FormId(u32);

impl FormId {
	/// Parse a hex string into a [`FormId`]. Returns `None` for anything
	/// that is not a plain hexadecimal digit run (empty strings, stray
	/// whitespace, `0x` prefixes).
	pub fn parse(text: &str) -> Option<Self> {
		u32::from_str_radix(text, 16).ok().map(Self)
	}

	/// Canonical form: six hex digits, zero-padded, uppercase. This is the
	/// lookup key format for the merge map's FormID tables.
	pub fn canonical(self) -> String {
		format!("{:06X}", self.0)
	}

	/// Compact form: uppercase hex with no padding, the width following the
	/// natural digit count of the value. This is the form written back into
	/// rewritten lines.
	pub fn compact(self) -> String {
		format!("{:X}", self.0)
	}
}

impl fmt::Display for FormId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{:06X}", self.0)
	}
}
