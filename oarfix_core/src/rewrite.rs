use std::ops::Range;

use crate::OarfixError;
use crate::OarfixResult;
use crate::form_id::FormId;
use crate::remap::RemapTable;

/// Suffix marker identifying a mergeable plugin reference. `.esm` and `.esl`
/// plugins are never merged, so only `.esp` references are candidates.
pub const PLUGIN_SUFFIX: &str = ".esp";

/// Key prefix introducing a FormID field on the line following a plugin
/// reference in OAR conditions files.
pub const FORM_ID_KEY: &str = "\"formID\": \"";

/// A single line rewrite performed by the engine, suitable for caller-side
/// progress logging. The engine itself writes nothing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Substitution {
	/// 1-indexed line number in the source document.
	pub line: usize,
	/// The line as it appeared in the input.
	pub original: String,
	/// The line as emitted after substitution.
	pub replacement: String,
}

/// The outcome of rewriting one document.
#[derive(Debug)]
pub struct Rewrite {
	/// True when at least one substitution occurred.
	pub changed: bool,
	/// The full output line sequence. Always the same length as the input —
	/// lookahead lines are re-emitted whether or not they were modified, and
	/// no input line is ever dropped.
	pub lines: Vec<String>,
	/// One entry per rewritten line, in document order.
	pub substitutions: Vec<Substitution>,
}

/// A plugin reference located inside a line: the quoted literal ending in
/// [`PLUGIN_SUFFIX`], together with the offsets needed to splice a
/// replacement back into place.
#[derive(Debug, PartialEq, Eq)]
pub(crate) struct PluginReference<'a> {
	/// The plugin name, from just after the opening quote through the end of
	/// the suffix marker.
	pub(crate) name: &'a str,
	/// Byte offset of the opening double quote.
	pub(crate) quote: usize,
	/// Byte offset one past the end of the suffix marker.
	pub(crate) end: usize,
}

/// Locate a plugin reference in a line.
///
/// Only the first occurrence of the suffix marker is considered; a line
/// carrying several candidate references only ever has its first one
/// evaluated. A marker with no preceding double quote is treated as spurious
/// (a comment or malformed line) and reported as no reference.
pub(crate) fn locate_reference(line: &str) -> Option<PluginReference<'_>> {
	let offset = line.find(PLUGIN_SUFFIX)?;
	let end = offset + PLUGIN_SUFFIX.len();
	// Scan backward for the quote delimiting the start of the literal.
	let quote = line[..offset].rfind('"')?;

	Some(PluginReference {
		name: &line[quote + 1..end],
		quote,
		end,
	})
}

/// Replace `range` within `line`, preserving the prefix and suffix
/// byte-for-byte. `range` must lie on character boundaries within `line`.
pub(crate) fn splice(line: &str, range: Range<usize>, replacement: &str) -> String {
	let mut out = String::with_capacity(line.len() - range.len() + replacement.len());
	out.push_str(&line[..range.start]);
	out.push_str(replacement);
	out.push_str(&line[range.end..]);
	out
}

/// Scanner state for the per-file rewrite.
///
/// The engine is a two-state machine: it scans for plugin references, and
/// after substituting one it may consume exactly one extra line looking for
/// the dependent FormID field. The consumed line is never itself scanned for
/// plugin references.
#[derive(Debug)]
enum ScanState<'a> {
	/// Looking for plugin references.
	Scanning,
	/// A reference to `plugin` was just substituted and the plugin has FormID
	/// mappings; the next line is consumed as FormID lookahead.
	PendingFormId { plugin: &'a str },
}

/// A forward-only cursor over the input lines. A line handed out (including
/// as lookahead) is consumed and cannot be re-scanned.
struct LineCursor<I> {
	lines: I,
	number: usize,
}

impl<'a, I: Iterator<Item = &'a str>> LineCursor<I> {
	fn new(lines: I) -> Self {
		Self { lines, number: 0 }
	}

	/// Consume the next line, returning it with its 1-indexed line number.
	fn consume_next(&mut self) -> Option<(usize, &'a str)> {
		let line = self.lines.next()?;
		self.number += 1;
		Some((self.number, line))
	}
}

/// Rewrite one document against the remap table.
///
/// This is a pure fold over the input lines: no I/O, no shared state, and
/// every byte of unrelated content is preserved exactly. Lines are processed
/// strictly in order. Malformed content (a marker without a preceding quote,
/// a FormID field that does not parse) passes through unchanged; the only
/// hard failure is a replacement FormID in the table that is not valid hex,
/// which indicates a corrupt merge map.
pub fn rewrite_lines<'a, I>(lines: I, table: &RemapTable) -> OarfixResult<Rewrite>
where
	I: IntoIterator<Item = &'a str>,
{
	let mut cursor = LineCursor::new(lines.into_iter());
	let mut out = Vec::new();
	let mut substitutions = Vec::new();
	let mut state = ScanState::Scanning;

	while let Some((number, line)) = cursor.consume_next() {
		match std::mem::replace(&mut state, ScanState::Scanning) {
			ScanState::Scanning => {
				let Some(reference) = locate_reference(line) else {
					out.push(line.to_string());
					continue;
				};

				let Some(merged) = table.lookup_plugin(reference.name) else {
					out.push(line.to_string());
					continue;
				};

				let rewritten = splice(line, reference.quote + 1..reference.end, merged);
				tracing::debug!(line = number, plugin = reference.name, %merged, "plugin reference rewritten");
				substitutions.push(Substitution {
					line: number,
					original: line.to_string(),
					replacement: rewritten.clone(),
				});
				out.push(rewritten);

				// The FormID field sits on the very next line. Consume it as
				// lookahead only when the plugin has FormID mappings at all.
				if table.has_form_ids(reference.name) {
					state = ScanState::PendingFormId {
						plugin: reference.name,
					};
				}
			}
			ScanState::PendingFormId { plugin } => {
				match remap_form_id_line(line, plugin, table)? {
					Some(rewritten) => {
						tracing::debug!(line = number, plugin, "FormID rewritten");
						substitutions.push(Substitution {
							line: number,
							original: line.to_string(),
							replacement: rewritten.clone(),
						});
						out.push(rewritten);
					}
					None => out.push(line.to_string()),
				}
			}
		}
	}

	Ok(Rewrite {
		changed: !substitutions.is_empty(),
		lines: out,
		substitutions,
	})
}

/// Rewrite a document given as a single string. Line terminators are the
/// caller's concern; the result's lines carry none.
pub fn rewrite_content(content: &str, table: &RemapTable) -> OarfixResult<Rewrite> {
	rewrite_lines(content.lines(), table)
}

/// Attempt to remap the FormID field on a lookahead line.
///
/// Returns `Ok(None)` when the line passes through unchanged: the key prefix
/// is absent, the field has no closing quote, the value does not parse as
/// hex, or the table has no mapping for it. The FormID is canonicalized to
/// six zero-padded uppercase digits for lookup (so `"1A"` and `"00001A"` in
/// the file find the same entry) and the replacement is written back
/// compact, without padding.
fn remap_form_id_line(line: &str, plugin: &str, table: &RemapTable) -> OarfixResult<Option<String>> {
	let Some(offset) = line.find(FORM_ID_KEY) else {
		return Ok(None);
	};
	let start = offset + FORM_ID_KEY.len();
	let Some(end) = line[start..].find('"').map(|rel| start + rel) else {
		return Ok(None);
	};

	let Some(form_id) = FormId::parse(&line[start..end]) else {
		return Ok(None);
	};

	let canonical = form_id.canonical();
	let Some(replacement) = table.lookup_form_id(plugin, &canonical) else {
		return Ok(None);
	};

	// A table value that is not hex is corrupt remap data, not ordinary
	// unmapped input; surface it instead of writing wrong content.
	let Some(mapped) = FormId::parse(replacement) else {
		return Err(OarfixError::InvalidRemapTarget {
			plugin: plugin.to_string(),
			form_id: canonical,
			value: replacement.to_string(),
		});
	};

	Ok(Some(splice(line, start..end, &mapped.compact())))
}
