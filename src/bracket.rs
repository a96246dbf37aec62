// 🎯 Bracket Selector - maps a live value onto the reference table
//
// select_bracket: entry just below the first entry that exceeds the value
// window_around:  neighbors strip around the chosen entry
//
// Pure functions over immutable inputs. No I/O, no shared state.

use crate::table::{ReferenceEntry, ReferenceTable};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Entries shown to the left of the chosen one
pub const DEFAULT_BEFORE: usize = 2;

/// Chosen entry plus the ones to its right (`after - 1` of them)
pub const DEFAULT_AFTER: usize = 3;

// ============================================================================
// INPUTS
// ============================================================================

/// A non-negative, finite live number (market cap in USD)
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct LiveValue(f64);

#[derive(Debug, Clone, Copy, PartialEq, Error)]
#[error("live value must be finite, got {0}")]
pub struct NonFiniteValue(pub f64);

impl TryFrom<f64> for LiveValue {
    type Error = NonFiniteValue;

    fn try_from(raw: f64) -> Result<Self, Self::Error> {
        LiveValue::new(raw).ok_or(NonFiniteValue(raw))
    }
}

impl From<LiveValue> for f64 {
    fn from(live: LiveValue) -> f64 {
        live.0
    }
}

impl LiveValue {
    /// Negative inputs clamp to 0; NaN and infinities are not a value.
    pub fn new(raw: f64) -> Option<Self> {
        if !raw.is_finite() {
            return None;
        }
        Some(LiveValue(if raw < 0.0 { 0.0 } else { raw }))
    }

    pub fn get(self) -> f64 {
        self.0
    }
}

/// How many neighbors `window_around` keeps on each side
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowSpec {
    pub before: usize,
    pub after: usize,
}

impl Default for WindowSpec {
    fn default() -> Self {
        WindowSpec {
            before: DEFAULT_BEFORE,
            after: DEFAULT_AFTER,
        }
    }
}

// ============================================================================
// SELECTION
// ============================================================================

/// Pick the entry that brackets `live` from below.
///
/// Finds the first entry whose value strictly exceeds `live` and returns the
/// one before it. When nothing exceeds `live`, or when the very first entry
/// already does (no predecessor), the last entry is returned instead.
/// Only an empty table yields `None`.
pub fn select_bracket(table: &ReferenceTable, live: LiveValue) -> Option<&ReferenceEntry> {
    let entries = table.entries();
    let first_above = entries.partition_point(|e| e.value <= live.get());

    match first_above {
        // Below every entry: same fallback as "above every entry"
        0 => entries.last(),
        n => entries.get(n - 1),
    }
}

/// Index of the first entry whose value equals `chosen.value`
pub fn position_of(table: &ReferenceTable, chosen: &ReferenceEntry) -> Option<usize> {
    table.iter().position(|e| e.value == chosen.value)
}

/// Contiguous slice around `chosen`: up to `before` entries on the left,
/// `chosen` itself, then up to `after - 1` entries on the right. Both ends
/// clamp to the table bounds. Empty if `chosen` is not in the table.
pub fn window_around<'t>(
    table: &'t ReferenceTable,
    chosen: &ReferenceEntry,
    before: usize,
    after: usize,
) -> &'t [ReferenceEntry] {
    let Some(index) = position_of(table, chosen) else {
        return &[];
    };

    let start = index.saturating_sub(before);
    let end = index.saturating_add(after).min(table.len());
    &table.entries()[start..end]
}

// ============================================================================
// COMBINED RESULT
// ============================================================================

/// Chosen entry plus its display window, owned so it can outlive the table borrow
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SelectionResult {
    pub chosen: ReferenceEntry,

    /// Index of the first table entry with `chosen.value`. The window is
    /// anchored here, so with duplicate values it may point at a twin of
    /// `chosen` rather than `chosen` itself.
    pub chosen_index: usize,

    /// Neighbors strip, in table order
    pub window: Vec<ReferenceEntry>,

    /// `chosen_index` relative to the start of `window`
    pub window_offset: usize,
}

impl SelectionResult {
    /// Window entries paired with a highlight flag. Every entry sharing the
    /// chosen value is highlighted, twins included.
    pub fn window_with_highlight(&self) -> impl Iterator<Item = (&ReferenceEntry, bool)> {
        self.window
            .iter()
            .map(move |entry| (entry, entry.value == self.chosen.value))
    }
}

/// Run selection and windowing in one go. `None` only for an empty table.
pub fn evaluate(
    table: &ReferenceTable,
    live: LiveValue,
    spec: WindowSpec,
) -> Option<SelectionResult> {
    let chosen = select_bracket(table, live)?;
    let chosen_index = position_of(table, chosen)?;
    let window_start = chosen_index.saturating_sub(spec.before);
    let window = window_around(table, chosen, spec.before, spec.after);

    Some(SelectionResult {
        chosen: chosen.clone(),
        chosen_index,
        window: window.to_vec(),
        window_offset: chosen_index - window_start,
    })
}
