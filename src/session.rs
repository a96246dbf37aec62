// 🔄 Comparison State - two independently refreshed inputs, one derived selection
//
// The table and the live value are owned separately and replaced wholesale.
// Every setter recomputes the selection immediately and reports whether the
// input actually changed, so callers redraw on `Change::Updated` instead of
// polling. A new live value inside the same bracket still changes the headline.

use crate::bracket::{evaluate, LiveValue, SelectionResult, WindowSpec};
use crate::table::ReferenceTable;
use crate::view::ComparisonView;
use chrono::NaiveDate;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Change {
    Unchanged,
    Updated,
}

#[derive(Debug, Clone, Default)]
pub struct ComparisonState {
    table: Option<Arc<ReferenceTable>>,
    live: Option<LiveValue>,
    window: WindowSpec,
    selection: Option<SelectionResult>,
}

impl ComparisonState {
    pub fn new(window: WindowSpec) -> Self {
        ComparisonState {
            window,
            ..Default::default()
        }
    }

    pub fn table(&self) -> Option<&ReferenceTable> {
        self.table.as_deref()
    }

    pub fn live_value(&self) -> Option<LiveValue> {
        self.live
    }

    pub fn selection(&self) -> Option<&SelectionResult> {
        self.selection.as_ref()
    }

    pub fn set_table(&mut self, table: Arc<ReferenceTable>) -> Change {
        if self.table.as_deref() == Some(table.as_ref()) {
            return Change::Unchanged;
        }
        self.table = Some(table);
        self.recompute();
        Change::Updated
    }

    /// `None` means the source had no value; the selection is cleared.
    pub fn set_live_value(&mut self, live: Option<LiveValue>) -> Change {
        if self.live == live {
            return Change::Unchanged;
        }
        self.live = live;
        self.recompute();
        Change::Updated
    }

    fn recompute(&mut self) {
        let next = match (&self.table, self.live) {
            (Some(table), Some(live)) => evaluate(table, live, self.window),
            _ => None,
        };

        if next == self.selection {
            return;
        }

        match &next {
            Some(sel) => log::debug!(
                "Selection now {} (index {}, window {})",
                sel.chosen.label,
                sel.chosen_index,
                sel.window.len()
            ),
            None => log::debug!("Selection cleared"),
        }
        self.selection = next;
    }

    /// Display model for the current inputs, if there is anything to show
    pub fn view(&self, date: NaiveDate, subject: &str, subject_url: &str) -> Option<ComparisonView> {
        let selection = self.selection.as_ref()?;
        let live = self.live?;
        Some(ComparisonView::build(selection, live, date, subject, subject_url))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::ReferenceEntry;

    fn table() -> Arc<ReferenceTable> {
        Arc::new(ReferenceTable::sorted(vec![
            ReferenceEntry::new(10.0, "Ten", "", ""),
            ReferenceEntry::new(20.0, "Twenty", "", ""),
            ReferenceEntry::new(30.0, "Thirty", "", ""),
        ]))
    }

    fn live(v: f64) -> Option<LiveValue> {
        LiveValue::new(v)
    }

    #[test]
    fn test_needs_both_inputs() {
        let mut state = ComparisonState::new(WindowSpec::default());

        assert_eq!(state.set_live_value(live(25.0)), Change::Updated);
        assert!(state.selection().is_none());

        assert_eq!(state.set_table(table()), Change::Updated);
        assert_eq!(state.selection().unwrap().chosen.label, "Twenty");
    }

    #[test]
    fn test_same_value_is_unchanged() {
        let mut state = ComparisonState::new(WindowSpec::default());
        state.set_table(table());
        state.set_live_value(live(25.0));

        assert_eq!(state.set_live_value(live(25.0)), Change::Unchanged);
        assert_eq!(state.set_table(table()), Change::Unchanged);
    }

    #[test]
    fn test_new_value_in_same_bracket_is_updated() {
        let mut state = ComparisonState::new(WindowSpec::default());
        state.set_table(Arc::new(ReferenceTable::sorted(vec![
            ReferenceEntry::new(100.0, "Ant", "", ""),
            ReferenceEntry::new(1_000_000.0, "Cat", "", ""),
            ReferenceEntry::new(5_000_000.0, "Whale", "", ""),
        ])));
        let date = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();

        state.set_live_value(live(1_200_000.0));
        let before = state.view(date, "DeGods", "https://de.xyz").unwrap();

        // Still bracketed by Cat, but the headline moves from 1M to 2M
        assert_eq!(state.set_live_value(live(2_400_000.0)), Change::Updated);
        let after = state.view(date, "DeGods", "https://de.xyz").unwrap();

        assert_eq!(before.label, after.label);
        assert_eq!(before.market_cap_display, "1M");
        assert_eq!(after.market_cap_display, "2M");
    }

    #[test]
    fn test_new_value_recomputes() {
        let mut state = ComparisonState::new(WindowSpec::default());
        state.set_table(table());
        state.set_live_value(live(15.0));
        assert_eq!(state.selection().unwrap().chosen.label, "Ten");

        assert_eq!(state.set_live_value(live(35.0)), Change::Updated);
        assert_eq!(state.selection().unwrap().chosen.label, "Thirty");
    }

    #[test]
    fn test_losing_value_clears_selection() {
        let mut state = ComparisonState::new(WindowSpec::default());
        state.set_table(table());
        state.set_live_value(live(15.0));

        assert_eq!(state.set_live_value(None), Change::Updated);
        assert!(state.selection().is_none());
    }

    #[test]
    fn test_empty_table_has_no_view() {
        let mut state = ComparisonState::new(WindowSpec::default());
        state.set_table(Arc::new(ReferenceTable::default()));
        state.set_live_value(live(15.0));

        let date = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
        assert!(state.selection().is_none());
        assert!(state.view(date, "DeGods", "https://de.xyz").is_none());
    }

    #[test]
    fn test_view_when_ready() {
        let mut state = ComparisonState::new(WindowSpec::default());
        state.set_table(table());
        state.set_live_value(live(22.0));

        let date = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
        let view = state.view(date, "DeGods", "https://de.xyz").unwrap();
        assert_eq!(view.label, "Twenty");
        assert_eq!(view.date, "January 1, 2026");
    }
}
