use mcap_compare::{
    evaluate, position_of, select_bracket, window_around, LiveValue, ReferenceEntry,
    ReferenceTable, WindowSpec,
};
use proptest::prelude::*;

fn table_from(mut values: Vec<u32>) -> ReferenceTable {
    values.sort_unstable();
    let entries = values
        .iter()
        .enumerate()
        .map(|(i, v)| ReferenceEntry::new(*v as f64, &format!("item-{}", i), "", ""))
        .collect();
    ReferenceTable::from_sorted(entries).unwrap()
}

fn table_strategy() -> impl Strategy<Value = ReferenceTable> {
    prop::collection::vec(0u32..10_000_000, 1..40).prop_map(table_from)
}

fn live(v: u32) -> LiveValue {
    LiveValue::new(v as f64).unwrap()
}

proptest! {
    #[test]
    fn chosen_is_below_value_or_table_max(table in table_strategy(), v in 0u32..20_000_000) {
        let chosen = select_bracket(&table, live(v)).unwrap();
        let max = table.max_entry().unwrap().value;

        prop_assert!(chosen.value <= v as f64 || chosen.value == max);
    }

    #[test]
    fn below_every_entry_returns_max(table in table_strategy()) {
        let min = table.get(0).unwrap().value;
        prop_assume!(min > 0.0);

        let chosen = select_bracket(&table, LiveValue::new(min - 1.0).unwrap()).unwrap();
        prop_assert_eq!(chosen.value, table.max_entry().unwrap().value);
    }

    #[test]
    fn above_every_entry_returns_max(table in table_strategy(), extra in 0u32..1_000) {
        let max = table.max_entry().unwrap().value;

        let chosen = select_bracket(&table, LiveValue::new(max + extra as f64).unwrap()).unwrap();
        prop_assert_eq!(chosen.value, max);
    }

    #[test]
    fn empty_table_never_selects(v in any::<u32>()) {
        prop_assert!(select_bracket(&ReferenceTable::default(), live(v)).is_none());
    }

    #[test]
    fn window_length_and_order(
        table in table_strategy(),
        v in 0u32..20_000_000,
        before in 0usize..6,
        after in 1usize..6,
    ) {
        let chosen = select_bracket(&table, live(v)).unwrap();
        let index = position_of(&table, chosen).unwrap();
        let window = window_around(&table, chosen, before, after);

        let expected = before.min(index) + after.min(table.len() - index);
        prop_assert_eq!(window.len(), expected);
        prop_assert!(window.iter().any(|e| e.value == chosen.value));
        prop_assert!(window.windows(2).all(|w| w[0].value <= w[1].value));

        // Contiguous slice of the table starting `before` (clamped) left of the chosen entry
        let start = index - before.min(index);
        prop_assert_eq!(window, &table.entries()[start..start + window.len()]);
    }

    #[test]
    fn evaluate_is_idempotent(table in table_strategy(), v in 0u32..20_000_000) {
        let spec = WindowSpec::default();
        prop_assert_eq!(evaluate(&table, live(v), spec), evaluate(&table, live(v), spec));
    }
}

// Fixed scenarios over the small animal table

fn animals() -> ReferenceTable {
    ReferenceTable::sorted(vec![
        ReferenceEntry::new(100.0, "Ant", "", ""),
        ReferenceEntry::new(1_000_000.0, "Cat", "", ""),
        ReferenceEntry::new(5_000_000.0, "Whale", "", ""),
    ])
}

#[test]
fn scenario_value_between_entries_picks_predecessor_of_first_above() {
    let table = animals();
    assert_eq!(select_bracket(&table, live(500_000)).unwrap().label, "Ant");
    assert_eq!(select_bracket(&table, live(2_000_000)).unwrap().label, "Cat");
}

#[test]
fn scenario_value_below_all_entries() {
    assert_eq!(select_bracket(&animals(), live(50)).unwrap().label, "Whale");
}

#[test]
fn scenario_value_above_all_entries() {
    assert_eq!(select_bracket(&animals(), live(10_000_000)).unwrap().label, "Whale");
}

#[test]
fn scenario_window_clamped_both_ends() {
    let table = animals();
    let cat = table.get(1).unwrap();
    let labels: Vec<&str> = window_around(&table, cat, 2, 3)
        .iter()
        .map(|e| e.label.as_str())
        .collect();

    assert_eq!(labels, vec!["Ant", "Cat", "Whale"]);
}

#[test]
fn scenario_empty_table() {
    let table = ReferenceTable::default();
    assert!(select_bracket(&table, live(500_000)).is_none());
    assert!(evaluate(&table, live(500_000), WindowSpec::default()).is_none());
}
