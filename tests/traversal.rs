//! Integration tests for cell traversal and the form table.

use chrono::NaiveDate;
use formgrid::grid::table::ColumnSpec;
use formgrid::grid::traversal::{self, FnPredicate};
use formgrid::{
    CenturyPivot, DatePattern, Direction, FormTable, GridExtent, GridPosition, ReferenceContext,
    ShortcutInterpreter, TableEvent, TraversalMode, TraversalResult,
};

fn p(row: usize, col: usize) -> GridPosition {
    GridPosition::new(row, col)
}

#[test]
fn test_last_editable_cell_without_wrap_flags_terminates() {
    let extent = GridExtent::new(4, 6);
    let mode = TraversalMode::by_column().skip_non_editable();

    // A2 is the only editable cell of its row and of the grid.
    let only = FnPredicate::new(|pos: GridPosition| pos == p(1, 0));
    assert_eq!(
        traversal::next(p(1, 0), extent, &mode, &only),
        TraversalResult::NotFound
    );

    // With a second editable cell the scan wraps around to it.
    let two = FnPredicate::new(|pos: GridPosition| pos == p(1, 0) || pos == p(3, 5));
    assert_eq!(
        traversal::next(p(3, 5), extent, &mode, &two).position(),
        Some(p(1, 0))
    );
}

#[test]
fn test_wrap_in_line_keeps_the_orthogonal_index() {
    let extent = GridExtent::new(5, 7);
    let everything = FnPredicate::new(|_: GridPosition| true);

    let by_column = TraversalMode::by_column().wrap_in_line();
    let mut pos = p(3, 4);
    for _ in 0..50 {
        pos = traversal::next(pos, extent, &by_column, &everything)
            .position()
            .unwrap();
        assert_eq!(pos.row, 3);
    }

    let by_row = TraversalMode::by_row().wrap_in_line();
    let mut pos = p(0, 6);
    for _ in 0..50 {
        pos = traversal::next(pos, extent, &by_row, &everything)
            .position()
            .unwrap();
        assert_eq!(pos.col, 6);
    }
}

#[test]
fn test_no_table_wrap_stops_at_corners() {
    let extent = GridExtent::new(3, 3);
    let everything = FnPredicate::new(|_: GridPosition| true);
    let mode = TraversalMode::by_column().no_table_wrap();

    let mut pos = p(0, 0);
    for _ in 0..20 {
        pos = traversal::next(pos, extent, &mode, &everything)
            .position()
            .unwrap();
    }
    assert_eq!(pos, p(2, 2));

    for _ in 0..20 {
        pos = traversal::previous(pos, extent, &mode, &everything)
            .position()
            .unwrap();
    }
    assert_eq!(pos, p(0, 0));

    // The same walk with table wrap cycles back to the opposite corner.
    let wrapping = TraversalMode::by_column();
    assert_eq!(
        traversal::next(p(2, 2), extent, &wrapping, &everything).position(),
        Some(p(0, 0))
    );
}

#[test]
fn test_data_entry_round_through_a_table() {
    let reference = NaiveDate::from_ymd_opt(2026, 3, 2)
        .unwrap()
        .and_hms_opt(8, 15, 0)
        .unwrap();
    let due = ShortcutInterpreter::new(
        ReferenceContext::new(DatePattern::new("MM/dd/yy").unwrap())
            .with_reference(reference)
            .with_pivot(CenturyPivot::for_year(2026)),
    );
    let mut table = FormTable::new(
        vec![
            ColumnSpec::new("Item"),
            ColumnSpec::new("Id").read_only(),
            ColumnSpec::new("Due").date(due),
        ],
        2,
    )
    .with_advance_on_commit(true);

    table.request_next();
    table.process_pending();
    assert_eq!(table.editing().map(|s| s.position), Some(p(0, 0)));

    table.set_edit_buffer("Bolts").unwrap();
    table.commit_edit().unwrap();
    table.process_pending();
    assert_eq!(table.editing().map(|s| s.position), Some(p(0, 2)));

    table.set_edit_buffer("+1w").unwrap();
    table.commit_edit().unwrap();
    assert_eq!(table.value(p(0, 2)), Some("03/09/26"));
    table.process_pending();
    assert_eq!(table.editing().map(|s| s.position), Some(p(1, 0)));

    table.cancel_edit().unwrap();
    table.request_previous();
    table.process_pending();
    assert_eq!(table.selection(), Some(p(0, 2)));

    let events = table.take_events();
    assert!(events.contains(&TableEvent::EditCommitted {
        position: p(0, 2),
        old: None,
        new: "03/09/26".to_string(),
    }));
    assert!(
        !events
            .iter()
            .any(|e| matches!(e, TableEvent::TraversalExhausted { .. }))
    );
}

#[test]
fn test_locked_table_reports_exhaustion() {
    let mut table = FormTable::new(vec![ColumnSpec::new("Only").read_only()], 2);
    table.post(formgrid::TableCommand::Traverse(Direction::Next));
    table.process_pending();
    assert_eq!(table.selection(), None);
    assert_eq!(
        table.take_events(),
        vec![TableEvent::TraversalExhausted {
            from: None,
            direction: Direction::Next,
        }]
    );
}
