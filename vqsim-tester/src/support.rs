//! Small helpers shared by the scenario and property checks: building a
//! span's anchor + continuation cells, and a tolerance-checked float
//! comparison that returns a descriptive `Err` instead of panicking, so
//! the harness can report a failing assertion instead of aborting.

use vqsim_core::{Cell, GateType, Grid, Span};

pub fn span_cells(grid: &mut Grid, col: usize, gate: GateType, span: Span) {
    grid.set(span.start_row, col, Cell::with_span(gate, span)).unwrap();
    for row in (span.start_row + 1)..=span.end_row {
        grid.set(row, col, Cell::with_span(gate, Span { is_continuation: true, ..span }))
            .unwrap();
    }
}

pub fn approx(actual: f64, expected: f64, tol: f64, what: &str) -> Result<(), String> {
    if (actual - expected).abs() > tol {
        Err(format!("{what}: expected {expected}, got {actual} (tolerance {tol})"))
    } else {
        Ok(())
    }
}
