//! Structural validation over a raw grid (blocking errors), plus the
//! `Warning` data type the driver emits for the same checks re-run
//! during simulation (non-blocking).

use serde::{Deserialize, Serialize};

use crate::column::{compile_column, ArithmeticSpanOp};
use crate::grid::{GateType, Grid, Span};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationError {
    pub column: usize,
    pub row: usize,
    pub gate_type: GateType,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WarningCategory {
    MissingInput,
    PreconditionViolated,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Warning {
    pub column: usize,
    pub row: usize,
    pub gate_type: GateType,
    pub message: String,
    pub category: WarningCategory,
}

/// Which register(s) an arithmetic gate at `span` still needs but the
/// column's input markers don't supply, or whose span overlaps `span`.
fn missing_or_overlapping(
    op: &ArithmeticSpanOp,
    input_a: Option<Span>,
    input_b: Option<Span>,
    input_r: Option<Span>,
) -> Vec<String> {
    let mut problems = Vec::new();
    let mut check = |required: bool, label: &str, provided: Option<Span>| {
        if !required {
            return;
        }
        match provided {
            None => problems.push(format!("missing required input marker {}", label)),
            Some(span) if span.overlaps(&op.span) => problems.push(format!(
                "input marker {} span [{}..{}] overlaps effect span [{}..{}]",
                label, span.start_row, span.end_row, op.span.start_row, op.span.end_row
            )),
            Some(_) => {}
        }
    };
    check(op.gate.requires_a(), "A", input_a);
    check(op.gate.requires_b(), "B", input_b);
    check(op.gate.requires_r(), "R", input_r);
    problems
}

/// Structural validation over the raw (un-filtered) grid.
pub fn validate(grid: &Grid) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    for col in 0..grid.cols() {
        let buckets = compile_column(grid.column(col));

        for op in &buckets.arithmetic_span_ops {
            for message in missing_or_overlapping(
                op,
                buckets.input_spans.a,
                buckets.input_spans.b,
                buckets.input_spans.r,
            ) {
                errors.push(ValidationError {
                    column: col,
                    row: op.span.start_row,
                    gate_type: op.gate,
                    message,
                });
            }
        }

        for comparison in &buckets.comparison_ops {
            if buckets.input_spans.a.is_none() {
                errors.push(ValidationError {
                    column: col,
                    row: comparison.row,
                    gate_type: comparison.gate,
                    message: "missing required input marker A".to_string(),
                });
            }
            if buckets.input_spans.b.is_none() {
                errors.push(ValidationError {
                    column: col,
                    row: comparison.row,
                    gate_type: comparison.gate,
                    message: "missing required input marker B".to_string(),
                });
            }
        }
    }

    errors
}

/// Same checks as `validate`, but phrased as non-blocking simulation
/// warnings for one already-compiled column. The driver calls this once
/// per column as it simulates.
pub fn missing_input_warnings(column: usize, buckets: &crate::column::ColumnBuckets) -> Vec<Warning> {
    let mut warnings = Vec::new();

    for op in &buckets.arithmetic_span_ops {
        for message in missing_or_overlapping(
            op,
            buckets.input_spans.a,
            buckets.input_spans.b,
            buckets.input_spans.r,
        ) {
            warnings.push(Warning {
                column,
                row: op.span.start_row,
                gate_type: op.gate,
                message,
                category: WarningCategory::MissingInput,
            });
        }
    }

    for comparison in &buckets.comparison_ops {
        if buckets.input_spans.a.is_none() || buckets.input_spans.b.is_none() {
            warnings.push(Warning {
                column,
                row: comparison.row,
                gate_type: comparison.gate,
                message: "missing required input marker for comparison".to_string(),
                category: WarningCategory::MissingInput,
            });
        }
    }

    warnings
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Cell;

    #[test]
    fn missing_input_marker_is_an_error() {
        let mut grid = Grid::new(2, 1).unwrap();
        grid.set(0, 0, Cell::with_span(GateType::AddA, Span::new(0, 1)))
            .unwrap();
        let errors = validate(&grid);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].gate_type, GateType::AddA);
        assert!(errors[0].message.contains("missing"));
    }

    #[test]
    fn non_overlapping_input_marker_is_valid() {
        let mut grid = Grid::new(4, 1).unwrap();
        grid.set(0, 0, Cell::with_span(GateType::AddA, Span::new(0, 1)))
            .unwrap();
        grid.set(2, 0, Cell::with_span(GateType::InputA, Span::new(2, 3)))
            .unwrap();
        assert!(validate(&grid).is_empty());
    }

    #[test]
    fn overlapping_input_marker_is_an_error() {
        let mut grid = Grid::new(3, 1).unwrap();
        grid.set(0, 0, Cell::with_span(GateType::AddA, Span::new(0, 1)))
            .unwrap();
        grid.set(1, 0, Cell::with_span(GateType::InputA, Span::new(1, 2)))
            .unwrap();
        let errors = validate(&grid);
        assert_eq!(errors.len(), 1);
        assert!(errors[0].message.contains("overlaps"));
    }

    #[test]
    fn comparison_missing_either_register_is_an_error_each() {
        let mut grid = Grid::new(2, 1).unwrap();
        grid.set(1, 0, Cell::simple(GateType::Lt)).unwrap();
        let errors = validate(&grid);
        assert_eq!(errors.len(), 2);
    }
}
