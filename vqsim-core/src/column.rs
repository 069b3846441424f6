//! Column compiler: scans one column of the (already row-filtered) grid
//! and classifies its cells into operation buckets, one match arm per
//! gate family.

use crate::grid::{Cell, GateType, Params, Span};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SingleQubitOp {
    pub row: usize,
    pub gate: GateType,
    pub params: Params,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArithmeticSpanOp {
    pub gate: GateType,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ComparisonOp {
    pub row: usize,
    pub gate: GateType,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScalarOp {
    pub row: usize,
    pub gate: GateType,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct InputSpans {
    pub a: Option<Span>,
    pub b: Option<Span>,
    pub r: Option<Span>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ColumnBuckets {
    pub controls: Vec<usize>,
    pub anti_controls: Vec<usize>,
    pub x_controls: Vec<usize>,
    pub x_anti_controls: Vec<usize>,
    pub y_controls: Vec<usize>,
    pub y_anti_controls: Vec<usize>,
    pub swap_targets: Vec<usize>,
    pub single_qubit_ops: Vec<SingleQubitOp>,
    pub measure_rows: Vec<usize>,
    pub reverse_spans: Vec<Span>,
    pub arithmetic_span_ops: Vec<ArithmeticSpanOp>,
    pub comparison_ops: Vec<ComparisonOp>,
    pub scalar_ops: Vec<ScalarOp>,
    pub input_spans: InputSpans,
}

pub fn compile_column(cells: &[Cell]) -> ColumnBuckets {
    let mut buckets = ColumnBuckets::default();

    for (row, cell) in cells.iter().enumerate() {
        let Some(gate) = cell.gate else { continue };
        if cell.is_continuation() {
            continue;
        }

        use GateType::*;
        match gate {
            Control => buckets.controls.push(row),
            AntiControl => buckets.anti_controls.push(row),
            XControl => buckets.x_controls.push(row),
            XAntiControl => buckets.x_anti_controls.push(row),
            YControl => buckets.y_controls.push(row),
            YAntiControl => buckets.y_anti_controls.push(row),
            Swap => buckets.swap_targets.push(row),
            Measure => buckets.measure_rows.push(row),
            Reverse => {
                if let Some(span) = cell.params.span {
                    buckets.reverse_spans.push(span);
                }
            }
            Ccx => buckets.single_qubit_ops.push(SingleQubitOp {
                row,
                gate: GateType::X,
                params: Params::default(),
            }),
            g if g.is_arithmetic() => {
                if let Some(span) = cell.params.span {
                    buckets
                        .arithmetic_span_ops
                        .push(ArithmeticSpanOp { gate, span });
                }
            }
            g if g.is_comparison() => buckets.comparison_ops.push(ComparisonOp { row, gate }),
            g if g.is_scalar() => buckets.scalar_ops.push(ScalarOp { row, gate }),
            InputA => {
                if let Some(span) = cell.params.span {
                    buckets.input_spans.a = Some(span);
                }
            }
            InputB => {
                if let Some(span) = cell.params.span {
                    buckets.input_spans.b = Some(span);
                }
            }
            InputR => {
                if let Some(span) = cell.params.span {
                    buckets.input_spans.r = Some(span);
                }
            }
            g if g.is_visualization_only() => {}
            _ => buckets.single_qubit_ops.push(SingleQubitOp {
                row,
                gate,
                params: cell.params,
            }),
        }
    }

    buckets
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Span;

    #[test]
    fn controls_and_single_qubit_ops_are_separated() {
        let mut cells = vec![Cell::empty(); 2];
        cells[0] = Cell::simple(GateType::Control);
        cells[1] = Cell::simple(GateType::X);
        let buckets = compile_column(&cells);
        assert_eq!(buckets.controls, vec![0]);
        assert_eq!(buckets.single_qubit_ops.len(), 1);
        assert_eq!(buckets.single_qubit_ops[0].row, 1);
    }

    #[test]
    fn ccx_becomes_x_single_qubit_op() {
        let cells = vec![Cell::simple(GateType::Ccx)];
        let buckets = compile_column(&cells);
        assert_eq!(buckets.single_qubit_ops.len(), 1);
        assert_eq!(buckets.single_qubit_ops[0].gate, GateType::X);
    }

    #[test]
    fn continuation_cells_are_skipped() {
        let mut span = Span::new(0, 1);
        span.is_continuation = true;
        let mut cells = vec![Cell::empty(); 2];
        cells[0] = Cell::with_span(GateType::Reverse, Span::new(0, 1));
        cells[1] = Cell::with_span(GateType::Reverse, span);
        let buckets = compile_column(&cells);
        assert_eq!(buckets.reverse_spans.len(), 1);
    }

    #[test]
    fn input_markers_populate_input_spans() {
        let mut cells = vec![Cell::empty(); 1];
        cells[0] = Cell::with_span(GateType::InputA, Span::new(0, 0));
        let buckets = compile_column(&cells);
        assert_eq!(buckets.input_spans.a, Some(Span::new(0, 0)));
        assert!(buckets.input_spans.b.is_none());
    }

    #[test]
    fn visualization_only_gates_produce_no_bucket_entries() {
        let cells = vec![Cell::simple(GateType::BlochVis)];
        let buckets = compile_column(&cells);
        assert_eq!(buckets, ColumnBuckets::default());
    }
}
