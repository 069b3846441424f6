//! Simulation driver: iterates a grid's columns, compiling and applying
//! each one through the kernel, tracking history and measurements, and
//! collecting the same missing-input warnings the validator reports as
//! blocking errors. The grid is an immutable snapshot, so `simulate` is
//! a free function over a fold, not a builder method.

use tracing::{debug, warn};

use crate::column::compile_column;
use crate::complex::Complex;
use crate::error::{CoreError, Result};
use crate::grid::{Cell, Grid, Span};
use crate::kernel;
use crate::random::RandomSource;
use crate::rowfilter::{self, RowIndexMap};
use crate::validator::{self, Warning};

/// Qubit counts above this are rejected outright. Circuits in the 8-16
/// qubit range stay well under it; the margin only bites counts that
/// would thrash memory.
pub const MAX_QUBITS: usize = 24;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimulationOptions {
    /// When `false`, only `final_state` is populated and `history` stays
    /// `None` — lets a caller skip the `O(C * 2^n)` retained cost when
    /// nothing is stepping through columns.
    pub keep_history: bool,
}

impl Default for SimulationOptions {
    fn default() -> Self {
        SimulationOptions { keep_history: true }
    }
}

/// One measurement outcome, reported in the grid's *original* row
/// numbering (pre-row-filtering).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Measurement {
    pub qubit: usize,
    pub result: u8,
    pub probability: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SimulationResult {
    pub final_state: Vec<Complex>,
    /// `history[0]` is the initial `|0...0>` state; `history[k]` is the
    /// state after column `k-1`. `None` when `keep_history` was `false`.
    pub history: Option<Vec<Vec<Complex>>>,
    pub measurements: Vec<Measurement>,
    pub populated_rows: Vec<usize>,
    pub warnings: Vec<Warning>,
}

/// Run with default options (history retained) and no abort signal.
pub fn simulate(grid: &Grid, rng: &mut dyn RandomSource) -> Result<SimulationResult> {
    simulate_with(grid, rng, SimulationOptions::default(), None)
}

/// Remap a cell read from the original grid into filtered-row terms: its
/// own position is already handled by the caller (it iterates
/// `populated` in order), but a carried `span` still names *original*
/// rows and must be rewritten into the compact basis before the column
/// compiler / kernel see it.
fn remap_cell_span(mut cell: Cell, map: &RowIndexMap) -> Cell {
    if let Some(span) = cell.params.span {
        let start = map
            .to_filtered(span.start_row)
            .expect("every row spanned by a gate in this column carries that gate, so it is populated");
        let end = map
            .to_filtered(span.end_row)
            .expect("every row spanned by a gate in this column carries that gate, so it is populated");
        cell.params.span = Some(Span {
            start_row: start,
            end_row: end,
            is_continuation: span.is_continuation,
        });
    }
    cell
}

fn filtered_column(grid: &Grid, col: usize, populated: &[usize], map: &RowIndexMap) -> Vec<Cell> {
    populated
        .iter()
        .map(|&orig_row| remap_cell_span(grid.get(orig_row, col), map))
        .collect()
}

/// Run the simulator with explicit options and an optional cooperative
/// abort signal, checked between columns. Mid-column work is never
/// interrupted; a column either fully applies or doesn't start.
pub fn simulate_with(
    grid: &Grid,
    rng: &mut dyn RandomSource,
    options: SimulationOptions,
    mut abort: Option<&mut dyn FnMut() -> bool>,
) -> Result<SimulationResult> {
    let (populated, map) = rowfilter::populated_rows(grid);
    let num_qubits = populated.len();

    if num_qubits > MAX_QUBITS {
        return Err(CoreError::TooManyQubits {
            limit: MAX_QUBITS,
            actual: num_qubits,
        });
    }

    let dim = 1usize << num_qubits;
    let mut state = vec![Complex::ZERO; dim];
    state[0] = Complex::ONE;

    let mut history = options.keep_history.then(|| vec![state.clone()]);
    let mut measurements = Vec::new();
    let mut warnings = Vec::new();

    for col in 0..grid.cols() {
        if let Some(signal) = abort.as_deref_mut() {
            if signal() {
                break;
            }
        }

        // Warnings are derived from the *raw* grid so reported rows match
        // the validator's own row numbering.
        let raw_buckets = compile_column(grid.column(col));
        let col_warnings = validator::missing_input_warnings(col, &raw_buckets);
        for w in &col_warnings {
            warn!(column = col, row = w.row, gate = ?w.gate_type, message = %w.message, "simulation warning");
        }
        warnings.extend(col_warnings);

        if num_qubits == 0 {
            // Nothing to simulate; still report warnings per column above.
            continue;
        }

        let cells = filtered_column(grid, col, &populated, &map);
        let buckets = compile_column(&cells);
        debug!(
            column = col,
            num_qubits,
            controls = buckets.controls.len(),
            single_qubit_ops = buckets.single_qubit_ops.len(),
            measurements = buckets.measure_rows.len(),
            "applying column"
        );

        let (new_state, outcomes) = kernel::apply_column(&state, &buckets, num_qubits, rng);
        state = new_state;

        for outcome in outcomes {
            measurements.push(Measurement {
                qubit: map.to_original(outcome.row),
                result: outcome.result,
                probability: outcome.probability,
            });
        }

        if let Some(h) = history.as_mut() {
            h.push(state.clone());
        }
    }

    Ok(SimulationResult {
        final_state: state,
        history,
        measurements,
        populated_rows: populated,
        warnings,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::GateType;
    use crate::random::SeededSource;

    #[test]
    fn bell_pair_end_to_end() {
        let mut grid = Grid::new(2, 2).unwrap();
        grid.set(0, 0, Cell::simple(GateType::H)).unwrap();
        grid.set(0, 1, Cell::simple(GateType::Control)).unwrap();
        grid.set(1, 1, Cell::simple(GateType::X)).unwrap();

        let mut rng = SeededSource::new(1);
        let result = simulate(&grid, &mut rng).unwrap();

        let expected = 1.0 / 2.0_f64.sqrt();
        assert!((result.final_state[0].re - expected).abs() < 1e-9);
        assert!(result.final_state[1].norm2() < 1e-18);
        assert!(result.final_state[2].norm2() < 1e-18);
        assert!((result.final_state[3].re - expected).abs() < 1e-9);
        assert_eq!(result.populated_rows, vec![0, 1]);
        assert_eq!(result.history.unwrap().len(), 3); // initial + 2 columns
    }

    #[test]
    fn ghz3_end_to_end() {
        let mut grid = Grid::new(3, 3).unwrap();
        grid.set(0, 0, Cell::simple(GateType::H)).unwrap();
        grid.set(0, 1, Cell::simple(GateType::Control)).unwrap();
        grid.set(1, 1, Cell::simple(GateType::X)).unwrap();
        grid.set(0, 2, Cell::simple(GateType::Control)).unwrap();
        grid.set(2, 2, Cell::simple(GateType::X)).unwrap();

        let mut rng = SeededSource::new(7);
        let result = simulate(&grid, &mut rng).unwrap();

        let expected = 1.0 / 2.0_f64.sqrt();
        assert!((result.final_state[0b000].re - expected).abs() < 1e-9);
        assert!((result.final_state[0b111].re - expected).abs() < 1e-9);
        for i in 0..8 {
            if i != 0b000 && i != 0b111 {
                assert!(result.final_state[i].norm2() < 1e-18);
            }
        }
    }

    #[test]
    fn empty_rows_are_dropped_before_simulation() {
        // Row 1 never gets a gate anywhere; the basis should be 1 qubit.
        let mut grid = Grid::new(2, 1).unwrap();
        grid.set(0, 0, Cell::simple(GateType::X)).unwrap();
        let mut rng = SeededSource::new(1);
        let result = simulate(&grid, &mut rng).unwrap();
        assert_eq!(result.final_state.len(), 2);
        assert_eq!(result.populated_rows, vec![0]);
    }

    #[test]
    fn history_off_keeps_only_final_state() {
        let mut grid = Grid::new(1, 3).unwrap();
        grid.set(0, 0, Cell::simple(GateType::H)).unwrap();
        let mut rng = SeededSource::new(1);
        let result = simulate_with(
            &grid,
            &mut rng,
            SimulationOptions { keep_history: false },
            None,
        )
        .unwrap();
        assert!(result.history.is_none());
    }

    #[test]
    fn abort_signal_stops_before_next_column() {
        let mut grid = Grid::new(1, 5).unwrap();
        for c in 0..5 {
            grid.set(0, c, Cell::simple(GateType::X)).unwrap();
        }
        let mut rng = SeededSource::new(1);
        let mut calls = 0;
        let mut signal = || {
            calls += 1;
            calls > 2
        };
        let result = simulate_with(
            &grid,
            &mut rng,
            SimulationOptions::default(),
            Some(&mut signal),
        )
        .unwrap();
        // Stopped after 2 columns of X applied (2 flips = identity).
        assert_eq!(result.history.unwrap().len(), 3); // initial + 2 columns
    }

    #[test]
    fn missing_input_marker_produces_a_warning() {
        let mut grid = Grid::new(2, 1).unwrap();
        grid.set(0, 0, Cell::with_span(GateType::AddA, Span::new(0, 1)))
            .unwrap();
        let mut rng = SeededSource::new(1);
        let result = simulate(&grid, &mut rng).unwrap();
        assert_eq!(result.warnings.len(), 1);
        assert_eq!(result.warnings[0].category, crate::validator::WarningCategory::MissingInput);
    }

    #[test]
    fn too_many_qubits_is_rejected() {
        let grid = Grid::new(MAX_QUBITS + 1, 1).unwrap();
        // No gates means no populated rows, so build a grid where every
        // row is populated instead.
        let mut grid = grid;
        for r in 0..grid.rows() {
            grid.set(r, 0, Cell::simple(GateType::Identity)).unwrap();
        }
        let mut rng = SeededSource::new(1);
        assert!(matches!(
            simulate(&grid, &mut rng),
            Err(CoreError::TooManyQubits { .. })
        ));
    }
}
