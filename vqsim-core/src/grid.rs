use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};

/// The closed set of gate families the grid can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GateType {
    // Single-qubit unitary, fixed
    X,
    Y,
    Z,
    H,
    S,
    T,
    Sdg,
    SqrtX,
    SqrtXdg,
    SqrtY,
    SqrtYdg,
    Identity,
    // Single-qubit unitary, parameterized
    Rx,
    Ry,
    Rz,
    // Controls
    Control,
    AntiControl,
    XControl,
    XAntiControl,
    YControl,
    YAntiControl,
    // Multi-qubit patterns
    Swap,
    Ccx,
    // Measurement
    Measure,
    // Span gates
    Reverse,
    Inc,
    Dec,
    AddA,
    SubA,
    MulA,
    DivA,
    MulB,
    DivB,
    Inc1Mod,
    Dec1Mod,
    AddAMod,
    SubAMod,
    MulAMod,
    DivAMod,
    // Comparisons
    Lt,
    Le,
    Gt,
    Ge,
    Eq,
    Ne,
    // Scalars
    MulI,
    MulNegI,
    MulSqrtI,
    MulSqrtNegI,
    // Input markers
    InputA,
    InputB,
    InputR,
    // Visualization-only
    BlochVis,
    PercentVis,
    // Custom matrix
    Custom,
}

impl GateType {
    pub fn is_span_gate(self) -> bool {
        matches!(
            self,
            GateType::Reverse
                | GateType::Inc
                | GateType::Dec
                | GateType::AddA
                | GateType::SubA
                | GateType::MulA
                | GateType::DivA
                | GateType::MulB
                | GateType::DivB
                | GateType::Inc1Mod
                | GateType::Dec1Mod
                | GateType::AddAMod
                | GateType::SubAMod
                | GateType::MulAMod
                | GateType::DivAMod
                | GateType::InputA
                | GateType::InputB
                | GateType::InputR
        )
    }

    pub fn is_arithmetic(self) -> bool {
        matches!(
            self,
            GateType::Inc
                | GateType::Dec
                | GateType::AddA
                | GateType::SubA
                | GateType::MulA
                | GateType::DivA
                | GateType::MulB
                | GateType::DivB
                | GateType::Inc1Mod
                | GateType::Dec1Mod
                | GateType::AddAMod
                | GateType::SubAMod
                | GateType::MulAMod
                | GateType::DivAMod
        )
    }

    pub fn is_comparison(self) -> bool {
        matches!(
            self,
            GateType::Lt | GateType::Le | GateType::Gt | GateType::Ge | GateType::Eq | GateType::Ne
        )
    }

    pub fn is_scalar(self) -> bool {
        matches!(
            self,
            GateType::MulI | GateType::MulNegI | GateType::MulSqrtI | GateType::MulSqrtNegI
        )
    }

    pub fn is_input_marker(self) -> bool {
        matches!(self, GateType::InputA | GateType::InputB | GateType::InputR)
    }

    pub fn is_visualization_only(self) -> bool {
        matches!(self, GateType::BlochVis | GateType::PercentVis)
    }

    /// Whether this gate requires register R as an input.
    pub fn requires_r(self) -> bool {
        matches!(
            self,
            GateType::Inc1Mod
                | GateType::Dec1Mod
                | GateType::AddAMod
                | GateType::SubAMod
                | GateType::MulAMod
                | GateType::DivAMod
        )
    }

    /// Whether this gate requires register A as an input.
    pub fn requires_a(self) -> bool {
        matches!(
            self,
            GateType::AddA
                | GateType::SubA
                | GateType::MulA
                | GateType::DivA
                | GateType::AddAMod
                | GateType::SubAMod
                | GateType::MulAMod
                | GateType::DivAMod
                | GateType::Lt
                | GateType::Le
                | GateType::Gt
                | GateType::Ge
                | GateType::Eq
                | GateType::Ne
        )
    }

    /// Whether this gate requires register B as an input.
    pub fn requires_b(self) -> bool {
        matches!(
            self,
            GateType::MulB | GateType::DivB | GateType::Lt | GateType::Le | GateType::Gt | GateType::Ge | GateType::Eq | GateType::Ne
        )
    }
}

/// A contiguous row range in one column, with an anchor cell (`start_row`)
/// and continuation cells (`start_row+1..=end_row`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Span {
    pub start_row: usize,
    pub end_row: usize,
    #[serde(default)]
    pub is_continuation: bool,
}

impl Span {
    pub fn new(start_row: usize, end_row: usize) -> Self {
        Span {
            start_row,
            end_row,
            is_continuation: false,
        }
    }

    pub fn len(&self) -> usize {
        self.end_row - self.start_row + 1
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn overlaps(&self, other: &Span) -> bool {
        self.start_row <= other.end_row && other.start_row <= self.end_row
    }
}

/// Per-cell parameters. `angle` is resolved radians (the raw
/// `angleExpression` string lives in `vqsim-format`, not here — the core
/// only ever sees a numeric angle).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Params {
    #[serde(default)]
    pub angle: Option<f64>,
    #[serde(default)]
    pub custom_matrix: Option<[[(f64, f64); 2]; 2]>,
    #[serde(default)]
    pub span: Option<Span>,
}

/// A single grid cell: either empty, or one gate with its parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Cell {
    pub gate: Option<GateType>,
    #[serde(default)]
    pub params: Params,
}

impl Cell {
    pub fn empty() -> Self {
        Cell {
            gate: None,
            params: Params::default(),
        }
    }

    pub fn simple(gate: GateType) -> Self {
        Cell {
            gate: Some(gate),
            params: Params::default(),
        }
    }

    pub fn with_angle(gate: GateType, angle: f64) -> Self {
        Cell {
            gate: Some(gate),
            params: Params {
                angle: Some(angle),
                ..Default::default()
            },
        }
    }

    pub fn with_span(gate: GateType, span: Span) -> Self {
        Cell {
            gate: Some(gate),
            params: Params {
                span: Some(span),
                ..Default::default()
            },
        }
    }

    pub fn is_empty(&self) -> bool {
        self.gate.is_none()
    }

    pub fn is_continuation(&self) -> bool {
        self.params.span.map(|s| s.is_continuation).unwrap_or(false)
    }
}

/// The rectangular layout: `rows` qubits x `cols` time steps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Grid {
    rows: usize,
    cols: usize,
    cells: Vec<Cell>,
}

impl Grid {
    pub fn new(rows: usize, cols: usize) -> Result<Self> {
        if rows == 0 || cols == 0 {
            return Err(CoreError::EmptyGrid { rows, cols });
        }
        Ok(Grid {
            rows,
            cols,
            cells: vec![Cell::empty(); rows * cols],
        })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    fn index(&self, row: usize, col: usize) -> Result<usize> {
        if row >= self.rows || col >= self.cols {
            return Err(CoreError::CellOutOfBounds {
                row,
                col,
                rows: self.rows,
                cols: self.cols,
            });
        }
        Ok(col * self.rows + row)
    }

    pub fn get(&self, row: usize, col: usize) -> Cell {
        match self.index(row, col) {
            Ok(idx) => self.cells[idx],
            Err(_) => Cell::empty(),
        }
    }

    pub fn set(&mut self, row: usize, col: usize, cell: Cell) -> Result<()> {
        let idx = self.index(row, col)?;
        self.cells[idx] = cell;
        Ok(())
    }

    /// The cells of one column, indexed by row.
    pub fn column(&self, col: usize) -> &[Cell] {
        let start = col * self.rows;
        &self.cells[start..start + self.rows]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_grid_is_all_empty() {
        let grid = Grid::new(2, 3).unwrap();
        for c in 0..3 {
            for r in 0..2 {
                assert!(grid.get(r, c).is_empty());
            }
        }
    }

    #[test]
    fn zero_size_grid_is_rejected() {
        assert!(matches!(Grid::new(0, 3), Err(CoreError::EmptyGrid { .. })));
        assert!(matches!(Grid::new(3, 0), Err(CoreError::EmptyGrid { .. })));
    }

    #[test]
    fn set_then_get_roundtrips() {
        let mut grid = Grid::new(2, 2).unwrap();
        grid.set(1, 0, Cell::simple(GateType::H)).unwrap();
        assert_eq!(grid.get(1, 0).gate, Some(GateType::H));
        assert!(grid.get(0, 0).is_empty());
    }

    #[test]
    fn span_overlap_detection() {
        let a = Span::new(0, 2);
        let b = Span::new(2, 3);
        let c = Span::new(3, 4);
        assert!(a.overlaps(&b));
        assert!(!a.overlaps(&c));
    }
}
