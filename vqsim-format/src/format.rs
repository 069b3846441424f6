//! Circuit file format: the versioned JSON persisted-state shape, plus
//! conversion to/from `vqsim_core::Grid`. The `#[derive]`-based serde
//! model matches the JSON shape directly, no hand-rolled parsing.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use vqsim_core::{Cell, GateType, Grid, Matrix2, Params, Span};

use crate::angle;
use crate::error::{FormatError, Result};

pub const CURRENT_VERSION: &str = "1.0";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Metadata {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub created_at: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ComplexDto {
    pub re: f64,
    pub im: f64,
}

impl From<ComplexDto> for (f64, f64) {
    fn from(c: ComplexDto) -> Self {
        (c.re, c.im)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpanRangeDto {
    pub start_row: usize,
    pub end_row: usize,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CellParamsDto {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub angle: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub angle_expression: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub span: Option<SpanRangeDto>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_continuation: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_matrix: Option<[[ComplexDto; 2]; 2]>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_label: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GridCellDto {
    pub gate: Option<GateType>,
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<CellParamsDto>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CircuitBody {
    pub rows: usize,
    pub cols: usize,
    /// Row-major: `grid[row][col]`.
    pub grid: Vec<Vec<GridCellDto>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomGateDef {
    pub label: String,
    pub matrix: [[ComplexDto; 2]; 2],
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CircuitFile {
    pub version: String,
    pub metadata: Metadata,
    pub circuit: CircuitBody,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_gates: Option<Vec<CustomGateDef>>,
}

fn matrix_dto_to_core(m: [[ComplexDto; 2]; 2]) -> [[(f64, f64); 2]; 2] {
    [[m[0][0].into(), m[0][1].into()], [m[1][0].into(), m[1][1].into()]]
}

fn matrix_core_to_dto(m: [[(f64, f64); 2]; 2]) -> [[ComplexDto; 2]; 2] {
    [
        [ComplexDto { re: m[0][0].0, im: m[0][0].1 }, ComplexDto { re: m[0][1].0, im: m[0][1].1 }],
        [ComplexDto { re: m[1][0].0, im: m[1][0].1 }, ComplexDto { re: m[1][1].0, im: m[1][1].1 }],
    ]
}

fn params_dto_to_core(row: usize, col: usize, dto: &CellParamsDto) -> Result<Params> {
    let span = match dto.span {
        Some(s) => {
            if s.start_row > s.end_row {
                return Err(FormatError::InvalidSpan {
                    row,
                    col,
                    start: s.start_row,
                    end: s.end_row,
                });
            }
            Some(Span {
                start_row: s.start_row,
                end_row: s.end_row,
                is_continuation: dto.is_continuation.unwrap_or(false),
            })
        }
        None => None,
    };

    // angle wins if present; otherwise resolve angleExpression.
    let angle = match (dto.angle, &dto.angle_expression) {
        (Some(a), _) => Some(a),
        (None, Some(expr)) => Some(angle::evaluate(expr)?),
        (None, None) => None,
    };

    Ok(Params {
        angle,
        custom_matrix: dto.custom_matrix.map(matrix_dto_to_core),
        span,
    })
}

fn cell_dto_to_core(row: usize, col: usize, dto: &GridCellDto) -> Result<Cell> {
    let params = match &dto.params {
        Some(p) => params_dto_to_core(row, col, p)?,
        None => Params::default(),
    };
    Ok(Cell { gate: dto.gate, params })
}

fn cell_core_to_dto(row: usize, col: usize, cell: Cell) -> GridCellDto {
    let params = if cell.params == Params::default() {
        None
    } else {
        Some(CellParamsDto {
            angle: cell.params.angle,
            angle_expression: None,
            span: cell.params.span.map(|s| SpanRangeDto {
                start_row: s.start_row,
                end_row: s.end_row,
            }),
            is_continuation: cell.params.span.map(|s| s.is_continuation),
            custom_matrix: cell.params.custom_matrix.map(matrix_core_to_dto),
            custom_label: None,
        })
    };
    GridCellDto {
        gate: cell.gate,
        id: format!("r{row}c{col}"),
        params,
    }
}

impl CircuitFile {
    /// Resolve the JSON document into a simulator-ready `Grid`, evaluating
    /// any `angleExpression` fields along the way. Unknown versions and
    /// malformed documents are rejected here, before the grid ever
    /// reaches the validator.
    pub fn to_grid(&self) -> Result<Grid> {
        if self.version != CURRENT_VERSION {
            return Err(FormatError::UnsupportedVersion {
                found: self.version.clone(),
            });
        }

        if self.circuit.grid.len() != self.circuit.rows {
            return Err(FormatError::GridShapeMismatch {
                declared_rows: self.circuit.rows,
                declared_cols: self.circuit.cols,
                actual_rows: self.circuit.grid.len(),
                bad_row: self.circuit.grid.len(),
                actual_cols: 0,
            });
        }

        let mut grid = Grid::new(self.circuit.rows, self.circuit.cols)?;

        for (row, row_cells) in self.circuit.grid.iter().enumerate() {
            if row_cells.len() != self.circuit.cols {
                return Err(FormatError::GridShapeMismatch {
                    declared_rows: self.circuit.rows,
                    declared_cols: self.circuit.cols,
                    actual_rows: self.circuit.grid.len(),
                    bad_row: row,
                    actual_cols: row_cells.len(),
                });
            }
            for (col, dto) in row_cells.iter().enumerate() {
                let cell = cell_dto_to_core(row, col, dto)?;
                grid.set(row, col, cell)?;
            }
        }

        Ok(grid)
    }

    /// Build a saveable document from a simulated `Grid` (the reverse of
    /// `to_grid`). Angle expressions are not reconstructed — the core only
    /// ever carries the resolved numeric angle.
    pub fn from_grid(grid: &Grid, metadata: Metadata) -> CircuitFile {
        let mut rows = Vec::with_capacity(grid.rows());
        for row in 0..grid.rows() {
            let mut cols = Vec::with_capacity(grid.cols());
            for col in 0..grid.cols() {
                cols.push(cell_core_to_dto(row, col, grid.get(row, col)));
            }
            rows.push(cols);
        }

        CircuitFile {
            version: CURRENT_VERSION.to_string(),
            metadata,
            circuit: CircuitBody {
                rows: grid.rows(),
                cols: grid.cols(),
                grid: rows,
            },
            custom_gates: None,
        }
    }

    /// Named custom-gate presets (editor convenience; the core itself
    /// only ever sees a cell's own inline `customMatrix`), resolved to
    /// `Matrix2` and keyed by label.
    pub fn custom_gate_catalog(&self) -> Result<HashMap<String, Matrix2>> {
        let mut map = HashMap::new();
        if let Some(gates) = &self.custom_gates {
            for def in gates {
                if def.label.trim().is_empty() {
                    return Err(FormatError::MalformedMatrix { label: def.label.clone() });
                }
                let core_matrix = matrix_dto_to_core(def.matrix);
                let m = Matrix2::new([
                    [vqsim_core::Complex::new(core_matrix[0][0].0, core_matrix[0][0].1), vqsim_core::Complex::new(core_matrix[0][1].0, core_matrix[0][1].1)],
                    [vqsim_core::Complex::new(core_matrix[1][0].0, core_matrix[1][0].1), vqsim_core::Complex::new(core_matrix[1][1].0, core_matrix[1][1].1)],
                ]);
                map.insert(def.label.clone(), m);
            }
        }
        Ok(map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vqsim_core::GateType;

    fn sample_metadata() -> Metadata {
        Metadata {
            name: "bell pair".to_string(),
            description: None,
            created_at: "2026-01-01T00:00:00Z".to_string(),
        }
    }

    #[test]
    fn round_trips_through_grid() {
        let mut grid = Grid::new(2, 2).unwrap();
        grid.set(0, 0, Cell::simple(GateType::H)).unwrap();
        grid.set(0, 1, Cell::simple(GateType::Control)).unwrap();
        grid.set(1, 1, Cell::simple(GateType::X)).unwrap();

        let file = CircuitFile::from_grid(&grid, sample_metadata());
        let restored = file.to_grid().unwrap();
        assert_eq!(restored.get(0, 0).gate, Some(GateType::H));
        assert_eq!(restored.get(0, 1).gate, Some(GateType::Control));
        assert_eq!(restored.get(1, 1).gate, Some(GateType::X));
        assert!(restored.get(1, 0).is_empty());
    }

    #[test]
    fn rejects_unsupported_version() {
        let mut grid = Grid::new(1, 1).unwrap();
        grid.set(0, 0, Cell::simple(GateType::H)).unwrap();
        let mut file = CircuitFile::from_grid(&grid, sample_metadata());
        file.version = "2.0".to_string();
        assert!(matches!(
            file.to_grid(),
            Err(FormatError::UnsupportedVersion { .. })
        ));
    }

    #[test]
    fn resolves_angle_expression_when_angle_is_absent() {
        let file = CircuitFile {
            version: CURRENT_VERSION.to_string(),
            metadata: sample_metadata(),
            circuit: CircuitBody {
                rows: 1,
                cols: 1,
                grid: vec![vec![GridCellDto {
                    gate: Some(GateType::Rx),
                    id: "r0c0".to_string(),
                    params: Some(CellParamsDto {
                        angle_expression: Some("pi/2".to_string()),
                        ..Default::default()
                    }),
                }]],
            },
            custom_gates: None,
        };
        let grid = file.to_grid().unwrap();
        let angle = grid.get(0, 0).params.angle.unwrap();
        assert!((angle - std::f64::consts::FRAC_PI_2).abs() < 1e-12);
    }

    #[test]
    fn malformed_angle_expression_is_rejected() {
        let file = CircuitFile {
            version: CURRENT_VERSION.to_string(),
            metadata: sample_metadata(),
            circuit: CircuitBody {
                rows: 1,
                cols: 1,
                grid: vec![vec![GridCellDto {
                    gate: Some(GateType::Rx),
                    id: "r0c0".to_string(),
                    params: Some(CellParamsDto {
                        angle_expression: Some("not an angle".to_string()),
                        ..Default::default()
                    }),
                }]],
            },
            custom_gates: None,
        };
        assert!(file.to_grid().is_err());
    }

    #[test]
    fn invalid_span_is_rejected() {
        let file = CircuitFile {
            version: CURRENT_VERSION.to_string(),
            metadata: sample_metadata(),
            circuit: CircuitBody {
                rows: 2,
                cols: 1,
                grid: vec![
                    vec![GridCellDto {
                        gate: Some(GateType::Reverse),
                        id: "r0c0".to_string(),
                        params: Some(CellParamsDto {
                            span: Some(SpanRangeDto { start_row: 1, end_row: 0 }),
                            ..Default::default()
                        }),
                    }],
                    vec![GridCellDto {
                        gate: None,
                        id: "r1c0".to_string(),
                        params: None,
                    }],
                ],
            },
            custom_gates: None,
        };
        assert!(matches!(file.to_grid(), Err(FormatError::InvalidSpan { .. })));
    }

    #[test]
    fn custom_gate_catalog_resolves_named_matrices() {
        let mut grid = Grid::new(1, 1).unwrap();
        grid.set(0, 0, Cell::simple(GateType::Identity)).unwrap();
        let mut file = CircuitFile::from_grid(&grid, sample_metadata());
        file.custom_gates = Some(vec![CustomGateDef {
            label: "my-gate".to_string(),
            matrix: [
                [ComplexDto { re: 1.0, im: 0.0 }, ComplexDto { re: 0.0, im: 0.0 }],
                [ComplexDto { re: 0.0, im: 0.0 }, ComplexDto { re: 1.0, im: 0.0 }],
            ],
        }]);
        let catalog = file.custom_gate_catalog().unwrap();
        assert!(catalog.contains_key("my-gate"));
    }

    #[test]
    fn serializes_to_json_and_back() {
        let mut grid = Grid::new(1, 1).unwrap();
        grid.set(0, 0, Cell::with_angle(GateType::Rx, 1.0)).unwrap();
        let file = CircuitFile::from_grid(&grid, sample_metadata());
        let json = serde_json::to_string(&file).unwrap();
        let parsed: CircuitFile = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.version, CURRENT_VERSION);
        assert_eq!(parsed.circuit.rows, 1);
    }
}
