//! Gate catalog: fixed matrices, memoized via `lazy_static` since they
//! never change, plus the parameterized rotation generators computed
//! fresh per application.

use std::f64::consts::FRAC_1_SQRT_2;

use crate::complex;
use crate::complex::{Complex, Matrix2};
use crate::grid::{Cell, GateType, Params};

pub fn rx(theta: f64) -> Matrix2 {
    let c = (theta / 2.0).cos();
    let s = (theta / 2.0).sin();
    Matrix2::new([
        [complex!(c, 0.0), complex!(0.0, -s)],
        [complex!(0.0, -s), complex!(c, 0.0)],
    ])
}

pub fn ry(theta: f64) -> Matrix2 {
    let c = (theta / 2.0).cos();
    let s = (theta / 2.0).sin();
    Matrix2::new([
        [complex!(c, 0.0), complex!(-s, 0.0)],
        [complex!(s, 0.0), complex!(c, 0.0)],
    ])
}

pub fn rz(theta: f64) -> Matrix2 {
    let half = theta / 2.0;
    Matrix2::new([
        [complex!(half.cos(), -half.sin()), Complex::ZERO],
        [Complex::ZERO, complex!(half.cos(), half.sin())],
    ])
}

#[rustfmt::skip]
lazy_static::lazy_static! {
    pub static ref HADAMARD: Matrix2 = Matrix2::new([
        [complex!(FRAC_1_SQRT_2, 0.0), complex!(FRAC_1_SQRT_2, 0.0)],
        [complex!(FRAC_1_SQRT_2, 0.0), complex!(-FRAC_1_SQRT_2, 0.0)],
    ]);

    pub static ref PAULI_X: Matrix2 = Matrix2::new([
        [Complex::ZERO, Complex::ONE],
        [Complex::ONE, Complex::ZERO],
    ]);

    pub static ref PAULI_Y: Matrix2 = Matrix2::new([
        [Complex::ZERO, complex!(0.0, -1.0)],
        [complex!(0.0, 1.0), Complex::ZERO],
    ]);

    pub static ref PAULI_Z: Matrix2 = Matrix2::new([
        [Complex::ONE, Complex::ZERO],
        [Complex::ZERO, complex!(-1.0, 0.0)],
    ]);

    pub static ref S_GATE: Matrix2 = Matrix2::new([
        [Complex::ONE, Complex::ZERO],
        [Complex::ZERO, complex!(0.0, 1.0)],
    ]);

    pub static ref SDG_GATE: Matrix2 = Matrix2::new([
        [Complex::ONE, Complex::ZERO],
        [Complex::ZERO, complex!(0.0, -1.0)],
    ]);

    pub static ref T_GATE: Matrix2 = Matrix2::new([
        [Complex::ONE, Complex::ZERO],
        [Complex::ZERO, complex!(FRAC_1_SQRT_2, FRAC_1_SQRT_2)],
    ]);

    pub static ref SQRT_X: Matrix2 = rx(std::f64::consts::FRAC_PI_2);
    pub static ref SQRT_X_DG: Matrix2 = rx(-std::f64::consts::FRAC_PI_2);
    pub static ref SQRT_Y: Matrix2 = ry(std::f64::consts::FRAC_PI_2);
    pub static ref SQRT_Y_DG: Matrix2 = ry(-std::f64::consts::FRAC_PI_2);

    pub static ref IDENTITY: Matrix2 = Matrix2::new([
        [Complex::ONE, Complex::ZERO],
        [Complex::ZERO, Complex::ONE],
    ]);
}

/// Resolve a cell to its 2x2 matrix, if it has one. Returns `None` for
/// non-matrix families (SWAP, CCX, span gates, controls, measure, inputs,
/// visualization) — the kernel handles those separately.
pub fn matrix_for(gate: GateType, params: &Params) -> Option<Matrix2> {
    use GateType::*;
    match gate {
        X => Some(*PAULI_X),
        Y => Some(*PAULI_Y),
        Z => Some(*PAULI_Z),
        H => Some(*HADAMARD),
        S => Some(*S_GATE),
        Sdg => Some(*SDG_GATE),
        T => Some(*T_GATE),
        SqrtX => Some(*SQRT_X),
        SqrtXdg => Some(*SQRT_X_DG),
        SqrtY => Some(*SQRT_Y),
        SqrtYdg => Some(*SQRT_Y_DG),
        Identity => Some(*IDENTITY),
        Rx => Some(rx(params.angle.unwrap_or(0.0))),
        Ry => Some(ry(params.angle.unwrap_or(0.0))),
        Rz => Some(rz(params.angle.unwrap_or(0.0))),
        Custom => params.custom_matrix.map(|m| {
            Matrix2::new([
                [complex!(m[0][0].0, m[0][0].1), complex!(m[0][1].0, m[0][1].1)],
                [complex!(m[1][0].0, m[1][0].1), complex!(m[1][1].0, m[1][1].1)],
            ])
        }),
        _ => None,
    }
}

/// Fixed-angle presets (π/2, π/4, π/8, π/12) on a given axis, as the
/// editor offers them — convenience constructors over the same rotation
/// generators, not distinct catalog entries.
pub fn rx_preset(cell_angle: RxPreset) -> Cell {
    Cell::with_angle(GateType::Rx, cell_angle.radians())
}

pub fn ry_preset(cell_angle: RyPreset) -> Cell {
    Cell::with_angle(GateType::Ry, cell_angle.radians())
}

pub fn rz_preset(cell_angle: RzPreset) -> Cell {
    Cell::with_angle(GateType::Rz, cell_angle.radians())
}

macro_rules! preset_enum {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        pub enum $name {
            Half,
            Quarter,
            Eighth,
            Twelfth,
        }

        impl $name {
            pub fn radians(self) -> f64 {
                use std::f64::consts::PI;
                match self {
                    $name::Half => PI / 2.0,
                    $name::Quarter => PI / 4.0,
                    $name::Eighth => PI / 8.0,
                    $name::Twelfth => PI / 12.0,
                }
            }
        }
    };
}

preset_enum!(RxPreset);
preset_enum!(RyPreset);
preset_enum!(RzPreset);

/// Scalar gates (×i/×−i/×√i/×√−i) as the global-phase factor they
/// multiply every satisfying amplitude by.
pub fn scalar_factor(gate: GateType) -> Option<Complex> {
    use std::f64::consts::FRAC_1_SQRT_2;
    match gate {
        GateType::MulI => Some(complex!(0.0, 1.0)),
        GateType::MulNegI => Some(complex!(0.0, -1.0)),
        GateType::MulSqrtI => Some(complex!(FRAC_1_SQRT_2, FRAC_1_SQRT_2)),
        GateType::MulSqrtNegI => Some(complex!(FRAC_1_SQRT_2, -FRAC_1_SQRT_2)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: Complex, b: Complex) {
        assert!((a.re - b.re).abs() < 1e-12 && (a.im - b.im).abs() < 1e-12, "{:?} != {:?}", a, b);
    }

    #[test]
    fn hadamard_is_self_inverse() {
        let h = *HADAMARD;
        // H*H = I, checked element-wise via direct 2x2 multiply.
        let mut result = [[Complex::ZERO; 2]; 2];
        for i in 0..2 {
            for j in 0..2 {
                let mut sum = Complex::ZERO;
                for k in 0..2 {
                    sum = sum + h.get(i, k) * h.get(k, j);
                }
                result[i][j] = sum;
            }
        }
        approx(result[0][0], Complex::ONE);
        approx(result[0][1], Complex::ZERO);
        approx(result[1][0], Complex::ZERO);
        approx(result[1][1], Complex::ONE);
    }

    #[test]
    fn rx_pi_matches_x_up_to_phase() {
        let m = rx(std::f64::consts::PI);
        // Rx(pi) = [[0, -i], [-i, 0]] = -i * X
        approx(m.get(0, 0), Complex::ZERO);
        approx(m.get(0, 1), complex!(0.0, -1.0));
        approx(m.get(1, 0), complex!(0.0, -1.0));
        approx(m.get(1, 1), Complex::ZERO);
    }

    #[test]
    fn sqrt_x_presets_match_rx_quarter_turn() {
        let a = *SQRT_X;
        let b = rx(std::f64::consts::FRAC_PI_2);
        for i in 0..2 {
            for j in 0..2 {
                approx(a.get(i, j), b.get(i, j));
            }
        }
    }

    #[test]
    fn custom_matrix_resolves_from_params() {
        let params = Params {
            custom_matrix: Some([[(1.0, 0.0), (0.0, 0.0)], [(0.0, 0.0), (1.0, 0.0)]]),
            ..Default::default()
        };
        let m = matrix_for(GateType::Custom, &params).unwrap();
        approx(m.get(0, 0), Complex::ONE);
        approx(m.get(1, 1), Complex::ONE);
    }

    #[test]
    fn non_matrix_families_resolve_to_none() {
        assert!(matrix_for(GateType::Swap, &Params::default()).is_none());
        assert!(matrix_for(GateType::Measure, &Params::default()).is_none());
        assert!(matrix_for(GateType::Reverse, &Params::default()).is_none());
    }
}
