//! Arithmetic register gate semantics and the modular inverse helper
//! they share. Every function here returns `None` to mean "identity on
//! this basis state" rather than failing — the kernel is infallible by
//! design.

use crate::grid::GateType;

/// Extended Euclidean algorithm: returns `(gcd, x, y)` with `a*x + b*y = gcd`.
fn extended_gcd(a: i128, b: i128) -> (i128, i128, i128) {
    if b == 0 {
        (a, 1, 0)
    } else {
        let (g, x1, y1) = extended_gcd(b, a % b);
        (g, y1, x1 - (a / b) * y1)
    }
}

/// Modular inverse of `a` mod `m`, or `None` if `a` and `m` are not coprime.
pub fn mod_inverse(a: u64, m: u64) -> Option<u64> {
    if m <= 1 {
        return None;
    }
    let (g, x, _) = extended_gcd(a as i128, m as i128);
    if g != 1 {
        return None;
    }
    let m = m as i128;
    Some((((x % m) + m) % m) as u64)
}

/// Mathematical (always-nonnegative) remainder.
pub fn modulo(a: i128, m: i128) -> u64 {
    (((a % m) + m) % m) as u64
}

/// Inputs an arithmetic gate may read, decoded from the current basis
/// state. `None` means the marker was absent in this column.
#[derive(Debug, Clone, Copy, Default)]
pub struct ArithmeticInputs {
    pub a: Option<u64>,
    pub b: Option<u64>,
    pub r: Option<u64>,
}

/// Apply one arithmetic register gate to `effect` (the value decoded from
/// the effect span), returning the new value or `None` if a required
/// input is missing or a precondition fails — both cases mean "identity on
/// this basis state."
pub fn apply_arithmetic(
    gate: GateType,
    effect: u64,
    modulus: u64,
    inputs: ArithmeticInputs,
) -> Option<u64> {
    use GateType::*;
    match gate {
        Inc => Some(modulo(effect as i128 + 1, modulus as i128)),
        Dec => Some(modulo(effect as i128 - 1, modulus as i128)),
        AddA => inputs.a.map(|a| modulo(effect as i128 + a as i128, modulus as i128)),
        SubA => inputs.a.map(|a| modulo(effect as i128 - a as i128, modulus as i128)),
        MulA => inputs.a.and_then(|a| {
            (a % 2 == 1).then(|| modulo(effect as i128 * a as i128, modulus as i128))
        }),
        DivA => inputs.a.and_then(|a| {
            if a % 2 != 1 {
                return None;
            }
            let inv = mod_inverse(a, modulus)?;
            Some(modulo(effect as i128 * inv as i128, modulus as i128))
        }),
        MulB => inputs.b.and_then(|b| {
            (b % 2 == 1).then(|| modulo(effect as i128 * b as i128, modulus as i128))
        }),
        DivB => inputs.b.and_then(|b| {
            if b % 2 != 1 {
                return None;
            }
            let inv = mod_inverse(b, modulus)?;
            Some(modulo(effect as i128 * inv as i128, modulus as i128))
        }),
        Inc1Mod => inputs.r.and_then(|r| {
            (r > 0 && effect < r).then(|| modulo(effect as i128 + 1, r as i128))
        }),
        Dec1Mod => inputs.r.and_then(|r| {
            (r > 0 && effect < r).then(|| modulo(effect as i128 - 1, r as i128))
        }),
        AddAMod => match (inputs.a, inputs.r) {
            (Some(a), Some(r)) if r > 0 && effect < r && a < r => {
                Some(modulo(effect as i128 + a as i128, r as i128))
            }
            _ => None,
        },
        SubAMod => match (inputs.a, inputs.r) {
            (Some(a), Some(r)) if r > 0 && effect < r && a < r => {
                Some(modulo(effect as i128 - a as i128, r as i128))
            }
            _ => None,
        },
        MulAMod => match (inputs.a, inputs.r) {
            (Some(a), Some(r)) if r > 0 && effect < r && gcd(a, r) == 1 => {
                Some(modulo(effect as i128 * a as i128, r as i128))
            }
            _ => None,
        },
        DivAMod => match (inputs.a, inputs.r) {
            (Some(a), Some(r)) if r > 0 && effect < r && gcd(a, r) == 1 => {
                let inv = mod_inverse(a, r)?;
                Some(modulo(effect as i128 * inv as i128, r as i128))
            }
            _ => None,
        },
        _ => None,
    }
}

fn gcd(a: u64, b: u64) -> u64 {
    if b == 0 {
        a
    } else {
        gcd(b, a % b)
    }
}

/// Evaluate a comparison gate over decoded registers `a`, `b`.
pub fn evaluate_comparison(gate: GateType, a: u64, b: u64) -> bool {
    match gate {
        GateType::Lt => a < b,
        GateType::Le => a <= b,
        GateType::Gt => a > b,
        GateType::Ge => a >= b,
        GateType::Eq => a == b,
        GateType::Ne => a != b,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mod_inverse_of_odd_number_mod_power_of_two_exists() {
        // 3 * inverse = 1 mod 8
        let inv = mod_inverse(3, 8).unwrap();
        assert_eq!((3 * inv) % 8, 1);
    }

    #[test]
    fn mod_inverse_of_even_number_mod_power_of_two_is_none() {
        assert_eq!(mod_inverse(2, 8), None);
    }

    #[test]
    fn inc_then_dec_is_identity() {
        let m = 8;
        let v = 5;
        let after_inc = apply_arithmetic(GateType::Inc, v, m, ArithmeticInputs::default()).unwrap();
        let after_dec =
            apply_arithmetic(GateType::Dec, after_inc, m, ArithmeticInputs::default()).unwrap();
        assert_eq!(after_dec, v);
    }

    #[test]
    fn mul_a_then_div_a_is_identity_for_odd_a() {
        let m = 16;
        let inputs = ArithmeticInputs {
            a: Some(5),
            ..Default::default()
        };
        let v = 7;
        let after_mul = apply_arithmetic(GateType::MulA, v, m, inputs).unwrap();
        let after_div = apply_arithmetic(GateType::DivA, after_mul, m, inputs).unwrap();
        assert_eq!(after_div, v);
    }

    #[test]
    fn mul_a_with_even_a_is_identity_via_none() {
        let inputs = ArithmeticInputs {
            a: Some(4),
            ..Default::default()
        };
        assert_eq!(apply_arithmetic(GateType::MulA, 3, 8, inputs), None);
    }

    #[test]
    fn missing_required_input_is_identity_via_none() {
        assert_eq!(
            apply_arithmetic(GateType::AddA, 3, 8, ArithmeticInputs::default()),
            None
        );
    }

    #[test]
    fn mod_r_preconditions_enforced() {
        let inputs = ArithmeticInputs {
            a: Some(3),
            r: Some(5),
            ..Default::default()
        };
        // effect (2) + a (3) = 5 mod 5 = 0
        assert_eq!(apply_arithmetic(GateType::AddAMod, 2, 0, inputs), Some(0));
        // effect >= r is a precondition failure
        let inputs_bad = ArithmeticInputs {
            a: Some(1),
            r: Some(3),
            ..Default::default()
        };
        assert_eq!(apply_arithmetic(GateType::AddAMod, 5, 0, inputs_bad), None);
    }

    #[test]
    fn comparisons_match_semantics() {
        assert!(evaluate_comparison(GateType::Lt, 2, 3));
        assert!(!evaluate_comparison(GateType::Lt, 3, 3));
        assert!(evaluate_comparison(GateType::Eq, 3, 3));
        assert!(evaluate_comparison(GateType::Ne, 2, 3));
    }
}
