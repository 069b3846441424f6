//! Testable invariants over the simulator: normalization, unitarity
//! round-trips, control neutrality, endianness consistency, REVERSE
//! idempotence, arithmetic closure under inverses, and measurement
//! probability convergence. Each holds for every reachable intermediate
//! state of a constructed circuit, checked as a direct assertion.

use vqsim_core::{codec, random::SeededSource, simulate, simulate_with, validator, Cell, GateType, Grid, Span, SimulationOptions};

use crate::support::{approx, span_cells};

pub struct Property {
    pub name: &'static str,
    pub run: fn() -> Result<(), String>,
}

fn normalization_after_every_column() -> Result<(), String> {
    let mut grid = Grid::new(2, 4).unwrap();
    grid.set(0, 0, Cell::simple(GateType::H)).unwrap();
    grid.set(0, 1, Cell::simple(GateType::Control)).unwrap();
    grid.set(1, 1, Cell::simple(GateType::X)).unwrap();
    grid.set(0, 2, Cell::with_angle(GateType::Ry, 0.7)).unwrap();
    grid.set(1, 3, Cell::simple(GateType::H)).unwrap();

    let mut rng = SeededSource::new(1);
    let result = simulate_with(&grid, &mut rng, SimulationOptions { keep_history: true }, None)
        .map_err(|e| e.to_string())?;
    let history = result.history.ok_or("expected history")?;
    for (i, state) in history.iter().enumerate() {
        let total: f64 = state.iter().map(|c| c.norm2()).sum();
        approx(total, 1.0, 1e-9, &format!("normalization after column {i}"))?;
    }
    Ok(())
}

fn unitarity_round_trip() -> Result<(), String> {
    let pairs: &[(GateType, GateType)] = &[
        (GateType::X, GateType::X),
        (GateType::Y, GateType::Y),
        (GateType::Z, GateType::Z),
        (GateType::H, GateType::H),
        (GateType::S, GateType::Sdg),
        (GateType::SqrtX, GateType::SqrtXdg),
        (GateType::SqrtY, GateType::SqrtYdg),
    ];

    for &(g, g_inv) in pairs {
        let mut grid = Grid::new(1, 3).unwrap();
        grid.set(0, 0, Cell::with_angle(GateType::Ry, 0.9)).unwrap();
        grid.set(0, 1, Cell::simple(g)).unwrap();
        grid.set(0, 2, Cell::simple(g_inv)).unwrap();

        let mut rng = SeededSource::new(3);
        let result = simulate_with(&grid, &mut rng, SimulationOptions { keep_history: true }, None)
            .map_err(|e| e.to_string())?;
        let history = result.history.ok_or("expected history")?;
        let prepared = &history[1];
        let after_round_trip = &history[3];
        for i in 0..2 {
            approx(after_round_trip[i].re, prepared[i].re, 1e-10, &format!("{g:?} round trip re[{i}]"))?;
            approx(after_round_trip[i].im, prepared[i].im, 1e-10, &format!("{g:?} round trip im[{i}]"))?;
        }
    }
    Ok(())
}

fn control_neutrality() -> Result<(), String> {
    let mut grid = Grid::new(2, 1).unwrap();
    // Control row stays |0>, so the X on row 1 must never fire.
    grid.set(0, 0, Cell::simple(GateType::Control)).unwrap();
    grid.set(1, 0, Cell::simple(GateType::X)).unwrap();

    let mut rng = SeededSource::new(1);
    let result = simulate(&grid, &mut rng).map_err(|e| e.to_string())?;
    approx(result.final_state[0].re, 1.0, 1e-12, "control-neutral identity on |00>")
}

fn endianness_consistency() -> Result<(), String> {
    let span = Span::new(1, 3);
    let num_qubits = 5;
    for v in 0..(1u64 << span.len()) {
        let encoded = codec::encode(0, v, span, num_qubits);
        let decoded = codec::decode(encoded, span, num_qubits);
        if decoded != v {
            return Err(format!("encode/decode round trip failed for v={v}: got {decoded}"));
        }
    }
    Ok(())
}

fn reverse_idempotence() -> Result<(), String> {
    let mut grid = Grid::new(3, 2).unwrap();
    grid.set(0, 0, Cell::simple(GateType::X)).unwrap();
    grid.set(2, 0, Cell::simple(GateType::H)).unwrap();
    span_cells(&mut grid, 1, GateType::Reverse, Span::new(0, 2));

    let mut rng = SeededSource::new(1);
    let result = simulate_with(&grid, &mut rng, SimulationOptions { keep_history: true }, None)
        .map_err(|e| e.to_string())?;
    let history = result.history.ok_or("expected history")?;
    let before = &history[1];
    let after_one_reverse = &history[2];
    if (before[0].re - after_one_reverse[0].re).abs() < 1e-12 {
        return Err("a single REVERSE unexpectedly left the state unchanged".to_string());
    }

    let mut grid2 = Grid::new(3, 3).unwrap();
    grid2.set(0, 0, Cell::simple(GateType::X)).unwrap();
    grid2.set(2, 0, Cell::simple(GateType::H)).unwrap();
    span_cells(&mut grid2, 1, GateType::Reverse, Span::new(0, 2));
    span_cells(&mut grid2, 2, GateType::Reverse, Span::new(0, 2));
    let mut rng2 = SeededSource::new(1);
    let result2 = simulate(&grid2, &mut rng2).map_err(|e| e.to_string())?;
    for i in 0..8 {
        approx(result2.final_state[i].re, before[i].re, 1e-12, &format!("reverse^2 re[{i}]"))?;
        approx(result2.final_state[i].im, before[i].im, 1e-12, &format!("reverse^2 im[{i}]"))?;
    }
    Ok(())
}

fn arithmetic_closure_under_inverses() -> Result<(), String> {
    // INC then DEC on a classically-prepared value (1, via the span's LSB row).
    let mut grid = Grid::new(3, 3).unwrap();
    grid.set(0, 0, Cell::simple(GateType::X)).unwrap();
    span_cells(&mut grid, 1, GateType::Inc, Span::new(0, 2));
    span_cells(&mut grid, 2, GateType::Dec, Span::new(0, 2));
    let mut rng = SeededSource::new(1);
    let result = simulate(&grid, &mut rng).map_err(|e| e.to_string())?;
    let n = result.populated_rows.len();
    let (idx, amp) = result
        .final_state
        .iter()
        .enumerate()
        .max_by(|a, b| a.1.norm2().partial_cmp(&b.1.norm2()).unwrap())
        .unwrap();
    approx(amp.norm2(), 1.0, 1e-9, "INC/DEC closure: dominant amplitude")?;
    let decoded = codec::decode(idx, Span::new(0, 2), n);
    if decoded != 1 {
        return Err(format!("INC then DEC should restore the original value 1, got {decoded}"));
    }

    // +A then -A with an odd A.
    let mut grid2 = Grid::new(6, 3).unwrap();
    grid2.set(1, 0, Cell::simple(GateType::X)).unwrap(); // effect span bit1 -> value 2
    grid2.set(2, 0, Cell::simple(GateType::X)).unwrap(); // A span bit0
    grid2.set(3, 0, Cell::simple(GateType::X)).unwrap(); // A span bit1 -> value 3 (odd)
    span_cells(&mut grid2, 1, GateType::AddA, Span::new(0, 1));
    span_cells(&mut grid2, 1, GateType::InputA, Span::new(2, 3));
    span_cells(&mut grid2, 2, GateType::SubA, Span::new(0, 1));
    span_cells(&mut grid2, 2, GateType::InputA, Span::new(2, 3));
    let mut rng2 = SeededSource::new(1);
    let result2 = simulate(&grid2, &mut rng2).map_err(|e| e.to_string())?;
    let n2 = result2.populated_rows.len();
    let (idx2, amp2) = result2
        .final_state
        .iter()
        .enumerate()
        .max_by(|a, b| a.1.norm2().partial_cmp(&b.1.norm2()).unwrap())
        .unwrap();
    approx(amp2.norm2(), 1.0, 1e-9, "+A/-A closure: dominant amplitude")?;
    let effect2 = codec::decode(idx2, Span::new(0, 1), n2);
    if effect2 != 2 {
        return Err(format!("+A then -A should restore the original effect value 2, got {effect2}"));
    }
    Ok(())
}

fn measurement_probabilities_converge() -> Result<(), String> {
    let theta = 1.1_f64;
    let expected_p1 = (1.0 - theta.cos()) / 2.0;

    let trials = 4000;
    let mut ones = 0u32;
    for seed in 0..trials {
        let mut grid = Grid::new(1, 2).unwrap();
        grid.set(0, 0, Cell::with_angle(GateType::Ry, theta)).unwrap();
        grid.set(0, 1, Cell::simple(GateType::Measure)).unwrap();
        let mut rng = SeededSource::new(seed as u64);
        let result = simulate(&grid, &mut rng).map_err(|e| e.to_string())?;
        if result.measurements[0].result == 1 {
            ones += 1;
        }
    }

    let empirical = ones as f64 / trials as f64;
    let confidence = 4.0 * (expected_p1 * (1.0 - expected_p1) / trials as f64).sqrt();
    approx(empirical, expected_p1, confidence.max(0.02), "measurement frequency of outcome 1")
}

fn validator_completeness() -> Result<(), String> {
    let mut grid = Grid::new(2, 1).unwrap();
    span_cells(&mut grid, 0, GateType::AddA, Span::new(0, 1));
    let errors = validator::validate(&grid);
    if errors.len() != 1 {
        return Err(format!("expected exactly one missing-input error, got {}", errors.len()));
    }
    Ok(())
}

pub fn all() -> Vec<Property> {
    vec![
        Property { name: "normalization", run: normalization_after_every_column },
        Property { name: "unitarity-round-trip", run: unitarity_round_trip },
        Property { name: "control-neutrality", run: control_neutrality },
        Property { name: "endianness-consistency", run: endianness_consistency },
        Property { name: "reverse-idempotence", run: reverse_idempotence },
        Property { name: "arithmetic-closure", run: arithmetic_closure_under_inverses },
        Property { name: "measurement-probabilities", run: measurement_probabilities_converge },
        Property { name: "validator-completeness", run: validator_completeness },
    ]
}
