//! Six concrete end-to-end scenarios: Bell pair, Rx(π), GHZ-3, REVERSE,
//! modular add, and comparison. Each builds a grid, runs it through
//! `vqsim_core::simulate`, and checks the result against known
//! amplitudes/outcomes.

use vqsim_core::{codec, random::SeededSource, simulate, Cell, GateType, Grid, Span};

use crate::support::{approx, span_cells};

pub struct Scenario {
    pub name: &'static str,
    pub build: fn() -> Grid,
    pub check: fn(&Grid) -> Result<(), String>,
}

fn bell_pair_grid() -> Grid {
    let mut grid = Grid::new(2, 2).unwrap();
    grid.set(0, 0, Cell::simple(GateType::H)).unwrap();
    grid.set(0, 1, Cell::simple(GateType::Control)).unwrap();
    grid.set(1, 1, Cell::simple(GateType::X)).unwrap();
    grid
}

fn check_bell_pair(grid: &Grid) -> Result<(), String> {
    let mut rng = SeededSource::new(1);
    let result = simulate(grid, &mut rng).map_err(|e| e.to_string())?;
    let expected = 1.0 / 2.0_f64.sqrt();
    let fs = &result.final_state;
    approx(fs[0].re, expected, 1e-9, "state[00].re")?;
    approx(fs[1].norm2(), 0.0, 1e-18, "state[01] amplitude")?;
    approx(fs[2].norm2(), 0.0, 1e-18, "state[10] amplitude")?;
    approx(fs[3].re, expected, 1e-9, "state[11].re")?;

    let n = result.populated_rows.len();
    let z0 = vqsim_core::bloch_vector(fs, 0, n).z;
    let z1 = vqsim_core::bloch_vector(fs, 1, n).z;
    approx(z0, 0.0, 1e-9, "qubit 0 <Z>")?;
    approx(z1, 0.0, 1e-9, "qubit 1 <Z>")?;
    Ok(())
}

fn rx_pi_grid() -> Grid {
    let mut grid = Grid::new(1, 1).unwrap();
    grid.set(0, 0, Cell::with_angle(GateType::Rx, std::f64::consts::PI)).unwrap();
    grid
}

fn check_rx_pi(grid: &Grid) -> Result<(), String> {
    let mut rng = SeededSource::new(1);
    let result = simulate(grid, &mut rng).map_err(|e| e.to_string())?;
    let fs = &result.final_state;
    if fs[0].abs() >= 1e-12 {
        return Err(format!("state[0] should vanish, got abs={}", fs[0].abs()));
    }
    approx(fs[1].abs(), 1.0, 1e-9, "|state[1]|")
}

fn ghz3_grid() -> Grid {
    let mut grid = Grid::new(3, 3).unwrap();
    grid.set(0, 0, Cell::simple(GateType::H)).unwrap();
    grid.set(0, 1, Cell::simple(GateType::Control)).unwrap();
    grid.set(1, 1, Cell::simple(GateType::X)).unwrap();
    grid.set(0, 2, Cell::simple(GateType::Control)).unwrap();
    grid.set(2, 2, Cell::simple(GateType::X)).unwrap();
    grid
}

fn check_ghz3(grid: &Grid) -> Result<(), String> {
    let mut rng = SeededSource::new(7);
    let result = simulate(grid, &mut rng).map_err(|e| e.to_string())?;
    let fs = &result.final_state;
    let expected = 1.0 / 2.0_f64.sqrt();
    approx(fs[0b000].re, expected, 1e-9, "state[000].re")?;
    approx(fs[0b111].re, expected, 1e-9, "state[111].re")?;
    for i in 0..8 {
        if i != 0b000 && i != 0b111 {
            approx(fs[i].norm2(), 0.0, 1e-18, &format!("state[{i:03b}] amplitude"))?;
        }
    }
    Ok(())
}

fn reverse3_grid() -> Grid {
    let mut grid = Grid::new(3, 2).unwrap();
    grid.set(2, 0, Cell::simple(GateType::X)).unwrap(); // prepare |001>
    span_cells(&mut grid, 1, GateType::Reverse, Span::new(0, 2));
    grid
}

fn check_reverse3(grid: &Grid) -> Result<(), String> {
    let mut rng = SeededSource::new(1);
    let result = simulate(grid, &mut rng).map_err(|e| e.to_string())?;
    let fs = &result.final_state;
    approx(fs[0b100].re, 1.0, 1e-9, "state[100].re")?;
    for i in 0..8 {
        if i != 0b100 {
            approx(fs[i].norm2(), 0.0, 1e-18, &format!("state[{i:03b}] amplitude"))?;
        }
    }
    Ok(())
}

fn modular_add_grid() -> Grid {
    // rows 0-1: effect span, classical 2 (row0=LSB). rows 2-3: INPUT_A=3.
    // rows 4-6: INPUT_R=5.
    let mut grid = Grid::new(7, 2).unwrap();
    grid.set(1, 0, Cell::simple(GateType::X)).unwrap();
    grid.set(2, 0, Cell::simple(GateType::X)).unwrap();
    grid.set(3, 0, Cell::simple(GateType::X)).unwrap();
    grid.set(4, 0, Cell::simple(GateType::X)).unwrap();
    grid.set(6, 0, Cell::simple(GateType::X)).unwrap();

    span_cells(&mut grid, 1, GateType::AddAMod, Span::new(0, 1));
    span_cells(&mut grid, 1, GateType::InputA, Span::new(2, 3));
    span_cells(&mut grid, 1, GateType::InputR, Span::new(4, 6));
    grid
}

fn check_modular_add(grid: &Grid) -> Result<(), String> {
    let mut rng = SeededSource::new(1);
    let result = simulate(grid, &mut rng).map_err(|e| e.to_string())?;
    let n = result.populated_rows.len();

    let (max_idx, max_amp) = result
        .final_state
        .iter()
        .enumerate()
        .max_by(|a, b| a.1.norm2().partial_cmp(&b.1.norm2()).unwrap())
        .unwrap();
    approx(max_amp.norm2(), 1.0, 1e-9, "dominant basis amplitude")?;

    let effect = codec::decode(max_idx, Span::new(0, 1), n);
    let a = codec::decode(max_idx, Span::new(2, 3), n);
    let r = codec::decode(max_idx, Span::new(4, 6), n);
    if effect != 0 {
        return Err(format!("effect span should encode (2+3) mod 5 = 0, got {effect}"));
    }
    if a != 3 {
        return Err(format!("INPUT_A span should be left at 3, got {a}"));
    }
    if r != 5 {
        return Err(format!("INPUT_R span should be left at 5, got {r}"));
    }
    Ok(())
}

fn comparison_grid() -> Grid {
    // rows 0-1: A=2, rows 2-3: B=3, row 4: target. Column 1 compares
    // A<B; column 2 re-applies the same comparison to check involution.
    let mut grid = Grid::new(5, 3).unwrap();
    grid.set(1, 0, Cell::simple(GateType::X)).unwrap();
    grid.set(2, 0, Cell::simple(GateType::X)).unwrap();

    span_cells(&mut grid, 1, GateType::InputA, Span::new(0, 1));
    span_cells(&mut grid, 1, GateType::InputB, Span::new(2, 3));
    grid.set(4, 1, Cell::simple(GateType::Lt)).unwrap();

    span_cells(&mut grid, 2, GateType::InputA, Span::new(0, 1));
    span_cells(&mut grid, 2, GateType::InputB, Span::new(2, 3));
    grid.set(4, 2, Cell::simple(GateType::Lt)).unwrap();
    grid
}

fn check_comparison(grid: &Grid) -> Result<(), String> {
    let mut rng = SeededSource::new(1);
    let result = vqsim_core::simulate_with(grid, &mut rng, vqsim_core::SimulationOptions::default(), None)
        .map_err(|e| e.to_string())?;
    let history = result.history.ok_or("expected history to be retained")?;
    let n = result.populated_rows.len();

    // After column 1 (index 2 in history: initial, col0, col1), target bit
    // (row 4) must be 1 since 2 < 3.
    let after_first_compare = &history[2];
    let (idx, amp) = after_first_compare
        .iter()
        .enumerate()
        .max_by(|a, b| a.1.norm2().partial_cmp(&b.1.norm2()).unwrap())
        .unwrap();
    approx(amp.norm2(), 1.0, 1e-9, "dominant basis amplitude after first comparison")?;
    let target_bit = (idx >> codec::bit_of_row(4, n)) & 1;
    if target_bit != 1 {
        return Err(format!("target should be 1 after A<B, got {target_bit}"));
    }

    // After column 2 (re-applying A<B), target must return to 0.
    let final_state = &result.final_state;
    let (idx2, amp2) = final_state
        .iter()
        .enumerate()
        .max_by(|a, b| a.1.norm2().partial_cmp(&b.1.norm2()).unwrap())
        .unwrap();
    approx(amp2.norm2(), 1.0, 1e-9, "dominant basis amplitude after second comparison")?;
    let target_bit2 = (idx2 >> codec::bit_of_row(4, n)) & 1;
    if target_bit2 != 0 {
        return Err(format!("target should return to 0 after re-applying A<B, got {target_bit2}"));
    }
    Ok(())
}

pub fn all() -> Vec<Scenario> {
    vec![
        Scenario { name: "bell-pair", build: bell_pair_grid, check: check_bell_pair },
        Scenario { name: "rx-pi", build: rx_pi_grid, check: check_rx_pi },
        Scenario { name: "ghz3", build: ghz3_grid, check: check_ghz3 },
        Scenario { name: "reverse3", build: reverse3_grid, check: check_reverse3 },
        Scenario { name: "modular-add", build: modular_add_grid, check: check_modular_add },
        Scenario { name: "comparison", build: comparison_grid, check: check_comparison },
    ]
}
