//! Built-in scenario circuits for the `bench` subcommand: Bell pair,
//! Rx(π), GHZ-3, REVERSE, modular add, comparison. A light duplicate of
//! the grids `vqsim-tester` builds for the same shapes — this copy only
//! needs to build the grid, not check the outcome.

use vqsim_core::{Cell, GateType, Grid, Span};

pub fn bell_pair() -> Grid {
    let mut grid = Grid::new(2, 2).unwrap();
    grid.set(0, 0, Cell::simple(GateType::H)).unwrap();
    grid.set(0, 1, Cell::simple(GateType::Control)).unwrap();
    grid.set(1, 1, Cell::simple(GateType::X)).unwrap();
    grid
}

pub fn rx_pi() -> Grid {
    let mut grid = Grid::new(1, 1).unwrap();
    grid.set(0, 0, Cell::with_angle(GateType::Rx, std::f64::consts::PI))
        .unwrap();
    grid
}

pub fn ghz3() -> Grid {
    let mut grid = Grid::new(3, 3).unwrap();
    grid.set(0, 0, Cell::simple(GateType::H)).unwrap();
    grid.set(0, 1, Cell::simple(GateType::Control)).unwrap();
    grid.set(1, 1, Cell::simple(GateType::X)).unwrap();
    grid.set(0, 2, Cell::simple(GateType::Control)).unwrap();
    grid.set(2, 2, Cell::simple(GateType::X)).unwrap();
    grid
}

pub fn reverse3() -> Grid {
    let mut grid = Grid::new(3, 2).unwrap();
    // Prepare |001> (row 0 = MSB, row 2 = LSB): set row 2.
    grid.set(2, 0, Cell::simple(GateType::X)).unwrap();
    let span = Span::new(0, 2);
    grid.set(0, 1, Cell::with_span(GateType::Reverse, span)).unwrap();
    grid.set(1, 1, Cell::with_span(GateType::Reverse, Span { is_continuation: true, ..span }))
        .unwrap();
    grid.set(2, 1, Cell::with_span(GateType::Reverse, Span { is_continuation: true, ..span }))
        .unwrap();
    grid
}

fn span_cells(grid: &mut Grid, col: usize, gate: GateType, span: Span) {
    grid.set(span.start_row, col, Cell::with_span(gate, span)).unwrap();
    for row in (span.start_row + 1)..=span.end_row {
        grid.set(row, col, Cell::with_span(gate, Span { is_continuation: true, ..span }))
            .unwrap();
    }
}

pub fn modular_add() -> Grid {
    // rows 0-1: effect span, classical value 2 (row 0 = LSB). rows 2-3:
    // INPUT_A span, value 3. rows 4-6: INPUT_R marker, value 5.
    let mut grid = Grid::new(7, 2).unwrap();
    grid.set(1, 0, Cell::simple(GateType::X)).unwrap(); // effect row1 (2^1 bit) -> value 2
    grid.set(2, 0, Cell::simple(GateType::X)).unwrap(); // A row2 (2^0 bit)
    grid.set(3, 0, Cell::simple(GateType::X)).unwrap(); // A row3 (2^1 bit) -> value 3
    grid.set(4, 0, Cell::simple(GateType::X)).unwrap(); // R row4 (2^0 bit)
    grid.set(6, 0, Cell::simple(GateType::X)).unwrap(); // R row6 (2^2 bit) -> value 5

    span_cells(&mut grid, 1, GateType::AddAMod, Span::new(0, 1));
    span_cells(&mut grid, 1, GateType::InputA, Span::new(2, 3));
    span_cells(&mut grid, 1, GateType::InputR, Span::new(4, 6));
    grid
}

pub fn comparison() -> Grid {
    // rows 0-1: A=2, rows 2-3: B=3, row 4: comparison target, prepared in
    // col 0 and compared in col 1.
    let mut grid = Grid::new(5, 2).unwrap();
    grid.set(1, 0, Cell::simple(GateType::X)).unwrap(); // A = 2
    grid.set(2, 0, Cell::simple(GateType::X)).unwrap();
    grid.set(3, 0, Cell::simple(GateType::X)).unwrap(); // B = 3

    span_cells(&mut grid, 1, GateType::InputA, Span::new(0, 1));
    span_cells(&mut grid, 1, GateType::InputB, Span::new(2, 3));
    grid.set(4, 1, Cell::simple(GateType::Lt)).unwrap();
    grid
}

pub fn by_name(name: &str) -> Option<Grid> {
    match name {
        "bell" | "bell-pair" => Some(bell_pair()),
        "rx-pi" => Some(rx_pi()),
        "ghz3" | "ghz-3" => Some(ghz3()),
        "reverse" | "reverse3" => Some(reverse3()),
        "modadd" | "modular-add" => Some(modular_add()),
        "comparison" => Some(comparison()),
        _ => None,
    }
}

pub const NAMES: &[&str] = &["bell", "rx-pi", "ghz3", "reverse", "modadd", "comparison"];
