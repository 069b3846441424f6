//! ASCII grid renderer: fixed-width, per-column cell layout drawing a
//! `vqsim_core::Grid` one row per line.

use std::fmt::Write as _;

use vqsim_core::{Cell, GateType, Grid};

/// Short glyph for a gate, used to label its cell. Exhaustive match so a
/// newly added `GateType` variant fails to compile here rather than
/// rendering silently as blank.
fn label(gate: GateType) -> &'static str {
    use GateType::*;
    match gate {
        X => "X",
        Y => "Y",
        Z => "Z",
        H => "H",
        S => "S",
        Sdg => "S+",
        T => "T",
        SqrtX => "vX",
        SqrtXdg => "vX+",
        SqrtY => "vY",
        SqrtYdg => "vY+",
        Identity => "I",
        Rx => "Rx",
        Ry => "Ry",
        Rz => "Rz",
        Control => "*",
        AntiControl => "o",
        XControl => "X*",
        XAntiControl => "Xo",
        YControl => "Y*",
        YAntiControl => "Yo",
        Swap => "x",
        Ccx => "X",
        Measure => "M",
        Reverse => "REV",
        Inc => "+1",
        Dec => "-1",
        AddA => "+A",
        SubA => "-A",
        MulA => "*A",
        DivA => "/A",
        MulB => "*B",
        DivB => "/B",
        Inc1Mod => "+1%",
        Dec1Mod => "-1%",
        AddAMod => "+A%",
        SubAMod => "-A%",
        MulAMod => "*A%",
        DivAMod => "/A%",
        Lt => "<",
        Le => "<=",
        Gt => ">",
        Ge => ">=",
        Eq => "==",
        Ne => "!=",
        MulI => "xi",
        MulNegI => "x-i",
        MulSqrtI => "x/i",
        MulSqrtNegI => "x/-i",
        InputA => "A",
        InputB => "B",
        InputR => "R",
        BlochVis => "Bv",
        PercentVis => "%",
        Custom => "U",
    }
}

/// Renders a `Grid` as a fixed-width ASCII diagram, one line per row.
/// All cells in one render are padded to the width of the longest label
/// present.
pub struct GridRenderer<'a> {
    grid: &'a Grid,
}

impl<'a> GridRenderer<'a> {
    pub fn new(grid: &'a Grid) -> Self {
        GridRenderer { grid }
    }

    fn cell_width(&self) -> usize {
        let mut width = 1;
        for col in 0..self.grid.cols() {
            for cell in self.grid.column(col) {
                if let Some(gate) = cell.gate {
                    width = width.max(label(gate).len());
                }
            }
        }
        width
    }

    fn render_cell(&self, cell: Cell, width: usize) -> String {
        if cell.is_continuation() {
            return format!("──{:^width$}──", "|", width = width);
        }
        match cell.gate {
            None => "─".repeat(width + 4),
            Some(gate @ (GateType::Control | GateType::XControl | GateType::YControl)) => {
                let glyph = if gate == GateType::Control { "*" } else { label(gate) };
                format!("──{:^width$}──", glyph, width = width)
            }
            Some(gate @ (GateType::AntiControl | GateType::XAntiControl | GateType::YAntiControl)) => {
                format!("──{:^width$}──", label(gate), width = width)
            }
            Some(GateType::Swap) => format!("──{:^width$}──", "x", width = width),
            Some(GateType::Ccx) => format!("─[{:^width$}]─", "X", width = width),
            Some(gate) => format!("─[{:^width$}]─", label(gate), width = width),
        }
    }

    pub fn render(&self) -> String {
        let width = self.cell_width();
        let mut out = String::new();
        for row in 0..self.grid.rows() {
            let _ = write!(out, "q{row}: ");
            for col in 0..self.grid.cols() {
                out.push_str(&self.render_cell(self.grid.get(row, col), width));
            }
            out.push('\n');
        }
        out
    }
}

impl std::fmt::Display for GridRenderer<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.render())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vqsim_core::Cell;

    #[test]
    fn renders_one_gate_per_row() {
        let mut grid = Grid::new(2, 2).unwrap();
        grid.set(0, 0, Cell::simple(GateType::H)).unwrap();
        grid.set(0, 1, Cell::simple(GateType::Control)).unwrap();
        grid.set(1, 1, Cell::simple(GateType::X)).unwrap();
        let rendered = GridRenderer::new(&grid).render();
        assert_eq!(rendered.lines().count(), 2);
        assert!(rendered.lines().next().unwrap().contains('H'));
    }

    #[test]
    fn empty_grid_renders_blank_wires() {
        let grid = Grid::new(1, 3).unwrap();
        let rendered = GridRenderer::new(&grid).render();
        assert!(rendered.contains("q0:"));
        assert!(!rendered.contains('['));
    }
}
