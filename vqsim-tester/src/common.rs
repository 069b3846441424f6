//! Report-printing helpers: box-drawing table layout for scenario
//! results, where each row reports a pass/fail assertion against its
//! expected outcome.

use std::time::Duration;

pub struct ScenarioResult {
    pub name: String,
    pub elapsed: Duration,
    pub passed: bool,
    pub detail: Option<String>,
}

pub fn format_duration(d: Duration) -> String {
    if d.as_secs() > 0 {
        format!("{:.3}s", d.as_secs_f64())
    } else if d.as_millis() > 0 {
        format!("{:.3}ms", d.as_secs_f64() * 1000.0)
    } else {
        format!("{:.3}us", d.as_secs_f64() * 1_000_000.0)
    }
}

pub fn print_section(title: &str) {
    let width = 61;
    let padding = width.saturating_sub(title.len() + 2);
    println!("┌{}┐", "─".repeat(width));
    println!("│ {}{} │", title, " ".repeat(padding));
    println!("└{}┘\n", "─".repeat(width));
}

pub fn print_scenario_table(results: &[ScenarioResult]) {
    const C1: usize = 30;
    const C2: usize = 12;
    const C3: usize = 6;

    let top = format!("╔{}═{}═{}╗", "═".repeat(C1 + 2), "═".repeat(C2 + 2), "═".repeat(C3 + 2));
    let title_sep = format!("╠{}╤{}╤{}╣", "═".repeat(C1 + 2), "═".repeat(C2 + 2), "═".repeat(C3 + 2));
    let header_sep = format!("╠{}╪{}╪{}╣", "═".repeat(C1 + 2), "═".repeat(C2 + 2), "═".repeat(C3 + 2));
    let bottom = format!("╚{}╧{}╧{}╝", "═".repeat(C1 + 2), "═".repeat(C2 + 2), "═".repeat(C3 + 2));
    let total_width = C1 + C2 + C3 + 8;

    println!("\n{}", top);
    println!("║{:^width$}║", "SCENARIO RESULTS", width = total_width);
    println!("{}", title_sep);
    println!("║ {:<C1$} │ {:^C2$} │ {:^C3$} ║", "Scenario", "Time", "Pass");
    println!("{}", header_sep);

    for r in results {
        let pass_str = if r.passed { "✓" } else { "✗" };
        println!(
            "║ {:<C1$} │ {:>C2$} │ {:^C3$} ║",
            r.name,
            format_duration(r.elapsed),
            pass_str,
        );
        if let Some(detail) = &r.detail {
            println!("║   {:<width$} ║", detail, width = C1 + C2 + C3 + 4);
        }
    }

    println!("{}", bottom);
}

pub fn print_summary(results: &[ScenarioResult]) {
    let all_pass = results.iter().all(|r| r.passed);
    println!();
    if all_pass {
        println!("✓ All scenarios produced the expected result.");
    } else {
        println!("✗ WARNING: some scenarios did not match the expected result.");
    }

    let total: Duration = results.iter().map(|r| r.elapsed).sum();
    println!("\nTotal time: {}", format_duration(total));
}
