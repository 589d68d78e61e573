use mdvalidate::core::energy::breakdown::EnergyBreakdown;
use mdvalidate::workflows::compare::Comparison;
use mdvalidate::workflows::suite::{CaseOutcome, SuiteReport};
use std::io::{self, Write};

const INDENT: &str = "  ";

const MIN_TERM_W: usize = 8;
const MAX_TERM_W: usize = 40;
const VALUE_W: usize = 16;
const NAME_W: usize = 28;
const STATUS_W: usize = 6;

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        return s.to_string();
    }
    let mut out: String = s.chars().take(max_len.saturating_sub(1)).collect();
    out.push('…');
    out
}

/// Width of the term column: the longest name, within `[MIN_TERM_W, MAX_TERM_W]`.
fn term_width<'a>(names: impl IntoIterator<Item = &'a str>) -> usize {
    names
        .into_iter()
        .map(|n| n.chars().count())
        .max()
        .unwrap_or(0)
        .clamp(MIN_TERM_W, MAX_TERM_W)
}

fn title(out: &mut impl Write, text: &str) -> io::Result<()> {
    writeln!(out, "{}{}", INDENT, text)
}

fn rule(left: char, mid: char, right: char, widths: &[usize]) -> String {
    let cells: Vec<String> = widths.iter().map(|w| "─".repeat(w + 2)).collect();
    format!("{}{}{}{}", INDENT, left, cells.join(&mid.to_string()), right)
}

pub fn print_breakdown(
    out: &mut impl Write,
    heading: &str,
    breakdown: &EnergyBreakdown,
) -> io::Result<()> {
    let term_w = term_width(breakdown.terms());
    let widths = [term_w, VALUE_W, 8];
    title(out, heading)?;
    writeln!(out, "{}", rule('┌', '┬', '┐', &widths))?;
    writeln!(
        out,
        "{}│ {:<term_w$} │ {:>VALUE_W$} │ {:<8} │",
        INDENT, "Term", "Energy", "Unit"
    )?;
    writeln!(out, "{}", rule('├', '┼', '┤', &widths))?;
    for (term, energy) in breakdown.iter() {
        writeln!(
            out,
            "{}│ {:<term_w$} │ {:>VALUE_W$.6} │ {:<8} │",
            INDENT,
            truncate(term, term_w),
            energy.value,
            energy.unit.symbol()
        )?;
    }
    writeln!(out, "{}", rule('└', '┴', '┘', &widths))
}

pub fn print_comparison(out: &mut impl Write, comparison: &Comparison) -> io::Result<()> {
    let term_w = term_width(comparison.diff.iter().map(|(term, _)| term));
    let widths = [term_w, VALUE_W, VALUE_W, VALUE_W, STATUS_W];
    let unit = comparison.reference_engine.native_unit();
    title(
        out,
        &format!(
            "{}: {} vs {} ({})",
            comparison.case_name, comparison.reference_engine, comparison.converted_engine, unit
        ),
    )?;
    writeln!(out, "{}", rule('┌', '┬', '┐', &widths))?;
    writeln!(
        out,
        "{}│ {:<term_w$} │ {:>VALUE_W$} │ {:>VALUE_W$} │ {:>VALUE_W$} │ {:<STATUS_W$} │",
        INDENT, "Term", "Reference", "Converted", "Difference", ""
    )?;
    writeln!(out, "{}", rule('├', '┼', '┤', &widths))?;

    for (term, delta) in comparison.diff.iter() {
        let reference = comparison.reference.get(term).map_or(0.0, |e| e.value);
        let converted = comparison.converted.get(term).map_or(0.0, |e| e.value);
        let status = if comparison.violations.iter().any(|(t, _)| t == term) {
            "FAIL"
        } else {
            ""
        };
        writeln!(
            out,
            "{}│ {:<term_w$} │ {:>VALUE_W$.6} │ {:>VALUE_W$.6} │ {:>VALUE_W$.6} │ {:<STATUS_W$} │",
            INDENT,
            truncate(term, term_w),
            reference,
            converted,
            delta.value,
            status
        )?;
    }
    writeln!(out, "{}", rule('└', '┴', '┘', &widths))?;

    let verdict = if comparison.passed() { "PASSED" } else { "FAILED" };
    writeln!(
        out,
        "{}{} (tolerance {} {})",
        INDENT, verdict, comparison.tolerance.value, comparison.tolerance.unit
    )
}

pub fn print_suite_summary(out: &mut impl Write, report: &SuiteReport) -> io::Result<()> {
    let widths = [NAME_W, STATUS_W, 30];
    title(out, "Suite summary")?;
    writeln!(out, "{}", rule('┌', '┬', '┐', &widths))?;
    writeln!(
        out,
        "{}│ {:<NAME_W$} │ {:<STATUS_W$} │ {:<30} │",
        INDENT, "Case", "Status", "Detail"
    )?;
    writeln!(out, "{}", rule('├', '┼', '┤', &widths))?;

    for case in &report.cases {
        let status = if case.passed() { "ok" } else { "FAIL" };
        let detail = match &case.outcome {
            CaseOutcome::Evaluated(energy) => {
                let potential = energy.get("potential").map_or(0.0, |e| e.value);
                format!("evaluated, potential {:.4}", potential)
            }
            CaseOutcome::Compared(c) => match c.diff.max_abs() {
                Some((term, delta)) => format!("max |Δ| {:.3e} ({})", delta.value.abs(), term),
                None => "compared".to_string(),
            },
            CaseOutcome::Failed(e) => e.to_string(),
        };
        writeln!(
            out,
            "{}│ {:<NAME_W$} │ {:<STATUS_W$} │ {:<30} │",
            INDENT,
            truncate(&case.name, NAME_W),
            status,
            truncate(&detail, 30)
        )?;
    }
    writeln!(out, "{}", rule('└', '┴', '┘', &widths))?;
    writeln!(
        out,
        "{}{}/{} case(s) passed",
        INDENT,
        report.passed_count(),
        report.cases.len()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use mdvalidate::core::energy::canonical::{Engine, canonicalize};
    use mdvalidate::core::units::Energy;
    use mdvalidate::engine::config::ComparisonConfig;
    use mdvalidate::workflows::compare::compare_breakdowns;
    use mdvalidate::workflows::suite::CaseResult;

    fn render(f: impl FnOnce(&mut Vec<u8>) -> io::Result<()>) -> String {
        let mut buf = Vec::new();
        f(&mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    fn amber(potential: f64) -> EnergyBreakdown {
        let mut raw = EnergyBreakdown::new();
        raw.try_insert("ENERGY", Energy::kcal(potential)).unwrap();
        raw.try_insert("BOND", Energy::kcal(1.5)).unwrap();
        canonicalize(&raw, Engine::Amber)
    }

    #[test]
    fn truncate_shortens_long_names() {
        assert_eq!(truncate("potential", 12), "potential");
        assert_eq!(truncate("a_very_long_case_name", 8), "a_very_…");
    }

    #[test]
    fn term_column_fits_the_longest_name() {
        assert_eq!(term_width(["bond", "vdw"]), MIN_TERM_W);
        assert_eq!(term_width(["Position Rest.", "Bond"]), 14);
        assert_eq!(term_width(["x".repeat(60).as_str()]), MAX_TERM_W);
    }

    #[test]
    fn raw_gromacs_names_are_printed_in_full() {
        let mut raw = EnergyBreakdown::new();
        raw.try_insert("Position Rest.", Energy::kj(0.25)).unwrap();
        raw.try_insert("Coulomb recip.", Energy::kj(-12.0)).unwrap();
        let text = render(|out| print_breakdown(out, "GROMACS raw terms", &raw));

        assert!(text.contains("│ Position Rest. │"));
        assert!(!text.contains('…'));
        let widths: Vec<_> = text.lines().skip(1).map(|l| l.chars().count()).collect();
        assert!(widths.windows(2).all(|w| w[0] == w[1]), "{:?}", widths);
    }

    #[test]
    fn heading_is_not_boxed() {
        let text = render(|out| print_breakdown(out, "AMBER energy", &amber(-1.0)));
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("  AMBER energy"));
        assert!(lines.next().unwrap().trim_start().starts_with('┌'));
        assert_eq!(text.matches('┌').count(), 1);
    }

    #[test]
    fn breakdown_table_lists_every_term_with_unit() {
        let text = render(|out| print_breakdown(out, "AMBER energy", &amber(-10.0)));
        assert!(text.contains("AMBER energy"));
        assert!(text.contains("bond"));
        assert!(text.contains("1.500000"));
        assert!(text.contains("-10.000000"));
        assert!(text.contains("kcal/mol"));
    }

    #[test]
    fn comparison_table_flags_failing_terms() {
        let comparison = compare_breakdowns(
            "ala",
            (Engine::Amber, amber(-10.0)),
            (Engine::Amber, amber(-9.0)),
            &ComparisonConfig::default(),
        )
        .unwrap();
        let text = render(|out| print_comparison(out, &comparison));
        let potential_line = text.lines().find(|l| l.contains("potential")).unwrap();
        assert!(potential_line.contains("FAIL"));
        assert!(potential_line.contains("1.000000"));
        assert!(text.contains("FAILED"));
    }

    #[test]
    fn suite_summary_counts_passes() {
        let report = SuiteReport {
            cases: vec![
                CaseResult {
                    name: "ala".to_string(),
                    outcome: CaseOutcome::Evaluated(amber(-10.0)),
                },
                CaseResult {
                    name: "ethane".to_string(),
                    outcome: CaseOutcome::Failed(
                        mdvalidate::engine::error::EngineError::Input("broken".to_string()),
                    ),
                },
            ],
        };
        let text = render(|out| print_suite_summary(out, &report));
        assert!(text.contains("1/2 case(s) passed"));
        assert!(text.contains("FAIL"));
        assert!(text.contains("potential -10.0000"));
    }
}
