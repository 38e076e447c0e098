use crate::batch::ScenarioReport;
use crate::benchmarks::BenchmarkLabel;
use crate::core::{Gap, StageValue, StageVolumes};
use colored::*;
use comfy_table::{presets::UTF8_FULL, Cell, ContentArrangement, Table};
use std::io::Write;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    Markdown,
    Terminal,
}

pub trait OutputWriter {
    fn write_report(&mut self, report: &ScenarioReport) -> anyhow::Result<()>;
}

pub fn create_writer<W: Write + 'static>(writer: W, format: OutputFormat) -> Box<dyn OutputWriter> {
    match format {
        OutputFormat::Json => Box::new(JsonWriter::new(writer)),
        OutputFormat::Markdown => Box::new(MarkdownWriter::new(writer)),
        OutputFormat::Terminal => Box::new(TerminalWriter::new(writer)),
    }
}

pub struct JsonWriter<W: Write> {
    writer: W,
}

impl<W: Write> JsonWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }
}

impl<W: Write> OutputWriter for JsonWriter<W> {
    fn write_report(&mut self, report: &ScenarioReport) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(report)?;
        self.writer.write_all(json.as_bytes())?;
        writeln!(self.writer)?;
        Ok(())
    }
}

pub struct MarkdownWriter<W: Write> {
    writer: W,
}

impl<W: Write> MarkdownWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    fn write_funnel_table(&mut self, annual: &StageVolumes, monthly: &StageVolumes) -> anyhow::Result<()> {
        writeln!(self.writer, "| Stage | Annual | Monthly |")?;
        writeln!(self.writer, "|-------|--------|---------|")?;
        for (name, a, m) in stage_rows(annual, monthly) {
            writeln!(
                self.writer,
                "| {name} | {} | {} |",
                fmt_volume(a),
                fmt_volume(m)
            )?;
        }
        writeln!(self.writer)?;
        Ok(())
    }
}

impl<W: Write> OutputWriter for MarkdownWriter<W> {
    fn write_report(&mut self, report: &ScenarioReport) -> anyhow::Result<()> {
        writeln!(self.writer, "# Funnel Analysis Report")?;
        writeln!(self.writer)?;
        writeln!(
            self.writer,
            "Industry: **{}** | Scale: **{}** | Cost per visitor: **${:.2}**",
            report.resolved_industry,
            report.state.scale.display_name(),
            report.cost_per_visitor
        )?;
        writeln!(self.writer)?;

        writeln!(self.writer, "## Funnel")?;
        writeln!(self.writer)?;
        self.write_funnel_table(&report.result.annual, &report.result.monthly)?;

        writeln!(self.writer, "## Economics")?;
        writeln!(self.writer)?;
        writeln!(self.writer, "| Metric | Value |")?;
        writeln!(self.writer, "|--------|-------|")?;
        writeln!(
            self.writer,
            "| Total spend | {} |",
            fmt_money(report.result.total_spend)
        )?;
        writeln!(
            self.writer,
            "| Revenue | {} |",
            fmt_money(StageValue::from_f64(report.result.revenue))
        )?;
        for (name, value) in cost_rows(report) {
            writeln!(self.writer, "| {name} | {} |", fmt_money(value))?;
        }
        writeln!(self.writer, "| ROI | {} |", report.result.roi)?;
        writeln!(self.writer)?;

        if let Some(gap) = &report.result.gap {
            writeln!(self.writer, "## Gap")?;
            writeln!(self.writer)?;
            writeln!(self.writer, "{}", describe_gap(gap))?;
            writeln!(self.writer)?;
        }

        writeln!(self.writer, "## Benchmarks")?;
        writeln!(self.writer)?;
        writeln!(
            self.writer,
            "| Stage | Actual | Benchmark avg | Percentile | Rating |"
        )?;
        writeln!(
            self.writer,
            "|-------|--------|---------------|------------|--------|"
        )?;
        for assessment in &report.stage_assessments {
            writeln!(
                self.writer,
                "| {} | {:.1}% | {:.1}% | {:.0} | {} |",
                assessment.stage.display_name(),
                assessment.actual * 100.0,
                assessment.benchmark.avg * 100.0,
                assessment.classification.percentile,
                assessment.classification.label.display_name()
            )?;
        }
        if let Some(classification) = &report.cac.classification {
            writeln!(
                self.writer,
                "| CAC | {} | {} | {:.0} | {} |",
                fmt_money(report.cac.actual),
                fmt_money(StageValue::from_f64(report.cac.benchmark.avg)),
                classification.percentile,
                classification.label.display_name()
            )?;
        }
        writeln!(self.writer)?;

        writeln!(self.writer, "## Suggestions")?;
        writeln!(self.writer)?;
        if report.suggestions.is_empty() {
            writeln!(
                self.writer,
                "All stages are performing at or above benchmark."
            )?;
        } else {
            for (i, s) in report.suggestions.iter().enumerate() {
                writeln!(
                    self.writer,
                    "{}. {} — estimated savings {}",
                    i + 1,
                    s.impact,
                    fmt_money(s.savings_estimate)
                )?;
            }
        }
        writeln!(self.writer)?;
        Ok(())
    }
}

pub struct TerminalWriter<W: Write> {
    writer: W,
}

impl<W: Write> TerminalWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }
}

impl<W: Write> OutputWriter for TerminalWriter<W> {
    fn write_report(&mut self, report: &ScenarioReport) -> anyhow::Result<()> {
        writeln!(
            self.writer,
            "{}",
            format!(
                "Funnel analysis — {} ({}, ${:.2}/visitor)",
                report.resolved_industry,
                report.state.scale.display_name(),
                report.cost_per_visitor
            )
            .bold()
        )?;
        writeln!(self.writer)?;

        let mut table = Table::new();
        table
            .load_preset(UTF8_FULL)
            .set_content_arrangement(ContentArrangement::Dynamic)
            .set_header(vec!["Stage", "Annual", "Monthly", "Cost per unit"]);
        let costs: Vec<StageValue> = vec![
            report.result.economics.cost_per_visitor,
            report.result.economics.cpl,
            report.result.economics.cpql,
            report.result.economics.cpsql,
            report.result.economics.cp_opp,
            report.result.economics.cac,
        ];
        for ((name, a, m), cost) in
            stage_rows(&report.result.annual, &report.result.monthly).zip(costs)
        {
            table.add_row(vec![
                Cell::new(name),
                Cell::new(fmt_volume(a)),
                Cell::new(fmt_volume(m)),
                Cell::new(fmt_money(cost)),
            ]);
        }
        writeln!(self.writer, "{table}")?;
        writeln!(self.writer)?;

        writeln!(
            self.writer,
            "Total spend: {}   Revenue: {}   ROI: {}",
            fmt_money(report.result.total_spend).bold(),
            fmt_money(StageValue::from_f64(report.result.revenue)).bold(),
            format!("{}", report.result.roi).bold()
        )?;

        if let Some(gap) = &report.result.gap {
            writeln!(self.writer, "{}", describe_gap(gap).yellow())?;
        }
        writeln!(self.writer)?;

        writeln!(self.writer, "{}", "Benchmarks".bold())?;
        for assessment in &report.stage_assessments {
            writeln!(
                self.writer,
                "  {:<28} {:>6.1}%  (avg {:>5.1}%)  {}",
                assessment.stage.display_name(),
                assessment.actual * 100.0,
                assessment.benchmark.avg * 100.0,
                color_label(assessment.classification.label)
            )?;
        }
        if let Some(classification) = &report.cac.classification {
            writeln!(
                self.writer,
                "  {:<28} {:>8}  (avg {:>7})  {}",
                "CAC",
                fmt_money(report.cac.actual),
                fmt_money(StageValue::from_f64(report.cac.benchmark.avg)),
                color_label(classification.label)
            )?;
        }
        writeln!(self.writer)?;

        if report.suggestions.is_empty() {
            writeln!(
                self.writer,
                "{}",
                "All stages performing at or above benchmark.".green()
            )?;
        } else {
            writeln!(self.writer, "{}", "Suggestions".bold())?;
            for (i, s) in report.suggestions.iter().enumerate() {
                writeln!(self.writer, "  {}. {}", i + 1, s.impact)?;
                writeln!(
                    self.writer,
                    "     estimated savings: {}",
                    fmt_money(s.savings_estimate).green()
                )?;
            }
        }
        Ok(())
    }
}

fn stage_rows<'a>(
    annual: &'a StageVolumes,
    monthly: &'a StageVolumes,
) -> impl Iterator<Item = (&'static str, StageValue, StageValue)> + 'a {
    const NAMES: [&str; 6] = [
        "Web visitors",
        "Leads",
        "MQLs",
        "SQLs",
        "Opportunities",
        "Closed won",
    ];
    NAMES
        .into_iter()
        .zip(annual.as_array())
        .zip(monthly.as_array())
        .map(|((name, a), m)| (name, a, m))
}

fn cost_rows(report: &ScenarioReport) -> [(&'static str, StageValue); 6] {
    let e = &report.result.economics;
    [
        ("Cost per visitor", e.cost_per_visitor),
        ("CPL", e.cpl),
        ("CPQL", e.cpql),
        ("CPSQL", e.cpsql),
        ("Cost per opportunity", e.cp_opp),
        ("CAC", e.cac),
    ]
}

fn describe_gap(gap: &Gap) -> String {
    match gap {
        Gap::RevenueShortfall {
            gap,
            percentage_off,
        } => {
            if *gap > 0.0 {
                format!(
                    "Revenue gap vs goal: {} short ({percentage_off:.1}% off)",
                    fmt_money(StageValue::from_f64(*gap))
                )
            } else {
                format!(
                    "Revenue exceeds goal by {} ({:.1}%)",
                    fmt_money(StageValue::from_f64(-gap)),
                    -percentage_off
                )
            }
        }
        Gap::BudgetOverrun {
            gap,
            percentage_off,
        } => {
            if *gap > 0.0 {
                format!(
                    "Required spend exceeds budget by {} ({percentage_off:.1}% over)",
                    fmt_money(StageValue::from_f64(*gap))
                )
            } else {
                format!(
                    "Required spend is under budget by {} ({:.1}%)",
                    fmt_money(StageValue::from_f64(-gap)),
                    -percentage_off
                )
            }
        }
    }
}

/// Display rounding happens here and only here; the engine carries exact
/// fractional volumes.
fn fmt_volume(value: StageValue) -> String {
    match value.value() {
        Some(v) if v >= 100.0 => group_thousands(v.floor()),
        Some(v) => format!("{v:.1}"),
        None => "n/a".to_string(),
    }
}

fn fmt_money(value: StageValue) -> String {
    match value.value() {
        Some(v) if v.abs() >= 100.0 => format!("${}", group_thousands(v.round())),
        Some(v) => format!("${v:.2}"),
        None => "n/a".to_string(),
    }
}

fn group_thousands(value: f64) -> String {
    let raw = format!("{}", value.abs() as i64);
    let mut grouped = String::new();
    for (i, c) in raw.chars().enumerate() {
        if i > 0 && (raw.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    if value < 0.0 {
        format!("-{grouped}")
    } else {
        grouped
    }
}

fn color_label(label: BenchmarkLabel) -> ColoredString {
    let name = label.display_name();
    match label {
        BenchmarkLabel::Poor => name.red(),
        BenchmarkLabel::BelowAverage => name.yellow(),
        BenchmarkLabel::Average => name.normal(),
        BenchmarkLabel::AboveAverage => name.green(),
        BenchmarkLabel::Excellent => name.bright_green(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::batch::evaluate_scenario;
    use crate::benchmarks::BenchmarkRepository;
    use crate::core::CalculatorState;

    fn sample_report() -> ScenarioReport {
        let repo = BenchmarkRepository::builtin();
        evaluate_scenario(&CalculatorState::default(), &repo, None).unwrap()
    }

    #[test]
    fn json_writer_emits_valid_json() {
        let report = sample_report();
        let mut buffer = Vec::new();
        JsonWriter::new(&mut buffer).write_report(&report).unwrap();
        let parsed: serde_json::Value = serde_json::from_slice(&buffer).unwrap();
        assert!(parsed["result"]["annual"]["closedWon"].is_number());
    }

    #[test]
    fn markdown_writer_includes_all_sections() {
        let report = sample_report();
        let mut buffer = Vec::new();
        MarkdownWriter::new(&mut buffer)
            .write_report(&report)
            .unwrap();
        let text = String::from_utf8(buffer).unwrap();
        assert!(text.contains("# Funnel Analysis Report"));
        assert!(text.contains("## Funnel"));
        assert!(text.contains("## Benchmarks"));
        assert!(text.contains("at or above benchmark"));
    }

    #[test]
    fn group_thousands_inserts_separators() {
        assert_eq!(group_thousands(1_234_567.0), "1,234,567");
        assert_eq!(group_thousands(999.0), "999");
        assert_eq!(group_thousands(-4_000.0), "-4,000");
    }

    #[test]
    fn not_computable_renders_as_na() {
        assert_eq!(fmt_volume(StageValue::NotComputable), "n/a");
        assert_eq!(fmt_money(StageValue::NotComputable), "n/a");
    }
}
