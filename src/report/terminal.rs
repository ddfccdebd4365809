use std::path::Path;

use colored::*;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use crate::license::summary::rule_for;
use crate::models::{LicenseCategory, LicenseReport, Severity};

/// Findings shown per category unless `verbose` is set.
const PREVIEW_ROWS: usize = 5;

/// Render a colored terminal summary of a freshly built report.
pub fn render(report: &LicenseReport, output: &Path, verbose: bool, quiet: bool) {
    let problem_count: usize = report
        .problematic_licenses
        .as_slice()
        .iter()
        .map(|c| c.findings.len())
        .sum();
    let scan_errors = report.scan_issues.iter().filter(|i| i.kind == "scan_error").count();
    let low_confidence = report
        .scan_issues
        .iter()
        .filter(|i| i.kind == "low_confidence_license")
        .count();
    let (total_files, total_licenses, total_detections) = report
        .metadata
        .as_ref()
        .map(|m| (m.total_files, m.total_licenses, m.total_license_detections))
        .unwrap_or((0, 0, 0));

    if quiet {
        println!(
            "Files: {}  Licenses: {}  Findings: {}  Scan errors: {}",
            total_files,
            total_licenses,
            problem_count.to_string().red(),
            scan_errors.to_string().yellow(),
        );
        return;
    }

    println!(
        "\n {} v{}",
        "license-report-mcp".bold(),
        env!("CARGO_PKG_VERSION")
    );
    println!(" Report written to: {}\n", output.display());

    println!(" ┌────────────────────────────────────────────────────┐");
    println!(" │  {:<48} │", "SUMMARY".bold());
    println!(" │  {:<48} │", format!("Files scanned          : {}", total_files));
    println!(" │  {:<48} │", format!("Unique licenses        : {}", total_licenses));
    println!(" │  {:<48} │", format!("License detections     : {}", total_detections));
    println!(" │  {:<48} │", format!("Scan errors            : {}", scan_errors));
    println!(" │  {:<48} │", format!("Low-confidence matches : {}", low_confidence));
    println!(" └────────────────────────────────────────────────────┘\n");

    if !report.license_statistics.is_empty() {
        println!(" {} Most common licenses:\n", "[STATS]".cyan().bold());
        render_statistics(report);
        println!();
    }

    if problem_count == 0 {
        println!(" {} No major license issues detected!\n", "✓".green());
    }

    for category in report.problematic_licenses.as_slice() {
        if category.findings.is_empty() {
            continue;
        }
        println!(
            " {} {} licenses ({} findings):\n",
            "[ISSUE]".red().bold(),
            category.name.to_uppercase().replace('_', " "),
            category.findings.len()
        );
        render_category(category, verbose);
        println!();
    }

    if !report.recommendations.is_empty() {
        println!(" {} Recommendations:\n", "[ADVICE]".yellow().bold());
        for rec in &report.recommendations {
            let marker = match Severity::parse(&rec.severity) {
                Some(Severity::Critical) | Some(Severity::High) => "●".red(),
                Some(Severity::Medium) => "●".yellow(),
                _ => "●".normal(),
            };
            println!(
                "   {} [{}] {} ({} files)",
                marker,
                rec.severity,
                rec.message,
                rec.affected_display()
            );
        }
        println!();
    }
}

fn render_statistics(report: &LicenseReport) {
    let mut pairs: Vec<(&String, &usize)> = report.license_statistics.iter().collect();
    pairs.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("License").add_attribute(Attribute::Bold),
            Cell::new("Detections").add_attribute(Attribute::Bold),
        ]);

    for (license, count) in pairs.into_iter().take(10) {
        table.add_row(vec![
            Cell::new(license),
            Cell::new(count).set_alignment(CellAlignment::Right),
        ]);
    }

    println!("{}", table);
}

fn render_category(category: &LicenseCategory, verbose: bool) {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("File").add_attribute(Attribute::Bold),
            Cell::new("License").add_attribute(Attribute::Bold),
            Cell::new("Score").add_attribute(Attribute::Bold),
            Cell::new("Summary").add_attribute(Attribute::Bold),
        ]);

    let limit = if verbose { usize::MAX } else { PREVIEW_ROWS };

    for finding in category.findings.iter().take(limit) {
        let score_color = if finding.score < 50.0 {
            Color::Red
        } else if finding.score < 70.0 {
            Color::Yellow
        } else {
            Color::Green
        };

        table.add_row(vec![
            Cell::new(&finding.file),
            Cell::new(&finding.name),
            Cell::new(finding.score_display())
                .fg(score_color)
                .set_alignment(CellAlignment::Right),
            Cell::new(rule_for(&finding.name).short),
        ]);
    }

    println!("{}", table);

    if !verbose && category.findings.len() > PREVIEW_ROWS {
        println!(
            "   ... and {} more (use --verbose to list all)",
            category.findings.len() - PREVIEW_ROWS
        );
    }
}
