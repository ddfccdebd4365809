//! Text renderers behind each tool.
//!
//! Every function returns a complete text blob. Absent data is a message,
//! never an error.

use std::collections::BTreeSet;
use std::path::Path;

use futures::future::join_all;

use crate::files;
use crate::license::compatibility::compatibility_verdict;
use crate::license::summary::summarize;
use crate::models::LicenseFinding;
use crate::store::{ReportStore, HIGH_RISK_CATEGORIES};

fn bullet_list<I, S>(header: String, items: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut out = header;
    for item in items {
        out.push_str("\n- ");
        out.push_str(item.as_ref());
    }
    out
}

fn finding_line(finding: &LicenseFinding) -> String {
    format!("{} (score {})", finding.name, finding.score_display())
}

pub fn list_categories(store: &ReportStore) -> String {
    let categories = store.list_categories();
    if categories.is_empty() {
        return "No license categories found in the report.".to_string();
    }
    bullet_list(format!("License categories ({}):", categories.len()), categories)
}

pub fn list_licenses_in_category(store: &ReportStore, category: &str) -> String {
    let findings = store.list_findings(category);
    if findings.is_empty() {
        return format!("No licenses found in category '{}'.", category);
    }
    bullet_list(
        format!("Licenses in category '{}' ({}):", category, findings.len()),
        findings
            .iter()
            .map(|f| format!("{} in {}", finding_line(f), f.file)),
    )
}

pub fn get_files_by_license(store: &ReportStore, license_name: &str) -> String {
    let findings = store.find_by_license_name(license_name);
    if findings.is_empty() {
        return format!("No files found with licenses matching '{}'.", license_name);
    }
    bullet_list(
        format!("Files with licenses matching '{}' ({}):", license_name, findings.len()),
        findings
            .iter()
            .map(|f| format!("{} [{}]", f.file, finding_line(f))),
    )
}

pub fn check_file_licenses(store: &ReportStore, file_path: &str) -> String {
    let findings = store.find_by_file_path(file_path);
    if findings.is_empty() {
        return format!("No license findings for files matching '{}'.", file_path);
    }
    bullet_list(
        format!("Licenses for files matching '{}' ({}):", file_path, findings.len()),
        findings
            .iter()
            .map(|f| format!("{}: {}", f.file, finding_line(f))),
    )
}

pub fn list_scan_issues(store: &ReportStore) -> String {
    let issues = store.list_scan_issues();
    if issues.is_empty() {
        return "No scan issues recorded in the report.".to_string();
    }
    bullet_list(
        format!("Scan issues ({}):", issues.len()),
        issues
            .iter()
            .map(|i| format!("[{}] {}: {}", i.kind, i.file, i.details.join("; "))),
    )
}

pub fn get_recommendations(store: &ReportStore) -> String {
    let recs = store.list_recommendations();
    if recs.is_empty() {
        return "No recommendations recorded in the report.".to_string();
    }
    bullet_list(
        format!("Recommendations ({}):", recs.len()),
        recs.iter().map(|r| {
            format!(
                "[{}] {}: {} (affected files: {})",
                r.severity.to_uppercase(),
                r.category,
                r.message,
                r.affected_display()
            )
        }),
    )
}

pub fn list_files_for_analysis(store: &ReportStore) -> String {
    let files = store.unique_files_with_findings();
    if files.is_empty() {
        return "No files need license review.".to_string();
    }
    bullet_list(format!("Files needing license review ({}):", files.len()), files)
}

/// Every license in the report with the files it was found in.
pub fn summarize_license_risks(store: &ReportStore) -> String {
    let mut licenses: Vec<(&str, BTreeSet<&str>)> = Vec::new();
    for category in store.list_categories() {
        for finding in store.list_findings(category) {
            match licenses.iter_mut().find(|(name, _)| *name == finding.name) {
                Some((_, files)) => {
                    files.insert(finding.file.as_str());
                }
                None => licenses.push((
                    finding.name.as_str(),
                    BTreeSet::from([finding.file.as_str()]),
                )),
            }
        }
    }

    if licenses.is_empty() {
        return "No license findings in the report.".to_string();
    }

    let mut out = format!("License risk summary ({} licenses):", licenses.len());
    for (name, files) in &licenses {
        out.push_str(&format!(
            "\n\n{}\n  Summary: {}\n  Files ({}): {}",
            name,
            summarize(name, true),
            files.len(),
            files.iter().copied().collect::<Vec<_>>().join(", ")
        ));
    }
    out
}

pub fn list_high_risk_files(store: &ReportStore) -> String {
    let hits = store.filter_by_categories(HIGH_RISK_CATEGORIES);
    if hits.is_empty() {
        return format!(
            "No high-risk files found (checked: {}).",
            HIGH_RISK_CATEGORIES.join(", ")
        );
    }
    bullet_list(
        format!(
            "High-risk files ({} findings in {}):",
            hits.len(),
            HIGH_RISK_CATEGORIES.join(", ")
        ),
        hits.iter().map(|(category, f)| {
            format!(
                "[{}] {}: {}. {}",
                category,
                f.file,
                finding_line(f),
                summarize(&f.name, true)
            )
        }),
    )
}

pub fn get_license_clause_summary(license_name: &str) -> String {
    format!("{}\n\n{}", license_name, summarize(license_name, false))
}

pub fn compare_license_compatibility(license_a: &str, license_b: &str) -> String {
    format!(
        "{} + {}\n\n{}",
        license_a,
        license_b,
        compatibility_verdict(license_a, license_b)
    )
}

fn findings_block(store: &ReportStore, report_path: &str) -> String {
    let findings = store.find_exact_file(report_path);
    if findings.is_empty() {
        return "No license findings recorded for this path.".to_string();
    }
    findings
        .iter()
        .map(|f| format!("- {}: {}", finding_line(f), summarize(&f.name, true)))
        .collect::<Vec<_>>()
        .join("\n")
}

async fn analyze_one(store: &ReportStore, raw: &str, base: &Path, lines_to_read: usize) -> String {
    let resolved = files::resolve(raw, base);
    let report_path = files::report_path(&resolved, base);
    let licenses = findings_block(store, &report_path);

    let body = match files::read_lines(&resolved, lines_to_read).await {
        Ok(lines) => format!("First {} lines:\n{}", lines.len(), lines.join("\n")),
        Err(e) => format!("Error: could not read {}: {}", resolved.display(), e),
    };

    format!(
        "File: {}\nReport path: {}\nLicenses in report:\n{}\n\n{}",
        raw, report_path, licenses, body
    )
}

/// Snippet and known licenses for each requested file. Reads run concurrently.
pub async fn analyze_license_file(
    store: &ReportStore,
    file_paths: &[String],
    base: &Path,
    lines_to_read: usize,
) -> String {
    if file_paths.is_empty() {
        return "No file paths provided.".to_string();
    }

    let sections = join_all(
        file_paths
            .iter()
            .map(|p| analyze_one(store, p, base, lines_to_read)),
    )
    .await;

    sections.join("\n\n---\n\n")
}

/// Full content of one file plus the findings recorded for its exact path.
pub async fn generate_file_report(store: &ReportStore, file_path: &str, base: &Path) -> String {
    let resolved = files::resolve(file_path, base);
    let report_path = files::report_path(&resolved, base);
    let licenses = findings_block(store, &report_path);

    let content = match files::read_all(&resolved).await {
        Ok(content) => format!("File content:\n{}", content),
        Err(e) => format!("Error: could not read {}: {}", resolved.display(), e),
    };

    format!(
        "License report for: {}\nResolved path: {}\nReport path: {}\n\nLicense findings:\n{}\n\n{}",
        file_path,
        resolved.display(),
        report_path,
        licenses,
        content
    )
}
