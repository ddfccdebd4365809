//! Builds a [`LicenseReport`] from ScanCode JSON output.
//!
//! Three license sources are read per file: `detected_license_expression`,
//! `license_detections` (current ScanCode) and `licenses` (pre-v32 output).

use std::collections::{BTreeMap, HashSet};
use std::path::Path;

use serde::Deserialize;

use crate::error::ReportError;
use crate::models::{
    Categories, LicenseCategory, LicenseFinding, LicenseReport, Recommendation, ReportMetadata,
    ScanIssue, Severity,
};

/// Below this score a detection is reported as a scan issue.
const ISSUE_SCORE: f64 = 50.0;
/// Below this score a detection lands in the `low_confidence` category.
const LOW_CONFIDENCE_SCORE: f64 = 70.0;

/// Problem categories in report order with the license-key fragments that
/// place a detection in them.
const CATEGORY_PATTERNS: &[(&str, &[&str])] = &[
    ("copyleft", &["gpl-2.0", "gpl-3.0", "lgpl-2.1", "lgpl-3.0", "agpl-3.0"]),
    ("gpl", &["gpl-2.0", "gpl-3.0", "gpl-2.0-plus", "gpl-3.0-plus"]),
    ("agpl", &["agpl-3.0", "gpl-3.0-plus"]),
    ("commercial_unfriendly", &["gpl-2.0", "gpl-3.0", "agpl-3.0", "cc-by-sa-4.0"]),
    (
        "unknown",
        &["unknown", "other-permissive", "other-copyleft", "unknown-license-reference"],
    ),
];

const LOW_CONFIDENCE: &str = "low_confidence";

#[derive(Debug, Default, Deserialize)]
pub struct ScanCodeResults {
    #[serde(default)]
    pub files: Vec<ScanFile>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ScanFile {
    #[serde(default = "unknown_path")]
    pub path: String,
    #[serde(default)]
    pub scan_errors: Vec<String>,
    #[serde(default)]
    pub detected_license_expression: Option<String>,
    #[serde(default)]
    pub license_detections: Vec<LicenseDetection>,
    #[serde(default)]
    pub licenses: Vec<LegacyLicense>,
}

fn unknown_path() -> String {
    "Unknown".to_string()
}

#[derive(Debug, Default, Deserialize)]
pub struct LicenseDetection {
    #[serde(default)]
    pub license_expression: Option<String>,
    #[serde(default)]
    pub license_expression_spdx: Option<String>,
    #[serde(default)]
    pub matches: Vec<DetectionMatch>,
}

#[derive(Debug, Default, Deserialize)]
pub struct DetectionMatch {
    #[serde(default)]
    pub score: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
pub struct LegacyLicense {
    #[serde(default)]
    pub key: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub score: Option<f64>,
}

/// One license extracted from a scanned file.
#[derive(Debug, Clone, PartialEq)]
pub struct Detection {
    pub key: String,
    pub name: String,
    pub score: f64,
}

/// Read ScanCode output from disk.
pub fn read_results(path: &Path) -> Result<ScanCodeResults, ReportError> {
    let content = std::fs::read_to_string(path)
        .map_err(|source| ReportError::Read { path: path.to_path_buf(), source })?;
    serde_json::from_str(&content)
        .map_err(|source| ReportError::Parse { path: path.to_path_buf(), source })
}

/// Every license ScanCode recorded for a file, in source order.
pub fn extract_licenses(file: &ScanFile) -> Vec<Detection> {
    let mut out = Vec::new();

    if let Some(expr) = file.detected_license_expression.as_deref().filter(|e| !e.is_empty()) {
        out.push(Detection { key: expr.to_string(), name: expr.to_string(), score: 100.0 });
    }

    for detection in &file.license_detections {
        let key = detection
            .license_expression
            .as_deref()
            .filter(|e| !e.is_empty())
            .or(detection.license_expression_spdx.as_deref().filter(|e| !e.is_empty()))
            .unwrap_or("unknown")
            .to_string();
        let score = detection
            .matches
            .iter()
            .map(|m| m.score.unwrap_or(100.0))
            .reduce(f64::max)
            .unwrap_or(100.0);
        out.push(Detection { name: key.clone(), key, score });
    }

    for license in &file.licenses {
        let key = license.key.clone().unwrap_or_else(|| "unknown".to_string());
        let name = license.name.clone().unwrap_or_else(|| key.clone());
        out.push(Detection { key, name, score: license.score.unwrap_or(100.0) });
    }

    out
}

/// A score as ScanCode writes it: floats keep their fractional part (`40.0`).
fn json_score(score: f64) -> String {
    if score.is_finite() && score.fract() == 0.0 {
        format!("{:.1}", score)
    } else {
        score.to_string()
    }
}

/// Accumulates per-file results into report sections.
pub struct ReportBuilder {
    total_files: usize,
    scan_issues: Vec<ScanIssue>,
    statistics: BTreeMap<String, usize>,
    categories: Vec<LicenseCategory>,
    seen: Vec<HashSet<(String, String, u64)>>,
}

impl ReportBuilder {
    pub fn new() -> Self {
        let names = CATEGORY_PATTERNS
            .iter()
            .map(|(name, _)| *name)
            .chain(std::iter::once(LOW_CONFIDENCE));
        let categories: Vec<LicenseCategory> = names
            .map(|name| LicenseCategory { name: name.to_string(), findings: Vec::new() })
            .collect();
        let seen = vec![HashSet::new(); categories.len()];

        Self {
            total_files: 0,
            scan_issues: Vec::new(),
            statistics: BTreeMap::new(),
            categories,
            seen,
        }
    }

    pub fn add_file(&mut self, file: &ScanFile) {
        self.total_files += 1;

        if !file.scan_errors.is_empty() {
            self.scan_issues.push(ScanIssue {
                file: file.path.clone(),
                kind: "scan_error".to_string(),
                details: file.scan_errors.clone(),
            });
        }

        for detection in extract_licenses(file) {
            if detection.score < ISSUE_SCORE {
                self.scan_issues.push(ScanIssue {
                    file: file.path.clone(),
                    kind: "low_confidence_license".to_string(),
                    details: vec![format!(
                        "License: {}, Score: {}",
                        detection.key,
                        json_score(detection.score)
                    )],
                });
            }

            *self.statistics.entry(detection.key.clone()).or_insert(0) += 1;
            self.categorize(&file.path, &detection);
        }
    }

    fn categorize(&mut self, file: &str, detection: &Detection) {
        let lower = detection.key.to_lowercase();

        for (idx, (_, patterns)) in CATEGORY_PATTERNS.iter().enumerate() {
            if patterns.iter().any(|p| lower.contains(p)) {
                self.push_unique(idx, file, detection);
            }
        }

        if detection.score < LOW_CONFIDENCE_SCORE {
            self.push_unique(self.categories.len() - 1, file, detection);
        }
    }

    fn push_unique(&mut self, idx: usize, file: &str, detection: &Detection) {
        let key = (file.to_string(), detection.key.clone(), detection.score.to_bits());
        if self.seen[idx].insert(key) {
            self.categories[idx].findings.push(LicenseFinding {
                name: detection.key.clone(),
                file: file.to_string(),
                score: detection.score,
            });
        }
    }

    pub fn finish(self, source_file: &str, analysis_date: &str) -> LicenseReport {
        let categories = Categories(self.categories);
        let recommendations = recommendations_for(&categories);

        LicenseReport {
            metadata: Some(ReportMetadata {
                source_file: source_file.to_string(),
                analysis_date: analysis_date.to_string(),
                total_files: self.total_files,
                total_licenses: self.statistics.len(),
                total_license_detections: self.statistics.values().sum(),
            }),
            license_statistics: self.statistics,
            problematic_licenses: categories,
            scan_issues: self.scan_issues,
            recommendations,
        }
    }
}

impl Default for ReportBuilder {
    fn default() -> Self {
        Self::new()
    }
}

fn recommendations_for(categories: &Categories) -> Vec<Recommendation> {
    let rules = [
        (
            "gpl",
            Severity::High,
            "GPL licenses detected. Review compatibility with your project license.",
        ),
        (
            "agpl",
            Severity::Critical,
            "AGPL licenses detected. Network copyleft requirements apply.",
        ),
        (
            "unknown",
            Severity::Medium,
            "Unknown licenses detected. Manual review required.",
        ),
    ];

    rules
        .iter()
        .filter_map(|(category, severity, message)| {
            let count = categories
                .as_slice()
                .iter()
                .find(|c| c.name == *category)
                .map(|c| c.findings.len())
                .unwrap_or(0);
            (count > 0).then(|| Recommendation {
                severity: severity.to_string(),
                category: category.to_string(),
                message: message.to_string(),
                affected_files: serde_json::json!(count),
            })
        })
        .collect()
}
