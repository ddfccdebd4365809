//! Read-only query engine over a loaded [`LicenseReport`].
//!
//! The store starts empty and is filled exactly once by [`ReportStore::install`],
//! usually from a background task. Until then every query answers as if the
//! report had no data.

use std::collections::BTreeSet;
use std::path::Path;
use std::sync::OnceLock;

use tracing::{info, warn};

use crate::error::ReportError;
use crate::models::{LicenseCategory, LicenseFinding, LicenseReport, Recommendation, ScanIssue};

/// Categories inspected by `list_high_risk_files`.
pub const HIGH_RISK_CATEGORIES: &[&str] =
    &["copyleft", "unknown", "commercial_unfriendly", "gpl", "agpl"];

/// Read and decode a report file.
pub async fn read_report(path: &Path) -> Result<LicenseReport, ReportError> {
    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| ReportError::Read { path: path.to_path_buf(), source })?;
    serde_json::from_str(&content)
        .map_err(|source| ReportError::Parse { path: path.to_path_buf(), source })
}

/// Load a report, degrading to an empty one on any failure.
pub async fn load_report(path: &Path) -> LicenseReport {
    match read_report(path).await {
        Ok(report) => {
            info!(
                path = %path.display(),
                categories = report.problematic_licenses.as_slice().len(),
                issues = report.scan_issues.len(),
                "license report loaded"
            );
            report
        }
        Err(e) => {
            warn!(error = %e, "license report unavailable, serving empty report");
            LicenseReport::default()
        }
    }
}

#[derive(Debug, Default)]
pub struct ReportStore {
    report: OnceLock<LicenseReport>,
}

impl ReportStore {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub fn with_report(report: LicenseReport) -> Self {
        let store = Self::new();
        store.install(report);
        store
    }

    /// Install the report. Only the first call has any effect.
    pub fn install(&self, report: LicenseReport) -> bool {
        self.report.set(report).is_ok()
    }

    pub fn is_loaded(&self) -> bool {
        self.report.get().is_some()
    }

    fn categories(&self) -> &[LicenseCategory] {
        self.report
            .get()
            .map(|r| r.problematic_licenses.as_slice())
            .unwrap_or(&[])
    }

    fn all_findings(&self) -> impl Iterator<Item = &LicenseFinding> {
        self.categories().iter().flat_map(|c| c.findings.iter())
    }

    pub fn list_categories(&self) -> Vec<&str> {
        self.categories().iter().map(|c| c.name.as_str()).collect()
    }

    pub fn list_findings(&self, category: &str) -> &[LicenseFinding] {
        self.categories()
            .iter()
            .find(|c| c.name == category)
            .map(|c| c.findings.as_slice())
            .unwrap_or(&[])
    }

    /// Case-insensitive substring match on the license name, across every category.
    pub fn find_by_license_name(&self, needle: &str) -> Vec<&LicenseFinding> {
        let needle = needle.to_lowercase();
        self.all_findings()
            .filter(|f| f.name.to_lowercase().contains(&needle))
            .collect()
    }

    /// Case-insensitive substring match on the stored file path.
    pub fn find_by_file_path(&self, needle: &str) -> Vec<&LicenseFinding> {
        let needle = needle.to_lowercase();
        self.all_findings()
            .filter(|f| f.file.to_lowercase().contains(&needle))
            .collect()
    }

    /// Case-insensitive exact match on the stored file path.
    ///
    /// Stored paths are relative with forward slashes; callers normalize first.
    pub fn find_exact_file(&self, path: &str) -> Vec<&LicenseFinding> {
        let path = path.to_lowercase();
        self.all_findings()
            .filter(|f| f.file.to_lowercase() == path)
            .collect()
    }

    pub fn list_scan_issues(&self) -> &[ScanIssue] {
        self.report
            .get()
            .map(|r| r.scan_issues.as_slice())
            .unwrap_or(&[])
    }

    pub fn list_recommendations(&self) -> &[Recommendation] {
        self.report
            .get()
            .map(|r| r.recommendations.as_slice())
            .unwrap_or(&[])
    }

    pub fn unique_files_with_findings(&self) -> BTreeSet<&str> {
        self.all_findings().map(|f| f.file.as_str()).collect()
    }

    /// Findings of the named categories, in the report's category order.
    /// Names absent from the report are skipped.
    pub fn filter_by_categories(&self, names: &[&str]) -> Vec<(&str, &LicenseFinding)> {
        self.categories()
            .iter()
            .filter(|c| names.contains(&c.name.as_str()))
            .flat_map(|c| c.findings.iter().map(move |f| (c.name.as_str(), f)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Categories;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn finding(name: &str, file: &str, score: f64) -> LicenseFinding {
        LicenseFinding { name: name.into(), file: file.into(), score }
    }

    fn sample_store() -> ReportStore {
        let report = LicenseReport {
            problematic_licenses: Categories(vec![
                LicenseCategory {
                    name: "gpl".into(),
                    findings: vec![finding("GPL-3.0", "a.txt", 80.0)],
                },
                LicenseCategory {
                    name: "copyleft".into(),
                    findings: vec![
                        finding("GPL-3.0", "a.txt", 80.0),
                        finding("LGPL-2.1", "src/lib/b.c", 95.0),
                    ],
                },
                LicenseCategory {
                    name: "permissive".into(),
                    findings: vec![finding("MIT", "vendor/c.js", 100.0)],
                },
            ]),
            ..LicenseReport::default()
        };
        ReportStore::with_report(report)
    }

    #[test]
    fn test_single_category() {
        let report = LicenseReport {
            problematic_licenses: Categories(vec![LicenseCategory {
                name: "gpl".into(),
                findings: vec![finding("GPL-3.0", "a.txt", 80.0)],
            }]),
            ..LicenseReport::default()
        };
        let store = ReportStore::with_report(report);
        assert_eq!(store.list_categories(), vec!["gpl"]);
        let files: Vec<_> = store.find_by_license_name("gpl").into_iter().map(|f| f.file.as_str()).collect();
        assert_eq!(files, vec!["a.txt"]);
        assert!(store.find_by_license_name("mit").is_empty());
        assert_eq!(store.find_by_file_path("A.TXT").len(), 1);
    }

    #[test]
    fn test_list_findings_absent_category() {
        let store = sample_store();
        assert_eq!(store.list_findings("copyleft").len(), 2);
        assert!(store.list_findings("agpl").is_empty());
    }

    #[test]
    fn test_license_name_matches_across_categories() {
        let store = sample_store();
        // GPL-3.0 twice (gpl + copyleft) and LGPL-2.1 once
        assert_eq!(store.find_by_license_name("GPL").len(), 3);
    }

    #[test]
    fn test_exact_file_is_not_substring() {
        let store = sample_store();
        assert!(store.find_exact_file("lib/b.c").is_empty());
        assert_eq!(store.find_exact_file("SRC/LIB/B.C").len(), 1);
        assert_eq!(store.find_by_file_path("lib/b").len(), 1);
    }

    #[test]
    fn test_unique_files_counted_once() {
        let store = sample_store();
        let files = store.unique_files_with_findings();
        assert_eq!(files.len(), 3);
        assert!(files.contains("a.txt"));
    }

    #[test]
    fn test_filter_by_high_risk_categories() {
        let store = sample_store();
        let hits = store.filter_by_categories(HIGH_RISK_CATEGORIES);
        assert_eq!(hits.len(), 3);
        assert!(hits.iter().all(|(category, _)| *category != "permissive"));
        assert!(hits.iter().all(|(_, f)| f.name != "MIT"));
    }

    #[test]
    fn test_unloaded_store_is_empty() {
        let store = ReportStore::new();
        assert!(!store.is_loaded());
        assert!(store.list_categories().is_empty());
        assert!(store.find_by_license_name("gpl").is_empty());
        assert!(store.find_exact_file("a.txt").is_empty());
        assert!(store.list_scan_issues().is_empty());
        assert!(store.list_recommendations().is_empty());
        assert!(store.unique_files_with_findings().is_empty());
        assert!(store.filter_by_categories(HIGH_RISK_CATEGORIES).is_empty());
    }

    #[test]
    fn test_install_only_once() {
        let store = sample_store();
        assert!(!store.install(LicenseReport::default()));
        assert_eq!(store.list_categories().len(), 3);
    }

    #[tokio::test]
    async fn test_load_missing_file_gives_empty_report() {
        let report = load_report(Path::new("/definitely/not/here/report.json")).await;
        assert!(report.problematic_licenses.as_slice().is_empty());
        assert!(report.scan_issues.is_empty());
    }

    #[tokio::test]
    async fn test_load_malformed_file_gives_empty_report() {
        let mut f = NamedTempFile::new().unwrap();
        write!(f, "{{ not json").unwrap();
        assert!(read_report(f.path()).await.is_err());
        let report = load_report(f.path()).await;
        assert!(report.recommendations.is_empty());
    }

    #[tokio::test]
    async fn test_load_valid_file() {
        let mut f = NamedTempFile::new().unwrap();
        write!(
            f,
            r#"{{"problematic_licenses": {{"gpl": [{{"name": "GPL-3.0", "file": "a.txt", "score": 80}}]}},
                "scan_issues": [], "recommendations": []}}"#
        )
        .unwrap();
        let store = ReportStore::with_report(load_report(f.path()).await);
        assert_eq!(store.list_categories(), vec!["gpl"]);
    }
}
