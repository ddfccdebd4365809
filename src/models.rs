use std::collections::BTreeMap;
use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A license report as written by `build` (or an external scanner).
///
/// Every top-level key is optional; a present key with the wrong shape
/// fails the whole document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LicenseReport {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<ReportMetadata>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub license_statistics: BTreeMap<String, usize>,
    #[serde(default)]
    pub problematic_licenses: Categories,
    #[serde(default)]
    pub scan_issues: Vec<ScanIssue>,
    #[serde(default)]
    pub recommendations: Vec<Recommendation>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMetadata {
    pub source_file: String,
    pub analysis_date: String,
    pub total_files: usize,
    pub total_licenses: usize,
    pub total_license_detections: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LicenseFinding {
    pub name: String,
    pub file: String,
    pub score: f64,
}

impl LicenseFinding {
    /// Score without a trailing `.0` for whole numbers.
    pub fn score_display(&self) -> String {
        if self.score.fract() == 0.0 && self.score.is_finite() {
            format!("{}", self.score as i64)
        } else {
            format!("{:.2}", self.score)
        }
    }
}

/// One named group of findings, e.g. `gpl` or `unknown`.
#[derive(Debug, Clone, PartialEq)]
pub struct LicenseCategory {
    pub name: String,
    pub findings: Vec<LicenseFinding>,
}

/// Category map that keeps the key order of the JSON document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Categories(pub Vec<LicenseCategory>);

impl Categories {
    pub fn as_slice(&self) -> &[LicenseCategory] {
        &self.0
    }
}

impl Serialize for Categories {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for category in &self.0 {
            map.serialize_entry(&category.name, &category.findings)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Categories {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct CategoriesVisitor;

        impl<'de> Visitor<'de> for CategoriesVisitor {
            type Value = Categories;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of category name to license findings")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Categories, A::Error> {
                let mut categories = Vec::with_capacity(access.size_hint().unwrap_or(0));
                while let Some((name, findings)) =
                    access.next_entry::<String, Vec<LicenseFinding>>()?
                {
                    categories.push(LicenseCategory { name, findings });
                }
                Ok(Categories(categories))
            }
        }

        deserializer.deserialize_map(CategoriesVisitor)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanIssue {
    pub file: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(deserialize_with = "one_or_many")]
    pub details: Vec<String>,
}

/// Older reports store a single string for low-confidence issue details.
fn one_or_many<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(String),
        Many(Vec<String>),
    }

    Ok(match OneOrMany::deserialize(deserializer)? {
        OneOrMany::One(detail) => vec![detail],
        OneOrMany::Many(details) => details,
    })
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub severity: String,
    pub category: String,
    pub message: String,
    pub affected_files: serde_json::Value,
}

impl Recommendation {
    pub fn affected_display(&self) -> String {
        match &self.affected_files {
            serde_json::Value::String(s) => s.clone(),
            serde_json::Value::Array(items) => items
                .iter()
                .map(|v| v.as_str().map(str::to_string).unwrap_or_else(|| v.to_string()))
                .collect::<Vec<_>>()
                .join(", "),
            serde_json::Value::Null => "n/a".to_string(),
            other => other.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    /// Lenient parse of the free-form `severity` string in a report.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "low" => Some(Severity::Low),
            "medium" => Some(Severity::Medium),
            "high" => Some(Severity::High),
            "critical" => Some(Severity::Critical),
            _ => None,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Low => write!(f, "low"),
            Severity::Medium => write!(f, "medium"),
            Severity::High => write!(f, "high"),
            Severity::Critical => write!(f, "critical"),
        }
    }
}
