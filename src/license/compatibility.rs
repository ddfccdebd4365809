/// Condition under which a canned verdict applies.
enum Condition {
    /// One license mentions the first keyword and the other the second.
    Pair(&'static str, &'static str),
    /// Either license mentions the keyword.
    Either(&'static str),
}

impl Condition {
    fn matches(&self, a: &str, b: &str) -> bool {
        match self {
            Condition::Pair(x, y) => {
                (a.contains(*x) && b.contains(*y)) || (a.contains(*y) && b.contains(*x))
            }
            Condition::Either(k) => a.contains(*k) || b.contains(*k),
        }
    }
}

/// Evaluated in order; the first matching rule wins.
const VERDICTS: &[(Condition, &str)] = &[
    (
        Condition::Pair("mit", "gpl"),
        "Compatible in one direction: MIT-licensed code can be incorporated into a GPL \
         project, but the combined work must be distributed under the GPL. GPL code cannot \
         be relicensed under MIT.",
    ),
    (
        Condition::Pair("mit", "apache"),
        "Compatible: MIT and Apache-2.0 are both permissive. The combined work may be \
         distributed under Apache-2.0; keep the MIT copyright notice and any Apache NOTICE \
         file.",
    ),
    (
        Condition::Pair("gpl", "apache"),
        "Conditionally compatible: Apache-2.0 code may be combined with GPL-3.0 code, with \
         the result distributed under GPL-3.0. Apache-2.0 is NOT compatible with GPL-2.0-only \
         because of its patent termination and indemnification terms.",
    ),
    (
        Condition::Either("proprietary"),
        "Restricted: combining proprietary code with other licenses depends on the vendor \
         agreement. Copyleft licenses generally cannot be combined with proprietary code \
         that is distributed. Obtain legal review.",
    ),
    (
        Condition::Either("unknown"),
        "Cannot determine: at least one license is unknown. Identify the license before \
         combining the code.",
    ),
];

const FALLBACK: &str = "No specific compatibility rule for this pair. Review both license \
                        texts; legal review is recommended before combining the code.";

/// Canned verdict for combining code under `license_a` and `license_b`.
///
/// The argument order never changes which rule fires.
pub fn compatibility_verdict(license_a: &str, license_b: &str) -> String {
    let a = license_a.to_lowercase();
    let b = license_b.to_lowercase();

    if a == b {
        return format!("Compatible: both components use {}.", license_a);
    }

    VERDICTS
        .iter()
        .find(|(condition, _)| condition.matches(&a, &b))
        .map(|(_, verdict)| verdict.to_string())
        .unwrap_or_else(|| FALLBACK.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symmetric() {
        let pairs = [
            ("MIT", "GPL-3.0"),
            ("Apache-2.0", "MIT"),
            ("GPL-2.0", "Apache-2.0"),
            ("Proprietary", "BSD-3-Clause"),
            ("unknown", "MIT"),
            ("Zlib", "ISC"),
        ];
        for (a, b) in pairs {
            assert_eq!(compatibility_verdict(a, b), compatibility_verdict(b, a), "{a} / {b}");
        }
    }

    #[test]
    fn test_same_license_case_insensitive() {
        let verdict = compatibility_verdict("MIT", "mit");
        assert!(verdict.starts_with("Compatible: both"));
        assert!(verdict.contains("MIT"));
    }

    #[test]
    fn test_mit_gpl_one_direction() {
        assert!(compatibility_verdict("MIT", "GPL-3.0").contains("one direction"));
    }

    #[test]
    fn test_gpl_apache() {
        assert!(compatibility_verdict("Apache-2.0", "GPL-2.0").contains("GPL-2.0-only"));
    }

    #[test]
    fn test_rule_order_pair_before_either() {
        // "unknown" is present, but the mit+apache pair is tested first
        let verdict = compatibility_verdict("MIT (unknown version)", "Apache-2.0");
        assert!(verdict.starts_with("Compatible: MIT and Apache"));
    }

    #[test]
    fn test_proprietary_and_unknown() {
        assert!(compatibility_verdict("proprietary", "unknown").starts_with("Restricted"));
        assert!(compatibility_verdict("unknown", "ISC").starts_with("Cannot determine"));
    }

    #[test]
    fn test_fallback() {
        assert_eq!(compatibility_verdict("Zlib", "ISC"), FALLBACK);
    }
}
