//! Assertions over reports and usage for test suites.

use crate::report::{dirty_reports, unused_elements, Report, UsageCategory, UsageReport};

const NOT_SUPPORTED: &str = "'Not' not supported.";

/// Outcome of a matcher; `message` explains a failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchResult {
    pub pass: bool,
    pub message: String,
}

impl MatchResult {
    fn from_message(message: String) -> Self {
        Self {
            pass: message.is_empty(),
            message,
        }
    }

    pub fn into_result(self) -> Result<(), String> {
        if self.pass {
            Ok(())
        } else {
            Err(self.message)
        }
    }
}

pub trait Matcher<T: ?Sized> {
    fn compare(&self, actual: Option<&T>) -> MatchResult;

    /// Negated matching is not supported by any matcher.
    fn negative_compare(&self, _actual: Option<&T>) -> MatchResult {
        MatchResult {
            pass: false,
            message: NOT_SUPPORTED.to_string(),
        }
    }
}

/// Passes when no report carries a violation.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoViolations;

impl Matcher<[Report]> for NoViolations {
    fn compare(&self, actual: Option<&[Report]>) -> MatchResult {
        MatchResult::from_message(dirty_reports(actual))
    }
}

/// Passes when every element of the selected categories was exercised.
#[derive(Debug, Clone)]
pub struct FullyUsed {
    pub categories: Vec<UsageCategory>,
}

impl Default for FullyUsed {
    fn default() -> Self {
        Self {
            categories: UsageCategory::ALL.to_vec(),
        }
    }
}

impl FullyUsed {
    pub fn only(categories: &[UsageCategory]) -> Self {
        Self {
            categories: categories.to_vec(),
        }
    }
}

impl Matcher<UsageReport> for FullyUsed {
    fn compare(&self, actual: Option<&UsageReport>) -> MatchResult {
        let Some(usage) = actual else {
            return MatchResult {
                pass: false,
                message: "Expected full usage, but not a single request registered.".to_string(),
            };
        };
        let unused = unused_elements(usage, &self.categories);
        if unused.is_empty() {
            MatchResult::from_message(unused)
        } else {
            MatchResult::from_message(format!(
                "\nExpected no unused elements, but found these:\n{}",
                unused
            ))
        }
    }
}

/// Panics with the violation diagnostic if any report is dirty.
#[track_caller]
pub fn assert_no_violations(reports: &[Report]) {
    if let Err(message) = NoViolations.compare(Some(reports)).into_result() {
        panic!("{}", message);
    }
}

/// Panics listing unused elements of all categories.
#[track_caller]
pub fn assert_fully_used(usage: Option<&UsageReport>) {
    if let Err(message) = FullyUsed::default().compare(usage).into_result() {
        panic!("{}", message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::UsagePayload;
    use serde_json::json;

    fn usage(unused: serde_json::Value) -> UsageReport {
        serde_json::from_value(json!({ "unused": unused })).unwrap()
    }

    fn report(violation: Option<&str>) -> Report {
        serde_json::from_value(json!({
            "request": "GET /",
            "requestViolations": violation.into_iter().collect::<Vec<_>>(),
            "responseViolations": [],
        }))
        .unwrap()
    }

    #[test]
    fn clean_reports_pass() {
        let result = NoViolations.compare(Some(&[report(None)][..]));
        assert!(result.pass);
        assert_eq!(result.message, "");
    }

    #[test]
    fn missing_reports_pass() {
        assert!(NoViolations.compare(None).pass);
    }

    #[test]
    fn dirty_reports_fail_with_diagnostic() {
        let result = NoViolations.compare(Some(&[report(None), report(Some("X"))][..]));
        assert!(!result.pass);
        assert!(result.message.contains("Request number 2"));
        assert!(result.message.contains("[\"X\"]"));
    }

    #[test]
    fn negation_is_unsupported() {
        let result = NoViolations.negative_compare(None);
        assert!(!result.pass);
        assert_eq!(result.message, "'Not' not supported.");
    }

    #[test]
    fn no_usage_means_no_requests() {
        let result = FullyUsed::default().compare(None);
        assert!(!result.pass);
        assert_eq!(result.message, "Expected full usage, but not a single request registered.");
    }

    #[test]
    fn unused_elements_fail() {
        let result = FullyUsed::default().compare(Some(&usage(json!({"resources": ["/a"]}))));
        assert!(!result.pass);
        assert_eq!(
            result.message,
            "\nExpected no unused elements, but found these:\n  resources: [\"/a\"]\n"
        );
    }

    #[test]
    fn server_spelled_categories_fail() {
        let payload: UsagePayload = serde_json::from_value(json!({
            "api.raml": {"unused": {"request headers": ["X-Token"], "response codes": ["404"]}}
        }))
        .unwrap();
        let UsagePayload::ByRaml(map) = payload else {
            panic!("expected usage keyed by RAML");
        };
        let result = FullyUsed::default().compare(map.get("api.raml"));
        assert!(!result.pass);
        assert!(result.message.contains("  requestHeaders: [\"X-Token\"]\n"));
        assert!(result.message.contains("  responseCodes: [\"404\"]\n"));
    }

    #[test]
    fn fully_used_when_nothing_listed() {
        let result = FullyUsed::default().compare(Some(&usage(json!({}))));
        assert!(result.pass);
    }

    #[test]
    fn category_filter_ignores_others() {
        let matcher = FullyUsed::only(&[UsageCategory::Actions]);
        assert!(matcher.compare(Some(&usage(json!({"resources": ["/a"]})))).pass);
    }

    #[test]
    #[should_panic(expected = "Request number 1")]
    fn assert_no_violations_panics() {
        assert_no_violations(&[report(Some("bad"))]);
    }

    #[test]
    fn assert_fully_used_accepts_clean_usage() {
        assert_fully_used(Some(&usage(json!({}))));
    }
}
