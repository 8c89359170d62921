//! Typed report and usage payloads, and their human-readable rendering.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Maximum length of a single rendered field.
const MAX_FIELD_LEN: usize = 400;

/// One recorded request/response pair as reported by the server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    #[serde(default)]
    pub request: Value,
    #[serde(default, alias = "request headers")]
    pub request_headers: Value,
    #[serde(alias = "request violations")]
    pub request_violations: Vec<String>,
    #[serde(default)]
    pub response: Value,
    #[serde(default, alias = "response headers")]
    pub response_headers: Value,
    #[serde(alias = "response violations")]
    pub response_violations: Vec<String>,
}

impl Report {
    pub fn has_violations(&self) -> bool {
        !self.request_violations.is_empty() || !self.response_violations.is_empty()
    }
}

/// Report fields that can be rendered into a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportField {
    Request,
    RequestHeaders,
    RequestViolations,
    ResponseViolations,
}

impl ReportField {
    pub fn name(self) -> &'static str {
        match self {
            ReportField::Request => "request",
            ReportField::RequestHeaders => "requestHeaders",
            ReportField::RequestViolations => "requestViolations",
            ReportField::ResponseViolations => "responseViolations",
        }
    }

    fn to_json(self, report: &Report) -> String {
        match self {
            ReportField::Request => json(&report.request),
            ReportField::RequestHeaders => json(&report.request_headers),
            ReportField::RequestViolations => json(&report.request_violations),
            ReportField::ResponseViolations => json(&report.response_violations),
        }
    }
}

/// Server reply to `reports`: either a plain list, or lists keyed by RAML.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ReportsPayload {
    List(Vec<Report>),
    ByRaml(serde_json::Map<String, Value>),
}

impl ReportsPayload {
    /// Flattens the payload into one list, keeping server order.
    pub fn into_reports(self) -> Result<Vec<Report>, serde_json::Error> {
        match self {
            ReportsPayload::List(reports) => Ok(reports),
            ReportsPayload::ByRaml(map) => {
                let mut reports = Vec::new();
                for (_, list) in map {
                    reports.extend(serde_json::from_value::<Vec<Report>>(list)?);
                }
                Ok(reports)
            }
        }
    }
}

/// Elements of a RAML definition that can go unused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UsageCategory {
    Resources,
    Actions,
    RequestHeaders,
    QueryParameters,
    FormParameters,
    ResponseHeaders,
    ResponseCodes,
}

impl UsageCategory {
    pub const ALL: [UsageCategory; 7] = [
        UsageCategory::Resources,
        UsageCategory::Actions,
        UsageCategory::RequestHeaders,
        UsageCategory::QueryParameters,
        UsageCategory::FormParameters,
        UsageCategory::ResponseHeaders,
        UsageCategory::ResponseCodes,
    ];

    pub fn key(self) -> &'static str {
        match self {
            UsageCategory::Resources => "resources",
            UsageCategory::Actions => "actions",
            UsageCategory::RequestHeaders => "requestHeaders",
            UsageCategory::QueryParameters => "queryParameters",
            UsageCategory::FormParameters => "formParameters",
            UsageCategory::ResponseHeaders => "responseHeaders",
            UsageCategory::ResponseCodes => "responseCodes",
        }
    }

    /// Spelling used by the server's own usage output.
    pub fn server_key(self) -> &'static str {
        match self {
            UsageCategory::Resources => "resources",
            UsageCategory::Actions => "actions",
            UsageCategory::RequestHeaders => "request headers",
            UsageCategory::QueryParameters => "query parameters",
            UsageCategory::FormParameters => "form parameters",
            UsageCategory::ResponseHeaders => "response headers",
            UsageCategory::ResponseCodes => "response codes",
        }
    }
}

/// Usage of one RAML definition.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct UsageReport {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
    pub unused: BTreeMap<String, Vec<String>>,
}

/// Server reply to `usage`: a single usage record or records keyed by RAML.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum UsagePayload {
    Single(UsageReport),
    ByRaml(BTreeMap<String, UsageReport>),
}

fn json<T: Serialize + ?Sized>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| "null".to_string())
}

fn trim(s: &str, max_len: usize) -> String {
    if s.chars().count() > max_len {
        let head: String = s.chars().take(max_len - 3).collect();
        head + "..."
    } else {
        s.to_string()
    }
}

/// Renders the given fields of a report, one `<tab><name>: <json>` line each.
pub fn report_to_string(report: &Report, tab: &str, fields: &[ReportField]) -> String {
    fields
        .iter()
        .map(|field| {
            format!(
                "{}{}: {}\n",
                tab,
                field.name(),
                trim(&field.to_json(report), MAX_FIELD_LEN)
            )
        })
        .collect()
}

/// Describes every report carrying violations. Empty means nothing failed.
pub fn dirty_reports(reports: Option<&[Report]>) -> String {
    let mut res = String::new();
    for (i, report) in reports.unwrap_or_default().iter().enumerate() {
        if !report.has_violations() {
            continue;
        }
        res += &format!("\nRequest number {}\n", i + 1);
        res += &report_to_string(
            report,
            "  ",
            &[ReportField::Request, ReportField::RequestHeaders],
        );
        res += "\nCaused the following violations:\n";
        res += &report_to_string(
            report,
            "  ",
            &[ReportField::RequestViolations, ReportField::ResponseViolations],
        );
        res += "\n";
    }
    res
}

/// Lists the unused elements of the requested categories. Categories missing
/// from the payload are skipped; present but empty ones are still listed.
/// Lines always carry the camelCase category name.
pub fn unused_elements(usage: &UsageReport, categories: &[UsageCategory]) -> String {
    categories
        .iter()
        .filter_map(|category| {
            usage
                .unused
                .get(category.key())
                .or_else(|| usage.unused.get(category.server_key()))
                .map(|elements| format!("  {}: {}\n", category.key(), json(elements)))
        })
        .collect()
}
