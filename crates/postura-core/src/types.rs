// SPDX-License-Identifier: Apache-2.0

//! Wire types for the scanning API.
//!
//! Server-side enums (`ScanState`, `Severity`) deserialize leniently: values
//! outside the known set land in an `Unknown` variant instead of failing the
//! whole response. Identifiers normalize to strings whether the server sends
//! them as JSON strings or numbers.

use std::fmt;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Scope a scan runs against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScanScope {
    /// A single repository.
    #[default]
    Repository,
    /// Every repository in an organization.
    Organization,
    /// Every organization in an enterprise.
    Enterprise,
}

impl ScanScope {
    /// Lowercase name as used in API paths and configuration.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ScanScope::Repository => "repository",
            ScanScope::Organization => "organization",
            ScanScope::Enterprise => "enterprise",
        }
    }
}

impl fmt::Display for ScanScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lifecycle state of a scan, as reported by the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScanState {
    /// Accepted, not yet started.
    Queued,
    /// In progress.
    Running,
    /// Finished successfully.
    Completed,
    /// Finished with a server-side failure.
    Failed,
    /// Cancelled before completion.
    Cancelled,
    /// Any state string this client does not recognize.
    #[default]
    Unknown,
}

impl ScanState {
    /// Parses a server state string, case-insensitively.
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s.to_ascii_lowercase().as_str() {
            "queued" => ScanState::Queued,
            "running" => ScanState::Running,
            "completed" => ScanState::Completed,
            "failed" => ScanState::Failed,
            "cancelled" => ScanState::Cancelled,
            _ => ScanState::Unknown,
        }
    }

    /// Lowercase name of the state.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ScanState::Queued => "queued",
            ScanState::Running => "running",
            ScanState::Completed => "completed",
            ScanState::Failed => "failed",
            ScanState::Cancelled => "cancelled",
            ScanState::Unknown => "unknown",
        }
    }

    /// True once the server will not change the state again.
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            ScanState::Completed | ScanState::Failed | ScanState::Cancelled
        )
    }
}

impl fmt::Display for ScanState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for ScanState {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ScanState {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(ScanState::parse(&s))
    }
}

/// Severity of an issue instance.
///
/// Ordered `low < medium < high < critical` via [`Severity::rank`]. Values
/// outside the known set become [`Severity::Unknown`], which ranks alongside
/// medium for threshold comparisons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Severity {
    /// Informational or low-impact finding.
    Low,
    /// Medium severity finding.
    Medium,
    /// High severity finding.
    High,
    /// Critical finding requiring immediate attention.
    Critical,
    /// Any severity string this client does not recognize.
    #[default]
    Unknown,
}

impl Severity {
    /// Parses a severity string, case-insensitively.
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s.to_ascii_lowercase().as_str() {
            "low" => Severity::Low,
            "medium" => Severity::Medium,
            "high" => Severity::High,
            "critical" => Severity::Critical,
            _ => Severity::Unknown,
        }
    }

    /// Lowercase name of the severity.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
            Severity::Critical => "critical",
            Severity::Unknown => "unknown",
        }
    }

    /// Numeric rank for threshold comparisons.
    ///
    /// Unknown severities rank as medium, so a misreported issue is neither
    /// silently ignored nor promoted past high.
    #[must_use]
    pub fn rank(self) -> u8 {
        match self {
            Severity::Low => 1,
            Severity::Medium | Severity::Unknown => 2,
            Severity::High => 3,
            Severity::Critical => 4,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Severity {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Severity {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(Severity::parse(&s))
    }
}

/// Deserializes an identifier the server may send as a string or a number.
fn de_id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => Ok(s),
        serde_json::Value::Number(n) => Ok(n.to_string()),
        other => Err(D::Error::custom(format!(
            "expected string or number identifier, got {other}"
        ))),
    }
}

fn unknown_id() -> String {
    "unknown".to_string()
}

/// Response to a scan creation request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanCreated {
    /// Identifier assigned to the new scan.
    #[serde(deserialize_with = "de_id")]
    pub scan_id: String,
    /// Initial state, if the server reports one.
    #[serde(default)]
    pub status: ScanState,
}

/// Status of a scan, as observed via polling.
///
/// Mutates server-side only; this client never writes it back. Fields the
/// client does not model are preserved in `extra` so JSON output passes the
/// server's data through unmodified.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScanStatus {
    /// Scan identifier.
    #[serde(default, deserialize_with = "de_opt_id")]
    pub scan_id: Option<String>,
    /// Current lifecycle state.
    #[serde(default)]
    pub status: ScanState,
    /// Scope the scan runs against, if reported.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
    /// Server fields this client does not model.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl ScanStatus {
    /// A synthetic queued status for scans the client chose not to wait on.
    #[must_use]
    pub fn queued(scan_id: &str) -> Self {
        ScanStatus {
            scan_id: Some(scan_id.to_string()),
            status: ScanState::Queued,
            scope: None,
            extra: serde_json::Map::new(),
        }
    }
}

/// Optional variant of [`de_id`] for fields that may be absent.
fn de_opt_id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    match Option::<serde_json::Value>::deserialize(deserializer)? {
        None | Some(serde_json::Value::Null) => Ok(None),
        Some(serde_json::Value::String(s)) => Ok(Some(s)),
        Some(serde_json::Value::Number(n)) => Ok(Some(n.to_string())),
        Some(other) => Err(D::Error::custom(format!(
            "expected string or number identifier, got {other}"
        ))),
    }
}

/// Location and narrative context attached to an issue instance.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueContext {
    /// Instance-specific description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Path of the file the issue was found in.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_path: Option<String>,
}

/// One concrete finding produced by a scan. Read-only.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IssueInstance {
    /// Issue identifier, doubling as the rule id in SARIF output.
    #[serde(default = "unknown_id", deserialize_with = "de_id")]
    pub issue_id: String,
    /// Severity of the finding.
    #[serde(default)]
    pub severity: Severity,
    /// Short issue title.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Full issue description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Suggested remediation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remediation: Option<String>,
    /// Instance context (file path, per-instance description).
    #[serde(default)]
    pub context: IssueContext,
    /// Server fields this client does not model.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// An organization registered with the scanning service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Organization {
    /// Service-side organization identifier.
    #[serde(deserialize_with = "de_id")]
    pub id: String,
    /// External identity, e.g. `github_<org>`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_id: Option<String>,
    /// Display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}
