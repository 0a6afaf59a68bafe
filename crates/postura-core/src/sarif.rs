// SPDX-License-Identifier: Apache-2.0

//! SARIF (Static Analysis Results Interchange Format) output support.
//!
//! Converts issue instances to SARIF 2.1.0 for integration with GitHub Code
//! Scanning and other security tools. One rule is emitted per distinct issue
//! id, one result per instance.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::types::{IssueInstance, Severity};

/// SARIF report structure (SARIF 2.1.0).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SarifReport {
    /// SARIF schema version.
    pub version: String,
    /// SARIF schema URI.
    #[serde(rename = "$schema")]
    pub schema: String,
    /// List of runs (one per tool invocation).
    pub runs: Vec<SarifRun>,
}

/// A single run of a tool.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SarifRun {
    /// Tool information.
    pub tool: SarifTool,
    /// List of results (issue instances).
    pub results: Vec<SarifResult>,
}

/// Tool information.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SarifTool {
    /// Driver (the tool itself).
    pub driver: SarifDriver,
}

/// Tool driver information.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SarifDriver {
    /// Tool name.
    pub name: String,
    /// Tool version.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    /// Information URI.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(rename = "informationUri")]
    pub information_uri: Option<String>,
    /// One rule per distinct issue id.
    pub rules: Vec<SarifRule>,
}

/// A reporting rule, keyed by issue id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SarifRule {
    /// Rule id (the issue id).
    pub id: String,
    /// Short description.
    #[serde(rename = "shortDescription")]
    pub short_description: SarifMessage,
    /// Full description.
    #[serde(rename = "fullDescription")]
    pub full_description: SarifMessage,
    /// Remediation help.
    pub help: SarifMessage,
    /// Default severity level for results of this rule.
    #[serde(rename = "defaultConfiguration")]
    pub default_configuration: SarifConfiguration,
}

/// Rule default configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SarifConfiguration {
    /// Result level (note, warning, error).
    pub level: String,
}

/// A single result (issue instance).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SarifResult {
    /// Rule ID that produced this result.
    #[serde(rename = "ruleId")]
    pub rule_id: String,
    /// Result level (note, warning, error).
    pub level: String,
    /// Human-readable message.
    pub message: SarifMessage,
    /// Locations where the issue was found.
    pub locations: Vec<SarifLocation>,
    /// Stable fingerprint for deduplication.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fingerprints: Option<SarifFingerprints>,
}

/// Message structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SarifMessage {
    /// Message text.
    pub text: String,
}

/// Location information.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SarifLocation {
    /// Physical location in the scanned tree.
    #[serde(rename = "physicalLocation")]
    pub physical_location: SarifPhysicalLocation,
}

/// Physical location in the scanned tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SarifPhysicalLocation {
    /// Artifact (file) location.
    #[serde(rename = "artifactLocation")]
    pub artifact_location: SarifArtifactLocation,
}

/// Artifact location (file path).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SarifArtifactLocation {
    /// File URI or path.
    pub uri: String,
}

/// Fingerprints for deduplication.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SarifFingerprints {
    /// Primary fingerprint (SHA-256 hash).
    #[serde(rename = "primaryLocationLineHash")]
    pub primary_location_line_hash: String,
}

/// Maps a severity to a SARIF result level.
///
/// Total over every severity, including unknown.
#[must_use]
pub fn severity_to_level(severity: Severity) -> &'static str {
    match severity {
        Severity::Critical | Severity::High => "error",
        Severity::Medium | Severity::Unknown => "warning",
        Severity::Low => "note",
    }
}

impl SarifReport {
    /// Builds a SARIF report from a list of issue instances.
    #[must_use]
    pub fn from_issues(issues: &[IssueInstance]) -> Self {
        let mut rules: Vec<SarifRule> = Vec::new();
        let mut results: Vec<SarifResult> = Vec::new();

        for issue in issues {
            if !rules.iter().any(|r| r.id == issue.issue_id) {
                rules.push(SarifRule::from(issue));
            }
            results.push(SarifResult::from(issue));
        }

        SarifReport {
            version: "2.1.0".to_string(),
            schema: "https://raw.githubusercontent.com/oasis-tcs/sarif-spec/master/Schemata/sarif-schema-2.1.0.json".to_string(),
            runs: vec![SarifRun {
                tool: SarifTool {
                    driver: SarifDriver {
                        name: "postura".to_string(),
                        version: Some(env!("CARGO_PKG_VERSION").to_string()),
                        information_uri: Some("https://github.com/clouatre-labs/postura".to_string()),
                        rules,
                    },
                },
                results,
            }],
        }
    }
}

impl From<&IssueInstance> for SarifRule {
    fn from(issue: &IssueInstance) -> Self {
        SarifRule {
            id: issue.issue_id.clone(),
            short_description: SarifMessage {
                text: issue.title.clone().unwrap_or_else(|| issue.issue_id.clone()),
            },
            full_description: SarifMessage {
                text: issue.description.clone().unwrap_or_default(),
            },
            help: SarifMessage {
                text: issue.remediation.clone().unwrap_or_default(),
            },
            default_configuration: SarifConfiguration {
                level: severity_to_level(issue.severity).to_string(),
            },
        }
    }
}

impl From<&IssueInstance> for SarifResult {
    fn from(issue: &IssueInstance) -> Self {
        let uri = issue
            .context
            .file_path
            .clone()
            .unwrap_or_else(|| ".".to_string());

        let message = issue
            .context
            .description
            .clone()
            .unwrap_or_else(|| format!("Issue detected: {}", issue.issue_id));

        // Stable fingerprint: hash of (issue_id + file path)
        let mut hasher = Sha256::new();
        hasher.update(format!("{}:{uri}", issue.issue_id).as_bytes());
        let hash = hasher.finalize();
        let fingerprint = format!("{hash:x}");

        SarifResult {
            rule_id: issue.issue_id.clone(),
            level: severity_to_level(issue.severity).to_string(),
            message: SarifMessage { text: message },
            locations: vec![SarifLocation {
                physical_location: SarifPhysicalLocation {
                    artifact_location: SarifArtifactLocation { uri },
                },
            }],
            fingerprints: Some(SarifFingerprints {
                primary_location_line_hash: fingerprint,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::IssueContext;

    fn issue(id: &str, severity: Severity, file: Option<&str>) -> IssueInstance {
        IssueInstance {
            issue_id: id.to_string(),
            severity,
            title: Some(format!("Title for {id}")),
            description: Some("Full description".to_string()),
            remediation: Some("Fix it".to_string()),
            context: IssueContext {
                description: Some(format!("instance of {id}")),
                file_path: file.map(ToString::to_string),
            },
            ..IssueInstance::default()
        }
    }

    #[test]
    fn test_severity_mapping_is_total() {
        assert_eq!(severity_to_level(Severity::Critical), "error");
        assert_eq!(severity_to_level(Severity::High), "error");
        assert_eq!(severity_to_level(Severity::Medium), "warning");
        assert_eq!(severity_to_level(Severity::Low), "note");
        assert_eq!(severity_to_level(Severity::Unknown), "warning");
    }

    #[test]
    fn test_report_structure() {
        let issues = vec![issue("admin-rights", Severity::Critical, Some("OWNERS"))];
        let report = SarifReport::from_issues(&issues);

        assert_eq!(report.version, "2.1.0");
        assert_eq!(report.runs.len(), 1);
        assert_eq!(report.runs[0].tool.driver.name, "postura");
        assert_eq!(report.runs[0].tool.driver.rules.len(), 1);
        assert_eq!(report.runs[0].results.len(), 1);
    }

    #[test]
    fn test_rules_deduplicated_by_issue_id() {
        let issues = vec![
            issue("secrets", Severity::High, Some("a.txt")),
            issue("secrets", Severity::High, Some("b.txt")),
            issue("dependabot", Severity::Low, None),
        ];
        let report = SarifReport::from_issues(&issues);

        let driver = &report.runs[0].tool.driver;
        assert_eq!(driver.rules.len(), 2);
        assert_eq!(report.runs[0].results.len(), 3);
    }

    #[test]
    fn test_result_defaults_location_to_dot() {
        let issues = vec![issue("secrets", Severity::Medium, None)];
        let report = SarifReport::from_issues(&issues);
        let result = &report.runs[0].results[0];
        assert_eq!(result.locations[0].physical_location.artifact_location.uri, ".");
        assert_eq!(result.level, "warning");
    }

    #[test]
    fn test_fingerprint_stable_and_distinct() {
        let a1 = SarifResult::from(&issue("a", Severity::High, Some("x.rs")));
        let a2 = SarifResult::from(&issue("a", Severity::High, Some("x.rs")));
        let b = SarifResult::from(&issue("b", Severity::High, Some("x.rs")));

        let hash = |r: &SarifResult| {
            r.fingerprints
                .as_ref()
                .unwrap()
                .primary_location_line_hash
                .clone()
        };
        assert_eq!(hash(&a1), hash(&a2));
        assert_ne!(hash(&a1), hash(&b));
    }

    #[test]
    fn test_serialization_uses_sarif_field_names() {
        let report = SarifReport::from_issues(&[issue("x", Severity::Low, Some("f"))]);
        let json = serde_json::to_string(&report).unwrap();

        assert!(json.contains("\"$schema\""));
        assert!(json.contains("\"ruleId\":\"x\""));
        assert!(json.contains("\"artifactLocation\""));
        assert!(json.contains("\"defaultConfiguration\""));
        assert!(json.contains("\"level\":\"note\""));
    }
}
