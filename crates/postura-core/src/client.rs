// SPDX-License-Identifier: Apache-2.0

//! HTTP client for the scanning API.
//!
//! Each operation sends one authenticated request and deserializes a JSON
//! response, or fails with a typed error. Retrying is the polling loop's
//! business, not the client's.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};

use crate::config::AppConfig;
use crate::context::organization_external_id;
use crate::error::PosturaError;
use crate::poller::ScanStatusSource;
use crate::types::{IssueInstance, Organization, ScanCreated, ScanStatus};

/// Check-type configuration shared by every scan request shape.
#[derive(Debug, Serialize)]
pub struct ScanConfiguration<'a> {
    /// Check types to run.
    pub check_types: &'a [String],
}

/// Request body for a repository scan. Immutable once submitted.
#[derive(Debug, Serialize)]
pub struct RepositoryScanRequest<'a> {
    /// Service-side repository identifier.
    pub repository_id: &'a str,
    /// Check-type configuration.
    pub configuration: ScanConfiguration<'a>,
}

/// Request body for an organization scan. Immutable once submitted.
#[derive(Debug, Serialize)]
pub struct OrganizationScanRequest<'a> {
    /// Service-side organization identifier.
    pub organization_id: &'a str,
    /// Check-type configuration.
    pub configuration: ScanConfiguration<'a>,
    /// Repository visibility filter.
    pub visibility_filter: &'a [String],
}

/// Request body for an enterprise scan. Immutable once submitted.
#[derive(Debug, Serialize)]
pub struct EnterpriseScanRequest<'a> {
    /// Service-side enterprise identifier.
    pub enterprise_id: &'a str,
    /// Check-type configuration.
    pub configuration: ScanConfiguration<'a>,
    /// Repository visibility filter.
    pub visibility_filter: &'a [String],
}

/// Client for the scanning API.
///
/// Holds the HTTP client, base URL, and bearer token for reuse across
/// requests. The underlying client carries an explicit socket timeout so a
/// stalled connection can never hang the process.
#[derive(Debug)]
pub struct PosturaClient {
    /// HTTP client with configured timeout.
    http: Client,
    /// Base URL of the API, without a trailing slash.
    api_url: String,
    /// Bearer token for authentication.
    token: SecretString,
}

impl PosturaClient {
    /// Creates a new client from configuration.
    ///
    /// # Errors
    ///
    /// Returns `PosturaError::Config` if no token is configured, or
    /// `PosturaError::Network` if the HTTP client cannot be built.
    pub fn new(config: &AppConfig) -> Result<Self, PosturaError> {
        let token = config
            .token
            .as_deref()
            .filter(|token| !token.is_empty())
            .ok_or_else(|| PosturaError::Config {
                message: "POSTURA_TOKEN is required. \
                          Set it with: export POSTURA_TOKEN=your_api_token"
                    .to_string(),
            })?;

        let http = Client::builder()
            .timeout(Duration::from_secs(config.http_timeout_seconds))
            .user_agent(concat!("postura/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            api_url: config.api_url.trim_end_matches('/').to_string(),
            token: SecretString::new(token.to_string().into()),
        })
    }

    /// Base URL this client talks to.
    #[must_use]
    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.api_url)
    }

    async fn execute<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
        operation: &str,
    ) -> Result<T, PosturaError> {
        let response = request
            .header(
                "Authorization",
                format!("Bearer {}", self.token.expose_secret()),
            )
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let body = body.trim();
            let message = if body.is_empty() {
                format!("{operation} failed with HTTP {status}")
            } else {
                format!("{operation} failed with HTTP {status}: {body}")
            };
            return Err(PosturaError::Api {
                message,
                status: Some(status.as_u16()),
            });
        }

        Ok(response.json::<T>().await?)
    }

    /// Looks up an organization by its external GitHub name.
    ///
    /// # Errors
    ///
    /// Returns `PosturaError::OrganizationNotFound` if no registered
    /// organization carries the `github_<name>` external id.
    #[instrument(skip(self))]
    pub async fn find_organization(&self, name: &str) -> Result<Organization, PosturaError> {
        debug!("listing organizations");
        let organizations: Vec<Organization> = self
            .execute(self.http.get(self.url("/organizations")), "organization lookup")
            .await?;

        let external_id = organization_external_id(name);
        organizations
            .into_iter()
            .find(|org| org.external_id.as_deref() == Some(external_id.as_str()))
            .ok_or_else(|| PosturaError::OrganizationNotFound {
                name: name.to_string(),
            })
    }

    /// Creates a repository scan.
    #[instrument(skip(self, check_types))]
    pub async fn create_repository_scan(
        &self,
        repository_id: &str,
        check_types: &[String],
    ) -> Result<ScanCreated, PosturaError> {
        let payload = RepositoryScanRequest {
            repository_id,
            configuration: ScanConfiguration { check_types },
        };
        self.execute(
            self.http.post(self.url("/scans/repository")).json(&payload),
            "repository scan creation",
        )
        .await
    }

    /// Creates an organization scan.
    #[instrument(skip(self, check_types, visibility_filter))]
    pub async fn create_organization_scan(
        &self,
        organization_id: &str,
        check_types: &[String],
        visibility_filter: &[String],
    ) -> Result<ScanCreated, PosturaError> {
        let payload = OrganizationScanRequest {
            organization_id,
            configuration: ScanConfiguration { check_types },
            visibility_filter,
        };
        self.execute(
            self.http
                .post(self.url("/scans/organization"))
                .json(&payload),
            "organization scan creation",
        )
        .await
    }

    /// Creates an enterprise scan.
    #[instrument(skip(self, check_types, visibility_filter))]
    pub async fn create_enterprise_scan(
        &self,
        enterprise_id: &str,
        check_types: &[String],
        visibility_filter: &[String],
    ) -> Result<ScanCreated, PosturaError> {
        let payload = EnterpriseScanRequest {
            enterprise_id,
            configuration: ScanConfiguration { check_types },
            visibility_filter,
        };
        self.execute(
            self.http.post(self.url("/scans/enterprise")).json(&payload),
            "enterprise scan creation",
        )
        .await
    }

    /// Fetches the current status of a scan.
    #[instrument(skip(self))]
    pub async fn scan_status(&self, scan_id: &str) -> Result<ScanStatus, PosturaError> {
        self.execute(
            self.http.get(self.url(&format!("/scans/{scan_id}/status"))),
            "scan status fetch",
        )
        .await
    }

    /// Fetches the issue instances produced by a scan.
    #[instrument(skip(self))]
    pub async fn issue_instances(
        &self,
        scan_id: &str,
    ) -> Result<Vec<IssueInstance>, PosturaError> {
        self.execute(
            self.http
                .get(self.url("/issues/instances"))
                .query(&[("scan_id", scan_id)]),
            "issue instance fetch",
        )
        .await
    }
}

#[async_trait]
impl ScanStatusSource for PosturaClient {
    async fn fetch_status(&self, scan_id: &str) -> Result<ScanStatus, PosturaError> {
        self.scan_status(scan_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_requires_token() {
        let config = AppConfig::default();
        let result = PosturaClient::new(&config);
        assert!(matches!(result, Err(PosturaError::Config { .. })));
    }

    #[test]
    fn test_new_rejects_empty_token() {
        let config = AppConfig {
            token: Some(String::new()),
            ..AppConfig::default()
        };
        assert!(PosturaClient::new(&config).is_err());
    }

    #[test]
    fn test_api_url_trailing_slash_trimmed() {
        let config = AppConfig {
            token: Some("tok".to_string()),
            api_url: "https://api.postura.dev/".to_string(),
            ..AppConfig::default()
        };
        let client = PosturaClient::new(&config).unwrap();
        assert_eq!(client.api_url(), "https://api.postura.dev");
        assert_eq!(client.url("/organizations"), "https://api.postura.dev/organizations");
    }

    #[test]
    fn test_request_payload_shapes() {
        let check_types = vec!["secrets".to_string()];
        let visibility = vec!["public".to_string()];

        let repo = serde_json::to_value(RepositoryScanRequest {
            repository_id: "github_acme_widgets",
            configuration: ScanConfiguration {
                check_types: &check_types,
            },
        })
        .unwrap();
        assert_eq!(repo["repository_id"], "github_acme_widgets");
        assert_eq!(repo["configuration"]["check_types"][0], "secrets");
        assert!(repo.get("visibility_filter").is_none());

        let org = serde_json::to_value(OrganizationScanRequest {
            organization_id: "org-1",
            configuration: ScanConfiguration {
                check_types: &check_types,
            },
            visibility_filter: &visibility,
        })
        .unwrap();
        assert_eq!(org["visibility_filter"][0], "public");
    }
}
