// SPDX-License-Identifier: Apache-2.0

//! CI context resolution.
//!
//! Derives repository identity from the environment variables GitHub Actions
//! provides. All fields are optional at resolution time; whether a missing
//! field is fatal depends on the selected scan scope, which the caller
//! decides.

use crate::error::PosturaError;

/// Context derived from the CI environment.
#[derive(Debug, Clone, Default)]
pub struct CiContext {
    /// Full `owner/repo` slug.
    pub repository: Option<String>,
    /// Repository owner.
    pub owner: Option<String>,
    /// Repository name without the owner.
    pub repo_name: Option<String>,
    /// Event that triggered the workflow.
    pub event: Option<String>,
    /// Git ref the workflow runs against.
    pub git_ref: Option<String>,
    /// Commit SHA the workflow runs against.
    pub sha: Option<String>,
}

impl CiContext {
    /// Resolves the context from the process environment.
    ///
    /// Absent variables are not an error; a malformed `GITHUB_REPOSITORY` is.
    pub fn from_env() -> Result<Self, PosturaError> {
        let mut context = CiContext {
            event: std::env::var("GITHUB_EVENT_NAME").ok(),
            git_ref: std::env::var("GITHUB_REF").ok(),
            sha: std::env::var("GITHUB_SHA").ok(),
            ..CiContext::default()
        };

        if let Ok(repository) = std::env::var("GITHUB_REPOSITORY")
            && !repository.is_empty()
        {
            let (owner, repo_name) = parse_owner_repo(&repository)?;
            context.repository = Some(repository);
            context.owner = Some(owner);
            context.repo_name = Some(repo_name);
        }

        Ok(context)
    }
}

/// Parses an `owner/repo` string to extract owner and repo.
///
/// Validates format: exactly one `/`, non-empty parts.
///
/// # Errors
///
/// Returns `PosturaError::Config` if the format is invalid.
pub fn parse_owner_repo(s: &str) -> Result<(String, String), PosturaError> {
    let parts: Vec<&str> = s.split('/').collect();
    if parts.len() != 2 || parts[0].is_empty() || parts[1].is_empty() {
        return Err(PosturaError::Config {
            message: format!("Invalid owner/repo format. Expected: owner/repo, got: {s}"),
        });
    }
    Ok((parts[0].to_string(), parts[1].to_string()))
}

/// Derives the scanning-service repository id from an owner and repo name.
#[must_use]
pub fn repository_id(owner: &str, repo: &str) -> String {
    format!("github_{owner}_{repo}")
}

/// External identity of an organization as registered with the service.
#[must_use]
pub fn organization_external_id(owner: &str) -> String {
    format!("github_{owner}")
}

#[cfg(test)]
mod tests {
    use serial_test::serial;

    use super::*;

    #[test]
    fn test_parse_owner_repo_valid() {
        let (owner, repo) = parse_owner_repo("clouatre-labs/postura").unwrap();
        assert_eq!(owner, "clouatre-labs");
        assert_eq!(repo, "postura");
    }

    #[test]
    fn test_parse_owner_repo_invalid() {
        assert!(parse_owner_repo("no-slash").is_err());
        assert!(parse_owner_repo("a/b/c").is_err());
        assert!(parse_owner_repo("/repo").is_err());
        assert!(parse_owner_repo("owner/").is_err());
    }

    #[test]
    fn test_repository_id() {
        assert_eq!(
            repository_id("clouatre-labs", "postura"),
            "github_clouatre-labs_postura"
        );
    }

    #[test]
    fn test_organization_external_id() {
        assert_eq!(organization_external_id("acme"), "github_acme");
    }

    #[test]
    #[serial]
    fn test_from_env_with_repository() {
        unsafe {
            std::env::set_var("GITHUB_REPOSITORY", "acme/widgets");
            std::env::set_var("GITHUB_SHA", "abc123");
        }

        let context = CiContext::from_env().unwrap();
        assert_eq!(context.repository.as_deref(), Some("acme/widgets"));
        assert_eq!(context.owner.as_deref(), Some("acme"));
        assert_eq!(context.repo_name.as_deref(), Some("widgets"));
        assert_eq!(context.sha.as_deref(), Some("abc123"));

        unsafe {
            std::env::remove_var("GITHUB_REPOSITORY");
            std::env::remove_var("GITHUB_SHA");
        }
    }

    #[test]
    #[serial]
    fn test_from_env_without_repository() {
        unsafe {
            std::env::remove_var("GITHUB_REPOSITORY");
        }

        let context = CiContext::from_env().unwrap();
        assert!(context.repository.is_none());
        assert!(context.owner.is_none());
    }

    #[test]
    #[serial]
    fn test_from_env_malformed_repository() {
        unsafe {
            std::env::set_var("GITHUB_REPOSITORY", "not-a-slug");
        }

        let result = CiContext::from_env();
        assert!(result.is_err());

        unsafe {
            std::env::remove_var("GITHUB_REPOSITORY");
        }
    }
}
