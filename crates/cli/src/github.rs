//! GitHub API integration

use crate::error::{Error, Result};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, USER_AGENT};
use serde::Deserialize;
use size_report_core::is_report;
use std::path::Path;
use tracing::debug;

const COMMENTS_PER_PAGE: usize = 100;

/// GitHub API client
pub struct GitHubClient {
    client: reqwest::blocking::Client,
    token: Option<String>,
    api_base: String,
}

impl GitHubClient {
    pub fn new(token: Option<String>) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/vnd.github.v3+json"),
        );
        headers.insert(USER_AGENT, HeaderValue::from_static("size-report"));

        if let Some(ref t) = token {
            headers.insert(
                AUTHORIZATION,
                HeaderValue::from_str(&format!("Bearer {}", t))
                    .map_err(|_| Error::GitHub("Invalid token format".to_string()))?,
            );
        }

        let client = reqwest::blocking::Client::builder()
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            token,
            api_base: "https://api.github.com".to_string(),
        })
    }

    /// Point the client at another API root, e.g. GitHub Enterprise
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into().trim_end_matches('/').to_string();
        self
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    fn require_token(&self) -> Result<()> {
        if !self.is_authenticated() {
            return Err(Error::GitHub(
                "GitHub token required for creating comments".to_string(),
            ));
        }
        Ok(())
    }

    /// All comments of an issue or pull request, following pagination
    pub fn list_issue_comments(
        &self,
        owner: &str,
        repo: &str,
        issue_number: u64,
    ) -> Result<Vec<IssueComment>> {
        let url = format!(
            "{}/repos/{}/{}/issues/{}/comments",
            self.api_base, owner, repo, issue_number
        );

        let mut comments = Vec::new();
        let mut page = 1;

        loop {
            let batch: Vec<IssueComment> = self
                .client
                .get(&url)
                .query(&[("per_page", COMMENTS_PER_PAGE), ("page", page)])
                .send()?
                .error_for_status()
                .map_err(|e| Error::GitHub(format!("Failed to list comments: {}", e)))?
                .json()?;

            let done = batch.len() < COMMENTS_PER_PAGE;
            comments.extend(batch);
            if done {
                break;
            }
            page += 1;
        }

        debug!("Found {} comments on #{}", comments.len(), issue_number);

        Ok(comments)
    }

    /// Create an issue comment (for PRs)
    pub fn create_issue_comment(
        &self,
        owner: &str,
        repo: &str,
        issue_number: u64,
        body: &str,
    ) -> Result<String> {
        self.require_token()?;

        let url = format!(
            "{}/repos/{}/{}/issues/{}/comments",
            self.api_base, owner, repo, issue_number
        );

        let payload = serde_json::json!({ "body": body });

        let response: CommentResponse = self
            .client
            .post(&url)
            .json(&payload)
            .send()?
            .error_for_status()
            .map_err(|e| Error::GitHub(format!("Failed to create comment: {}", e)))?
            .json()?;

        Ok(response.html_url)
    }

    /// Replace the body of an existing issue comment
    pub fn update_issue_comment(
        &self,
        owner: &str,
        repo: &str,
        comment_id: u64,
        body: &str,
    ) -> Result<String> {
        self.require_token()?;

        let url = format!(
            "{}/repos/{}/{}/issues/comments/{}",
            self.api_base, owner, repo, comment_id
        );

        let payload = serde_json::json!({ "body": body });

        let response: CommentResponse = self
            .client
            .patch(&url)
            .json(&payload)
            .send()?
            .error_for_status()
            .map_err(|e| Error::GitHub(format!("Failed to update comment: {}", e)))?
            .json()?;

        Ok(response.html_url)
    }
}

/// Issue comment operations needed to publish a report
pub trait CommentApi {
    fn list_comments(&self, owner: &str, repo: &str, issue_number: u64) -> Result<Vec<IssueComment>>;
    fn create_comment(&self, owner: &str, repo: &str, issue_number: u64, body: &str) -> Result<String>;
    fn update_comment(&self, owner: &str, repo: &str, comment_id: u64, body: &str) -> Result<String>;
}

impl CommentApi for GitHubClient {
    fn list_comments(&self, owner: &str, repo: &str, issue_number: u64) -> Result<Vec<IssueComment>> {
        self.list_issue_comments(owner, repo, issue_number)
    }

    fn create_comment(&self, owner: &str, repo: &str, issue_number: u64, body: &str) -> Result<String> {
        self.create_issue_comment(owner, repo, issue_number, body)
    }

    fn update_comment(&self, owner: &str, repo: &str, comment_id: u64, body: &str) -> Result<String> {
        self.update_issue_comment(owner, repo, comment_id, body)
    }
}

/// Update the previous size report on a pull request, or create one.
///
/// A failed listing is returned as is. A failed create or update comes back
/// as [`Error::CommentWrite`] so callers can tolerate missing write access.
pub fn publish_report(
    api: &impl CommentApi,
    owner: &str,
    repo: &str,
    issue_number: u64,
    body: &str,
) -> Result<Published> {
    let comments = api.list_comments(owner, repo, issue_number)?;

    let published = match find_report_comment(&comments) {
        Some(existing) => api
            .update_comment(owner, repo, existing.id, body)
            .map(Published::Updated),
        None => api
            .create_comment(owner, repo, issue_number, body)
            .map(Published::Created),
    };

    published.map_err(|e| Error::CommentWrite(Box::new(e)))
}

/// How a report ended up on the pull request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Published {
    Created(String),
    Updated(String),
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct IssueComment {
    pub id: u64,
    #[serde(default)]
    pub body: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CommentResponse {
    html_url: String,
}

/// First comment that holds a size report
pub fn find_report_comment(comments: &[IssueComment]) -> Option<&IssueComment> {
    comments
        .iter()
        .find(|c| c.body.as_deref().map(is_report).unwrap_or(false))
}

/// Parse a GitHub repository URL or string into owner and repo
pub fn parse_github_repo(repo: &str) -> Result<(String, String)> {
    let repo = repo.trim();
    let repo = repo.strip_suffix(".git").unwrap_or(repo);

    // Try simple owner/repo format
    if !repo.contains("://") && !repo.contains('@') && !repo.contains("github.com") {
        let parts: Vec<&str> = repo.split('/').collect();
        if parts.len() == 2 {
            return Ok((parts[0].to_string(), parts[1].to_string()));
        }
    }

    // Try URL format
    if let Ok(url) = url::Url::parse(repo) {
        let path = url.path().trim_start_matches('/');
        let parts: Vec<&str> = path.split('/').collect();
        if parts.len() >= 2 {
            return Ok((parts[0].to_string(), parts[1].to_string()));
        }
    }

    // Try SSH format
    if let Some(path) = repo.strip_prefix("git@github.com:") {
        let parts: Vec<&str> = path.split('/').collect();
        if parts.len() == 2 {
            return Ok((parts[0].to_string(), parts[1].to_string()));
        }
    }

    // Try github.com/owner/repo
    if let Some(path) = repo.strip_prefix("github.com/") {
        let parts: Vec<&str> = path.split('/').collect();
        if parts.len() >= 2 {
            return Ok((parts[0].to_string(), parts[1].to_string()));
        }
    }

    Err(Error::GitHub(format!(
        "Could not parse GitHub repository from: {}",
        repo
    )))
}

/// Pull request fields read from the workflow event payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRequestInfo {
    pub number: u64,
    pub base_ref: String,
}

#[derive(Debug, Deserialize)]
struct EventPayload {
    pull_request: Option<PullRequestPayload>,
}

#[derive(Debug, Deserialize)]
struct PullRequestPayload {
    number: u64,
    base: BaseRef,
}

#[derive(Debug, Deserialize)]
struct BaseRef {
    #[serde(rename = "ref")]
    ref_name: String,
}

/// Extract the pull request from a `GITHUB_EVENT_PATH` payload.
///
/// Returns `None` for events that are not about a pull request.
pub fn parse_pull_request_event(payload: &str) -> Result<Option<PullRequestInfo>> {
    let event: EventPayload = serde_json::from_str(payload)
        .map_err(|e| Error::GitHub(format!("Invalid event payload: {}", e)))?;

    Ok(event.pull_request.map(|pr| PullRequestInfo {
        number: pr.number,
        base_ref: pr.base.ref_name,
    }))
}

/// Environment variables for GitHub Actions
#[derive(Debug, Clone, Default)]
pub struct GitHubActionsEnv {
    pub token: Option<String>,
    pub repository: Option<String>,
    pub event_path: Option<String>,
    pub api_url: Option<String>,
}

impl GitHubActionsEnv {
    pub fn from_env() -> Self {
        Self {
            token: std::env::var("GITHUB_TOKEN").ok(),
            repository: std::env::var("GITHUB_REPOSITORY").ok(),
            event_path: std::env::var("GITHUB_EVENT_PATH").ok(),
            api_url: std::env::var("GITHUB_API_URL").ok(),
        }
    }

    pub fn is_github_actions() -> bool {
        std::env::var("GITHUB_ACTIONS")
            .map(|v| v == "true")
            .unwrap_or(false)
    }

    pub fn get_owner_repo(&self) -> Option<(String, String)> {
        self.repository
            .as_ref()
            .and_then(|r| parse_github_repo(r).ok())
    }

    /// Pull request of the triggering event, if the event file names one
    pub fn pull_request(&self) -> Result<Option<PullRequestInfo>> {
        let Some(path) = self.event_path.as_deref() else {
            return Ok(None);
        };

        let payload = std::fs::read_to_string(Path::new(path))
            .map_err(|e| Error::Io(format!("Failed to read event payload '{}': {}", path, e)))?;

        parse_pull_request_event(&payload)
    }
}
