//! Jenkins REST implementation of [`BuildServer`].
//!
//! Talks to the JSON API (`/api/json` with `tree=` filters) using basic
//! auth on every request. Certificate verification is off unless the caller
//! opts in, matching the operational default for internal build servers;
//! each unverified request emits a transport warning unless the channel is
//! suppressed (see [`crate::diag`]).

use async_trait::async_trait;
use reqwest::{StatusCode, Url};
use serde::Deserialize;
use tracing::{debug, warn};

use crate::diag;
use crate::error::ServerError;
use crate::server_traits::{BuildInfo, BuildServer, JobBuildInfo, JobSummary, ServerResult};

/// Jenkins client for job management operations.
#[derive(Debug)]
pub struct JenkinsClient {
    base: Url,
    http: reqwest::Client,
    username: String,
    password: String,
    ssl_verify: bool,
}

impl JenkinsClient {
    /// Create a new client for the server at `url`.
    ///
    /// `ssl_verify = false` accepts invalid certificates; callers must opt
    /// in to verification.
    pub fn new(url: &str, username: &str, password: &str, ssl_verify: bool) -> ServerResult<Self> {
        let base =
            Url::parse(url).map_err(|err| ServerError::InvalidUrl(format!("{url}: {err}")))?;

        // Jenkins answers doDelete with a redirect to the parent view;
        // following it would re-fetch a page that may already be gone.
        let http = reqwest::Client::builder()
            .user_agent(concat!("jobscrub/", env!("CARGO_PKG_VERSION")))
            .danger_accept_invalid_certs(!ssl_verify)
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .map_err(|err| ServerError::Connection(err.to_string()))?;

        Ok(JenkinsClient {
            base,
            http,
            username: username.to_string(),
            password: password.to_string(),
            ssl_verify,
        })
    }

    /// URL for a job-scoped path: `{base}/job/{name}/{tail...}`.
    ///
    /// Job names pass through URL segment escaping, so names with spaces or
    /// reserved characters round-trip correctly.
    fn job_url(&self, name: &str, tail: &[&str]) -> ServerResult<Url> {
        let mut url = self.base.clone();
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|_| ServerError::InvalidUrl(format!("{} cannot be a base", self.base)))?;
            segments.pop_if_empty();
            segments.push("job");
            segments.push(name);
            for segment in tail {
                segments.push(segment);
            }
        }
        Ok(url)
    }

    async fn send(&self, request: reqwest::RequestBuilder) -> ServerResult<reqwest::Response> {
        if !self.ssl_verify && !diag::transport_warnings_suppressed() {
            warn!(server = %self.base, "TLS certificate verification is disabled");
        }
        let response = request
            .basic_auth(&self.username, Some(&self.password))
            .send()
            .await?;
        Ok(response)
    }

    /// GET `url` and decode the JSON body.
    ///
    /// `job` labels 404 responses: inside a job-scoped path a 404 means the
    /// job does not exist, anywhere else it is a protocol violation.
    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        url: Url,
        job: Option<&str>,
    ) -> ServerResult<T> {
        debug!(url = %url, "GET");
        let response = self.send(self.http.get(url.clone())).await?;
        let status = response.status();

        if status == StatusCode::NOT_FOUND {
            return match job {
                Some(name) => Err(ServerError::NotFound(name.to_string())),
                None => Err(ServerError::Protocol(format!("{url} returned 404"))),
            };
        }
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(ServerError::Unauthorized(format!("server returned {status}")));
        }
        if !status.is_success() {
            return Err(ServerError::Protocol(format!("{url} returned {status}")));
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|err| ServerError::Protocol(format!("{url}: {err}")))
    }
}

/// Top-level shape of the `/api/json` job listing.
#[derive(Debug, Deserialize)]
struct JobListing {
    #[serde(default)]
    jobs: Vec<JobSummary>,
}

#[async_trait]
impl BuildServer for JenkinsClient {
    async fn list_jobs(&self) -> ServerResult<Vec<JobSummary>> {
        let mut url = self.base.clone();
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|_| ServerError::InvalidUrl(format!("{} cannot be a base", self.base)))?;
            segments.pop_if_empty();
            segments.extend(["api", "json"]);
        }
        url.query_pairs_mut().append_pair("tree", "jobs[name]");

        let listing: JobListing = self.get_json(url, None).await?;
        Ok(listing.jobs)
    }

    async fn get_job_info(&self, name: &str) -> ServerResult<JobBuildInfo> {
        let mut url = self.job_url(name, &["api", "json"])?;
        url.query_pairs_mut()
            .append_pair("tree", "name,lastBuild[number]");
        self.get_json(url, Some(name)).await
    }

    async fn get_build_info(&self, name: &str, number: i64) -> ServerResult<BuildInfo> {
        let build = number.to_string();
        let mut url = self.job_url(name, &[&build, "api", "json"])?;
        url.query_pairs_mut()
            .append_pair("tree", "number,timestamp");
        self.get_json(url, Some(name)).await
    }

    async fn delete_job(&self, name: &str) -> ServerResult<()> {
        let url = self.job_url(name, &["doDelete"])?;
        debug!(url = %url, "POST");
        let response = self.send(self.http.post(url)).await?;
        let status = response.status();

        // A redirect to the parent view is Jenkins' success answer.
        if status.is_success() || status.is_redirection() {
            return Ok(());
        }
        match status {
            StatusCode::NOT_FOUND => Err(ServerError::NotFound(name.to_string())),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                Err(ServerError::Unauthorized(format!("server returned {status}")))
            }
            _ => Err(ServerError::Deletion {
                name: name.to_string(),
                reason: format!("server returned {status}"),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> JenkinsClient {
        JenkinsClient::new("https://ci.example.com/", "admin", "token", false)
            .expect("client construction failed")
    }

    #[test]
    fn test_rejects_invalid_url() {
        let err = JenkinsClient::new("not a url", "u", "p", false).unwrap_err();
        assert!(matches!(err, ServerError::InvalidUrl(_)));
    }

    #[test]
    fn test_job_url_shape() {
        let url = client().job_url("nightly-build", &["api", "json"]).unwrap();
        assert_eq!(
            url.as_str(),
            "https://ci.example.com/job/nightly-build/api/json"
        );
    }

    #[test]
    fn test_job_url_escapes_name() {
        let url = client().job_url("my job", &["doDelete"]).unwrap();
        assert_eq!(url.as_str(), "https://ci.example.com/job/my%20job/doDelete");
    }

    #[test]
    fn test_job_url_respects_base_path() {
        let client = JenkinsClient::new("https://ci.example.com/jenkins/", "u", "p", true)
            .expect("client construction failed");
        let url = client.job_url("deploy", &["api", "json"]).unwrap();
        assert_eq!(
            url.as_str(),
            "https://ci.example.com/jenkins/job/deploy/api/json"
        );
    }

    #[test]
    fn test_listing_decodes_empty_server() {
        let listing: JobListing = serde_json::from_str(r#"{"_class": "hudson.model.Hudson"}"#)
            .expect("decode failed");
        assert!(listing.jobs.is_empty());
    }

    #[test]
    fn test_listing_decodes_jobs() {
        let listing: JobListing = serde_json::from_str(
            r#"{"jobs": [{"name": "build-x"}, {"name": "nightly-y"}]}"#,
        )
        .expect("decode failed");
        assert_eq!(listing.jobs.len(), 2);
        assert_eq!(listing.jobs[0].name, "build-x");
    }
}
