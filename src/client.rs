use log::debug;
use reqwest::{
    header::{ACCEPT, AUTHORIZATION, LOCATION, USER_AGENT},
    redirect::Policy,
    Client, Method, RequestBuilder, Response, StatusCode,
};
use serde::de::DeserializeOwned;

use crate::{
    error::{Error, Result},
    github::{CommitStatus, Comparison, PullRequest, Release, ReleaseAsset, ReleaseUpdate, User},
};

const API_VERSION: &str = "2022-11-28";
const SCOPES_HEADER: &str = "x-oauth-scopes";

/// An authenticated client for a single repository on the release tracker.
///
/// Redirects are never followed automatically, see [`GitHub::download_text`].
pub struct GitHub {
    client: Client,
    api_url: String,
    owner: String,
    repo: String,
    token: String,
    user_agent: String,
}

impl GitHub {
    pub fn new(
        api_url: &str,
        owner: &str,
        repo: &str,
        token: &str,
        user_agent: &str,
    ) -> Result<Self> {
        let client = Client::builder()
            .redirect(Policy::none())
            .build()
            .map_err(|source| Error::Request {
                activity: "building the http client".to_string(),
                source,
            })?;

        Ok(Self {
            client,
            api_url: api_url.trim_end_matches('/').to_string(),
            owner: owner.to_string(),
            repo: repo.to_string(),
            token: token.to_string(),
            user_agent: user_agent.to_string(),
        })
    }

    fn auth_header(&self) -> String {
        format!("token {}", self.token)
    }

    fn repo_url(&self, path: &str) -> String {
        format!("{}/repos/{}/{}/{path}", self.api_url, self.owner, self.repo)
    }

    fn request(&self, method: Method, url: &str) -> RequestBuilder {
        debug!("{method} {url}");
        self.client
            .request(method, url)
            .header(ACCEPT, "application/vnd.github+json")
            .header("X-GitHub-Api-Version", API_VERSION)
            .header(USER_AGENT, &self.user_agent)
            .header(AUTHORIZATION, self.auth_header())
    }

    async fn send(&self, request: RequestBuilder, activity: &str) -> Result<Response> {
        let resp = request.send().await.map_err(|source| Error::Request {
            activity: activity.to_string(),
            source,
        })?;

        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }

        let body = resp.text().await.map_or_else(
            |_| "no text could be parsed".to_string(),
            |t| t.trim().to_string(),
        );
        Err(Error::Status {
            activity: activity.to_string(),
            status,
            body,
        })
    }

    async fn json<T: DeserializeOwned>(&self, resp: Response, activity: &str) -> Result<T> {
        resp.json().await.map_err(|source| Error::Decode {
            activity: activity.to_string(),
            source,
        })
    }

    async fn get<T: DeserializeOwned>(&self, url: &str, activity: &str) -> Result<T> {
        let resp = self.send(self.request(Method::GET, url), activity).await?;
        self.json(resp, activity).await
    }

    /// Returns the token's user and the raw comma separated scope list, if the server sent one.
    pub async fn current_user(&self) -> Result<(User, Option<String>)> {
        const ACTIVITY: &str = "fetching the authenticated user";
        let url = format!("{}/user", self.api_url);
        let resp = self.send(self.request(Method::GET, &url), ACTIVITY).await?;

        let scopes = resp
            .headers()
            .get(SCOPES_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned);
        let user = self.json(resp, ACTIVITY).await?;

        Ok((user, scopes))
    }

    /// The most recently created release, draft or not.
    pub async fn newest_release(&self) -> Result<Option<Release>> {
        let url = self.repo_url("releases?per_page=1&page=1");
        let releases: Vec<Release> = self.get(&url, "listing releases").await?;
        Ok(releases.into_iter().next())
    }

    /// The latest published release. Drafts and prereleases are never returned here.
    pub async fn latest_release(&self) -> Result<Release> {
        let url = self.repo_url("releases/latest");
        self.get(&url, "fetching the latest published release").await
    }

    pub async fn release_assets(&self, release_id: u64) -> Result<Vec<ReleaseAsset>> {
        let url = self.repo_url(&format!("releases/{release_id}/assets?per_page=100"));
        self.get(&url, "listing release assets").await
    }

    pub async fn commit_statuses(&self, git_ref: &str) -> Result<Vec<CommitStatus>> {
        let url = self.repo_url(&format!("commits/{git_ref}/statuses"));
        self.get(&url, "listing commit statuses").await
    }

    pub async fn compare(&self, base: &str, head: &str) -> Result<Comparison> {
        let url = self.repo_url(&format!("compare/{base}...{head}"));
        self.get(&url, "comparing commits").await
    }

    pub async fn pull_request(&self, number: u64) -> Result<PullRequest> {
        let url = self.repo_url(&format!("pulls/{number}"));
        self.get(&url, &format!("fetching pull request #{number}")).await
    }

    pub async fn update_release(
        &self,
        release_id: u64,
        update: &ReleaseUpdate<'_>,
    ) -> Result<Release> {
        const ACTIVITY: &str = "updating the draft release";
        let url = self.repo_url(&format!("releases/{release_id}"));
        let request = self.request(Method::PATCH, &url).json(update);
        let resp = self.send(request, ACTIVITY).await?;
        self.json(resp, ACTIVITY).await
    }

    /// Downloads a (small) asset as trimmed text.
    ///
    /// The API answers with a `302` pointing at a storage host. Exactly one redirect is
    /// followed, and the token is only ever sent to the API itself.
    pub async fn download_text(&self, url: &str) -> Result<String> {
        let activity = format!("downloading {url}");
        debug!("GET {url}");

        let resp = self
            .client
            .get(url)
            .header(ACCEPT, "application/octet-stream")
            .header(USER_AGENT, &self.user_agent)
            .header(AUTHORIZATION, self.auth_header())
            .send()
            .await
            .map_err(|source| Error::Request {
                activity: activity.clone(),
                source,
            })?;

        let resp = match resp.status() {
            StatusCode::FOUND => {
                let Some(location) = resp.headers().get(LOCATION).and_then(|l| l.to_str().ok())
                else {
                    return Err(Error::Download {
                        url: url.to_string(),
                        status: StatusCode::FOUND,
                    });
                };

                // storage hosts may answer with a relative location
                let location = resp.url().join(location).map_err(|_| Error::Redirect {
                    url: url.to_string(),
                    location: location.to_string(),
                })?;

                debug!("following redirect to {location}");
                let redirected = self
                    .client
                    .get(location.clone())
                    .header(USER_AGENT, &self.user_agent)
                    .send()
                    .await
                    .map_err(|source| Error::Request {
                        activity: activity.clone(),
                        source,
                    })?;

                if !redirected.status().is_success() {
                    return Err(Error::Download {
                        url: location.to_string(),
                        status: redirected.status(),
                    });
                }
                redirected
            }
            status if status.is_success() => resp,
            status => {
                return Err(Error::Download {
                    url: url.to_string(),
                    status,
                })
            }
        };

        let text = resp.text().await.map_err(|source| Error::Decode {
            activity: activity.clone(),
            source,
        })?;
        Ok(text.trim().to_string())
    }
}
