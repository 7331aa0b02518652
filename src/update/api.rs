use reqwest::blocking::{Client, Response};
use reqwest::header::{ACCEPT, CONTENT_LENGTH, HeaderMap, HeaderValue, USER_AGENT};
use serde::Deserialize;
use std::time::Duration;

use crate::error::UpdateError;

/// Default PaperMC download API endpoint.
pub const DEFAULT_API_BASE: &str = "https://papermc.io/api/v2";

/// Channel a build must be published on to be eligible for installation.
const STABLE_CHANNEL: &str = "default";

/// Per-request cap on the metadata calls (listing, size probe). The jar
/// download itself is not capped; a large jar on a slow link may legitimately
/// take longer than any fixed limit.
const METADATA_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Deserialize)]
struct BuildListing {
    builds: Vec<BuildRecord>,
}

#[derive(Debug, Deserialize)]
struct BuildRecord {
    build: u32,
    channel: String,
}

/// Latest eligible build for a version line, as resolved from the listing.
///
/// The download location is fully determined by `{version, build}`; no
/// redirect has to be followed to learn the final jar name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteBuild {
    pub version: String,
    pub build: u32,
    pub download_url: String,
}

impl RemoteBuild {
    /// Basename the jar is installed under: `paper-{version}-{build}.jar`.
    pub fn jar_name(&self) -> String {
        format!("paper-{}-{}.jar", self.version, self.build)
    }
}

/// Client for the PaperMC build-distribution API.
///
/// The base URL is injected at construction; nothing here is process-global.
pub struct PaperApi {
    client: Client,
    base_url: String,
}

impl PaperApi {
    pub fn new(base_url: impl Into<String>) -> Result<Self, UpdateError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(
            USER_AGENT,
            HeaderValue::from_static(concat!("paperup/", env!("CARGO_PKG_VERSION"))),
        );
        let client = Client::builder()
            .default_headers(headers)
            .connect_timeout(Duration::from_secs(10))
            .timeout(None::<Duration>)
            .build()?;
        Ok(Self { client, base_url: base_url.into() })
    }

    fn builds_url(&self, version: &str) -> String {
        format!("{}/projects/paper/versions/{}/builds", self.base_url, version)
    }

    fn download_url(&self, version: &str, build: u32) -> String {
        format!(
            "{0}/projects/paper/versions/{1}/builds/{2}/downloads/paper-{1}-{2}.jar",
            self.base_url, version, build
        )
    }

    /// Resolve the newest stable build published for `version`.
    ///
    /// The listing is usually append-ordered, but that is not relied on: the
    /// maximum build number among stable-channel entries is taken explicitly.
    pub fn resolve_latest(&self, version: &str) -> Result<RemoteBuild, UpdateError> {
        let listing: BuildListing = self
            .client
            .get(self.builds_url(version))
            .timeout(METADATA_TIMEOUT)
            .send()?
            .error_for_status()?
            .json()?;

        let latest = listing
            .builds
            .iter()
            .filter(|b| b.channel == STABLE_CHANNEL)
            .map(|b| b.build)
            .max()
            .ok_or_else(|| UpdateError::NoEligibleBuild { version: version.to_string() })?;

        Ok(RemoteBuild {
            version: version.to_string(),
            build: latest,
            download_url: self.download_url(version, latest),
        })
    }

    /// Probe the declared size of the jar without downloading it.
    pub fn content_length(&self, build: &RemoteBuild) -> Result<u64, UpdateError> {
        let resp = self
            .client
            .head(&build.download_url)
            .timeout(METADATA_TIMEOUT)
            .send()?
            .error_for_status()?;
        resp.headers()
            .get(CONTENT_LENGTH)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse::<u64>().ok())
            .ok_or_else(|| UpdateError::MissingLength { url: build.download_url.clone() })
    }

    /// Open the download stream for the jar; the caller owns writing it out.
    pub fn download(&self, build: &RemoteBuild) -> Result<Response, UpdateError> {
        Ok(self.client.get(&build.download_url).send()?.error_for_status()?)
    }
}
