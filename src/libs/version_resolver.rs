// VersionResolver: decides which release tag to install.
//
// An explicit tag is taken as-is without touching the network. Otherwise the
// release registry is asked once for its "latest" release and the tag field
// is used verbatim. Nothing is cached between runs.

use crate::libs::errors::{InstallerError, Result};
use crate::libs::utilities::network;
use crate::schemas::release::{LatestRelease, ReleaseVersion};
use crate::{log_debug, log_info};
use colored::Colorize;

/// A remote release registry that can name its latest release.
pub trait ReleaseRegistry {
    /// Performs one read-only query and returns the latest release tag.
    fn latest_tag(&self) -> Result<String>;
}

/// The GitHub releases API for one repository.
pub struct GitHubRegistry {
    /// e.g. `https://api.github.com/repos/<owner>/<repo>`
    api_base: String,
}

impl GitHubRegistry {
    pub fn new(api_base: impl Into<String>) -> Self {
        Self {
            api_base: api_base.into(),
        }
    }

    fn latest_url(&self) -> String {
        format!("{}/releases/latest", self.api_base.trim_end_matches('/'))
    }
}

impl ReleaseRegistry for GitHubRegistry {
    fn latest_tag(&self) -> Result<String> {
        let url = self.latest_url();
        log_debug!("[Version] Querying {}", url.blue());

        let failure = |reason: String| InstallerError::VersionResolution {
            url: url.clone(),
            reason,
        };

        let response = network::agent()
            .get(&url)
            .set("Accept", "application/vnd.github+json")
            .call()
            .map_err(|e| failure(network::describe_error(e)))?;

        let release: LatestRelease = response
            .into_json()
            .map_err(|e| failure(format!("malformed response: {e}")))?;

        match release.tag_name {
            Some(tag) if !tag.trim().is_empty() => Ok(tag),
            _ => Err(failure("response has no 'tag_name' field".to_string())),
        }
    }
}

/// Resolves the version to install.
///
/// # Arguments
/// * `explicit`: the tag given on the command line, if any. Accepted without
///   validation and without a registry call.
/// * `registry`: queried exactly once when `explicit` is `None`.
pub fn resolve(explicit: Option<&str>, registry: &dyn ReleaseRegistry) -> Result<ReleaseVersion> {
    if let Some(tag) = explicit {
        log_info!("[Version] Using requested version {}", tag.bold());
        return Ok(ReleaseVersion::new(tag));
    }

    log_info!("[Version] Resolving the latest release...");
    let tag = registry.latest_tag()?;
    log_info!("[Version] Latest release is {}", tag.bold());
    Ok(ReleaseVersion::new(tag))
}
