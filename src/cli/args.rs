use clap::Parser;
use std::fmt;
use std::str::FromStr;

/// The repository releases are published under unless `--repo` says otherwise.
pub const DEFAULT_REPOSITORY: &str = "chrysalis-dev/chrysalis";

/// Defines the command-line interface for `chrysalis-installer`.
#[derive(Parser, Debug)]
#[command(name = "chrysalis-installer")]
#[command(version, about = "Install the chrysalis command-line tool", long_about = None)]
pub struct Cli {
    /// Release tag to install (for example `v1.2.3`). Defaults to the latest release.
    #[arg(value_name = "VERSION")]
    pub(crate) tag: Option<String>,

    /// Directory to install into. Takes precedence over the default locations.
    #[arg(long, env = "CHRYSALIS_INSTALL_DIR", value_name = "DIR")]
    pub(crate) install_dir: Option<String>,

    /// GitHub repository releases are downloaded from.
    #[arg(long, value_name = "OWNER/NAME", default_value = DEFAULT_REPOSITORY)]
    pub(crate) repo: Repository,

    /// Base URL of the download host (defaults to `https://github.com/<repo>`).
    #[arg(long, value_name = "URL")]
    pub(crate) registry_base: Option<String>,

    /// Base URL of the releases API (defaults to `https://api.github.com/repos/<repo>`).
    #[arg(long, value_name = "URL")]
    pub(crate) api_base: Option<String>,

    /// Do not edit any shell configuration file; print the lines to add instead.
    #[arg(long)]
    pub(crate) no_modify_path: bool,

    /// Answer "yes" to the privilege-escalation prompt.
    #[arg(short, long)]
    pub(crate) yes: bool,

    /// Enables detailed debug output for troubleshooting.
    #[arg(short, long)]
    pub(crate) debug: bool,
}

/// An `owner/name` GitHub repository slug.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Repository {
    owner: String,
    name: String,
}

/// Parses `owner/name`; both halves must be non-empty and free of further slashes.
impl FromStr for Repository {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().split_once('/') {
            Some((owner, name)) if !owner.is_empty() && !name.is_empty() && !name.contains('/') => {
                Ok(Repository {
                    owner: owner.to_string(),
                    name: name.to_string(),
                })
            }
            _ => Err(format!("invalid repository '{s}', expected OWNER/NAME")),
        }
    }
}

impl fmt::Display for Repository {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}
