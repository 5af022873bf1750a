// Resolves parsed command-line arguments into the run configuration.

use crate::cli::args::Cli;
use crate::libs::utilities::path_helpers;
use std::path::PathBuf;

/// The resolved configuration for one installer run.
#[derive(Debug, Clone)]
pub struct InstallSettings {
    /// Explicit release tag; `None` means "latest".
    pub version: Option<String>,
    /// Download host, e.g. `https://github.com/<owner>/<repo>`.
    pub registry_base: String,
    /// Releases API, e.g. `https://api.github.com/repos/<owner>/<repo>`.
    pub api_base: String,
    /// Tilde-expanded override directory.
    pub install_dir: Option<PathBuf>,
    pub modify_path: bool,
    pub assume_yes: bool,
    pub debug: bool,
}

impl InstallSettings {
    pub fn from_cli(cli: Cli) -> Self {
        let registry_base = cli
            .registry_base
            .unwrap_or_else(|| format!("https://github.com/{}", cli.repo));
        let api_base = cli
            .api_base
            .unwrap_or_else(|| format!("https://api.github.com/repos/{}", cli.repo));

        InstallSettings {
            version: cli.tag.filter(|v| !v.trim().is_empty()),
            registry_base: registry_base.trim_end_matches('/').to_string(),
            api_base: api_base.trim_end_matches('/').to_string(),
            install_dir: cli
                .install_dir
                .filter(|d| !d.trim().is_empty())
                .map(|d| path_helpers::expand_tilde(d.trim())),
            modify_path: !cli.no_modify_path,
            assume_yes: cli.yes,
            debug: cli.debug,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn settings(args: &[&str]) -> InstallSettings {
        let mut argv = vec!["chrysalis-installer"];
        argv.extend_from_slice(args);
        InstallSettings::from_cli(Cli::try_parse_from(argv).unwrap())
    }

    #[test]
    fn github_defaults_follow_the_repository() {
        let s = settings(&["--repo", "acme/chrysalis", "--install-dir", "/opt/bin"]);
        assert_eq!(s.registry_base, "https://github.com/acme/chrysalis");
        assert_eq!(s.api_base, "https://api.github.com/repos/acme/chrysalis");
        assert!(s.version.is_none());
        assert!(s.modify_path);
    }

    #[test]
    fn explicit_bases_and_tilde_override() {
        let s = settings(&[
            "v2.0.0",
            "--registry-base",
            "http://127.0.0.1:8080/",
            "--api-base",
            "http://127.0.0.1:8080/api",
            "--install-dir",
            "~/tools/bin",
            "--no-modify-path",
        ]);
        assert_eq!(s.version.as_deref(), Some("v2.0.0"));
        assert_eq!(s.registry_base, "http://127.0.0.1:8080");
        assert_eq!(s.api_base, "http://127.0.0.1:8080/api");
        assert!(!s.modify_path);
        if let Some(home) = dirs::home_dir() {
            assert_eq!(s.install_dir, Some(home.join("tools/bin")));
        }
    }
}
