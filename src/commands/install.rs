// This file contains the install pipeline behind `chrysalis-installer`.
// It runs the five stages strictly in order, polls for interruption between
// them, and hands every boundary and exit path to the reporter.

use crate::cli::settings::InstallSettings;
use crate::libs::{
    artifact_fetcher,
    binary_installer::{self, InstallPolicy},
    errors::{InstallWarning, Result},
    interrupt::Interrupt,
    path_configurer::{self, PathOutcome},
    platform_detector::{self, HostPlatform},
    reporter::{InstallSummary, Reporter, Stage},
    utilities::path_helpers,
    version_resolver::{self, GitHubRegistry, ReleaseRegistry},
};
use crate::schemas::release::ReleaseAsset;
use crate::schemas::shell_profile::{ShellEnvironment, ShellKind};
use crate::{log_debug, log_info};
use colored::Colorize;
use std::path::PathBuf;

/// Name of the executable shipped in every release archive.
pub const BINARY_NAME: &str = "chrysalis";

/// The external resources one run depends on.
pub struct RunContext<'a> {
    pub host: HostPlatform,
    pub registry: &'a dyn ReleaseRegistry,
    /// Captured from the process after detection when `None`.
    pub shell: Option<ShellEnvironment>,
    /// Parent of the per-run staging directory.
    pub staging_root: PathBuf,
    /// Where a received SIGINT/SIGTERM is recorded.
    pub interrupt: Interrupt,
}

/// Main entry point for an installer run.
///
/// # Returns
/// * The process exit code: `0` on success, `1` on a fatal error, `130`
///   when interrupted.
pub fn run(settings: &InstallSettings) -> u8 {
    log_debug!("Entered install::run() with {:?}", settings);

    let registry = GitHubRegistry::new(settings.api_base.clone());
    let context = RunContext {
        host: HostPlatform::probe(),
        registry: &registry,
        shell: None,
        staging_root: std::env::temp_dir(),
        interrupt: Interrupt::process(),
    };

    let mut reporter = Reporter::new();
    match execute(settings, context, &mut reporter) {
        Ok(summary) => {
            reporter.print_summary(&summary);
            0
        }
        Err(e) => {
            reporter.fatal(&e);
            e.exit_code()
        }
    }
}

/// Runs detect → resolve → fetch → install → configure.
///
/// Any fatal error aborts the remaining stages. The staging directory lives
/// only inside the fetch and install stages and is removed on every path out
/// of them. A failure that follows a received signal is reported as
/// `Interrupted`.
pub fn execute(
    settings: &InstallSettings,
    context: RunContext<'_>,
    reporter: &mut Reporter,
) -> Result<InstallSummary> {
    let interrupt = context.interrupt;
    run_stages(settings, context, reporter).map_err(|e| interrupt.or_interrupted(e))
}

fn run_stages(
    settings: &InstallSettings,
    context: RunContext<'_>,
    reporter: &mut Reporter,
) -> Result<InstallSummary> {
    let interrupt = context.interrupt;

    reporter.stage(Stage::Detect);
    let platform = platform_detector::detect_host(&context.host)?;
    if context.host.substitutes_native_build() {
        reporter.record("Translation layer detected: installing the native darwin/arm64 build");
    }
    log_info!("[Platform] Detected {}", platform.to_string().green());
    interrupt.check()?;

    reporter.stage(Stage::Resolve);
    let version = version_resolver::resolve(settings.version.as_deref(), context.registry)?;
    interrupt.check()?;

    reporter.stage(Stage::Fetch);
    let asset = ReleaseAsset::resolve(BINARY_NAME, platform, &version, &settings.registry_base);
    let fetched = artifact_fetcher::fetch_artifact(&asset, &context.staging_root, interrupt)?;
    interrupt.check()?;

    reporter.stage(Stage::Install);
    let policy = InstallPolicy {
        override_dir: settings.install_dir.clone(),
        user_dir: path_helpers::user_bin_dir(platform.os()),
        system_dir: path_helpers::system_bin_dir(platform.os()),
        assume_yes: settings.assume_yes,
    };
    let target = binary_installer::choose_target(&policy, &asset.executable_name)?;
    let report = binary_installer::install(&fetched.executable, &target)?;
    drop(fetched);
    for warning in &report.warnings {
        reporter.warning(warning);
    }
    interrupt.check()?;

    reporter.stage(Stage::Configure);
    let shell = context
        .shell
        .or_else(|| ShellEnvironment::from_process(platform.os()));
    let outcome = match shell {
        Some(env) => path_configurer::configure(&env, &target.directory, settings.modify_path),
        None => PathOutcome::Manual {
            lines: path_configurer::export_lines(ShellKind::Posix, &target.directory),
            warning: Some(InstallWarning::PathConfig {
                reason: "could not determine the home directory".to_string(),
            }),
        },
    };
    if let PathOutcome::Manual {
        warning: Some(warning),
        ..
    } = &outcome
    {
        reporter.warning(warning);
    }

    Ok(InstallSummary {
        version,
        executable: target.executable_path,
        previous: report.previous,
        probe: report.probe,
        path: outcome,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::libs::errors::InstallerError;
    use crate::libs::path_configurer::MARKER;
    use crate::libs::test_support::{self, HttpFixture};
    use crate::schemas::platform::Os;
    use std::fs;
    use std::path::Path;

    struct Sandbox {
        _root: tempfile::TempDir,
        home: PathBuf,
        install_dir: PathBuf,
        staging_root: PathBuf,
    }

    impl Sandbox {
        fn new() -> Self {
            let root = tempfile::tempdir().unwrap();
            let home = root.path().join("home");
            let staging_root = root.path().join("staging");
            fs::create_dir_all(&home).unwrap();
            fs::create_dir_all(&staging_root).unwrap();
            Sandbox {
                install_dir: root.path().join("opt/chrysalis/bin"),
                home,
                staging_root,
                _root: root,
            }
        }

        fn settings(&self, fixture: &HttpFixture, version: Option<&str>) -> InstallSettings {
            InstallSettings {
                version: version.map(str::to_string),
                registry_base: fixture.base_url(),
                api_base: fixture.base_url(),
                install_dir: Some(self.install_dir.clone()),
                modify_path: true,
                assume_yes: false,
                debug: false,
            }
        }

        fn context<'a>(&self, registry: &'a dyn ReleaseRegistry, host: HostPlatform, shell: &str) -> RunContext<'a> {
            RunContext {
                host,
                registry,
                shell: Some(ShellEnvironment {
                    home: self.home.clone(),
                    shell: (!shell.is_empty()).then(|| shell.to_string()),
                    zdotdir: None,
                    path_var: Some(std::env::join_paths(["/usr/bin", "/bin"]).unwrap()),
                    host_os: Os::Linux,
                }),
                staging_root: self.staging_root.clone(),
                interrupt: Interrupt::detached(),
            }
        }

        fn staging_is_empty(&self) -> bool {
            fs::read_dir(&self.staging_root).unwrap().next().is_none()
        }
    }

    fn marker_count(file: &Path) -> usize {
        fs::read_to_string(file)
            .unwrap()
            .lines()
            .filter(|l| l.trim() == MARKER)
            .count()
    }

    #[cfg(unix)]
    #[test]
    fn end_to_end_install_is_idempotent() {
        let fixture = HttpFixture::start();
        fixture.route("/releases/latest", 200, br#"{"tag_name":"v1.2.3"}"#.to_vec());
        fixture.route(
            "/releases/download/v1.2.3/chrysalis-linux-amd64.tar.gz",
            200,
            test_support::tar_gz(&[(
                "chrysalis-v1.2.3/chrysalis",
                test_support::fake_chrysalis("v1.2.3").as_slice(),
                0o755,
            )]),
        );
        let sandbox = Sandbox::new();
        let registry = GitHubRegistry::new(fixture.base_url());
        let settings = sandbox.settings(&fixture, None);

        let mut reporter = Reporter::new();
        let first = execute(
            &settings,
            sandbox.context(&registry, HostPlatform::new("Linux", "x86_64", false), "/bin/bash"),
            &mut reporter,
        )
        .unwrap();
        assert_eq!(first.version.as_str(), "v1.2.3");
        assert_eq!(first.executable, sandbox.install_dir.join("chrysalis"));
        assert_eq!(first.probe.as_deref(), Some("chrysalis v1.2.3"));
        assert!(matches!(first.path, PathOutcome::Configured { .. }));
        assert!(reporter.warnings().is_empty());
        assert!(sandbox.staging_is_empty());

        let mut reporter = Reporter::new();
        let second = execute(
            &settings,
            sandbox.context(&registry, HostPlatform::new("Linux", "x86_64", false), "/bin/bash"),
            &mut reporter,
        )
        .unwrap();
        let bashrc = sandbox.home.join(".bashrc");
        assert_eq!(second.path, PathOutcome::AlreadyConfigured { file: bashrc.clone() });
        assert_eq!(second.previous.as_deref(), Some("chrysalis v1.2.3"));
        assert_eq!(marker_count(&bashrc), 1);
        assert_eq!(fixture.hits("/releases/latest"), 2);
    }

    #[cfg(unix)]
    #[test]
    fn explicit_version_skips_the_registry() {
        let fixture = HttpFixture::start();
        fixture.route(
            "/releases/download/v0.9.0/chrysalis-darwin-arm64.tar.gz",
            200,
            test_support::tar_gz(&[("chrysalis", test_support::fake_chrysalis("v0.9.0").as_slice(), 0o755)]),
        );
        let sandbox = Sandbox::new();
        let registry = GitHubRegistry::new(fixture.base_url());
        let mut settings = sandbox.settings(&fixture, Some("v0.9.0"));
        settings.modify_path = false;

        let mut reporter = Reporter::new();
        let summary = execute(
            &settings,
            sandbox.context(&registry, HostPlatform::new("Darwin", "x86_64", true), "/bin/zsh"),
            &mut reporter,
        )
        .unwrap();

        assert_eq!(fixture.hits("/releases/latest"), 0);
        assert_eq!(summary.probe.as_deref(), Some("chrysalis v0.9.0"));
        assert!(matches!(summary.path, PathOutcome::Manual { warning: None, .. }));
        assert_eq!(reporter.warnings().len(), 1);
        assert!(!sandbox.home.join(".zshrc").exists());
    }

    #[test]
    fn windows_host_fetches_the_zip_asset() {
        let fixture = HttpFixture::start();
        fixture.route(
            "/releases/download/v1.2.3/chrysalis-windows-amd64.exe.zip",
            200,
            test_support::zip(&[("chrysalis.exe", b"MZ")]),
        );
        let sandbox = Sandbox::new();
        let registry = GitHubRegistry::new(fixture.base_url());
        let settings = sandbox.settings(&fixture, Some("v1.2.3"));

        let mut reporter = Reporter::new();
        let summary = execute(
            &settings,
            sandbox.context(&registry, HostPlatform::new("Windows", "AMD64", false), "/bin/sh"),
            &mut reporter,
        )
        .unwrap();

        assert_eq!(fixture.hits("/releases/download/v1.2.3/chrysalis-windows-amd64.exe.zip"), 1);
        assert_eq!(summary.executable, sandbox.install_dir.join("chrysalis.exe"));
        assert_eq!(fs::read(&summary.executable).unwrap(), b"MZ");
        // A fake PE cannot be probed on the test host.
        assert!(reporter.warnings().iter().any(|w| w.starts_with("PermissionWarning")));
    }

    #[test]
    fn unsupported_platform_downloads_nothing() {
        let fixture = HttpFixture::start();
        let sandbox = Sandbox::new();
        let registry = GitHubRegistry::new(fixture.base_url());
        let settings = sandbox.settings(&fixture, Some("v1.2.3"));

        let mut reporter = Reporter::new();
        let result = execute(
            &settings,
            sandbox.context(&registry, HostPlatform::new("SunOS", "sparc", false), "/bin/sh"),
            &mut reporter,
        );

        let err = result.unwrap_err();
        assert!(matches!(err, InstallerError::UnsupportedPlatform { .. }));
        assert_eq!(err.exit_code(), 1);
        assert!(reporter
            .fatal_message(&err)
            .starts_with("UnsupportedPlatform during platform detection"));
        assert_eq!(fixture.total_hits(), 0);
        assert!(!sandbox.install_dir.exists());
    }

    #[test]
    fn failed_download_aborts_before_install() {
        let fixture = HttpFixture::start();
        let sandbox = Sandbox::new();
        let registry = GitHubRegistry::new(fixture.base_url());
        let settings = sandbox.settings(&fixture, Some("v9.9.9"));

        let mut reporter = Reporter::new();
        let err = execute(
            &settings,
            sandbox.context(&registry, HostPlatform::new("Linux", "aarch64", false), "/bin/bash"),
            &mut reporter,
        )
        .unwrap_err();

        assert_eq!(err.category(), "DownloadError");
        assert!(err
            .to_string()
            .contains("/releases/download/v9.9.9/chrysalis-linux-arm64.tar.gz"));
        assert_eq!(reporter.current_stage(), Some(Stage::Fetch));
        assert!(sandbox.staging_is_empty());
        assert!(!sandbox.install_dir.exists());
        assert!(!sandbox.home.join(".bashrc").exists());
    }

    /// Answers like a registry, but a signal "arrives" during the query.
    struct SignalDuringQuery {
        interrupt: Interrupt,
        answer: fn() -> Result<String>,
    }

    impl ReleaseRegistry for SignalDuringQuery {
        fn latest_tag(&self) -> Result<String> {
            self.interrupt.trip(2);
            (self.answer)()
        }
    }

    #[test]
    fn signal_during_resolution_stops_before_download() {
        let fixture = HttpFixture::start();
        let sandbox = Sandbox::new();
        let interrupt = Interrupt::detached();
        let registry = SignalDuringQuery {
            interrupt,
            answer: || Ok("v1.2.3".to_string()),
        };
        let settings = sandbox.settings(&fixture, None);
        let mut context = sandbox.context(&registry, HostPlatform::new("Linux", "x86_64", false), "/bin/bash");
        context.interrupt = interrupt;

        let mut reporter = Reporter::new();
        let err = execute(&settings, context, &mut reporter).unwrap_err();

        assert!(matches!(err, InstallerError::Interrupted(2)));
        assert_eq!(err.exit_code(), 130);
        assert_eq!(reporter.current_stage(), Some(Stage::Resolve));
        assert_eq!(fixture.total_hits(), 0);
        assert!(sandbox.staging_is_empty());
    }

    #[test]
    fn request_failing_after_a_signal_exits_as_interrupted() {
        let fixture = HttpFixture::start();
        let sandbox = Sandbox::new();
        let interrupt = Interrupt::detached();
        let registry = SignalDuringQuery {
            interrupt,
            answer: || {
                Err(InstallerError::VersionResolution {
                    url: "http://127.0.0.1/releases/latest".to_string(),
                    reason: "transport error: timed out reading response".to_string(),
                })
            },
        };
        let settings = sandbox.settings(&fixture, None);
        let mut context = sandbox.context(&registry, HostPlatform::new("Linux", "x86_64", false), "/bin/bash");
        context.interrupt = interrupt;

        let mut reporter = Reporter::new();
        let err = execute(&settings, context, &mut reporter).unwrap_err();
        assert_eq!(err.category(), "Interrupted");
        assert_eq!(err.exit_code(), 130);
    }
}
