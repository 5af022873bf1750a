// Reporter: user-facing progress for the install pipeline.
//
// Prints a banner at every stage boundary, collects warnings for the final
// summary, formats fatal errors with their category and the stage they hit,
// and renders the closing summary.

use crate::libs::errors::{InstallWarning, InstallerError};
use crate::libs::path_configurer::PathOutcome;
use crate::schemas::release::ReleaseVersion;
use crate::{log_error, log_warn};
use colored::Colorize;
use std::fmt;
use std::path::PathBuf;

/// The five pipeline stages, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Detect,
    Resolve,
    Fetch,
    Install,
    Configure,
}

impl Stage {
    pub const COUNT: usize = 5;

    /// 1-based position shown in the banner.
    pub fn number(self) -> usize {
        match self {
            Stage::Detect => 1,
            Stage::Resolve => 2,
            Stage::Fetch => 3,
            Stage::Install => 4,
            Stage::Configure => 5,
        }
    }

    /// Banner title.
    pub fn title(self) -> &'static str {
        match self {
            Stage::Detect => "Detecting platform",
            Stage::Resolve => "Resolving version",
            Stage::Fetch => "Fetching release artifact",
            Stage::Install => "Installing executable",
            Stage::Configure => "Configuring shell PATH",
        }
    }
}

/// Noun form used in "<Category> during <stage>".
impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Stage::Detect => "platform detection",
            Stage::Resolve => "version resolution",
            Stage::Fetch => "artifact download",
            Stage::Install => "installation",
            Stage::Configure => "shell configuration",
        };
        f.write_str(label)
    }
}

/// Everything the final summary reports.
#[derive(Debug, Clone)]
pub struct InstallSummary {
    pub version: ReleaseVersion,
    pub executable: PathBuf,
    /// `--version` output of the binary this run replaced.
    pub previous: Option<String>,
    /// `--version` output of the installed binary.
    pub probe: Option<String>,
    pub path: PathOutcome,
}

#[derive(Debug, Default)]
pub struct Reporter {
    current: Option<Stage>,
    warnings: Vec<String>,
}

impl Reporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks the start of `stage` and prints its banner.
    pub fn stage(&mut self, stage: Stage) {
        self.current = Some(stage);
        eprintln!();
        eprintln!(
            "{} {}",
            format!("[{}/{}]", stage.number(), Stage::COUNT).bright_blue().bold(),
            stage.title().bold()
        );
    }

    pub fn current_stage(&self) -> Option<Stage> {
        self.current
    }

    /// Prints a recoverable warning and keeps it for the summary.
    pub fn warning(&mut self, warning: &InstallWarning) {
        let line = format!("{}: {}", warning.category(), warning);
        log_warn!("{}", line);
        self.warnings.push(line);
    }

    /// Keeps a warning that has already been printed by the stage itself.
    pub fn record(&mut self, message: impl Into<String>) {
        self.warnings.push(message.into());
    }

    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    /// `<Category> during <stage>: <message>`
    pub fn fatal_message(&self, error: &InstallerError) -> String {
        match self.current {
            Some(stage) => format!("{} during {}: {}", error.category(), stage, error),
            None => format!("{}: {}", error.category(), error),
        }
    }

    /// Prints a fatal error; the `[ERROR]` prefix comes from the logger.
    pub fn fatal(&self, error: &InstallerError) {
        eprintln!();
        log_error!("{}", self.fatal_message(error));
    }

    /// Plain-text summary lines, one fact per line.
    pub fn summary_lines(&self, summary: &InstallSummary) -> Vec<String> {
        let mut lines = vec![
            format!("Version:    {}", summary.version),
            format!("Executable: {}", summary.executable.display()),
        ];
        if let Some(previous) = &summary.previous {
            lines.push(format!("Replaced:   {previous}"));
        }
        lines.push(format!(
            "Probe:      {}",
            summary.probe.as_deref().unwrap_or("not verified")
        ));

        match &summary.path {
            PathOutcome::AlreadyConfigured { file } => {
                lines.push(format!("Shell:      already configured in {}", file.display()));
            }
            PathOutcome::AlreadyOnPath => {
                lines.push("Shell:      install directory already on PATH".to_string());
            }
            PathOutcome::Configured { file, apply_command } => {
                lines.push(format!("Shell:      PATH updated in {}", file.display()));
                lines.push(format!("Run `{apply_command}` or open a new terminal to use chrysalis."));
            }
            PathOutcome::Manual { lines: manual, .. } => {
                lines.push("Shell:      not modified; add these lines to your shell configuration:".to_string());
                lines.extend(manual.iter().map(|l| format!("    {l}")));
            }
        }

        lines.push(format!("Warnings:   {}", self.warnings.len()));
        lines
    }

    /// Prints the closing summary.
    pub fn print_summary(&self, summary: &InstallSummary) {
        let rule = "=".repeat(40);
        eprintln!();
        eprintln!("{}", rule.bright_blue());
        eprintln!("  {} {}", "✓".green(), "chrysalis installed".bright_yellow().bold());
        eprintln!("{}", rule.bright_blue());
        for line in self.summary_lines(summary) {
            eprintln!("  {line}");
        }
        for warning in &self.warnings {
            eprintln!("  {} {}", "⚠".yellow(), warning.yellow());
        }
        eprintln!("{}", rule.bright_blue());
    }
}
