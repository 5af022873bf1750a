// Register the installer's building blocks.
// One module per pipeline stage, plus the shared error, interrupt and
// reporting plumbing.

// Fatal errors and recoverable warnings.
pub mod errors;
// SIGINT/SIGTERM bookkeeping polled between stages.
pub mod interrupt;
// Stage 1: raw host strings to a platform identifier.
pub mod platform_detector;
// Stage 2: explicit tag or the registry's latest release.
pub mod version_resolver;
// Stage 3: download and unpack into a staging directory.
pub mod artifact_fetcher;
// Stage 4: install-directory policy and placement.
pub mod binary_installer;
// Stage 5: shell configuration files.
pub mod path_configurer;
// Banners, warnings and the final summary.
pub mod reporter;
// Low-level helpers.
pub mod utilities;

#[cfg(test)]
pub(crate) mod test_support;
