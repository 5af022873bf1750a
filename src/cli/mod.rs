// Command-line surface of the installer.

// `clap` definitions for the arguments and flags.
pub mod args;
// Defaults and normalization on top of the parsed arguments.
pub mod settings;
