// Low-level helpers shared by the installer stages.

// Archive extraction (tar.gz / zip).
pub mod compression;
// Locating, chmod-ing and probing the executable.
pub mod binary;
// Writability probes and atomic placement.
pub mod file_operations;
// HTTP agent and error descriptions.
pub mod network;
// `~` expansion and default install directories.
pub mod path_helpers;
// Raw host OS/arch strings and translation-layer detection.
pub mod platform;
