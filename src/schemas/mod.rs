// Data structures shared by the installer stages.

// Canonical platform identifier (`os/arch`).
pub mod platform;
// Release tag, registry response and derived download asset.
pub mod release;
// The chosen installation destination.
pub mod install_target;
// Shell kinds, the captured shell environment and the detected profile.
pub mod shell_profile;
