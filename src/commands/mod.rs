// Register application commands.
// The installer has a single action; it lives in its own module so `main`
// stays limited to argument parsing and process setup.

// Runs the detect, resolve, fetch, install and configure pipeline.
pub mod install;
