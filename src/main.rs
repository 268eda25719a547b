//! Kodegen Bundler Packager - package manager publishing for released distributions.
//!
//! Renders Chocolatey packages for each configured distribution, packs them with
//! `choco` and pushes them, or hands them to a remote build repository.

use std::process;

#[tokio::main]
async fn main() {
    // Initialize logging
    env_logger::init();

    // Run CLI and get exit code
    let exit_code = match kodegen_bundler_packager::cli::run().await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {}", e);
            1
        }
    };

    process::exit(exit_code);
}
