//! Build script for the MusicMood CLI.
//!
//! Copies the `.env.example` configuration template from the crate root into
//! the user's local data directory so the expected configuration keys are
//! discoverable after installation:
//! - Linux: `~/.local/share/musicmood/.env.example`
//! - macOS: `~/Library/Application Support/musicmood/.env.example`
//! - Windows: `%LOCALAPPDATA%/musicmood/.env.example`
//!
//! Any I/O problem is reported as a cargo warning; the build never fails
//! because of the template.

use std::{env, fs, path::PathBuf};

fn main() {
    println!("cargo:rerun-if-changed=.env.example");

    if let Err(e) = copy_env_example() {
        println!("cargo:warning=could not install .env.example: {}", e);
    }
}

fn copy_env_example() -> Result<(), Box<dyn std::error::Error>> {
    let manifest_dir = PathBuf::from(env::var("CARGO_MANIFEST_DIR")?);
    let env_example_path = manifest_dir.join(".env.example");

    if !env_example_path.is_file() {
        println!(
            "cargo:warning=.env.example not found at {}",
            env_example_path.display()
        );
        return Ok(());
    }

    let mut out_dir = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    out_dir.push("musicmood");
    fs::create_dir_all(&out_dir)?;

    let contents = fs::read_to_string(&env_example_path)?;
    fs::write(out_dir.join(".env.example"), contents)?;

    Ok(())
}
