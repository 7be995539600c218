//! Build script for ledboard-device
//!
//! Embeds `LEDBOARD_*` entries from the nearest `.env` file as compile-time
//! environment variables, read back with `option_env!`. Keeps the NewsAPI
//! key out of the source tree and out of the runtime config file.

use std::env;
use std::path::PathBuf;

const PREFIX: &str = "LEDBOARD_";

const KEYS: [&str; 3] = [
    "LEDBOARD_NEWS_API_KEY",
    "LEDBOARD_LOCATION",
    "LEDBOARD_TIME_ZONE",
];

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    for key in KEYS {
        println!("cargo:rerun-if-env-changed={key}");
    }

    let Some(path) = find_env_file() else {
        return;
    };
    println!("cargo:rerun-if-changed={}", path.display());

    let entries = dotenvy::from_path_iter(&path)
        .unwrap_or_else(|e| panic!("cannot read {}: {e}", path.display()));
    for entry in entries {
        let (key, value) = entry.unwrap_or_else(|e| panic!("malformed {}: {e}", path.display()));
        // Values exported in the build environment win over the file.
        if key.starts_with(PREFIX) && env::var_os(&key).is_none() {
            println!("cargo:rustc-env={key}={value}");
        }
    }
}

/// `.env` in the crate directory or any parent (the workspace root).
fn find_env_file() -> Option<PathBuf> {
    let manifest_dir = PathBuf::from(env::var_os("CARGO_MANIFEST_DIR")?);
    manifest_dir
        .ancestors()
        .map(|dir| dir.join(".env"))
        .find(|path| path.is_file())
}
