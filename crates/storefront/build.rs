//! Build script for storefront crate.
//!
//! Generates content-based hashes for static assets (CSS and JS) so they can
//! be served with immutable caching.

use std::env;
use std::fs;
use std::path::Path;

use sha2::{Digest, Sha256};

/// Assets to fingerprint: (path under `static/`, extension, env var name).
const ASSETS: &[(&str, &str, &str)] = &[
    ("css/main", "css", "CSS_HASH"),
    ("js/toast", "js", "JS_HASH"),
];

fn main() {
    let manifest_dir =
        env::var("CARGO_MANIFEST_DIR").expect("CARGO_MANIFEST_DIR must be set by Cargo");
    let static_dir = Path::new(&manifest_dir).join("static");

    for (stem, ext, var) in ASSETS {
        hash_asset(&static_dir, stem, ext, var);
    }
}

/// Hash one asset and copy it to a `derived/` sibling directory with the hash
/// in its filename.
///
/// Sets `var` for use with `env!(var)`. An empty hash means the asset was
/// missing at build time and the unhashed path should be used.
fn hash_asset(static_dir: &Path, stem: &str, ext: &str, var: &str) {
    let source = static_dir.join(format!("{stem}.{ext}"));

    println!("cargo:rerun-if-changed={}", source.display());

    let content = match fs::read(&source) {
        Ok(content) => content,
        Err(e) => {
            println!("cargo:warning=Could not read {}: {e}", source.display());
            println!("cargo:rustc-env={var}=");
            return;
        }
    };

    // First 8 hex chars of SHA256
    let mut hasher = Sha256::new();
    hasher.update(&content);
    let hash = format!("{:x}", hasher.finalize());
    let short_hash = &hash[..8];

    println!("cargo:rustc-env={var}={short_hash}");

    let Some(parent) = source.parent() else {
        return;
    };
    let derived_dir = parent.join("derived");
    fs::create_dir_all(&derived_dir).expect("Failed to create derived asset directory");

    let file_name = Path::new(stem)
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or(stem);
    let derived_path = derived_dir.join(format!("{file_name}.{short_hash}.{ext}"));
    fs::copy(&source, &derived_path).expect("Failed to copy asset to derived directory");
}
