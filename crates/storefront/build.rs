//! Build script for the menu site.
//!
//! Hashes `static/css/main.css` so the stylesheet URL changes whenever its
//! content does and browsers can cache it indefinitely. The hashed copy is
//! written to `static/css/derived/main.{hash}.css`.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};

/// Hex digits of the digest kept in the file name.
const HASH_LEN: usize = 8;

fn main() {
    let manifest_dir =
        PathBuf::from(env::var("CARGO_MANIFEST_DIR").expect("CARGO_MANIFEST_DIR must be set by Cargo"));
    let css_dir = manifest_dir.join("static/css");

    let hash = hash_stylesheet(&css_dir).unwrap_or_default();
    println!("cargo:rustc-env=CSS_HASH={hash}");
}

/// Hash `main.css` and publish the hashed copy. Returns `None` (after a
/// build warning) when the stylesheet is missing.
fn hash_stylesheet(css_dir: &Path) -> Option<String> {
    let css_path = css_dir.join("main.css");
    println!("cargo:rerun-if-changed={}", css_path.display());

    let content = match fs::read(&css_path) {
        Ok(content) => content,
        Err(e) => {
            println!("cargo:warning=Could not read main.css: {e}");
            return None;
        }
    };

    let digest = format!("{:x}", Sha256::digest(&content));
    let hash = digest.get(..HASH_LEN)?.to_string();

    let derived_dir = css_dir.join("derived");
    fs::create_dir_all(&derived_dir).expect("Failed to create derived CSS directory");
    fs::write(derived_dir.join(format!("main.{hash}.css")), &content)
        .expect("Failed to write hashed stylesheet");

    Some(hash)
}
