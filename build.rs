//! Puts `memory.x` where cortex-m-rt's `link.x` can find it.

use std::env;
use std::fs;
use std::path::PathBuf;

fn main() {
    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=build.rs");

    let out_dir = PathBuf::from(env::var("OUT_DIR").expect("OUT_DIR not set"));
    fs::write(out_dir.join("memory.x"), include_bytes!("memory.x")).expect("Failed to write memory.x");
    println!("cargo:rustc-link-search={}", out_dir.display());
}
