//! Generates `include/sansrs.h`, the C header for the form factor ABI.
//!
//! Settings come from `cbindgen.toml`; the include guard and the version
//! macro are always set here so the header stays usable without it.

use std::env;
use std::path::PathBuf;

const HEADER: &str = "sansrs.h";
const INCLUDE_GUARD: &str = "SANSRS_H";

fn main() {
    let crate_dir = PathBuf::from(env::var("CARGO_MANIFEST_DIR").unwrap());
    let output_dir = crate_dir.join("include");
    std::fs::create_dir_all(&output_dir).unwrap();

    let config_path = crate_dir.join("cbindgen.toml");
    let config = if config_path.exists() {
        cbindgen::Config::from_file(&config_path).expect("invalid cbindgen.toml")
    } else {
        cbindgen::Config::default()
    };

    let version = format!(
        "#define SANSRS_VERSION \"{}\"",
        env::var("CARGO_PKG_VERSION").unwrap()
    );

    cbindgen::Builder::new()
        .with_crate(&crate_dir)
        .with_config(config)
        .with_language(cbindgen::Language::C)
        .with_include_guard(INCLUDE_GUARD)
        .with_after_include(version)
        .generate()
        .expect("Unable to generate sansrs C bindings")
        .write_to_file(output_dir.join(HEADER));

    println!("cargo:rerun-if-changed=src/");
    println!("cargo:rerun-if-changed=cbindgen.toml");
    println!("cargo:rerun-if-changed=build.rs");
}
