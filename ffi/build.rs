//! Generates `habits.h` for the mobile host.
//!
//! The header always lands in `OUT_DIR`. Set `HABITS_HEADER_DIR` to also
//! copy it somewhere the host build can pick it up.

use std::path::PathBuf;

const HEADER: &str = "habits.h";
const HEADER_DIR_VAR: &str = "HABITS_HEADER_DIR";

fn main() {
    println!("cargo:rerun-if-changed=src");
    println!("cargo:rerun-if-env-changed={HEADER_DIR_VAR}");

    let crate_dir = PathBuf::from(std::env::var("CARGO_MANIFEST_DIR").unwrap_or_else(|_| ".".to_string()));
    let Ok(out_dir) = std::env::var("OUT_DIR") else {
        println!("cargo:warning=OUT_DIR not set; skipping C header generation");
        return;
    };

    let generated = cbindgen::Builder::new()
        .with_crate(&crate_dir)
        .with_language(cbindgen::Language::C)
        .with_include_guard("HABITS_FFI_H")
        .generate();

    let bindings = match generated {
        Ok(bindings) => bindings,
        // A missing header must not break library builds.
        Err(e) => {
            println!("cargo:warning=skipping C header generation: {e}");
            return;
        }
    };

    bindings.write_to_file(PathBuf::from(out_dir).join(HEADER));

    if let Ok(dir) = std::env::var(HEADER_DIR_VAR) {
        let dir = PathBuf::from(dir);
        if std::fs::create_dir_all(&dir).is_ok() {
            bindings.write_to_file(dir.join(HEADER));
        } else {
            println!("cargo:warning=cannot create {}", dir.display());
        }
    }
}
