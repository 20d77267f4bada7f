use std::path::PathBuf;

const HEADER: &str = "card_shuffler.h";

fn main() {
    println!("cargo:rerun-if-changed=src");
    println!("cargo:rerun-if-env-changed=SHUFFLER_HEADER_DIR");

    let crate_dir = PathBuf::from(std::env::var("CARGO_MANIFEST_DIR").unwrap());
    let out_dir = PathBuf::from(std::env::var("OUT_DIR").unwrap());

    let bindings = match cbindgen::Builder::new()
        .with_crate(&crate_dir)
        .with_language(cbindgen::Language::C)
        .with_include_guard("CARD_SHUFFLER_H")
        .generate()
    {
        Ok(bindings) => bindings,
        // A header failure should not block building the library itself.
        Err(e) => {
            println!("cargo:warning=could not generate C header: {e}");
            return;
        }
    };

    bindings.write_to_file(out_dir.join(HEADER));

    // Opt-in copy for C builds that want the header at a fixed path.
    if let Some(dir) = std::env::var_os("SHUFFLER_HEADER_DIR") {
        let dir = PathBuf::from(dir);
        match std::fs::create_dir_all(&dir) {
            Ok(()) => {
                bindings.write_to_file(dir.join(HEADER));
            }
            Err(e) => println!("cargo:warning=could not create {}: {e}", dir.display()),
        }
    }
}
