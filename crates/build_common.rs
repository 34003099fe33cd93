// README-to-rustdoc step shared by every crate's build script.
// Pull it in with: include!("../build_common.rs");
//
// The including file must import:
//   use std::env;
//   use std::fs;
//   use std::path::Path;

/// Rewrite a crate's README.md into `$OUT_DIR/README_GENERATED.md` so it can
/// serve as the crate-level rustdoc.
///
/// Links written for browsing the repo (`src/ports/mod.rs`) are turned into
/// module links rustdoc can resolve (`ports/mod`). A crate without a README
/// still gets an empty file, with a build warning, so `include_str!` holds.
fn process_readme_for_rustdoc(crate_dir: &str) {
    println!("cargo:rerun-if-changed=README.md");

    let readme_path = Path::new(crate_dir).join("README.md");
    let rustdoc = match fs::read_to_string(&readme_path) {
        Ok(content) => rustdoc_links(&content),
        Err(e) => {
            println!("cargo:warning=no README.md for crate docs ({e})");
            String::new()
        }
    };

    let out_dir = env::var("OUT_DIR").unwrap();
    fs::write(Path::new(&out_dir).join("README_GENERATED.md"), rustdoc).unwrap();
}

/// Strip the `src/` prefix and `.rs` suffix from relative Markdown links.
fn rustdoc_links(content: &str) -> String {
    content.replace("](src/", "](").replace(".rs)", ")")
}
