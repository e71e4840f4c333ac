fn main() {
    // Debug builds hot-reload templates from disk; release builds carry them in the binary.
    let profile = std::env::var("PROFILE").unwrap_or_default();

    if profile == "release" {
        minijinja_embed::embed_templates!("templates");
    } else {
        println!("cargo:rerun-if-changed=build.rs");
    }
}
