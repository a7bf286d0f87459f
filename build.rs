/// Riff build script.
///
/// The window shell only exists for Windows targets.  Other targets still
/// build the controller and its tests, but the binary refuses to start, so
/// say so at build time instead of letting it surprise someone at run time.
fn main() {
    let target_os = std::env::var("CARGO_CFG_TARGET_OS").unwrap_or_default();
    if target_os != "windows" {
        println!(
            "cargo:warning=riff: no GUI shell for target_os = {target_os:?}; \
             the binary will exit with an error"
        );
    }

    println!("cargo:rerun-if-changed=build.rs");
}
