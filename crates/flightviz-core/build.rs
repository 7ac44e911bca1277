// File: crates/flightviz-core/build.rs
// Summary: Links the Windows system libraries Skia needs for graph rendering.

fn main() {
    #[cfg(target_os = "windows")]
    {
        // registry lookups inside Skia's font manager
        println!("cargo:rustc-link-lib=advapi32");
    }
}
