use std::env;
use std::fs;
use std::path::Path;

/// Pull the version string out of a `name = "x.y"` or `name = { version = "x.y", ... }` line.
fn dependency_version(line: &str, name: &str) -> Option<String> {
    let rest = line.strip_prefix(name)?.trim_start();
    let rest = rest.strip_prefix('=')?.trim_start();
    if let Some(version_part) = rest.split("version = ").nth(1) {
        return version_part.split('"').nth(1).map(str::to_string);
    }
    rest.split('"').nth(1).map(str::to_string)
}

fn main() {
    // Versions are pinned in the workspace Cargo.toml
    let manifest_dir = env::var("CARGO_MANIFEST_DIR").unwrap();
    let workspace_cargo_toml_path = Path::new(&manifest_dir).join("../../Cargo.toml");
    let workspace_cargo_toml = fs::read_to_string(&workspace_cargo_toml_path).unwrap_or_default();

    let mut egui_version = "unknown".to_string();
    let mut stl_io_version = "unknown".to_string();
    let mut reqwest_version = "unknown".to_string();

    for line in workspace_cargo_toml.lines() {
        if let Some(v) = dependency_version(line, "egui ") {
            egui_version = v;
        } else if let Some(v) = dependency_version(line, "stl_io ") {
            stl_io_version = v;
        } else if let Some(v) = dependency_version(line, "reqwest ") {
            reqwest_version = v;
        }
    }

    // These will be available as env!() variables at compile time
    println!("cargo:rustc-env=EGUI_VERSION={}", egui_version);
    println!("cargo:rustc-env=STL_IO_VERSION={}", stl_io_version);
    println!("cargo:rustc-env=REQWEST_VERSION={}", reqwest_version);
    println!("cargo:rerun-if-changed={}", workspace_cargo_toml_path.display());
}
