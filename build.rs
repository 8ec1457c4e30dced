//! Build script that reports missing system dependencies early.
//!
//! `OpenCV` must be installed for the `opencv` crate to link. The X server is
//! only needed at runtime (x11rb speaks the protocol directly), so its absence
//! is just a warning.

use std::env;
use std::process::Command;

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-env-changed=PKG_CONFIG_PATH");
    println!("cargo:rerun-if-env-changed=OPENCV_LINK_PATHS");
    println!("cargo:rerun-if-env-changed=OPENCV_INCLUDE_PATHS");

    if pkg_config(&["--version"]).is_none() {
        println!("cargo:warning=pkg-config not found; it is used to locate OpenCV.");
        println!("cargo:warning=On Ubuntu: sudo apt-get install pkg-config");
        println!("cargo:warning=On macOS: brew install pkg-config");
    }

    match ["opencv4", "opencv"]
        .iter()
        .find_map(|name| pkg_config(&["--modversion", name]))
    {
        Some(version) => println!("cargo:warning=Found OpenCV version: {version}"),
        None => {
            println!("cargo:warning=OpenCV not found via pkg-config. Camera capture needs it.");
            println!("cargo:warning=On Ubuntu: sudo apt-get install libopencv-dev clang libclang-dev");
            println!("cargo:warning=On macOS: brew install opencv");
        }
    }

    let target = env::var("TARGET").unwrap_or_default();
    if target.contains("linux") && pkg_config(&["--exists", "xrandr"]).is_none() {
        println!("cargo:warning=Xrandr development files not found; make sure the X server supports RandR 1.5 for multi-monitor discovery.");
    }
}

/// Run pkg-config and return its trimmed stdout on success
fn pkg_config(args: &[&str]) -> Option<String> {
    let output = Command::new("pkg-config").args(args).output().ok()?;
    output
        .status
        .success()
        .then(|| String::from_utf8_lossy(&output.stdout).trim().to_string())
}
