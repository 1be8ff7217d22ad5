//! Build script that reports system dependencies and model assets.
//!
//! `OpenCV` is located through pkg-config; missing libraries or model files
//! produce warnings with installation hints instead of failing the build.

use std::env;
use std::path::Path;
use std::process::Command;

const MODEL_ASSETS: [&str; 2] = ["assets/face_detection_short_range.onnx", "assets/face_landmark.onnx"];

fn main() {
    println!("cargo:rerun-if-changed=build.rs");

    check_pkg_config();
    check_opencv();
    check_model_assets();

    println!(
        "cargo:rustc-env=BUILD_TARGET={}",
        env::var("TARGET").unwrap_or_default()
    );
}

fn pkg_config_version(package: &str) -> Option<String> {
    let output = Command::new("pkg-config").args(["--modversion", package]).output().ok()?;
    output
        .status
        .success()
        .then(|| String::from_utf8_lossy(&output.stdout).trim().to_string())
}

fn check_opencv() {
    println!("cargo:rerun-if-env-changed=PKG_CONFIG_PATH");
    println!("cargo:rerun-if-env-changed=OPENCV_LINK_PATHS");
    println!("cargo:rerun-if-env-changed=OPENCV_INCLUDE_PATHS");

    match pkg_config_version("opencv4").or_else(|| pkg_config_version("opencv")) {
        Some(version) => println!("cargo:warning=Found OpenCV version: {version}"),
        None => {
            println!("cargo:warning=OpenCV not found via pkg-config. Make sure OpenCV is installed.");
            println!("cargo:warning=On Ubuntu: sudo apt-get install libopencv-dev");
            println!("cargo:warning=On macOS: brew install opencv");
        }
    }
}

fn check_pkg_config() {
    let found = Command::new("pkg-config")
        .arg("--version")
        .output()
        .is_ok_and(|output| output.status.success());

    if !found {
        println!("cargo:warning=pkg-config not found. This is required to find system libraries.");
        println!("cargo:warning=On Ubuntu: sudo apt-get install pkg-config");
        println!("cargo:warning=On macOS: brew install pkg-config");
    }
}

fn check_model_assets() {
    let manifest_dir = env::var("CARGO_MANIFEST_DIR").unwrap_or_default();
    for asset in MODEL_ASSETS {
        println!("cargo:rerun-if-changed={asset}");
        if !Path::new(&manifest_dir).join(asset).exists() {
            println!("cargo:warning=Model file {asset} is missing; download it before running the tracker");
        }
    }
}
