// Copyright © 2024 LabContent. All rights reserved.
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Build script that aborts early on toolchains older than the minimum
//! supported Rust version.

use std::process;

/// Minimum supported Rust version, kept in sync with `rust-version`.
const MIN_RUST_VERSION: &str = "1.74.0";

fn main() {
    println!("cargo:rerun-if-changed=build.rs");

    match version_check::is_min_version(MIN_RUST_VERSION) {
        Some(true) => {}
        Some(false) => {
            eprintln!(
                "labcontent requires Rust {MIN_RUST_VERSION} or newer; please upgrade your toolchain"
            );
            process::exit(1);
        }
        None => {
            println!(
                "cargo:warning=unable to determine the rustc version, assuming {MIN_RUST_VERSION}+"
            );
        }
    }
}
