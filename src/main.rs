// Copyright © 2024 LabContent. All rights reserved.
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! # LabContent CLI
//!
//! Entry point of the `labcontent` binary. It initialises the logger from the
//! `-v` count (or `RUST_LOG`), runs the selected command and maps the outcome
//! to the process exit status.

use std::io;
use std::process::ExitCode;

use anyhow::Context;
use clap::ArgMatches;
use labcontent::cli;
use log::debug;

/// Sets up `env_logger`. An explicit `-v` wins over `RUST_LOG`.
fn init_logger(verbosity: u8) {
    let mut builder = env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("warn"),
    );
    if verbosity > 0 {
        let _ = builder.filter_level(cli::log_level(verbosity));
    }
    let _ = builder.format_timestamp(None).try_init();
}

fn run(matches: &ArgMatches) -> anyhow::Result<bool> {
    let stdout = io::stdout();
    let stderr = io::stderr();
    cli::execute(matches, &mut stdout.lock(), &mut stderr.lock())
        .context("labcontent failed")
}

/// The main entry point for the LabContent CLI.
fn main() -> ExitCode {
    let matches = cli::build().get_matches();
    init_logger(matches.get_count("verbose"));
    debug!("labcontent {}", cli::VERSION);

    match run(&matches) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(err) => {
            eprintln!("Error: {err:#}");
            ExitCode::FAILURE
        }
    }
}
