// Copyright © 2024 LabContent. All rights reserved.
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Command-line interface for LabContent
//!
//! This module builds the `labcontent` command and executes its
//! subcommands:
//!
//! - `check` (the default): validate every collection and report all
//!   violations
//! - `list <collection>`: print the records of one collection in order
//! - `show <collection> <slug>`: print one record as JSON, or its body as
//!   HTML
//!
//! # Examples
//!
//! ```
//! use labcontent::cli;
//!
//! let matches = cli::build().get_matches_from(vec![
//!     "labcontent",
//!     "--root",
//!     "site/content",
//!     "list",
//!     "publications",
//!     "--json",
//! ]);
//!
//! let list = matches.subcommand_matches("list").unwrap();
//! assert_eq!(list.get_one::<String>("collection").unwrap(), "publications");
//! assert!(list.get_flag("json"));
//! ```

use std::io::Write;
use std::path::{Path, PathBuf};

use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use log::{debug, info, LevelFilter};
use serde::Serialize;

use crate::body::render_html;
use crate::checker::IntegrityChecker;
use crate::collections::{
    LogEntries, OpenLab, People, Playground, Projects, Publications,
    ResearchAreas,
};
use crate::core::config::{
    Config, ConfigBuilder, DEFAULT_CONFIG_FILE, DEFAULT_ENV_PREFIX,
};
use crate::core::error::{LabContentError, Result};
use crate::core::traits::{Collection, Record};
use crate::loader::ContentLoader;
use crate::schema::CollectionKind;

/// The current version of LabContent, as defined in `Cargo.toml`.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Builds and configures the `labcontent` command-line interface.
pub fn build() -> Command {
    Command::new("labcontent")
        .author("LabContent Contributors")
        .about("Loads and checks the content collections of a research lab website.")
        .version(VERSION)
        .arg(
            Arg::new("root")
                .short('r')
                .long("root")
                .help("Content root holding one directory per collection")
                .value_parser(value_parser!(PathBuf))
                .global(true),
        )
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .help("Configuration file (defaults to ./labcontent.toml when present)")
                .value_parser(value_parser!(PathBuf))
                .global(true),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Increase log output (-v, -vv, -vvv)")
                .action(ArgAction::Count)
                .global(true),
        )
        .subcommand(
            Command::new("check")
                .about("Validate every collection and report all violations")
                .arg(
                    Arg::new("references")
                        .long("references")
                        .help("Also verify that playground items name existing projects")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(
            Command::new("list")
                .about("List the records of a collection in display order")
                .arg(collection_arg())
                .arg(
                    Arg::new("json")
                        .long("json")
                        .help("Print the records as JSON")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(
            Command::new("show")
                .about("Show one record by slug")
                .arg(collection_arg())
                .arg(
                    Arg::new("slug")
                        .help("Slug of the record")
                        .required(true)
                        .value_parser(value_parser!(String)),
                )
                .arg(
                    Arg::new("html")
                        .long("html")
                        .help("Print the body rendered to HTML instead of JSON")
                        .action(ArgAction::SetTrue),
                ),
        )
}

fn collection_arg() -> Arg {
    Arg::new("collection")
        .help("people, publications, projects, log, open-lab, playground or research-areas")
        .required(true)
        .value_parser(value_parser!(String))
}

/// Maps the `-v` count to a log level; `warn` when not given.
pub fn log_level(verbosity: u8) -> LevelFilter {
    match verbosity {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

/// Resolves the configuration for a command line.
///
/// Sources, lowest precedence first: defaults, the `--config` file (or
/// `labcontent.toml` in the working directory), environment variables with
/// `env_prefix`, and `--root`.
///
/// # Errors
///
/// Returns `LabContentError::ConfigError` if a source cannot be read or the
/// result is invalid.
pub fn load_config(
    matches: &ArgMatches,
    env_prefix: Option<&str>,
) -> Result<Config> {
    let mut builder = ConfigBuilder::new();

    match matches.get_one::<PathBuf>("config") {
        Some(path) => builder = builder.with_file(path),
        None if Path::new(DEFAULT_CONFIG_FILE).is_file() => {
            debug!("Using {DEFAULT_CONFIG_FILE} from the working directory");
            builder = builder.with_file(DEFAULT_CONFIG_FILE);
        }
        None => {}
    }
    if let Some(prefix) = env_prefix {
        builder = builder.with_env_prefix(prefix);
    }
    if let Some(root) = matches.get_one::<PathBuf>("root") {
        builder = builder.with_content_root(root);
    }
    builder.build()
}

/// Executes the parsed command line, reading configuration from the
/// environment.
///
/// Returns `Ok(false)` when the command ran but found problems (a failed
/// check), which callers map to a non-zero exit status.
///
/// # Errors
///
/// Configuration errors, unknown collections, unknown slugs and IO failures.
pub fn execute(
    matches: &ArgMatches,
    out: &mut dyn Write,
    err: &mut dyn Write,
) -> Result<bool> {
    let config = load_config(matches, Some(DEFAULT_ENV_PREFIX))?;
    execute_with(matches, &config, out, err)
}

/// Executes the parsed command line against an already resolved
/// configuration.
///
/// # Errors
///
/// See [`execute`].
pub fn execute_with(
    matches: &ArgMatches,
    config: &Config,
    out: &mut dyn Write,
    err: &mut dyn Write,
) -> Result<bool> {
    match matches.subcommand() {
        Some(("list", sub)) => {
            let kind = collection(sub)?;
            let loader = ContentLoader::from_config(config);
            dispatch_list(kind, &loader, sub.get_flag("json"), out)?;
            Ok(true)
        }
        Some(("show", sub)) => {
            let kind = collection(sub)?;
            let slug = sub
                .get_one::<String>("slug")
                .ok_or_else(|| LabContentError::internal_error("missing slug"))?;
            let loader = ContentLoader::from_config(config);
            dispatch_show(kind, &loader, slug, sub.get_flag("html"), out)?;
            Ok(true)
        }
        Some(("check", sub)) => {
            run_check(config, sub.get_flag("references"), out, err)
        }
        Some((other, _)) => Err(LabContentError::internal_error(format!(
            "unsupported command `{other}`"
        ))),
        None => run_check(config, false, out, err),
    }
}

fn collection(matches: &ArgMatches) -> Result<CollectionKind> {
    matches
        .get_one::<String>("collection")
        .ok_or_else(|| LabContentError::internal_error("missing collection"))?
        .parse()
}

fn run_check(
    config: &Config,
    references: bool,
    out: &mut dyn Write,
    err: &mut dyn Write,
) -> Result<bool> {
    let mut checker_config = config.clone();
    checker_config.checker.check_references |= references;
    info!(
        "Checking content under {}",
        checker_config.content_root.display()
    );

    let report = IntegrityChecker::from_config(&checker_config).run();
    if report.is_ok() {
        writeln!(out, "{report}")?;
    } else {
        writeln!(err, "{report}")?;
    }
    Ok(report.is_ok())
}

fn dispatch_list(
    kind: CollectionKind,
    loader: &ContentLoader,
    json: bool,
    out: &mut dyn Write,
) -> Result<()> {
    match kind {
        CollectionKind::People => list::<People>(loader, json, out),
        CollectionKind::Publications => list::<Publications>(loader, json, out),
        CollectionKind::Projects => list::<Projects>(loader, json, out),
        CollectionKind::Log => list::<LogEntries>(loader, json, out),
        CollectionKind::OpenLab => list::<OpenLab>(loader, json, out),
        CollectionKind::Playground => list::<Playground>(loader, json, out),
        CollectionKind::ResearchAreas => {
            list::<ResearchAreas>(loader, json, out)
        }
    }
}

fn dispatch_show(
    kind: CollectionKind,
    loader: &ContentLoader,
    slug: &str,
    html: bool,
    out: &mut dyn Write,
) -> Result<()> {
    match kind {
        CollectionKind::People => show::<People>(loader, slug, html, out),
        CollectionKind::Publications => {
            show::<Publications>(loader, slug, html, out)
        }
        CollectionKind::Projects => show::<Projects>(loader, slug, html, out),
        CollectionKind::Log => show::<LogEntries>(loader, slug, html, out),
        CollectionKind::OpenLab => show::<OpenLab>(loader, slug, html, out),
        CollectionKind::Playground => {
            show::<Playground>(loader, slug, html, out)
        }
        CollectionKind::ResearchAreas => {
            show::<ResearchAreas>(loader, slug, html, out)
        }
    }
}

fn list<C: Collection>(
    loader: &ContentLoader,
    json: bool,
    out: &mut dyn Write,
) -> Result<()> {
    let records = loader.load::<C>()?;
    debug!("Listing {} {} record(s)", records.len(), C::KIND);
    if json {
        writeln!(out, "{}", to_json(&records)?)?;
    } else {
        for record in &records {
            writeln!(out, "{}\t{}", record.slug(), record.title())?;
        }
    }
    Ok(())
}

fn show<C: Collection>(
    loader: &ContentLoader,
    slug: &str,
    html: bool,
    out: &mut dyn Write,
) -> Result<()> {
    let record = loader
        .get_by_slug::<C>(slug)?
        .ok_or_else(|| LabContentError::not_found(C::KIND, slug))?;
    if html {
        write!(out, "{}", render_html(record.body()))?;
    } else {
        writeln!(out, "{}", to_json(&record)?)?;
    }
    Ok(())
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value).map_err(|e| {
        LabContentError::internal_error(format!("Failed to serialise: {e}"))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn content_root() -> TempDir {
        let temp_dir = TempDir::new().unwrap();
        for kind in CollectionKind::ALL {
            fs::create_dir_all(temp_dir.path().join(kind.name())).unwrap();
        }
        fs::write(
            temp_dir.path().join("projects/atlas.mdx"),
            "---\nslug: atlas\ntitle: Atlas\nkind: tool\nsummary: Maps.\nstatus: active\nrelatedAreas: [vis]\n---\n\n# Atlas\n\nA **mapping** tool.\n",
        )
        .unwrap();
        temp_dir
    }

    fn run(args: &[&str]) -> (Result<bool>, String, String) {
        let matches = build().try_get_matches_from(args.iter().copied()).unwrap();
        let config = load_config(&matches, None).unwrap();
        let mut out = Vec::new();
        let mut err = Vec::new();
        let result = execute_with(&matches, &config, &mut out, &mut err);
        (
            result,
            String::from_utf8(out).unwrap(),
            String::from_utf8(err).unwrap(),
        )
    }

    #[test]
    fn test_check_is_the_default_command() {
        let root = content_root();
        let root = root.path().to_str().unwrap();
        let (result, out, _) = run(&["labcontent", "--root", root]);
        assert!(result.unwrap());
        assert_eq!(out.trim(), "Content sanity check passed.");
    }

    #[test]
    fn test_check_failure_goes_to_stderr() {
        let root = content_root();
        fs::write(root.path().join("log/bad.mdx"), "---\nslug: other\n---\n")
            .unwrap();
        let (result, out, err) =
            run(&["labcontent", "check", "--root", root.path().to_str().unwrap()]);
        assert!(!result.unwrap());
        assert!(out.is_empty());
        assert!(err.starts_with("Content sanity check failed:\n"));
        assert!(err.contains("- log/bad.mdx: slug \"other\" does not match filename \"bad\""));
    }

    #[test]
    fn test_list_and_show() {
        let root = content_root();
        let root = root.path().to_str().unwrap();

        let (result, out, _) = run(&["labcontent", "list", "projects", "--root", root]);
        assert!(result.unwrap());
        assert_eq!(out, "atlas\tAtlas\n");

        let (result, out, _) = run(&["labcontent", "show", "project", "atlas", "--root", root]);
        assert!(result.unwrap());
        let json: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(json["kind"], "tool");
        assert_eq!(json["relatedAreas"][0], "vis");

        let (_, out, _) =
            run(&["labcontent", "show", "projects", "atlas", "--html", "--root", root]);
        assert!(out.contains("<strong>mapping</strong>"));
    }

    #[test]
    fn test_unknown_slug_and_collection() {
        let root = content_root();
        let root = root.path().to_str().unwrap();

        let (result, _, _) = run(&["labcontent", "show", "people", "nobody", "--root", root]);
        assert!(matches!(result, Err(LabContentError::NotFound { .. })));

        let (result, _, _) = run(&["labcontent", "list", "blog", "--root", root]);
        assert!(matches!(result, Err(LabContentError::UnknownCollection(_))));
    }

    #[test]
    fn test_log_level_mapping() {
        assert_eq!(log_level(0), LevelFilter::Warn);
        assert_eq!(log_level(2), LevelFilter::Debug);
        assert_eq!(log_level(9), LevelFilter::Trace);
    }

    #[test]
    fn test_verbose_is_global() {
        let matches = build()
            .try_get_matches_from(["labcontent", "list", "log", "-vv"])
            .unwrap();
        assert_eq!(matches.get_count("verbose"), 2);
    }
}
