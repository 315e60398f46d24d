// Copyright © 2024 LabContent. All rights reserved.
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! # Content Integrity Checker
//!
//! Validates every file of every collection against the schema registry and
//! reports all problems in a single pass. Nothing here stops early: a bad
//! file or an unreadable directory becomes a [`Violation`] and the run moves
//! on.
//!
//! The checker works on raw files and shares no code path with the loaders
//! beyond the parser, the validators and the registry.
//!
//! ## Example
//!
//! ```rust,no_run
//! use labcontent::checker::IntegrityChecker;
//! use labcontent::core::config::CheckerConfig;
//!
//! let report = IntegrityChecker::new("content", CheckerConfig::default()).run();
//! if !report.is_ok() {
//!     eprintln!("{report}");
//! }
//! ```

use std::collections::HashSet;
use std::fmt;
use std::path::{Path, PathBuf};

use log::{debug, info};

use crate::core::config::{CheckerConfig, Config};
use crate::frontmatter::{Document, FieldValue, FrontmatterStatus};
use crate::loader::DEFAULT_EXTENSION;
use crate::schema::{CollectionKind, CollectionSchema, FieldKind, SCHEMAS};
use crate::source::{file_stem, list_content_files, read_content};
use crate::validators::{is_non_empty_string, validate_field};

/// Headline printed when no violations are found.
pub const PASSED_MESSAGE: &str = "Content sanity check passed.";

/// Headline printed before the list of violations.
pub const FAILED_MESSAGE: &str = "Content sanity check failed:";

/// What is wrong with a file or collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViolationKind {
    /// No usable metadata block; remaining checks were skipped.
    MissingFrontmatter {
        /// Parser message when a block was present but unusable.
        reason: Option<String>,
    },
    /// `slug` is absent or blank.
    MissingSlug,
    /// `slug` differs from the file name.
    SlugMismatch {
        /// Declared slug.
        slug: String,
        /// File name without extension.
        file_stem: String,
    },
    /// A required field is absent or has the wrong type.
    InvalidField {
        /// Front-matter key.
        field: &'static str,
        /// Declared type.
        expected: FieldKind,
    },
    /// Another file of the collection already declared this slug.
    DuplicateSlug(String),
    /// A collection-specific rule failed.
    Custom(String),
    /// The file could not be read.
    UnreadableFile(String),
    /// The collection directory could not be listed.
    UnreadableCollection(String),
    /// A reference names a record that does not exist.
    BrokenReference {
        /// Front-matter key holding the reference.
        field: &'static str,
        /// Referenced slug.
        target: String,
        /// Collection the slug should exist in.
        collection: CollectionKind,
    },
}

impl fmt::Display for ViolationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ViolationKind::MissingFrontmatter { reason: None } => {
                write!(f, "missing frontmatter")
            }
            ViolationKind::MissingFrontmatter {
                reason: Some(reason),
            } => write!(f, "missing frontmatter ({reason})"),
            ViolationKind::MissingSlug => {
                write!(f, "missing required field \"slug\"")
            }
            ViolationKind::SlugMismatch { slug, file_stem } => write!(
                f,
                "slug \"{slug}\" does not match filename \"{file_stem}\""
            ),
            ViolationKind::InvalidField { field, expected } => {
                write!(f, "invalid or missing \"{field}\" ({expected})")
            }
            ViolationKind::DuplicateSlug(slug) => {
                write!(f, "duplicate slug \"{slug}\"")
            }
            ViolationKind::Custom(message)
            | ViolationKind::UnreadableFile(message)
            | ViolationKind::UnreadableCollection(message) => {
                f.write_str(message)
            }
            ViolationKind::BrokenReference {
                field,
                target,
                collection,
            } => write!(
                f,
                "\"{field}\" refers to \"{target}\", which is not in {collection}"
            ),
        }
    }
}

/// One problem found by the checker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// Path relative to the content root, e.g. `people/jdoe.mdx`; the
    /// collection name for collection-level problems.
    pub file: String,
    /// What is wrong.
    pub kind: ViolationKind,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ViolationKind::UnreadableCollection(message) => {
                write!(f, "Failed to validate {}: {message}", self.file)
            }
            kind => write!(f, "{}: {kind}", self.file),
        }
    }
}

/// Outcome of a full run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CheckReport {
    /// Every violation, in collection then file-name order.
    pub violations: Vec<Violation>,
    /// Number of content files examined.
    pub files_checked: usize,
}

impl CheckReport {
    /// Whether no violations were found.
    pub fn is_ok(&self) -> bool {
        self.violations.is_empty()
    }

    /// Number of violations.
    pub fn len(&self) -> usize {
        self.violations.len()
    }

    /// Whether there are no violations.
    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    /// Violations as display lines.
    pub fn messages(&self) -> Vec<String> {
        self.violations.iter().map(ToString::to_string).collect()
    }
}

impl fmt::Display for CheckReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_ok() {
            return f.write_str(PASSED_MESSAGE);
        }
        writeln!(f, "{FAILED_MESSAGE}")?;
        for violation in &self.violations {
            write!(f, "\n- {violation}")?;
        }
        Ok(())
    }
}

/// A `relatedProject` value waiting for the reference pass.
#[derive(Debug)]
struct PendingReference {
    file: String,
    target: String,
}

/// Runs the schema checks over a content root.
#[derive(Debug, Clone)]
pub struct IntegrityChecker {
    root: PathBuf,
    extension: String,
    options: CheckerConfig,
}

impl IntegrityChecker {
    /// A checker over `root`.
    pub fn new<P: AsRef<Path>>(root: P, options: CheckerConfig) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            extension: DEFAULT_EXTENSION.to_string(),
            options,
        }
    }

    /// A checker configured from `config`.
    pub fn from_config(config: &Config) -> Self {
        Self::new(&config.content_root, config.checker)
            .with_extension(&config.extension)
    }

    /// Sets the content file extension (without the dot).
    pub fn with_extension<S: Into<String>>(mut self, extension: S) -> Self {
        self.extension = extension.into();
        self
    }

    /// Content root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Checks every collection and returns all violations.
    pub fn run(&self) -> CheckReport {
        let mut report = CheckReport::default();
        let mut project_slugs = HashSet::new();
        let mut references = Vec::new();

        for schema in &SCHEMAS {
            let slugs = self.check_collection(schema, &mut report, &mut references);
            if schema.kind == CollectionKind::Projects {
                project_slugs = slugs;
            }
        }

        if self.options.check_references {
            for reference in references {
                if !project_slugs.contains(&reference.target) {
                    report.violations.push(Violation {
                        file: reference.file,
                        kind: ViolationKind::BrokenReference {
                            field: "relatedProject",
                            target: reference.target,
                            collection: CollectionKind::Projects,
                        },
                    });
                }
            }
        }

        info!(
            "Checked {} file(s), {} violation(s)",
            report.files_checked,
            report.violations.len()
        );
        report
    }

    /// Checks one collection, appending to `report`. Returns the slugs seen.
    fn check_collection(
        &self,
        schema: &CollectionSchema,
        report: &mut CheckReport,
        references: &mut Vec<PendingReference>,
    ) -> HashSet<String> {
        let mut seen = HashSet::new();
        let dir = self.root.join(schema.directory());
        let files = match list_content_files(&dir, &self.extension) {
            Ok(files) => files,
            Err(e) => {
                report.violations.push(Violation {
                    file: schema.directory().to_string(),
                    kind: ViolationKind::UnreadableCollection(e.to_string()),
                });
                return seen;
            }
        };
        debug!("Checking {} file(s) in {}", files.len(), dir.display());

        for path in files {
            report.files_checked += 1;
            let relative = format!(
                "{}/{}",
                schema.directory(),
                path.file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default()
            );
            let mut push = |kind| {
                report.violations.push(Violation {
                    file: relative.clone(),
                    kind,
                })
            };

            let document = match read_content(&path) {
                Ok(raw) => Document::parse(&raw),
                Err(e) => {
                    push(ViolationKind::UnreadableFile(e.to_string()));
                    continue;
                }
            };

            match document.status {
                FrontmatterStatus::Present => {}
                FrontmatterStatus::Missing => {
                    push(ViolationKind::MissingFrontmatter { reason: None });
                    continue;
                }
                FrontmatterStatus::Malformed(reason) => {
                    push(ViolationKind::MissingFrontmatter {
                        reason: Some(reason),
                    });
                    continue;
                }
            }
            let metadata = &document.metadata;

            let slug = metadata
                .get("slug")
                .filter(|v| is_non_empty_string(Some(*v)))
                .and_then(FieldValue::as_text);
            match slug {
                None => push(ViolationKind::MissingSlug),
                Some(slug) => {
                    let stem = file_stem(&path);
                    if slug != stem {
                        push(ViolationKind::SlugMismatch {
                            slug: slug.to_string(),
                            file_stem: stem,
                        });
                    }
                }
            }

            for (field, expected) in schema.required_fields() {
                if !validate_field(expected, metadata.get(field)) {
                    push(ViolationKind::InvalidField { field, expected });
                }
            }

            if let Some(slug) = slug {
                if !seen.insert(slug.to_string()) {
                    push(ViolationKind::DuplicateSlug(slug.to_string()));
                }
            }

            for message in schema.run_custom_check(metadata, &relative) {
                push(ViolationKind::Custom(message));
            }

            if schema.kind == CollectionKind::Playground {
                if let Some(target) = metadata.string("relatedProject") {
                    references.push(PendingReference {
                        file: relative.clone(),
                        target,
                    });
                }
            }
        }
        seen
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    const PERSON: &str = "---\nslug: jdoe\nname: Jane Doe\nrole: faculty\nstatus: current\norder: 1\nresearchAreas: [vis]\ntags: [hci]\n---\n\nBio.\n";

    /// A content root with every collection directory present and empty.
    fn content_root() -> TempDir {
        let temp_dir = TempDir::new().unwrap();
        for kind in CollectionKind::ALL {
            fs::create_dir_all(temp_dir.path().join(kind.name())).unwrap();
        }
        temp_dir
    }

    fn write(root: &Path, relative: &str, content: &str) {
        fs::write(root.join(relative), content).unwrap();
    }

    fn run(root: &Path) -> CheckReport {
        IntegrityChecker::new(root, CheckerConfig::default()).run()
    }

    #[test]
    fn test_valid_content_passes() {
        let root = content_root();
        write(root.path(), "people/jdoe.mdx", PERSON);
        write(
            root.path(),
            "open-lab/data.mdx",
            "---\nslug: data\ntitle: Data\nkind: dataset\ndate: 2024-01-01\n---\n",
        );
        let report = run(root.path());
        assert!(report.is_ok(), "{report}");
        assert_eq!(report.files_checked, 2);
        assert_eq!(report.to_string(), PASSED_MESSAGE);
    }

    #[test]
    fn test_duplicate_slug_reported_once_on_second_file() {
        let root = content_root();
        write(root.path(), "people/jdoe.mdx", PERSON);
        write(root.path(), "people/zz-copy.mdx", PERSON);
        let report = run(root.path());

        let duplicates: Vec<_> = report
            .violations
            .iter()
            .filter(|v| matches!(v.kind, ViolationKind::DuplicateSlug(_)))
            .collect();
        assert_eq!(duplicates.len(), 1);
        assert_eq!(duplicates[0].file, "people/zz-copy.mdx");
        assert_eq!(
            duplicates[0].to_string(),
            "people/zz-copy.mdx: duplicate slug \"jdoe\""
        );
    }

    #[test]
    fn test_slug_must_match_file_name() {
        let root = content_root();
        write(root.path(), "people/JDoe.mdx", PERSON);
        let report = run(root.path());
        assert_eq!(
            report.messages(),
            vec!["people/JDoe.mdx: slug \"jdoe\" does not match filename \"JDoe\""]
        );
    }

    #[test]
    fn test_open_lab_needs_updated_or_date() {
        let root = content_root();
        write(
            root.path(),
            "open-lab/data.mdx",
            "---\nslug: data\ntitle: Data\nkind: dataset\n---\n",
        );
        let report = run(root.path());
        assert_eq!(report.len(), 1);
        assert_eq!(
            report.messages()[0],
            "open-lab/data.mdx: expected \"updated\" or \"date\" in frontmatter"
        );
    }

    #[test]
    fn test_aggregates_violations_across_files() {
        let root = content_root();
        write(
            root.path(),
            "publications/a.mdx",
            "---\nslug: a\ntitle: A\nauthors: []\nyear: abc\n---\n",
        );
        write(
            root.path(),
            "log/b.mdx",
            "---\nslug: b\ntitle: B\ndate: \"2024-01-01\"\n---\n",
        );
        let report = run(root.path());
        assert_eq!(
            report.messages(),
            vec![
                "publications/a.mdx: invalid or missing \"authors\" (stringArray)",
                "publications/a.mdx: invalid or missing \"year\" (number)",
                "log/b.mdx: invalid or missing \"kind\" (string)",
            ]
        );
    }

    #[test]
    fn test_missing_frontmatter_skips_other_checks() {
        let root = content_root();
        write(root.path(), "projects/x.mdx", "No metadata here.");
        write(root.path(), "projects/y.mdx", "---\n- a list\n---\n");
        let report = run(root.path());
        assert_eq!(report.len(), 2);
        assert_eq!(report.messages()[0], "projects/x.mdx: missing frontmatter");
        assert!(matches!(
            report.violations[1].kind,
            ViolationKind::MissingFrontmatter { reason: Some(_) }
        ));
    }

    #[test]
    fn test_missing_slug() {
        let root = content_root();
        write(
            root.path(),
            "playground/demo.mdx",
            "---\ntitle: Demo\nkind: audio\n---\n",
        );
        let report = run(root.path());
        assert_eq!(
            report.messages(),
            vec!["playground/demo.mdx: missing required field \"slug\""]
        );
    }

    #[test]
    fn test_missing_collection_directory() {
        let root = content_root();
        fs::remove_dir(root.path().join("research-areas")).unwrap();
        let report = run(root.path());
        assert_eq!(report.len(), 1);
        assert!(report.messages()[0].starts_with("Failed to validate research-areas: "));
    }

    #[test]
    fn test_reference_check_is_opt_in() {
        let root = content_root();
        write(
            root.path(),
            "playground/demo.mdx",
            "---\nslug: demo\ntitle: Demo\nkind: video\nrelatedProject: atlas\n---\n",
        );
        assert!(run(root.path()).is_ok());

        let checker = IntegrityChecker::new(
            root.path(),
            CheckerConfig {
                check_references: true,
            },
        );
        let report = checker.run();
        assert_eq!(report.len(), 1);
        assert_eq!(
            report.messages()[0],
            "playground/demo.mdx: \"relatedProject\" refers to \"atlas\", which is not in projects"
        );

        write(
            root.path(),
            "projects/atlas.mdx",
            "---\nslug: atlas\ntitle: Atlas\nkind: tool\nsummary: Maps.\nstatus: active\nrelatedAreas: [vis]\n---\n",
        );
        assert!(checker.run().is_ok());
    }

    #[test]
    fn test_report_display_lists_every_violation() {
        let report = CheckReport {
            violations: vec![
                Violation {
                    file: "people/a.mdx".into(),
                    kind: ViolationKind::MissingSlug,
                },
                Violation {
                    file: "log".into(),
                    kind: ViolationKind::UnreadableCollection("denied".into()),
                },
            ],
            files_checked: 1,
        };
        assert_eq!(
            report.to_string(),
            "Content sanity check failed:\n\n- people/a.mdx: missing required field \"slug\"\n- Failed to validate log: denied"
        );
    }
}
