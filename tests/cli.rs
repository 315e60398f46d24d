// Copyright © 2024 LabContent. All rights reserved.
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! End-to-end tests of the `labcontent` binary over temporary content trees.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const COLLECTIONS: [&str; 7] = [
    "people",
    "publications",
    "projects",
    "log",
    "open-lab",
    "playground",
    "research-areas",
];

fn content_tree() -> TempDir {
    let tmp = TempDir::new().unwrap();
    for collection in COLLECTIONS {
        fs::create_dir_all(tmp.path().join(collection)).unwrap();
    }
    write(
        tmp.path(),
        "people/jdoe.mdx",
        "---\nslug: jdoe\nname: Jane Doe\nrole: faculty\nstatus: current\norder: 1\nresearchAreas: [vis]\ntags: [hci]\n---\n\nJane leads the lab.\n",
    );
    write(
        tmp.path(),
        "publications/foo.mdx",
        "---\nslug: \"foo\"\ntitle: \"X\"\nauthors: [\"A\"]\nyear: 2020\ntags: [\"quantum\", \"visualization\"]\n---\n\nAbstract body.\n",
    );
    write(
        tmp.path(),
        "log/jan.mdx",
        "---\nslug: jan\ntitle: January\ndate: \"2024-01-01\"\nkind: news\n---\n\nOld news.\n",
    );
    write(
        tmp.path(),
        "log/jun.mdx",
        "---\nslug: jun\ntitle: June\ndate: \"2024-06-01\"\nkind: release\n---\n\nFresh release.\n",
    );
    tmp
}

fn write(root: &Path, relative: &str, content: &str) {
    fs::write(root.join(relative), content).unwrap();
}

fn labcontent(root: &Path) -> Command {
    let mut cmd = Command::cargo_bin("labcontent").unwrap();
    let _ = cmd.current_dir(root).arg("--root").arg(root);
    cmd
}

#[test]
fn check_passes_on_valid_content() {
    let tmp = content_tree();
    let _ = labcontent(tmp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Content sanity check passed."));
}

#[test]
fn check_reports_every_violation_and_fails() {
    let tmp = content_tree();
    write(tmp.path(), "people/zz-copy.mdx", "---\nslug: jdoe\nname: Copy\nrole: student\nstatus: current\norder: 2\nresearchAreas: [vis]\ntags: [hci]\n---\n");
    write(tmp.path(), "open-lab/data.mdx", "---\nslug: data\ntitle: Data\nkind: dataset\n---\n");

    let _ = labcontent(tmp.path())
        .arg("check")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Content sanity check failed:"))
        .stderr(predicate::str::contains(
            "- people/zz-copy.mdx: slug \"jdoe\" does not match filename \"zz-copy\"",
        ))
        .stderr(predicate::str::contains(
            "- people/zz-copy.mdx: duplicate slug \"jdoe\"",
        ))
        .stderr(predicate::str::contains(
            "- open-lab/data.mdx: expected \"updated\" or \"date\" in frontmatter",
        ));
}

#[test]
fn check_reports_missing_collection_directory() {
    let tmp = content_tree();
    fs::remove_dir_all(tmp.path().join("playground")).unwrap();

    let _ = labcontent(tmp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("- Failed to validate playground:"));
}

#[test]
fn list_prints_log_newest_first() {
    let tmp = content_tree();
    let _ = labcontent(tmp.path())
        .args(["list", "log"])
        .assert()
        .success()
        .stdout("jun\tJune\njan\tJanuary\n");
}

#[test]
fn list_json_drops_unknown_tags() {
    let tmp = content_tree();
    let _ = labcontent(tmp.path())
        .args(["list", "publications", "--json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"visualization\""))
        .stdout(predicate::str::contains("quantum").not());
}

#[test]
fn show_prints_record_and_html() {
    let tmp = content_tree();
    let _ = labcontent(tmp.path())
        .args(["show", "people", "jdoe"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"role\": \"Faculty\""));

    let _ = labcontent(tmp.path())
        .args(["show", "people", "jdoe", "--html"])
        .assert()
        .success()
        .stdout(predicate::str::contains("<p>Jane leads the lab.</p>"));
}

#[test]
fn show_unknown_slug_fails() {
    let tmp = content_tree();
    let _ = labcontent(tmp.path())
        .args(["show", "publications", "nonexistent"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));
}

#[test]
fn config_file_enables_reference_check() {
    let tmp = content_tree();
    write(
        tmp.path(),
        "playground/demo.mdx",
        "---\nslug: demo\ntitle: Demo\nkind: video\nrelatedProject: atlas\n---\n",
    );
    let config = tmp.path().join("strict.toml");
    fs::write(&config, "[checker]\ncheck_references = true\n").unwrap();

    let _ = labcontent(tmp.path()).assert().success();
    let _ = labcontent(tmp.path())
        .arg("--config")
        .arg(&config)
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "playground/demo.mdx: \"relatedProject\" refers to \"atlas\"",
        ));
}
