// Copyright © 2024 LabContent. All rights reserved.
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Benchmarks for front-matter parsing, collection loading and the
//! integrity checker.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use labcontent::checker::IntegrityChecker;
use labcontent::core::config::CheckerConfig;
use labcontent::frontmatter::Document;
use labcontent::loader::ContentLoader;
use labcontent::CollectionKind;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const PERSON: &str = "---\nslug: {slug}\nname: Person {slug}\nrole: student\nstatus: current\norder: 3\nresearchAreas: [vis]\ntags: [hci, visualization]\n---\n\nWorks on interactive systems.\n";

const PUBLICATION: &str = "---\nslug: {slug}\ntitle: Paper {slug}\nauthors: [\"A. Author\", \"B. Author\"]\nyear: 2021\nvenue: CHI\ntags: [visualization]\n---\n\nWe study charts.\n";

fn populate(root: &Path, count: usize) {
    for kind in CollectionKind::ALL {
        fs::create_dir_all(root.join(kind.name())).unwrap();
    }
    for i in 0..count {
        let slug = format!("entry-{i:04}");
        fs::write(
            root.join("people").join(format!("{slug}.mdx")),
            PERSON.replace("{slug}", &slug),
        )
        .unwrap();
        fs::write(
            root.join("publications").join(format!("{slug}.mdx")),
            PUBLICATION.replace("{slug}", &slug),
        )
        .unwrap();
    }
}

fn bench_parse(c: &mut Criterion) {
    let raw = PUBLICATION.replace("{slug}", "sample");
    let _ = c.bench_function("document_parse", |b| {
        b.iter(|| Document::parse(black_box(&raw)))
    });
}

fn bench_load(c: &mut Criterion) {
    let tmp = TempDir::new().unwrap();
    populate(tmp.path(), 200);
    let loader = ContentLoader::new(tmp.path());

    let _ = c.bench_function("load_people", |b| {
        b.iter(|| loader.people().unwrap())
    });
    let _ = c.bench_function("load_publications", |b| {
        b.iter(|| loader.publications().unwrap())
    });
}

fn bench_check(c: &mut Criterion) {
    let tmp = TempDir::new().unwrap();
    populate(tmp.path(), 200);
    let checker = IntegrityChecker::new(tmp.path(), CheckerConfig::default());

    let _ = c.bench_function("integrity_check", |b| {
        b.iter(|| black_box(checker.run()))
    });
}

criterion_group!(benches, bench_parse, bench_load, bench_check);
criterion_main!(benches);
