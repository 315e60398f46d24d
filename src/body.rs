// Copyright © 2024 LabContent. All rights reserved.
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! # Body Helpers
//!
//! Helpers over the free-text part of a content file: deriving a one-line
//! summary and rendering the Markdown to HTML for the presentation layer.

use pulldown_cmark::{html, Options as MarkdownOptions, Parser};

/// First paragraph of `body` with all runs of whitespace collapsed to a
/// single space. Empty when the body is empty.
///
/// ```
/// use labcontent::body::first_paragraph;
///
/// let body = "We released the\n   new dataset.\n\nMore details follow.";
/// assert_eq!(first_paragraph(body), "We released the new dataset.");
/// ```
pub fn first_paragraph(body: &str) -> String {
    // Paragraphs end at two consecutive newlines; a line holding only
    // spaces or tabs does not end one.
    body.trim()
        .split("\n\n")
        .next()
        .unwrap_or_default()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Renders a record body to HTML.
///
/// MDX module lines (`import ...` / `export ...`) are dropped first; tables,
/// footnotes and strikethrough are enabled.
pub fn render_html(body: &str) -> String {
    let markdown = strip_mdx_module_lines(body);

    let mut options = MarkdownOptions::empty();
    options.insert(MarkdownOptions::ENABLE_TABLES);
    options.insert(MarkdownOptions::ENABLE_FOOTNOTES);
    options.insert(MarkdownOptions::ENABLE_STRIKETHROUGH);

    let parser = Parser::new_ext(&markdown, options);
    let mut html_output = String::with_capacity(markdown.len() * 2);
    html::push_html(&mut html_output, parser);
    html_output
}

fn strip_mdx_module_lines(body: &str) -> String {
    body.lines()
        .filter(|line| {
            let line = line.trim_start();
            !(line.starts_with("import ") || line.starts_with("export "))
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_paragraph_collapses_whitespace() {
        let body = "\n\n  Line one\n\tline two  \n\nSecond.";
        assert_eq!(first_paragraph(body), "Line one line two");
    }

    #[test]
    fn test_first_paragraph_empty_body() {
        assert_eq!(first_paragraph(""), "");
        assert_eq!(first_paragraph("   \n \n"), "");
    }

    #[test]
    fn test_first_paragraph_spans_whitespace_only_lines() {
        assert_eq!(first_paragraph("one\n   \ntwo\n\nthree"), "one two");
        assert_eq!(first_paragraph("one\n\t\ntwo\n\n\n\nthree"), "one two");
    }

    #[test]
    fn test_render_html_basic() {
        let html = render_html("# Title\n\nSome **bold** text.");
        assert!(html.contains("<h1>Title</h1>"));
        assert!(html.contains("<strong>bold</strong>"));
    }

    #[test]
    fn test_render_html_tables_and_strikethrough() {
        let html = render_html("| A | B |\n|---|---|\n| 1 | 2 |\n\n~~gone~~");
        assert!(html.contains("<table>"));
        assert!(html.contains("<del>"));
    }

    #[test]
    fn test_render_html_drops_mdx_imports() {
        let html = render_html(
            "import Chart from '../components/Chart'\n\nVisible text.",
        );
        assert!(!html.contains("import"));
        assert!(html.contains("Visible text."));
    }
}
