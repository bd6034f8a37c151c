//! Shared fixtures for integration tests

use std::fs;
use std::path::Path;

/// Generates one HTML page with a consistent structure
pub fn test_html(title: &str, body: &str, hrefs: &[&str]) -> String {
    let links = hrefs
        .iter()
        .map(|href| format!("<a href=\"{}\">{}</a>", href, href))
        .collect::<Vec<_>>()
        .join(" | ");

    format!(
        "<!DOCTYPE html>\n<html>\n<head>\n    <title>{}</title>\n</head>\n<body>\n    \
         <h1>{}</h1>\n    <p>{}</p>\n    <p>Links: {}</p>\n</body>\n</html>",
        title, title, body, links
    )
}

/// Builds a miniature documentation archive with relative, nested, and
/// external links
pub fn build_minimal_archive(base: &Path) {
    fs::create_dir_all(base.join("ug")).unwrap();
    fs::create_dir_all(base.join("C/cspice")).unwrap();

    fs::write(
        base.join("index.html"),
        test_html(
            "Toolkit Documentation Index",
            "Welcome to the toolkit documentation archive.",
            &["ug/kernels.html", "ug/time.html", "links.html"],
        ),
    )
    .unwrap();

    fs::write(
        base.join("ug/kernels.html"),
        test_html(
            "Kernels Guide",
            "Information about kernel files including SPK ephemeris kernels \
             and CK attitude kernels.",
            &["time.html", "../index.html"],
        ),
    )
    .unwrap();

    fs::write(
        base.join("ug/time.html"),
        test_html(
            "Time Systems",
            "Documentation about ephemeris time, UTC, and other time systems.",
            &["../index.html", "kernels.html"],
        ),
    )
    .unwrap();

    fs::write(
        base.join("C/cspice/spkpos_c.html"),
        test_html(
            "spkpos_c",
            "Return the position of a target body relative to an observing \
             body, computed from ephemeris data.",
            &["../../ug/kernels.html"],
        ),
    )
    .unwrap();

    fs::write(
        base.join("links.html"),
        test_html(
            "Links Test Page",
            "This page contains various link types.",
            &[
                "index.html",
                "./ug/kernels.html",
                "C/cspice/spkpos_c.html",
                "missing.html",
                "https://example.com/test",
                "#fragment",
            ],
        ),
    )
    .unwrap();

    // A file the indexer must ignore
    fs::write(base.join("readme.txt"), "plain text, not indexed").unwrap();
}
