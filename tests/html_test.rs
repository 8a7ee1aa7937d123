//! Tests for HTML page customization.

mod common;

use chrono::NaiveDate;
use epaper_tools::models::{BuildContext, HtmlPageConfig, HtmlProfile};
use epaper_tools::services::{customize_html, HtmlOutcome};
use flate2::read::GzDecoder;
use pretty_assertions::assert_eq;
use std::fs::{self, File};
use std::io::Read;
use std::path::Path;

const INFO_PAGE: &str = r#"<!DOCTYPE html>
<html>
  <head>
    <title>placeholder</title>
  </head>
  <body>
    <h1 id="title">placeholder</h1>
    <script>
      show()
    </script>
  </body>
</html>
"#;

const PORTAL_PAGE: &str = r#"<html>
  <head>
    <meta http-equiv="refresh" content="0; url='http://example.local'" />
    <title>placeholder</title>
  </head>
  <body>
    <h1 id="title">placeholder</h1>
    <img
      src="/Will.png"
    />
    <button onclick='
      window.open("http://example.local", "_self")'>Open</button>
  </body>
</html>
"#;

fn ctx() -> BuildContext {
    BuildContext {
        board: "esp32dev".to_string(),
        build_flags: r#"-DCORE_DEBUG_LEVEL=0 -D APP_NAME=\"Thingy\""#.to_string(),
        ..Default::default()
    }
}

fn now() -> chrono::NaiveDateTime {
    NaiveDate::from_ymd_opt(2026, 3, 14)
        .unwrap()
        .and_hms_opt(15, 9, 26)
        .unwrap()
}

fn gunzip(path: &Path) -> String {
    let mut text = String::new();
    GzDecoder::new(File::open(path).unwrap())
        .read_to_string(&mut text)
        .unwrap();
    text
}

fn page(dir: &Path, name: &str, content: &str, profile: HtmlProfile) -> HtmlPageConfig {
    let source = dir.join("assets").join(name);
    fs::create_dir_all(source.parent().unwrap()).unwrap();
    fs::write(&source, content).unwrap();
    HtmlPageConfig {
        source,
        output: dir.join(".pio/assets").join(format!("{name}.gz")),
        profile,
        title_suffix: String::new(),
    }
}

#[test]
fn test_info_page() {
    let dir = tempfile::tempdir().unwrap();
    let page = page(dir.path(), "thingy.html", INFO_PAGE, HtmlProfile::Info);

    let outcome = customize_html(&page, &ctx(), now()).unwrap();
    let customized = dir.path().join("assets/customized_thingy.html");
    assert_eq!(
        outcome,
        HtmlOutcome::Written {
            customized: customized.clone(),
            gzipped: page.output.clone(),
        }
    );

    let text = fs::read_to_string(&customized).unwrap();
    assert_eq!(gunzip(&page.output), text);
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines[0], "<!-- DO NOT EDIT - Created by epaper-tools -->");
    assert_eq!(lines[4], "    <title>Thingy</title>");
    assert_eq!(lines[7], r#"      <h1 id="title">Thingy</h1>"#);
    assert_eq!(lines[8], "    <script>");
    assert_eq!(lines[9], r#"      const info_text_board_value = "esp32dev""#);
    assert_eq!(lines[10], r#"      const info_text_build_value = "2026-03-14 15:09:26""#);
    assert_eq!(lines.last(), Some(&"</html>"));
}

#[test]
fn test_info_page_always_rebuilds() {
    let dir = tempfile::tempdir().unwrap();
    let page = page(dir.path(), "thingy.html", INFO_PAGE, HtmlProfile::Info);

    customize_html(&page, &ctx(), now()).unwrap();
    let later = now() + chrono::Duration::minutes(1);
    let outcome = customize_html(&page, &ctx(), later).unwrap();

    assert!(matches!(outcome, HtmlOutcome::Written { .. }));
    assert!(gunzip(&page.output).contains("2026-03-14 15:10:26"));
}

#[test]
fn test_captive_portal_page_and_stamp() {
    let dir = tempfile::tempdir().unwrap();
    let page = page(
        dir.path(),
        "hotspot-detect.html",
        PORTAL_PAGE,
        HtmlProfile::CaptivePortal,
    );

    customize_html(&page, &ctx(), now()).unwrap();
    let text = gunzip(&page.output);
    assert!(text.contains(
        r#"    <meta http-equiv="refresh" content="0; url='http://thingy.local'" />"#
    ));
    assert!(text.contains(r#"      <h1 id="title">Thingy Firmware Update</h1>"#));
    assert!(text.contains("        src='http://thingy.local/logo'"));
    assert!(text.contains(r#"        window.open("http://thingy.local", "#));
    assert!(!text.contains("example.local"));

    let outcome = customize_html(&page, &ctx(), now()).unwrap();
    assert_eq!(outcome, HtmlOutcome::UpToDate);
}

#[test]
fn test_missing_app_name() {
    let dir = tempfile::tempdir().unwrap();
    let page = page(dir.path(), "thingy.html", INFO_PAGE, HtmlProfile::Info);
    let ctx = BuildContext {
        build_flags: "-DOTHER=1".to_string(),
        ..Default::default()
    };

    let err = customize_html(&page, &ctx, now()).unwrap_err();
    assert_eq!(err.to_string(), "Build flag APP_NAME is not defined");
}
