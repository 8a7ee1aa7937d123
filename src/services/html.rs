//! Stamps build variables into the device's HTML pages and gzips them
//! for serving from flash.

use chrono::NaiveDateTime;
use std::fs;
use std::path::{Path, PathBuf};

use super::gzip::gzip_bytes;
use super::stamp_cache::StampCache;
use crate::error::BuildError;
use crate::models::{BuildContext, HtmlPageConfig, HtmlProfile};

pub const GENERATED_HEADER: &str = "<!-- DO NOT EDIT - Created by epaper-tools -->\n";

/// Format of the build timestamp shown on info pages.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Values substituted into a page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageVars<'a> {
    pub app: &'a str,
    pub board: &'a str,
    pub timestamp: &'a str,
    pub title_suffix: &'a str,
}

/// Outcome of [`customize_html`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HtmlOutcome {
    Written { customized: PathBuf, gzipped: PathBuf },
    UpToDate,
}

/// Apply the line rules of `profile` to every line of `text`.
///
/// Rules match on substrings and replace the whole line. Replaced lines
/// end with `\n`.
pub fn customize_lines(text: &str, profile: HtmlProfile, vars: &PageVars<'_>) -> String {
    let host = format!("http://{}.local", vars.app.to_lowercase());
    let mut out = String::with_capacity(text.len() + GENERATED_HEADER.len() + 128);
    out.push_str(GENERATED_HEADER);

    for line in text.split_inclusive('\n') {
        match profile {
            HtmlProfile::Info => {
                if line.contains("<title>") {
                    out.push_str(&format!("    <title>{}</title>\n", vars.app));
                } else if line.contains(r#"<h1 id="title">"#) {
                    out.push_str(&format!(
                        "      <h1 id=\"title\">{}{}</h1>\n",
                        vars.app, vars.title_suffix
                    ));
                } else if line.contains("<script>") {
                    push_line(&mut out, line);
                    out.push_str(&format!(
                        "      const info_text_board_value = \"{}\"\n",
                        vars.board
                    ));
                    out.push_str(&format!(
                        "      const info_text_build_value = \"{}\"\n",
                        vars.timestamp
                    ));
                } else {
                    out.push_str(line);
                }
            }
            HtmlProfile::CaptivePortal => {
                if line.contains("<meta http-equiv") {
                    out.push_str(&format!(
                        "    <meta http-equiv=\"refresh\" content=\"0; url='{host}'\" />\n"
                    ));
                } else if line.contains("<title>") {
                    out.push_str(&format!("    <title>{}</title>\n", vars.app));
                } else if line.contains(r#"<h1 id="title">"#) {
                    out.push_str(&format!(
                        "      <h1 id=\"title\">{} Firmware Update</h1>\n",
                        vars.app
                    ));
                } else if line.contains(r#"src="/Will"#) {
                    out.push_str(&format!("        src='{host}/logo'\n"));
                } else if line.contains("window.open(") {
                    out.push_str(&format!("        window.open(\"{host}\", \n"));
                } else {
                    out.push_str(line);
                }
            }
        }
    }
    out
}

/// Push a kept line, terminating it if it was the last line of the input.
fn push_line(out: &mut String, line: &str) {
    out.push_str(line);
    if !line.ends_with('\n') {
        out.push('\n');
    }
}

/// `customized_<name>` next to `source`.
pub fn customized_path(source: &Path) -> PathBuf {
    let name = source
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    source.with_file_name(format!("customized_{name}"))
}

/// Customize one page and write both the plain and the gzipped result.
///
/// Info pages carry the build time and are always rebuilt. Captive portal
/// pages are skipped while the source's stamp in the output directory is
/// current.
pub fn customize_html(
    page: &HtmlPageConfig,
    ctx: &BuildContext,
    now: NaiveDateTime,
) -> Result<HtmlOutcome, BuildError> {
    if !page.source.is_file() {
        return Err(BuildError::MissingSource(page.source.clone()));
    }

    let name = page
        .source
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let cache_dir = page
        .output
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_default();
    let cache = StampCache::new(cache_dir);

    if page.profile == HtmlProfile::CaptivePortal && cache.is_fresh(&page.source, &name)? {
        tracing::info!(file = %name, "up to date");
        return Ok(HtmlOutcome::UpToDate);
    }

    let app = ctx.app_name()?;
    let timestamp = now.format(TIMESTAMP_FORMAT).to_string();
    let text = fs::read_to_string(&page.source)?;
    tracing::info!(
        source = %page.source.display(),
        lines = text.lines().count(),
        app = %app,
        board = %ctx.board,
        %timestamp,
        "Customizing HTML"
    );

    let html = customize_lines(
        &text,
        page.profile,
        &PageVars {
            app: &app,
            board: &ctx.board,
            timestamp: &timestamp,
            title_suffix: &page.title_suffix,
        },
    );

    let customized = customized_path(&page.source);
    fs::write(&customized, &html)?;
    tracing::info!(
        source = %customized.display(),
        dest = %page.output.display(),
        "gzip"
    );
    gzip_bytes(html.as_bytes(), &page.output)?;
    cache.record(&page.source, &name)?;

    Ok(HtmlOutcome::Written {
        customized,
        gzipped: page.output.clone(),
    })
}
