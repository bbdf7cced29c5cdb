//! External converter handoff.
//!
//! Markdown rendering is delegated to pandoc: the cleaned tree is fed to it
//! as an HTML string with raw HTML, native divs, and native spans disabled
//! on the reader side, and GitHub-flavored Markdown with pipe tables on the
//! writer side. An optional second hop through `mdformat` canonicalizes the
//! result without re-wrapping lines.

use std::io::Write;
use std::path::Path;
use std::process::{Command, Stdio};

use log::info;

use crate::error::{Error, Result};

/// Pandoc reader spec: HTML without raw passthrough or native div/span.
const FROM_FORMAT: &str = "html-native_divs-native_spans-raw_html";
/// Pandoc writer spec: GitHub-flavored Markdown, no raw HTML, pipe tables.
const TO_FORMAT: &str = "gfm-raw_html+pipe_tables";

/// Render cleaned HTML to a Markdown file via pandoc.
pub fn html_to_markdown(html: &str, output: &Path) -> Result<()> {
    info!("running pandoc");
    let mut pandoc = Command::new("pandoc")
        .args(["-f", FROM_FORMAT, "--to", TO_FORMAT, "-o"])
        .arg(output)
        .stdin(Stdio::piped())
        .spawn()
        .map_err(|e| Error::Converter(format!("failed to launch pandoc: {e}")))?;

    if let Some(stdin) = pandoc.stdin.as_mut() {
        stdin.write_all(html.as_bytes())?;
    }

    let status = pandoc.wait()?;
    if !status.success() {
        return Err(Error::Converter(format!("pandoc exited with {status}")));
    }
    Ok(())
}

/// Canonicalize a Markdown file in place with mdformat, without line
/// wrapping.
pub fn reformat_markdown(path: &Path) -> Result<()> {
    info!("running mdformat");
    let status = Command::new("mdformat")
        .args(["--wrap", "no"])
        .arg(path)
        .status()
        .map_err(|e| Error::Converter(format!("failed to launch mdformat: {e}")))?;

    if !status.success() {
        return Err(Error::Converter(format!("mdformat exited with {status}")));
    }
    Ok(())
}
