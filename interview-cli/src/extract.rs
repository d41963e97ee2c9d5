//! Text extraction from CV, job description and reference files.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use interview_rag::Document;
use tracing::debug;

/// Destinations whose contents are not document text.
const SKIPPED_RTF_GROUPS: &[&str] = &[
    "colortbl",
    "datastore",
    "filetbl",
    "fldinst",
    "fonttbl",
    "footer",
    "generator",
    "header",
    "info",
    "latentstyles",
    "listoverridetable",
    "listtable",
    "object",
    "pict",
    "rsidtbl",
    "stylesheet",
    "themedata",
    "xmlnstbl",
];

/// Extract text by file extension: `.pdf`, `.rtf`, anything else as text.
pub fn extract_text(path: &Path) -> Result<String> {
    let extension = path.extension().and_then(|e| e.to_str()).map(str::to_ascii_lowercase);
    let text = match extension.as_deref() {
        Some("pdf") => extract_pdf(path)?,
        Some("rtf") => {
            let bytes =
                fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
            rtf_to_text(&String::from_utf8_lossy(&bytes))
        }
        _ => fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?,
    };
    debug!(path = %path.display(), chars = text.len(), "extracted text");
    Ok(text)
}

pub fn extract_pdf(path: &Path) -> Result<String> {
    let bytes = fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    pdf_extract::extract_text_from_mem(&bytes)
        .with_context(|| format!("failed to extract text from PDF {}", path.display()))
}

/// One [`Document`] per file, identified by its path.
pub fn load_reference_documents(paths: &[PathBuf]) -> Result<Vec<Document>> {
    paths
        .iter()
        .map(|path| {
            let text = extract_text(path)?;
            let display = path.display().to_string();
            let file_name =
                path.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_default();
            Ok(Document::new(display.clone(), text)
                .with_metadata("file_path", display.clone())
                .with_metadata("file_name", file_name)
                .with_source_uri(display))
        })
        .collect()
}

/// Plain text of an RTF document.
///
/// Handles groups, control words and symbols, `\'hh` escapes and `\uN`
/// characters, and drops font tables, stylesheets and other non-text
/// destinations. Paragraph and line breaks become newlines.
pub fn rtf_to_text(rtf: &str) -> String {
    let mut out = String::with_capacity(rtf.len());
    let mut saved = Vec::new();
    let mut skipping = false;
    let mut group_start = false;
    let mut chars = rtf.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '{' => {
                saved.push(skipping);
                group_start = true;
                continue;
            }
            '}' => skipping = saved.pop().unwrap_or(false),
            '\\' => match chars.peek().copied() {
                Some(symbol @ ('\\' | '{' | '}')) => {
                    chars.next();
                    if !skipping {
                        out.push(symbol);
                    }
                }
                Some('\'') => {
                    chars.next();
                    let hex: String = chars.by_ref().take(2).collect();
                    if let (false, Ok(byte)) = (skipping, u8::from_str_radix(&hex, 16)) {
                        out.push(char::from(byte));
                    }
                }
                Some('*') => {
                    chars.next();
                    if group_start {
                        skipping = true;
                    }
                    continue;
                }
                Some('~') => {
                    chars.next();
                    if !skipping {
                        out.push(' ');
                    }
                }
                Some('\n' | '\r') => {
                    chars.next();
                    if !skipping {
                        out.push('\n');
                    }
                }
                Some(_) => {
                    let mut word = String::new();
                    while let Some(&ch) = chars.peek().filter(|ch| ch.is_ascii_alphabetic()) {
                        word.push(ch);
                        chars.next();
                    }
                    let mut param = String::new();
                    if chars.peek() == Some(&'-') {
                        param.push('-');
                        chars.next();
                    }
                    while let Some(&ch) = chars.peek().filter(|ch| ch.is_ascii_digit()) {
                        param.push(ch);
                        chars.next();
                    }
                    if word.is_empty() && param.is_empty() {
                        // unknown control symbol
                        chars.next();
                    } else if chars.peek() == Some(&' ') {
                        chars.next();
                    }

                    if group_start && SKIPPED_RTF_GROUPS.contains(&word.as_str()) {
                        skipping = true;
                    }
                    if !skipping {
                        match word.as_str() {
                            "par" | "line" => out.push('\n'),
                            "tab" => out.push('\t'),
                            "u" => {
                                if let Some(ch) = param.parse::<i32>().ok().and_then(unicode_char) {
                                    out.push(ch);
                                }
                                // the ANSI fallback character that follows
                                if chars.peek().is_some_and(|ch| !matches!(*ch, '\\' | '{' | '}')) {
                                    chars.next();
                                }
                            }
                            _ => {}
                        }
                    }
                }
                None => {}
            },
            '\n' | '\r' => {}
            other => {
                if !skipping {
                    out.push(other);
                }
            }
        }
        group_start = false;
    }

    out.trim().to_string()
}

fn unicode_char(code: i32) -> Option<char> {
    let code = if code < 0 { code + 65_536 } else { code };
    u32::try_from(code).ok().and_then(char::from_u32)
}
