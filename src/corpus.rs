//! On-disk side of a corpus: recognition input, per-clip reference documents,
//! and the persisted alignment mapping.

use std::collections::{BTreeMap, HashSet};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Component, Path, PathBuf};

use chrono::{DateTime, Local};
use encoding_rs::Encoding;
use serde::Serialize;

use crate::error::AlignmentError;
use crate::types::AlignmentResult;

/// Maps a user-facing encoding label to an encoding.
///
/// Accepts every WHATWG label plus the Windows code page spellings used by
/// legacy Korean tooling (`949`, `cp949`, `ms949`, `uhc`).
pub fn resolve_encoding(label: &str) -> Result<&'static Encoding, AlignmentError> {
    let trimmed = label.trim().to_ascii_lowercase();
    let canonical = match trimmed.as_str() {
        "949" | "cp949" | "ms949" | "uhc" => "windows-949",
        "utf8" => "utf-8",
        other => other,
    };
    Encoding::for_label(canonical.as_bytes()).ok_or_else(|| {
        AlignmentError::invalid_input(format!("unknown text encoding label '{label}'"))
    })
}

/// Decodes `bytes`, dropping a byte order mark. Malformed sequences are an error.
pub fn decode(
    bytes: &[u8],
    encoding: &'static Encoding,
    context: &'static str,
) -> Result<String, AlignmentError> {
    let (text, had_errors) = encoding.decode_with_bom_removal(bytes);
    if had_errors {
        return Err(AlignmentError::encoding(
            context,
            format!("input is not valid {}", encoding.name()),
        ));
    }
    Ok(text.into_owned())
}

/// Loads the clip -> ASR transcript JSON object.
pub fn load_recognition(
    path: &Path,
    encoding_label: &str,
) -> Result<BTreeMap<String, String>, AlignmentError> {
    let encoding = resolve_encoding(encoding_label)?;
    let bytes = fs::read(path).map_err(|e| AlignmentError::io("read recognition file", e))?;
    let text = decode(&bytes, encoding, "decode recognition file")?;
    serde_json::from_str(&text).map_err(|e| AlignmentError::json("parse recognition file", e))
}

/// Reference document path for a clip.
///
/// Every path component named `audio_dir` becomes `assets_dir`, the segment
/// index of a `name.0003.wav` style file name is dropped, and the extension is
/// replaced with `extension`.
pub fn reference_path(clip: &str, audio_dir: &str, assets_dir: &str, extension: &str) -> PathBuf {
    let mut path: PathBuf = Path::new(clip)
        .components()
        .map(|component| match component {
            Component::Normal(name) if name == audio_dir => Component::Normal(assets_dir.as_ref()),
            other => other,
        })
        .collect();

    if let Some(file_name) = path.file_name().and_then(|name| name.to_str()) {
        let parts: Vec<&str> = file_name.rsplitn(3, '.').collect();
        if let [ext, _segment, stem] = parts.as_slice() {
            if !stem.is_empty() {
                let without_segment = format!("{stem}.{ext}");
                path.set_file_name(without_segment);
            }
        }
    }
    path.set_extension(extension);
    path
}

/// Candidate lines of a reference document: stripped, quotes removed, empty
/// and repeated lines dropped.
pub fn clean_reference_lines(text: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    text.lines()
        .map(|line| line.trim().replace(['"', '\''], ""))
        .map(|line| line.trim().to_string())
        .filter(|line| !line.is_empty())
        .filter(|line| seen.insert(line.clone()))
        .collect()
}

pub fn read_reference_lines(
    path: &Path,
    encoding: &'static Encoding,
) -> Result<Vec<String>, AlignmentError> {
    let bytes = fs::read(path).map_err(|e| AlignmentError::io("read reference document", e))?;
    let text = decode(&bytes, encoding, "decode reference document")?;
    Ok(clean_reference_lines(&text))
}

/// `<dir of recognition file>/<filename>`.
pub fn default_output_path(recognition_path: &Path, filename: &str) -> PathBuf {
    recognition_path
        .parent()
        .map(|dir| dir.join(filename))
        .unwrap_or_else(|| PathBuf::from(filename))
}

/// `<stem>.backup_<timestamp><.ext>` next to `path`, avoiding existing files.
pub fn backup_path(path: &Path, at: DateTime<Local>) -> PathBuf {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let ext = path
        .extension()
        .map(|e| format!(".{}", e.to_string_lossy()))
        .unwrap_or_default();
    let stamp = at.format("%Y-%m-%d_%H-%M-%S");

    let mut candidate = path.with_file_name(format!("{stem}.backup_{stamp}{ext}"));
    let mut attempt = 1;
    while candidate.exists() {
        candidate = path.with_file_name(format!("{stem}.backup_{stamp}_{attempt}{ext}"));
        attempt += 1;
    }
    candidate
}

/// Renames an existing file out of the way. Returns where it went.
pub fn backup_existing(path: &Path) -> Result<Option<PathBuf>, AlignmentError> {
    if !path.exists() {
        return Ok(None);
    }
    let target = backup_path(path, Local::now());
    fs::rename(path, &target).map_err(|e| AlignmentError::io("back up previous output", e))?;
    tracing::info!(
        path = %path.display(),
        backup = %target.display(),
        "previous alignment output backed up"
    );
    Ok(Some(target))
}

/// Writes the mapping as 4-space indented UTF-8 JSON with sorted keys,
/// backing up any file already at `path`.
pub fn write_mapping(
    path: &Path,
    mapping: &BTreeMap<String, AlignmentResult>,
) -> Result<Option<PathBuf>, AlignmentError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .map_err(|e| AlignmentError::io("create output directory", e))?;
    }
    let backup = backup_existing(path)?;

    let file = File::create(path).map_err(|e| AlignmentError::io("create output file", e))?;
    let mut writer = BufWriter::new(file);
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut writer, formatter);
    mapping
        .serialize(&mut serializer)
        .map_err(|e| AlignmentError::json("serialize alignment mapping", e))?;
    writer
        .write_all(b"\n")
        .and_then(|_| writer.flush())
        .map_err(|e| AlignmentError::io("finalize output file", e))?;
    Ok(backup)
}
