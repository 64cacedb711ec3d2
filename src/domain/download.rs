// SPDX-License-Identifier: MPL-2.0
//! Filename inference for downloaded assets.
//!
//! The server names the file through `Content-Disposition` when it can.
//! Otherwise a fixed base name is used, and the content type picks a
//! fallback extension from a closed table. The extension is appended only
//! when the name contains no dot at all.

/// Base name used when the server does not provide one.
pub const DEFAULT_BASE_NAME: &str = "downloaded_file";

/// Closed content-type to extension table.
const EXTENSIONS: &[(&str, &str)] = &[
    ("model/vnd.collada+xml", ".dae"),
    ("model/gltf+json", ".gltf"),
    ("model/gltf-binary", ".glb"),
    ("application/octet-stream", ".bin"),
];

/// Resolved name of a retrieved binary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadName {
    /// Final file name offered to the save dialog.
    pub file_name: String,
    /// Extension appended from the content-type table, if any.
    pub appended_extension: Option<&'static str>,
}

/// Extracts the `filename=` parameter of a `Content-Disposition` value.
///
/// Quoted values run to the closing quote, bare values to the next `;`.
/// Directory components are stripped so the result is a plain file name.
#[must_use]
pub fn filename_from_disposition(header: &str) -> Option<String> {
    const PARAM: &str = "filename=";

    let lower = header.to_ascii_lowercase();
    let start = lower.find(PARAM)? + PARAM.len();
    let rest = &header[start..];

    let value = match rest.strip_prefix('"') {
        Some(quoted) => quoted.split('"').next().unwrap_or(quoted),
        None => rest.split(';').next().unwrap_or(rest),
    };

    let value = value.trim();
    let value = value.rsplit(['/', '\\']).next().unwrap_or(value);
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

/// Maps a content type to its fallback extension. Parameters such as
/// `; charset=` are ignored and the match is case-insensitive.
#[must_use]
pub fn extension_for_content_type(content_type: &str) -> Option<&'static str> {
    let essence = content_type
        .split(';')
        .next()
        .unwrap_or(content_type)
        .trim()
        .to_ascii_lowercase();
    EXTENSIONS
        .iter()
        .find(|(mime, _)| *mime == essence)
        .map(|(_, ext)| *ext)
}

/// Resolves the file name from raw header values.
#[must_use]
pub fn resolve(disposition: Option<&str>, content_type: Option<&str>) -> DownloadName {
    let mut file_name = disposition
        .and_then(filename_from_disposition)
        .unwrap_or_else(|| DEFAULT_BASE_NAME.to_string());

    let mut appended_extension = None;
    if !file_name.contains('.') {
        if let Some(ext) = content_type.and_then(extension_for_content_type) {
            file_name.push_str(ext);
            appended_extension = Some(ext);
        }
    }

    DownloadName {
        file_name,
        appended_extension,
    }
}
