//! Asset type classifiers.
//!
//! A package offers three independent hints about what a file is, and they may disagree:
//!
//! - [`from_manifest`]: the asset map's `PackingList` flag and the chunk file names.
//!   Available before any file is opened, and only advisory.
//! - [`from_header`]: the first [`HEADER_SNIFF_LEN`] bytes of the file itself. This is the
//!   authoritative classification used when assembling a package.
//! - [`from_mime_type`]: a packing list's `Type` element. The only source of
//!   `MxfPicture`/`MxfSound`.
use crate::types::AssetType;

use log::trace;
use regex::Regex;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::sync::LazyLock;

/// Number of leading bytes inspected by [`from_header`].
pub const HEADER_SNIFF_LEN: usize = 100;

/// Leading key of a picture or sound MXF track file.
pub const MXF_HEADER: [u8; 28] = [
    0x06, 0x0E, 0x2B, 0x34, 0x02, 0x05, 0x01, 0x01, 0x0D, 0x01, 0x02, 0x01, 0x01, 0x02, 0x04,
    0x00, 0x83, 0x00, 0x00, 0x78, 0x00, 0x01, 0x00, 0x02, 0x00, 0x00, 0x00, 0x01,
];

static CPL_FILENAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(cpl|CPL)(\.xml|\.XML)$").expect("valid regex"));
static PKL_FILENAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(pkl|PKL)(\.xml|\.XML)$").expect("valid regex"));
static MXF_FILENAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\.mxf|\.MXF)$").expect("valid regex"));

/// Guesses an asset's type from the asset map alone.
///
/// An explicit `PackingList` flag of `true` wins. Otherwise every chunk path is matched in
/// order and the last one that matches decides.
pub fn from_manifest<'a>(
    packing_list: Option<&str>,
    paths: impl IntoIterator<Item = &'a str>,
) -> AssetType {
    if packing_list == Some("true") {
        return AssetType::Pkl;
    }

    let mut asset_type = AssetType::Unknown;
    for path in paths {
        if CPL_FILENAME.is_match(path) {
            asset_type = AssetType::Cpl;
        } else if PKL_FILENAME.is_match(path) {
            asset_type = AssetType::Pkl;
        } else if MXF_FILENAME.is_match(path) {
            asset_type = AssetType::Mxf;
        }
    }

    asset_type
}

/// Classifies a file from its leading bytes.
///
/// A header shorter than the MXF key can never be an MXF.
pub fn from_header(header: &[u8]) -> AssetType {
    if contains(header, b"PackingList") {
        AssetType::Pkl
    } else if contains(header, b"CompositionPlaylist") {
        AssetType::Cpl
    } else if header.starts_with(&MXF_HEADER) {
        AssetType::Mxf
    } else {
        AssetType::Unknown
    }
}

/// Reads up to [`HEADER_SNIFF_LEN`] bytes from `path` and classifies them.
///
/// Files that cannot be opened or read are `Unknown`, never an error.
pub fn from_file(path: impl AsRef<Path>) -> AssetType {
    let path = path.as_ref();

    match read_header(path) {
        Ok(header) => from_header(&header),
        Err(e) => {
            trace!("Failed to read header of {}: {}", path.display(), e);
            AssetType::Unknown
        }
    }
}

/// Maps a packing list MIME type, matched exactly.
pub fn from_mime_type(mime_type: &str) -> AssetType {
    match mime_type {
        "application/x-smpte-mxf;asdcpKind=Picture" => AssetType::MxfPicture,
        "application/x-smpte-mxf;asdcpKind=Sound" => AssetType::MxfSound,
        "text/xml;asdcpKind=CPL" => AssetType::Cpl,
        _ => AssetType::Unknown,
    }
}

fn read_header(path: &Path) -> std::io::Result<Vec<u8>> {
    let mut header = Vec::with_capacity(HEADER_SNIFF_LEN);
    File::open(path)?
        .take(HEADER_SNIFF_LEN as u64)
        .read_to_end(&mut header)?;
    Ok(header)
}

fn contains(haystack: &[u8], needle: &[u8]) -> bool {
    haystack
        .windows(needle.len())
        .any(|window| window == needle)
}
