use serde::Serialize;
use std::fmt;

/// The digital cinema standard a document was written against.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Format {
    #[default]
    Unknown,
    Interop,
    #[serde(rename = "SMPTE")]
    Smpte,
}

impl Format {
    /// Resolves a document namespace against the Interop and SMPTE namespaces of
    /// its document kind. Anything else is `Unknown`.
    pub fn from_namespace(namespace: &str, interop: &str, smpte: &str) -> Self {
        if namespace == interop {
            Format::Interop
        } else if namespace == smpte {
            Format::Smpte
        } else {
            Format::Unknown
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Format::Unknown => "Unknown",
            Format::Interop => "Interop",
            Format::Smpte => "SMPTE",
        })
    }
}

/// What kind of file a package asset is.
///
/// `MxfPicture` and `MxfSound` can only be learned from a packing list's MIME type,
/// every other classifier stops at `Mxf`.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum AssetType {
    #[default]
    Unknown,
    #[serde(rename = "CPL")]
    Cpl,
    #[serde(rename = "PKL")]
    Pkl,
    #[serde(rename = "MXF")]
    Mxf,
    #[serde(rename = "MXFPicture")]
    MxfPicture,
    #[serde(rename = "MXFSound")]
    MxfSound,
}

impl AssetType {
    pub fn is_mxf(self) -> bool {
        matches!(
            self,
            AssetType::Mxf | AssetType::MxfPicture | AssetType::MxfSound
        )
    }
}

impl fmt::Display for AssetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            AssetType::Unknown => "Unknown",
            AssetType::Cpl => "CPL",
            AssetType::Pkl => "PKL",
            AssetType::Mxf => "MXF",
            AssetType::MxfPicture => "MXF (picture)",
            AssetType::MxfSound => "MXF (sound)",
        })
    }
}
