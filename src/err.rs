use std::fmt;
use std::io;
use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, DcpError>;

/// The XML document kinds that make up a package.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    AssetMap,
    Cpl,
    Pkl,
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            DocumentKind::AssetMap => "asset map",
            DocumentKind::Cpl => "CPL",
            DocumentKind::Pkl => "PKL",
        })
    }
}

/// Coarse classification of a [`DcpError`], useful for callers that only care
/// about what went wrong, not where.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    SizeMismatch,
    MalformedDocument,
    Io,
}

#[derive(Debug, Error)]
pub enum DcpError {
    #[error("Unable to find an assetmap file in {}", dir.display())]
    AssetMapNotFound { dir: PathBuf },

    #[error("File {} referenced by the assetmap does not exist", path.display())]
    FileNotFound { path: PathBuf },

    #[error(
        "File size for {} is incorrect, expected {expected} bytes, found {found}",
        path.display()
    )]
    SizeMismatch {
        path: PathBuf,
        expected: u64,
        found: u64,
    },

    #[error("Failed to decode {document}: {message}")]
    MalformedDocument {
        document: DocumentKind,
        message: String,
    },

    #[error("Failed to parse {}, caused by:\n\t {source}", path.display())]
    FailedToParseFile {
        path: PathBuf,
        #[source]
        source: Box<DcpError>,
    },

    #[error("An I/O error has occurred while trying to read {}: {source}", path.display())]
    FailedToRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("An I/O error has occurred: {0}")]
    Io(#[from] io::Error),
}

impl DcpError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            DcpError::AssetMapNotFound { .. } | DcpError::FileNotFound { .. } => {
                ErrorKind::NotFound
            }
            DcpError::SizeMismatch { .. } => ErrorKind::SizeMismatch,
            DcpError::MalformedDocument { .. } => ErrorKind::MalformedDocument,
            DcpError::FailedToParseFile { source, .. } => source.kind(),
            DcpError::FailedToRead { .. } | DcpError::Io(_) => ErrorKind::Io,
        }
    }

    pub(crate) fn malformed(document: DocumentKind, message: impl fmt::Display) -> Self {
        DcpError::MalformedDocument {
            document,
            message: message.to_string(),
        }
    }

    /// Maps a failed `stat`/`open` of `path` to `FileNotFound` or `FailedToRead`.
    pub(crate) fn from_io_at(path: impl Into<PathBuf>, err: io::Error) -> Self {
        let path = path.into();
        if err.kind() == io::ErrorKind::NotFound {
            DcpError::FileNotFound { path }
        } else {
            DcpError::FailedToRead { path, source: err }
        }
    }
}
