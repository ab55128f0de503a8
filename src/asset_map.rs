//! The asset map (`ASSETMAP` / `ASSETMAP.xml`), the manifest listing every file of a package.
//!
//! <http://en.wikipedia.org/wiki/Digital_Cinema_Package#Asset_map_file>
use crate::classify;
use crate::err::{DcpError, DocumentKind, Result};
use crate::types::{AssetType, Format};
use crate::utils::{decode_document, parse_issue_date};

use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

pub const INTEROP_NAMESPACE: &str = "http://www.digicine.com/PROTO-ASDCP-AM-20040311#";
pub const SMPTE_NAMESPACE: &str = "http://www.smpte-ra.org/schemas/429-9/2007/AM";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssetMap {
    pub format: Format,
    pub id: String,
    pub creator: String,
    pub volume_count: u8,
    pub issuer: String,
    pub issue_date: Option<Timestamp>,
    pub assets: Vec<AmAsset>,
}

/// A single asset map entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AmAsset {
    pub id: String,
    /// Guessed from the asset map only, see [`classify::from_manifest`].
    pub asset_type: AssetType,
    pub chunks: Vec<Chunk>,
}

/// A single file, making up the whole or a part of an asset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chunk {
    #[serde(rename = "Path", default)]
    pub path: String,
    #[serde(rename = "Length", default)]
    pub size: u64,
    #[serde(rename = "VolumeIndex", default, skip_serializing_if = "Option::is_none")]
    pub volume_index: Option<u32>,
    #[serde(rename = "Offset", default, skip_serializing_if = "Option::is_none")]
    pub offset: Option<u64>,
}

impl AssetMap {
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = fs::read(path).map_err(|e| DcpError::from_io_at(path, e))?;

        Self::from_bytes(&bytes).map_err(|e| DcpError::FailedToParseFile {
            path: path.to_path_buf(),
            source: Box::new(e),
        })
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let raw: AssetMapXml = decode_document(DocumentKind::AssetMap, bytes)?;
        raw.into_asset_map()
    }

    /// The summed declared size of every asset.
    pub fn size(&self) -> u64 {
        self.assets.iter().map(AmAsset::size).sum()
    }

    /// Every chunk path, in document order.
    pub fn paths(&self) -> Vec<&str> {
        self.assets.iter().flat_map(|asset| asset.paths()).collect()
    }
}

impl AmAsset {
    pub fn size(&self) -> u64 {
        self.chunks.iter().map(|chunk| chunk.size).sum()
    }

    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.chunks.iter().map(|chunk| chunk.path.as_str())
    }
}

#[derive(Debug, Deserialize)]
struct AssetMapXml {
    #[serde(rename = "@xmlns", default)]
    xmlns: String,
    #[serde(rename = "Id", default)]
    id: String,
    #[serde(rename = "Creator", default)]
    creator: String,
    #[serde(rename = "VolumeCount", default)]
    volume_count: u8,
    #[serde(rename = "IssueDate")]
    issue_date: Option<String>,
    #[serde(rename = "Issuer", default)]
    issuer: String,
    #[serde(rename = "AssetList", default)]
    asset_list: AssetListXml,
}

#[derive(Debug, Default, Deserialize)]
struct AssetListXml {
    #[serde(rename = "Asset", default)]
    assets: Vec<AssetXml>,
}

#[derive(Debug, Deserialize)]
struct AssetXml {
    #[serde(rename = "Id", default)]
    id: String,
    #[serde(rename = "PackingList")]
    packing_list: Option<String>,
    #[serde(rename = "ChunkList", default)]
    chunk_list: ChunkListXml,
}

#[derive(Debug, Default, Deserialize)]
struct ChunkListXml {
    #[serde(rename = "Chunk", default)]
    chunks: Vec<Chunk>,
}

impl AssetMapXml {
    fn into_asset_map(self) -> Result<AssetMap> {
        let issue_date = parse_issue_date(DocumentKind::AssetMap, self.issue_date.as_deref())?;

        let assets = self
            .asset_list
            .assets
            .into_iter()
            .map(|asset| {
                let chunks = asset.chunk_list.chunks;
                let asset_type = classify::from_manifest(
                    asset.packing_list.as_deref(),
                    chunks.iter().map(|chunk| chunk.path.as_str()),
                );

                AmAsset {
                    id: asset.id,
                    asset_type,
                    chunks,
                }
            })
            .collect();

        Ok(AssetMap {
            format: Format::from_namespace(&self.xmlns, INTEROP_NAMESPACE, SMPTE_NAMESPACE),
            id: self.id,
            creator: self.creator,
            volume_count: self.volume_count,
            issuer: self.issuer,
            issue_date,
            assets,
        })
    }
}
