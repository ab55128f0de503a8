//! Packing lists.
//!
//! <http://en.wikipedia.org/wiki/Digital_Cinema_Package#Packing_list_file_or_PKL_Package_key_list>
use crate::classify;
use crate::err::{DcpError, DocumentKind, Result};
use crate::types::AssetType;
use crate::utils::{decode_document, parse_issue_date};

use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Pkl {
    pub id: String,
    pub annotation_text: String,
    pub issue_date: Option<Timestamp>,
    pub issuer: String,
    pub creator: String,
    pub assets: Vec<PklAsset>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PklAsset {
    pub id: String,
    pub annotation_text: String,
    /// Stored as found, never verified against the file.
    pub hash: String,
    pub size: u64,
    pub mime_type: String,
    /// Derived from `mime_type`, see [`classify::from_mime_type`].
    pub asset_type: AssetType,
}

impl Pkl {
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = fs::read(path).map_err(|e| DcpError::from_io_at(path, e))?;

        Self::from_bytes(&bytes).map_err(|e| DcpError::FailedToParseFile {
            path: path.to_path_buf(),
            source: Box::new(e),
        })
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let raw: PklXml = decode_document(DocumentKind::Pkl, bytes)?;
        let issue_date = parse_issue_date(DocumentKind::Pkl, raw.issue_date.as_deref())?;

        Ok(Pkl {
            id: raw.id,
            annotation_text: raw.annotation_text,
            issue_date,
            issuer: raw.issuer,
            creator: raw.creator,
            assets: raw
                .asset_list
                .assets
                .into_iter()
                .map(|asset| PklAsset {
                    asset_type: classify::from_mime_type(&asset.mime_type),
                    id: asset.id,
                    annotation_text: asset.annotation_text,
                    hash: asset.hash,
                    size: asset.size,
                    mime_type: asset.mime_type,
                })
                .collect(),
        })
    }

    /// Assets whose MIME type marks them as essence.
    pub fn mxf_assets(&self) -> impl Iterator<Item = &PklAsset> {
        self.assets.iter().filter(|asset| asset.asset_type.is_mxf())
    }
}

#[derive(Debug, Deserialize)]
struct PklXml {
    #[serde(rename = "Id", default)]
    id: String,
    #[serde(rename = "AnnotationText", default)]
    annotation_text: String,
    #[serde(rename = "IssueDate")]
    issue_date: Option<String>,
    #[serde(rename = "Issuer", default)]
    issuer: String,
    #[serde(rename = "Creator", default)]
    creator: String,
    #[serde(rename = "AssetList", default)]
    asset_list: PklAssetListXml,
}

#[derive(Debug, Default, Deserialize)]
struct PklAssetListXml {
    #[serde(rename = "Asset", default)]
    assets: Vec<PklAssetXml>,
}

#[derive(Debug, Deserialize)]
struct PklAssetXml {
    #[serde(rename = "Id", default)]
    id: String,
    #[serde(rename = "AnnotationText", default)]
    annotation_text: String,
    #[serde(rename = "Hash", default)]
    hash: String,
    #[serde(rename = "Size", default)]
    size: u64,
    #[serde(rename = "Type", default)]
    mime_type: String,
}
