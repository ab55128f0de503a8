//! Composition playlists.
//!
//! <http://en.wikipedia.org/wiki/Digital_Cinema_Package#Composition_playlist_file>
use crate::err::{DcpError, DocumentKind, Result};
use crate::types::Format;
use crate::utils::{decode_document, parse_issue_date};

use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

pub const INTEROP_NAMESPACE: &str = "http://www.digicine.com/PROTO-ASDCP-CPL-20040511#";
pub const SMPTE_NAMESPACE: &str = "http://www.smpte-ra.org/schemas/429-7/2006/CPL";

/// The kind of content a composition holds.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ContentKind {
    #[default]
    Unknown,
    Test,
    Feature,
    Advertisement,
}

impl ContentKind {
    /// Case-sensitive, unrecognized kinds are `Unknown`.
    pub fn from_xml(value: &str) -> Self {
        match value {
            "test" => ContentKind::Test,
            "feature" => ContentKind::Feature,
            "advertisement" => ContentKind::Advertisement,
            _ => ContentKind::Unknown,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Cpl {
    pub format: Format,
    pub id: String,
    pub annotation_text: String,
    pub creator: String,
    pub content_title_text: String,
    pub issue_date: Option<Timestamp>,
    pub content_kind: ContentKind,
    pub reels: Vec<Reel>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Reel {
    pub id: String,
    pub picture: Option<Picture>,
    pub sound: Option<Sound>,
    pub subtitle: Option<Subtitle>,
}

/// Fields shared by every track referenced from a reel.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct CplAsset {
    pub id: String,
    pub annotation_text: String,
    /// e.g. `24 1`
    pub edit_rate: String,
    pub intrinsic_duration: u64,
    pub entry_point: u64,
    pub duration: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Picture {
    #[serde(flatten)]
    pub asset: CplAsset,
    pub frame_rate: String,
    pub screen_aspect_ratio: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Sound {
    #[serde(flatten)]
    pub asset: CplAsset,
    pub language: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Subtitle {
    #[serde(flatten)]
    pub asset: CplAsset,
    pub language: String,
}

impl Cpl {
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = fs::read(path).map_err(|e| DcpError::from_io_at(path, e))?;

        Self::from_bytes(&bytes).map_err(|e| DcpError::FailedToParseFile {
            path: path.to_path_buf(),
            source: Box::new(e),
        })
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let raw: CplXml = decode_document(DocumentKind::Cpl, bytes)?;
        raw.into_cpl()
    }

    pub fn pictures(&self) -> Vec<&Picture> {
        self.reels.iter().filter_map(|reel| reel.picture.as_ref()).collect()
    }

    pub fn sounds(&self) -> Vec<&Sound> {
        self.reels.iter().filter_map(|reel| reel.sound.as_ref()).collect()
    }

    pub fn subtitles(&self) -> Vec<&Subtitle> {
        self.reels
            .iter()
            .filter_map(|reel| reel.subtitle.as_ref())
            .collect()
    }
}

#[derive(Debug, Deserialize)]
struct CplXml {
    #[serde(rename = "@xmlns", default)]
    xmlns: String,
    #[serde(rename = "Id", default)]
    id: String,
    #[serde(rename = "AnnotationText", default)]
    annotation_text: String,
    #[serde(rename = "IssueDate")]
    issue_date: Option<String>,
    #[serde(rename = "Creator", default)]
    creator: String,
    #[serde(rename = "ContentTitleText", default)]
    content_title_text: String,
    #[serde(rename = "ContentKind", default)]
    content_kind: String,
    #[serde(rename = "ReelList", default)]
    reel_list: ReelListXml,
}

#[derive(Debug, Default, Deserialize)]
struct ReelListXml {
    #[serde(rename = "Reel", default)]
    reels: Vec<ReelXml>,
}

#[derive(Debug, Deserialize)]
struct ReelXml {
    #[serde(rename = "Id", default)]
    id: String,
    #[serde(rename = "AssetList", default)]
    asset_list: ReelAssetListXml,
}

#[derive(Debug, Default, Deserialize)]
struct ReelAssetListXml {
    #[serde(rename = "MainPicture")]
    picture: Option<TrackXml>,
    #[serde(rename = "MainSound")]
    sound: Option<TrackXml>,
    #[serde(rename = "MainSubtitle")]
    subtitle: Option<TrackXml>,
}

// Superset of the picture, sound and subtitle elements.
// `quick-xml` cannot deserialize numbers inside a `#[serde(flatten)]` struct.
#[derive(Debug, Deserialize)]
struct TrackXml {
    #[serde(rename = "Id", default)]
    id: String,
    #[serde(rename = "AnnotationText", default)]
    annotation_text: String,
    #[serde(rename = "EditRate", default)]
    edit_rate: String,
    #[serde(rename = "IntrinsicDuration", default)]
    intrinsic_duration: u64,
    #[serde(rename = "EntryPoint", default)]
    entry_point: u64,
    #[serde(rename = "Duration", default)]
    duration: u64,
    #[serde(rename = "FrameRate", default)]
    frame_rate: String,
    #[serde(rename = "ScreenAspectRatio", default)]
    screen_aspect_ratio: String,
    #[serde(rename = "Language", default)]
    language: String,
}

impl TrackXml {
    fn into_parts(self) -> (CplAsset, TrackExtras) {
        (
            CplAsset {
                id: self.id,
                annotation_text: self.annotation_text,
                edit_rate: self.edit_rate,
                intrinsic_duration: self.intrinsic_duration,
                entry_point: self.entry_point,
                duration: self.duration,
            },
            TrackExtras {
                frame_rate: self.frame_rate,
                screen_aspect_ratio: self.screen_aspect_ratio,
                language: self.language,
            },
        )
    }

    fn into_picture(self) -> Picture {
        let (asset, extras) = self.into_parts();
        Picture {
            asset,
            frame_rate: extras.frame_rate,
            screen_aspect_ratio: extras.screen_aspect_ratio,
        }
    }

    fn into_sound(self) -> Sound {
        let (asset, extras) = self.into_parts();
        Sound {
            asset,
            language: extras.language,
        }
    }

    fn into_subtitle(self) -> Subtitle {
        let (asset, extras) = self.into_parts();
        Subtitle {
            asset,
            language: extras.language,
        }
    }
}

struct TrackExtras {
    frame_rate: String,
    screen_aspect_ratio: String,
    language: String,
}

impl CplXml {
    fn into_cpl(self) -> Result<Cpl> {
        let issue_date = parse_issue_date(DocumentKind::Cpl, self.issue_date.as_deref())?;

        let reels = self
            .reel_list
            .reels
            .into_iter()
            .map(|reel| Reel {
                id: reel.id,
                picture: reel.asset_list.picture.map(TrackXml::into_picture),
                sound: reel.asset_list.sound.map(TrackXml::into_sound),
                subtitle: reel.asset_list.subtitle.map(TrackXml::into_subtitle),
            })
            .collect();

        Ok(Cpl {
            format: Format::from_namespace(&self.xmlns, INTEROP_NAMESPACE, SMPTE_NAMESPACE),
            id: self.id,
            annotation_text: self.annotation_text,
            creator: self.creator,
            content_title_text: self.content_title_text,
            issue_date,
            content_kind: ContentKind::from_xml(&self.content_kind),
            reels,
        })
    }
}
