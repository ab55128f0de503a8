use crate::asset_map::AssetMap;
use crate::classify;
use crate::cpl::Cpl;
use crate::dcp::{ClassifiedFile, Dcp};
use crate::err::{DcpError, Result};
use crate::pkl::Pkl;
use crate::types::AssetType;

use log::{debug, info, trace};
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

static ASSETMAP_FILENAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(assetmap|ASSETMAP)(\.xml|\.XML)?$").expect("valid regex"));

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParserSettings {
    validate_sizes: bool,
    parse_documents: bool,
}

impl Default for ParserSettings {
    fn default() -> Self {
        ParserSettings {
            validate_sizes: true,
            parse_documents: true,
        }
    }
}

impl ParserSettings {
    pub fn new() -> Self {
        ParserSettings::default()
    }

    /// When unset, files are still required to exist, but their size is not compared with
    /// the asset map.
    pub fn validate_sizes(mut self, validate_sizes: bool) -> Self {
        self.validate_sizes = validate_sizes;
        self
    }

    /// When unset, CPL and PKL files are classified but not parsed.
    pub fn parse_documents(mut self, parse_documents: bool) -> Self {
        self.parse_documents = parse_documents;
        self
    }

    pub fn should_validate_sizes(&self) -> bool {
        self.validate_sizes
    }

    pub fn should_parse_documents(&self) -> bool {
        self.parse_documents
    }
}

/// Assembles a [`Dcp`] from a package directory.
///
/// ```no_run
/// use dcp::{DcpParser, ParserSettings};
///
/// let dcp = DcpParser::from_path("/mnt/dcp/feature")
///     .with_configuration(ParserSettings::new().validate_sizes(false))
///     .parse()?;
///
/// for cpl in &dcp.cpls {
///     println!("{}", cpl.content_title_text);
/// }
/// # Ok::<(), dcp::DcpError>(())
/// ```
#[derive(Debug, Clone)]
pub struct DcpParser {
    root_dir: PathBuf,
    settings: ParserSettings,
}

impl DcpParser {
    pub fn from_path(root_dir: impl AsRef<Path>) -> Self {
        DcpParser {
            root_dir: root_dir.as_ref().to_path_buf(),
            settings: ParserSettings::default(),
        }
    }

    pub fn with_configuration(mut self, configuration: ParserSettings) -> Self {
        self.settings = configuration;
        self
    }

    /// Locates and parses the asset map, checks every file it references, and parses every
    /// CPL and PKL among them.
    ///
    /// The first failure aborts the whole traversal, nothing is returned in that case.
    pub fn parse(&self) -> Result<Dcp> {
        let asset_map_path = find_asset_map(&self.root_dir)?;
        info!("Using asset map {}", asset_map_path.display());

        let asset_map = AssetMap::from_path(&asset_map_path)?;
        debug!(
            "Asset map {} lists {} assets ({} bytes)",
            asset_map.id,
            asset_map.assets.len(),
            asset_map.size()
        );

        let mut cpls = vec![];
        let mut pkls = vec![];
        let mut files = vec![];

        for asset in &asset_map.assets {
            for chunk in &asset.chunks {
                let path = self.root_dir.join(&chunk.path);
                self.check_file_size(&path, chunk.size)?;

                let detected = classify::from_file(&path);
                trace!(
                    "{}: asset map says {}, header says {}",
                    chunk.path, asset.asset_type, detected
                );

                if self.settings.parse_documents {
                    match detected {
                        AssetType::Cpl => cpls.push(Cpl::from_path(&path)?),
                        AssetType::Pkl => pkls.push(Pkl::from_path(&path)?),
                        _ => {}
                    }
                }

                files.push(ClassifiedFile {
                    path: chunk.path.clone(),
                    guessed: asset.asset_type,
                    detected,
                });
            }
        }

        info!(
            "Parsed {} CPL(s) and {} PKL(s) from {}",
            cpls.len(),
            pkls.len(),
            self.root_dir.display()
        );

        let asset_map_file = asset_map_path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();

        Ok(Dcp {
            root_dir: self.root_dir.clone(),
            asset_map,
            cpls,
            pkls,
            files,
            asset_map_file,
        })
    }

    fn check_file_size(&self, path: &Path, expected: u64) -> Result<()> {
        let metadata = fs::metadata(path).map_err(|e| DcpError::from_io_at(path, e))?;

        if self.settings.validate_sizes && metadata.len() != expected {
            return Err(DcpError::SizeMismatch {
                path: path.to_path_buf(),
                expected,
                found: metadata.len(),
            });
        }

        Ok(())
    }
}

/// Returns the path of the first `ASSETMAP`/`assetmap` (optionally `.xml`/`.XML`) file in
/// `dir`, by file name order.
pub fn find_asset_map(dir: impl AsRef<Path>) -> Result<PathBuf> {
    let dir = dir.as_ref();

    let mut names = vec![];
    for entry in fs::read_dir(dir).map_err(|e| DcpError::from_io_at(dir, e))? {
        let entry = entry.map_err(|e| DcpError::from_io_at(dir, e))?;
        let file_type = entry
            .file_type()
            .map_err(|e| DcpError::from_io_at(entry.path(), e))?;
        if file_type.is_dir() {
            continue;
        }
        names.push(entry.file_name());
    }
    names.sort();

    names
        .into_iter()
        .find(|name| {
            name.to_str()
                .is_some_and(|name| ASSETMAP_FILENAME.is_match(name))
        })
        .map(|name| dir.join(name))
        .ok_or_else(|| DcpError::AssetMapNotFound {
            dir: dir.to_path_buf(),
        })
}
