use crate::asset_map::AssetMap;
use crate::cpl::Cpl;
use crate::dcp_parser::DcpParser;
use crate::err::Result;
use crate::pkl::Pkl;
use crate::types::{AssetType, Format};

use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};

/// Every component found within a package directory.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dcp {
    pub root_dir: PathBuf,
    pub asset_map: AssetMap,
    pub cpls: Vec<Cpl>,
    pub pkls: Vec<Pkl>,
    pub(crate) files: Vec<ClassifiedFile>,
    pub(crate) asset_map_file: String,
}

/// A file referenced by the asset map, with both of its classifications.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClassifiedFile {
    /// Relative to the package root.
    pub path: String,
    /// From the asset map entry.
    pub guessed: AssetType,
    /// From the file header.
    pub detected: AssetType,
}

impl Dcp {
    /// Builds a package from a root directory containing an asset map, with default settings.
    pub fn generate(root_dir: impl AsRef<Path>) -> Result<Self> {
        DcpParser::from_path(root_dir).parse()
    }

    pub fn root_dir(&self) -> &Path {
        &self.root_dir
    }

    pub fn format(&self) -> Format {
        self.asset_map.format
    }

    /// The physical files making up the package, asset map first.
    pub fn files(&self) -> Vec<&str> {
        let mut files = Vec::with_capacity(self.files.len() + 1);
        files.push(self.asset_map_file.as_str());
        files.extend(self.asset_map.paths());
        files
    }

    /// Every file referenced by the asset map, in asset map order.
    pub fn files_with_types(&self) -> &[ClassifiedFile] {
        &self.files
    }

    pub fn asset_map_file(&self) -> &str {
        &self.asset_map_file
    }
}

impl fmt::Display for Dcp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.format() != Format::Unknown {
            writeln!(f, "Type: {}", self.format())?;
        }
        writeln!(f, "AssetMap: {}", self.asset_map.id)?;
        for cpl in &self.cpls {
            writeln!(f, "CPL: {}", cpl.annotation_text)?;
        }
        for pkl in &self.pkls {
            writeln!(f, "PKL: {}", pkl.annotation_text)?;
        }
        Ok(())
    }
}
