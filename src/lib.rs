#![deny(unused_must_use)]
#![forbid(unsafe_code)]
// Don't allow dbg! prints in release.
#![cfg_attr(not(debug_assertions), deny(clippy::dbg_macro))]

pub use asset_map::{AmAsset, AssetMap, Chunk};
pub use cpl::{ContentKind, Cpl, CplAsset, Picture, Reel, Sound, Subtitle};
pub use dcp::{ClassifiedFile, Dcp};
pub use dcp_parser::{DcpParser, ParserSettings, find_asset_map};
pub use err::{DcpError, DocumentKind, ErrorKind, Result};
pub use pkl::{Pkl, PklAsset};
pub use types::{AssetType, Format};

pub mod asset_map;
pub mod classify;
pub mod cpl;
pub mod dcp;
pub mod dcp_parser;
pub mod err;
pub mod pkl;
pub mod types;

mod utils;

// For tests, we only initialize logging once.
#[cfg(test)]
use std::sync::Once;

#[cfg(test)]
static LOGGER_INIT: Once = Once::new();

// Rust runs the tests concurrently, so unless we synchronize logging access
// it will crash when attempting to run `cargo test` with some logging facilities.
#[cfg(test)]
pub fn ensure_env_logger_initialized() {
    use std::io::Write;

    LOGGER_INIT.call_once(|| {
        let mut builder = env_logger::Builder::from_default_env();
        builder
            .format(|buf, record| writeln!(buf, "[{}] - {}", record.level(), record.args()))
            .init();
    });
}
