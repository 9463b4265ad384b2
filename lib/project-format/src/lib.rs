//! The `.lmprj` project container: a sequential chunked binary format.
//!
//! Each chunk is `[4-byte ASCII tag][u32 little-endian length][payload]`,
//! chunks concatenated with no separators, read until EOF. Unknown tags
//! are skipped, never fatal, so newer files open in older builds.

pub mod chunk;
pub mod store;

pub use chunk::{read_chunk, write_chunk};
pub use store::{
    EXTENSION, autosave_filename, list_projects, load, load_from, project_clip_count, save,
    save_count, save_dir, save_to,
};

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("IO Error {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON Error {0}")]
    Json(#[from] serde_json::Error),

    #[error("No platform data directory")]
    NoDataDir,

    #[error("Project file not found: {0}")]
    NotFound(String),
}
