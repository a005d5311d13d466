use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while loading definition assets.
#[derive(Debug, Error)]
pub enum AssetError {
    #[error("failed to read definitions from {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed definition data")]
    Parse(#[from] serde_json::Error),

    #[error("definition '{name}' is declared more than once")]
    DuplicateDef { name: String },

    #[error("definition '{def}' has negative {field} ({x}, {z})")]
    NegativeArea {
        def: String,
        field: &'static str,
        x: i32,
        z: i32,
    },
}
