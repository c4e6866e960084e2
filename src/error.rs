use std::io;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("ZIP error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("XML parse error: {0}")]
    Xml(#[from] roxmltree::Error),

    /// The input is not a readable DOCX package.
    #[error("invalid DOCX: {0}")]
    InvalidDocx(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A field dictionary, alias table or override file has the wrong shape.
    #[error("invalid configuration: {0}")]
    Config(String),
}
