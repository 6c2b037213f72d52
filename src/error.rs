use thiserror::Error;

#[derive(Error, Debug)]
pub enum DocmarkError {
    #[error("unsupported file type: {ext}")]
    UnsupportedType { ext: String },

    #[error("failed to decode {name}: {detail}")]
    Decode { name: String, detail: String },

    #[error("ocr error: {detail}")]
    Ocr { detail: String },

    #[error("failed to parse document {name}: {detail}")]
    Parse { name: String, detail: String },

    #[error("document not found: {id}")]
    DocumentNotFound { id: String },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("config error: {0}")]
    Config(String),

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, DocmarkError>;
