use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Rule resource failed to load: {0}")]
    ResourceLoad(String),

    #[error("No active editable target")]
    NoActiveTarget,

    #[error("Remote analysis failed with status {status}{}", body.as_deref().map(|b| format!(": {b}")).unwrap_or_default())]
    RemoteAnalysis { status: u16, body: Option<String> },

    #[error("Core is not active in this session")]
    NotInjected,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Other error: {0}")]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
