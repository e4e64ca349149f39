use std::path::PathBuf;

use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("unexpected message: {0}")]
    UnexpectedMessage(String),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("tungstenite error: {0}")]
    TungsteniteError(#[from] tungstenite::Error),
    #[error("serde json error: {0}")]
    SerdeJsonError(#[from] serde_json::Error),
    #[error("io error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Startup failures. Each cause gets its own variant so the fatal diagnostic
/// names what actually went wrong instead of collapsing everything into
/// "mode not set".
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("cannot read properties file {path}: {source}")]
    Unreadable {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("please, set `app.mode` to either AZURE or AKS")]
    ModeNotSet,
    #[error("unrecognized `app.mode` value `{0}`, expected AZURE or AKS")]
    UnknownMode(String),
    #[error("missing `{0}` property")]
    MissingProperty(&'static str),
    #[error("invalid `aks.tts.uri` value `{uri}`: {source}")]
    InvalidEndpointUri {
        uri: String,
        source: http::uri::InvalidUri,
    },
    #[error("`aks.tts.uri` has no host: {0}")]
    EndpointMissingHost(http::Uri),
    #[error("`aks.tts.uri` scheme `{0}` is not supported, expected http(s) or ws(s)")]
    UnsupportedEndpointScheme(String),
}
