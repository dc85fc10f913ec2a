use thiserror::Error;

/// Problems with the process environment. Always fatal at startup.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing configuration: {0} must be set in .env or environment")]
    Missing(&'static str),

    #[error("Invalid configuration: {key}={value:?} ({reason})")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

/// Errors fetching or decoding the README document.
#[derive(Error, Debug)]
pub enum SourceError {
    #[error("README request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-success HTTP status. The run treats this as "no table today".
    #[error("README request returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("README envelope has no content field")]
    MissingContent,

    #[error("README content is not valid base64: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("README content is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

/// Errors from the persistence layer.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    #[error("Store request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Store returned status {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Store returned no rows for {0}")]
    EmptyResponse(&'static str),

    #[error("Invalid store URL: {0}")]
    Url(#[from] url::ParseError),
}

/// Errors that abort a whole run.
#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Source(#[from] SourceError),

    #[error(transparent)]
    Store(#[from] StoreError),
}
