/// All errors that can occur while fetching and presenting suggestions.
#[derive(Debug, thiserror::Error)]
pub enum SuggestError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("HTTP status {0}")]
    Status(u16),

    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Query is empty")]
    EmptyQuery,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Custom(String),
}

/// Coarse classification used when logging fetch failures.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    Network,
    Parse,
    EmptyQuery,
    Other,
}

impl ErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::Network => "NetworkError",
            ErrorKind::Parse => "ParseError",
            ErrorKind::EmptyQuery => "EmptyQuery",
            ErrorKind::Other => "Error",
        }
    }
}

impl SuggestError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            // reqwest reports body decoding failures as its own error type
            SuggestError::Network(e) if e.is_decode() => ErrorKind::Parse,
            SuggestError::Network(_) | SuggestError::Status(_) => ErrorKind::Network,
            SuggestError::Parse(_) => ErrorKind::Parse,
            SuggestError::EmptyQuery => ErrorKind::EmptyQuery,
            SuggestError::Io(_) | SuggestError::Custom(_) => ErrorKind::Other,
        }
    }
}

pub type Result<T> = std::result::Result<T, SuggestError>;
