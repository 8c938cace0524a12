use thiserror::Error;

/// Failures of the two calls into the hosted model.
///
/// The `Display` text is what ends up in the Error status, so every variant reads
/// as a finished sentence for the user.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("API Key is missing.")]
    MissingCredential,

    #[error("{0}")]
    Transport(String),

    #[error("API Error {status}: {body}")]
    Api { status: u16, body: String },

    #[error("No response parts received from the model.")]
    MalformedResponse,

    #[error("The AI did not return an image.")]
    NoImage,

    #[error("Failed to generate writing content.")]
    Writing,
}

impl From<reqwest::Error> for GatewayError {
    fn from(err: reqwest::Error) -> Self {
        GatewayError::Transport(err.to_string())
    }
}

#[derive(Debug, Error)]
pub enum ImageBufferError {
    #[error("invalid base64 payload: {0}")]
    Decode(#[from] base64::DecodeError),
}

#[derive(Debug, Error)]
pub enum UploadError {
    #[error("no file was chosen")]
    NoFile,

    #[error("file is not a recognised image")]
    NotAnImage,

    #[error("upload worker failed: {0}")]
    Worker(String),
}
