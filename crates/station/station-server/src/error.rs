use std::io;

#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("failed to bind '{addr}'")]
    Bind {
        addr: String,
        #[source]
        source: io::Error,
    },

    #[error("websocket handshake failed: {0}")]
    Handshake(String),

    #[error(transparent)]
    Io(#[from] io::Error),
}
