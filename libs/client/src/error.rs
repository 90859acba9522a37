use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("This method is protected, you need to be authenticated")]
    Unauthenticated,

    #[error("Authentication failed")]
    AuthenticationFailed,

    #[error("Session store error: {0}")]
    Store(String),

    #[error(transparent)]
    Rpc(#[from] odoo_jsonrpc::Error),
}

impl Error {
    pub fn store(msg: impl Into<String>) -> Self {
        Self::Store(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
