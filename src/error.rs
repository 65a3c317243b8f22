use thiserror::Error;

#[cfg(feature = "tls")]
use crate::certificate::CertificateError;
use crate::cli::UsageError;
use crate::locator::LocateError;
use crate::namespace_mapping::MappingFileError;

#[derive(Error, Debug)]
pub enum Wsdl2CppError {
    #[error("{0}")]
    Usage(#[from] UsageError),

    #[error("{0}")]
    MappingFile(#[from] MappingFileError),

    #[cfg(feature = "tls")]
    #[error("{0}")]
    Certificate(#[from] CertificateError),

    #[error("{0}")]
    Locate(#[from] LocateError),

    #[error("Cannot start event loop: {0}")]
    Runtime(#[source] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Engine(#[from] anyhow::Error),
}

impl Wsdl2CppError {
    /// Whether the usage text should accompany this error on stderr.
    pub fn shows_usage(&self) -> bool {
        matches!(self, Self::Usage(_) | Self::MappingFile(_))
    }
}

pub type Result<T> = std::result::Result<T, Wsdl2CppError>;
