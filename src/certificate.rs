//! Client identity for authenticated WSDL downloads.
//!
//! A PKCS12 bundle is opened, decrypted and turned into a [`TlsClientContext`]
//! which is handed to the engine. Nothing here touches process-wide TLS state.

use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, info};
use openssl::nid::Nid;
use openssl::pkcs12::Pkcs12;
use openssl::pkey::{PKey, Private};
use openssl::ssl::{SslConnector, SslMethod};
use openssl::x509::X509;
use openssl::x509::store::X509StoreBuilder;
use thiserror::Error;

use crate::config::IdentitySource;

#[derive(Error, Debug)]
pub enum CertificateError {
    /// The file could not be read at all
    #[error("Failed to open the {} certificate file for reading: {source}", .path.display())]
    Open {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The file was read but key and certificate could not be extracted
    #[error("Unable to load the {} certificate file\n{}", .path.display(), extraction_hint(.password_supplied))]
    Extract {
        path: PathBuf,
        password_supplied: bool,
        #[source]
        source: Option<openssl::error::ErrorStack>,
    },

    /// The identity could not be installed into a TLS client context
    #[error("Cannot set up TLS client context: {0}")]
    Context(#[source] openssl::error::ErrorStack),
}

fn extraction_hint(password_supplied: &bool) -> &'static str {
    if *password_supplied {
        "Please make sure that you have passed the correct password"
    } else {
        "Maybe it is password protected?"
    }
}

/// Key, leaf certificate and authority chain from one PKCS12 file.
#[derive(Debug)]
pub struct CertificateBundle {
    pub private_key: PKey<Private>,
    pub certificate: X509,
    pub authorities: Vec<X509>,
}

impl CertificateBundle {
    /// Reads and decrypts a PKCS12 file. An empty password means none was given.
    pub fn load(path: &Path, password: &str) -> Result<Self, CertificateError> {
        let der = fs::read(path).map_err(|source| CertificateError::Open {
            path: path.to_path_buf(),
            source,
        })?;

        let extract_error = |source| CertificateError::Extract {
            path: path.to_path_buf(),
            password_supplied: !password.is_empty(),
            source,
        };

        let parsed = Pkcs12::from_der(&der)
            .and_then(|pkcs12| pkcs12.parse2(password))
            .map_err(|e| extract_error(Some(e)))?;

        let (Some(private_key), Some(certificate)) = (parsed.pkey, parsed.cert) else {
            return Err(extract_error(None));
        };
        let authorities: Vec<X509> = parsed
            .ca
            .map(|stack| stack.into_iter().collect())
            .unwrap_or_default();

        debug!(
            "Loaded {:?}: certificate for {}, {} authority certificate(s)",
            path,
            common_name(&certificate),
            authorities.len()
        );

        Ok(Self {
            private_key,
            certificate,
            authorities,
        })
    }
}

/// TLS client settings carrying the user's certificate, passed explicitly to
/// whatever performs the download.
pub struct TlsClientContext {
    connector: SslConnector,
    subject: String,
    trusted_authorities: Vec<String>,
}

impl TlsClientContext {
    /// Installs the bundle's key and certificate. Authority certificates are
    /// sent as the chain and, when the bundle has any, they replace the system
    /// roots as the only trusted authorities.
    pub fn from_bundle(bundle: CertificateBundle) -> Result<Self, CertificateError> {
        let mut builder =
            SslConnector::builder(SslMethod::tls_client()).map_err(CertificateError::Context)?;
        builder
            .set_private_key(&bundle.private_key)
            .map_err(CertificateError::Context)?;
        builder
            .set_certificate(&bundle.certificate)
            .map_err(CertificateError::Context)?;
        builder
            .check_private_key()
            .map_err(CertificateError::Context)?;

        let trusted_authorities: Vec<String> = bundle.authorities.iter().map(common_name).collect();
        if !bundle.authorities.is_empty() {
            let mut store = X509StoreBuilder::new().map_err(CertificateError::Context)?;
            for authority in &bundle.authorities {
                store
                    .add_cert(authority.clone())
                    .map_err(CertificateError::Context)?;
            }
            builder.set_cert_store(store.build());
            debug!("Trusting only {:?}", trusted_authorities);
        }

        for authority in bundle.authorities {
            builder
                .add_extra_chain_cert(authority)
                .map_err(CertificateError::Context)?;
        }

        Ok(Self {
            connector: builder.build(),
            subject: common_name(&bundle.certificate),
            trusted_authorities,
        })
    }

    pub fn connector(&self) -> &SslConnector {
        &self.connector
    }

    /// Common name of the client certificate.
    pub fn subject(&self) -> &str {
        &self.subject
    }

    /// Common names of the bundle's authorities. Empty when the system roots
    /// are trusted instead.
    pub fn trusted_authorities(&self) -> &[String] {
        &self.trusted_authorities
    }
}

impl std::fmt::Debug for TlsClientContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TlsClientContext")
            .field("subject", &self.subject)
            .field("trusted_authorities", &self.trusted_authorities)
            .finish_non_exhaustive()
    }
}

/// Loads the configured PKCS12 bundle into a TLS client context.
pub fn load_client_identity(source: &IdentitySource) -> Result<TlsClientContext, CertificateError> {
    let bundle = CertificateBundle::load(&source.pkcs12_file, &source.password)?;
    let context = TlsClientContext::from_bundle(bundle)?;
    info!(
        "Using client certificate {} from {:?}",
        context.subject(),
        source.pkcs12_file
    );
    Ok(context)
}

fn common_name(certificate: &X509) -> String {
    certificate
        .subject_name()
        .entries_by_nid(Nid::COMMONNAME)
        .next()
        .and_then(|entry| entry.data().as_utf8().ok())
        .map(|name| name.to_string())
        .unwrap_or_else(|| "<unnamed>".to_string())
}
