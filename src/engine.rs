//! Contract between the front end and a code generation engine.

use std::future::Future;

use log::info;

#[cfg(feature = "tls")]
use crate::certificate::TlsClientContext;
use crate::config::Configuration;
use crate::locator::{self, DocumentLocation};

/// What an engine gets to work with. Everything in here is read-only for the
/// whole run.
#[derive(Debug, Clone, Copy)]
pub struct EngineContext<'a> {
    pub config: &'a Configuration,
    /// Client identity for downloads, when a PKCS12 file was given.
    #[cfg(feature = "tls")]
    pub tls: Option<&'a TlsClientContext>,
}

impl<'a> EngineContext<'a> {
    pub fn new(config: &'a Configuration) -> Self {
        Self {
            config,
            #[cfg(feature = "tls")]
            tls: None,
        }
    }

    #[cfg(feature = "tls")]
    pub fn with_tls(mut self, tls: Option<&'a TlsClientContext>) -> Self {
        self.tls = tls;
        self
    }
}

/// A code generation engine.
///
/// `run` is first polled inside a live event loop, so the engine may start
/// network I/O right away. Returning ends the loop.
pub trait Engine {
    fn run(&mut self, context: EngineContext<'_>) -> impl Future<Output = anyhow::Result<()>>;
}

/// Files and sources a generation run works with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationPlan {
    pub document: DocumentLocation,
    pub outputs: Vec<std::path::PathBuf>,
    pub client_certificate: Option<String>,
}

/// Resolves the document and reports what a generation run would write.
#[derive(Debug, Default)]
pub struct PlanEngine {
    plan: Option<GenerationPlan>,
}

impl PlanEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// The plan of the last completed run.
    pub fn plan(&self) -> Option<&GenerationPlan> {
        self.plan.as_ref()
    }

    fn build_plan(context: &EngineContext<'_>) -> anyhow::Result<GenerationPlan> {
        let config = context.config;
        let document = locator::locate(config)?;
        let outputs = config
            .header_path()
            .into_iter()
            .chain(config.implementation_path())
            .collect();

        #[cfg(feature = "tls")]
        let client_certificate = context.tls.map(|tls| tls.subject().to_string());
        #[cfg(not(feature = "tls"))]
        let client_certificate = None;

        Ok(GenerationPlan {
            document,
            outputs,
            client_certificate,
        })
    }
}

impl Engine for PlanEngine {
    async fn run(&mut self, context: EngineContext<'_>) -> anyhow::Result<()> {
        let plan = Self::build_plan(&context)?;
        let config = context.config;

        match &plan.document {
            DocumentLocation::Local(path) => info!("Reading WSDL from {:?}", path),
            DocumentLocation::Remote(url) => match &plan.client_certificate {
                Some(subject) => info!("Downloading WSDL from {} as {}", url, subject),
                None => info!("Downloading WSDL from {}", url),
            },
        }
        info!("Generation mode: {:?}", config.mode);
        if config.mode == crate::config::GenerationMode::ImplementationOnly {
            info!("Implementation includes {}", config.header_file_name);
        }
        for output in &plan.outputs {
            info!("Output: {:?}", output);
        }
        if let Some(service) = &config.service_name {
            info!("Service: {}", service);
        }
        log::debug!(
            "server={} sync={} async={} async-jobs={} optional-elements={:?}",
            config.generate_server_code,
            !config.skip_sync,
            !config.skip_async,
            !config.skip_async_jobs,
            config.optional_element_type
        );

        self.plan = Some(plan);
        Ok(())
    }
}
