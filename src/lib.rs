//! Front end of the WSDL to C++ compiler.
//!
//! Turns the command line into a validated [`config::Configuration`], loads an
//! optional client certificate and runs the generation engine on an event loop.

pub mod bootstrap;
#[cfg(feature = "tls")]
pub mod certificate;
pub mod cli;
pub mod config;
pub mod engine;
pub mod error;
pub mod locator;
pub mod logging;
pub mod namespace_mapping;
