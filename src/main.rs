use std::process::ExitCode;

use colored::Colorize;
use wsdl2cpp::{
    bootstrap,
    cli::{self, Invocation},
    config::Configuration,
    engine::{EngineContext, PlanEngine},
    error::Result,
    logging::init_logging,
};

fn main() -> ExitCode {
    let program = std::env::args_os()
        .next()
        .map(|program| program.to_string_lossy().into_owned())
        .unwrap_or_else(|| "wsdl2cpp".to_string());

    // Usage errors are reported before the parsed flag is available.
    if std::env::args_os().skip(1).any(|arg| arg == "-no-color") {
        colored::control::set_override(false);
    }

    match run(&program) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{} {}", "error:".red().bold(), err);
            if err.shows_usage() {
                eprint!("\n{}", cli::usage_text(&program));
            }
            ExitCode::FAILURE
        }
    }
}

fn run(program: &str) -> Result<()> {
    let raw = match cli::parse_args(std::env::args_os().skip(1))? {
        Invocation::Help => {
            eprint!("{}", cli::usage_text(program));
            return Ok(());
        }
        Invocation::Version => {
            eprintln!("{}", cli::version_text());
            return Ok(());
        }
        Invocation::Run(raw) => raw,
    };

    init_logging(raw.verbose, raw.no_color);

    let config = Configuration::from_args(raw)?;

    log::debug!("Configuration: {:?}", config);

    #[cfg(feature = "tls")]
    let tls = config
        .client_identity
        .as_ref()
        .map(wsdl2cpp::certificate::load_client_identity)
        .transpose()?;

    let context = EngineContext::new(&config);
    #[cfg(feature = "tls")]
    let context = context.with_tls(tls.as_ref());

    let mut engine = PlanEngine::new();
    bootstrap::run(&mut engine, context)
}
