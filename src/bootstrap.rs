//! Hands the resolved configuration to the engine inside an event loop.

use log::debug;
use tokio::runtime::Builder;
use tokio::task::LocalSet;

use crate::engine::{Engine, EngineContext};
use crate::error::{Result, Wsdl2CppError};

/// Runs `engine` on a single-threaded event loop and blocks until it returns.
///
/// The engine is queued as the loop's first task rather than called directly,
/// so the I/O and timer drivers are already running when it is first polled.
pub fn run<E: Engine>(engine: &mut E, context: EngineContext<'_>) -> Result<()> {
    let runtime = Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(Wsdl2CppError::Runtime)?;
    let local = LocalSet::new();

    debug!("Starting event loop");
    local.block_on(&runtime, async move {
        tokio::task::yield_now().await;
        debug!("Dispatching generation engine");
        engine.run(context).await
    })?;
    debug!("Event loop finished");

    Ok(())
}
