use crate::args::MockArgs;
use crate::error::AppResult;
use crate::mock::{MockConfig, MockServer};
use crate::shutdown_handlers::{setup_signal_shutdown_handler, shutdown_channel};

/// Serves the mock endpoint until Ctrl+C or SIGTERM.
pub(crate) async fn run_mock(args: MockArgs) -> AppResult<()> {
    let config = MockConfig::from_args(&args)?;
    let server = MockServer::bind(&args.listen, config).await?;

    let (shutdown_tx, shutdown_rx) = shutdown_channel();
    let signal_handle = setup_signal_shutdown_handler(&shutdown_tx);

    server.serve(shutdown_rx).await;
    signal_handle.await?;
    Ok(())
}
