use std::io::IsTerminal;

use tokio::sync::{mpsc, watch};
use tracing::{info, warn};

use crate::args::TesterArgs;
use crate::error::{AppError, AppResult};
use crate::http::{HttpExecutor, RequestSpec};
use crate::metrics::{RunOutcome, Termination};
use crate::run::{RunController, RunSample};
use crate::shutdown::ShutdownSender;
use crate::shutdown_handlers::{
    setup_keyboard_shutdown_handler, setup_signal_shutdown_handler, shutdown_channel,
};
use crate::ui::{model::UiData, render::setup_render_ui};

use super::export::{export_csv, export_json};
use super::summary::print_report;

/// Samples buffered between the controller and its consumer.
const SAMPLE_CHANNEL_CAPACITY: usize = 64;

/// Whether the live dashboard should own the terminal for this run.
#[must_use]
pub(crate) fn dashboard_enabled(args: &TesterArgs) -> bool {
    !args.no_ui && std::io::stdout().is_terminal()
}

/// Runs one load test end to end: validate, execute, report, export.
///
/// # Errors
///
/// Returns an error for invalid input, when the HTTP client cannot be built,
/// when an export fails, or when the run was aborted.
pub(crate) async fn run_local(args: TesterArgs) -> AppResult<()> {
    let spec = RequestSpec::from_args(&args)?;
    let executor = HttpExecutor::new(&spec)?;
    let target = format!("{} {}", spec.method().as_str(), spec.url());

    let (shutdown_tx, _) = shutdown_channel();
    let signal_handle = setup_signal_shutdown_handler(&shutdown_tx);

    let controller = RunController::new(&spec, executor).with_shutdown(shutdown_tx.subscribe());
    let (sample_tx, sample_rx) = mpsc::channel::<RunSample>(SAMPLE_CHANNEL_CAPACITY);

    let outcome = if dashboard_enabled(&args) {
        let initial = UiData::new(target.clone(), spec.count().get(), args.no_color);
        run_with_dashboard(controller, sample_tx, sample_rx, &shutdown_tx, initial).await?
    } else {
        let logger = tokio::spawn(log_samples(sample_rx, spec.count().get()));
        let outcome = controller.run(sample_tx).await;
        logger.await?;
        outcome
    };

    drop(shutdown_tx.send(()));
    signal_handle.await?;

    print_report(&target, &outcome, !args.no_table);
    write_exports(&args, &outcome).await?;

    match outcome.termination {
        Termination::Completed => Ok(()),
        Termination::Aborted(reason) => Err(AppError::RunAborted {
            completed: outcome.completed(),
            requested: outcome.requested,
            reason,
        }),
    }
}

async fn run_with_dashboard(
    controller: RunController<'_, HttpExecutor>,
    sample_tx: mpsc::Sender<RunSample>,
    mut sample_rx: mpsc::Receiver<RunSample>,
    shutdown_tx: &ShutdownSender,
    initial: UiData,
) -> AppResult<RunOutcome> {
    let (ui_tx, _) = watch::channel(initial);
    let ui_handle = setup_render_ui(shutdown_tx, &ui_tx);
    let keyboard_handle = setup_keyboard_shutdown_handler(shutdown_tx);

    let forwarder = tokio::spawn(async move {
        while let Some(sample) = sample_rx.recv().await {
            ui_tx.send_modify(|data| data.apply(&sample));
        }
        ui_tx
    });

    let outcome = controller.run(sample_tx).await;
    let ui_tx = forwarder.await?;
    ui_tx.send_modify(|data| data.finish(outcome.termination));
    ui_handle.await?;

    drop(shutdown_tx.send(()));
    keyboard_handle.await?;
    Ok(outcome)
}

async fn log_samples(mut sample_rx: mpsc::Receiver<RunSample>, requested: u64) {
    while let Some(RunSample { result, statistics }) = sample_rx.recv().await {
        let position = result.index.saturating_add(1);
        let rps = statistics
            .requests_per_second
            .map_or_else(|| "--".to_owned(), |rps| format!("{:.2}", rps));
        if let Some(error) = result.error.as_deref() {
            warn!(
                "[{}/{}] failed after {:.1}ms: {} | rps {} | error rate {:.1}%",
                position,
                requested,
                result.elapsed.as_secs_f64() * 1_000.0,
                error,
                rps,
                statistics.error_rate * 100.0
            );
        } else if result.is_error {
            warn!(
                "[{}/{}] {} in {:.1}ms | rps {} | error rate {:.1}%",
                position,
                requested,
                result.status_code,
                result.elapsed.as_secs_f64() * 1_000.0,
                rps,
                statistics.error_rate * 100.0
            );
        } else {
            info!(
                "[{}/{}] {} in {:.1}ms | rps {} | avg {:.1}ms | error rate {:.1}%",
                position,
                requested,
                result.status_code,
                result.elapsed.as_secs_f64() * 1_000.0,
                rps,
                statistics.avg_response_time.as_secs_f64() * 1_000.0,
                statistics.error_rate * 100.0
            );
        }
    }
}

async fn write_exports(args: &TesterArgs, outcome: &RunOutcome) -> AppResult<()> {
    if let Some(path) = args.export_json.as_deref() {
        export_json(path, outcome).await?;
        info!("Wrote JSON export to {}", path);
    }
    if let Some(path) = args.export_csv.as_deref() {
        export_csv(path, &outcome.results).await?;
        info!("Wrote CSV export to {}", path);
    }
    Ok(())
}
