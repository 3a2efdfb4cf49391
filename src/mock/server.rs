use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, LogNormal};
use tokio::net::{TcpListener, TcpStream};
use tracing::{debug, info, warn};

use crate::args::{
    DEFAULT_MOCK_DELAY_LOCATION, DEFAULT_MOCK_DELAY_SCALE, DEFAULT_MOCK_ERROR_RATE, MockArgs,
};
use crate::error::{AppError, AppResult, HttpError, ValidationError};
use crate::shutdown::ShutdownReceiver;

use super::http::{read_request, write_error_response, write_status_response};

/// Behaviour of the mock endpoint.
#[derive(Debug, Clone, Copy)]
pub struct MockConfig {
    error_rate: f64,
    delay: Option<LogNormal<f64>>,
    seed: Option<u64>,
}

impl Default for MockConfig {
    fn default() -> Self {
        Self {
            error_rate: DEFAULT_MOCK_ERROR_RATE,
            delay: LogNormal::new(DEFAULT_MOCK_DELAY_LOCATION, DEFAULT_MOCK_DELAY_SCALE).ok(),
            seed: None,
        }
    }
}

impl MockConfig {
    /// # Errors
    ///
    /// Returns an error when the error rate is outside `0.0..=1.0` or the
    /// delay parameters do not describe a log-normal distribution.
    pub fn new(error_rate: f64, delay: Option<(f64, f64)>, seed: Option<u64>) -> AppResult<Self> {
        if !(0.0..=1.0).contains(&error_rate) {
            return Err(AppError::validation(ValidationError::ErrorRateOutOfRange {
                value: error_rate,
            }));
        }
        let delay = match delay {
            Some((location, scale)) => Some(log_normal(location, scale)?),
            None => None,
        };
        Ok(Self {
            error_rate,
            delay,
            seed,
        })
    }

    /// # Errors
    ///
    /// See [`MockConfig::new`].
    pub fn from_args(args: &MockArgs) -> AppResult<Self> {
        let delay = (!args.no_delay).then_some((args.delay_location, args.delay_scale));
        Self::new(args.error_rate, delay, args.seed)
    }

    #[must_use]
    pub const fn error_rate(&self) -> f64 {
        self.error_rate
    }

    #[must_use]
    pub const fn delay(&self) -> Option<LogNormal<f64>> {
        self.delay
    }

    #[must_use]
    pub const fn seed(&self) -> Option<u64> {
        self.seed
    }

    fn rng(&self) -> StdRng {
        self.seed
            .map_or_else(StdRng::from_entropy, StdRng::seed_from_u64)
    }
}

fn log_normal(location: f64, scale: f64) -> AppResult<LogNormal<f64>> {
    let invalid =
        || AppError::validation(ValidationError::InvalidDelayDistribution { location, scale });
    if !location.is_finite() || !scale.is_finite() || scale < 0.0 {
        return Err(invalid());
    }
    LogNormal::new(location, scale).map_err(|_err| invalid())
}

/// Decision for a single request, drawn up front so the RNG lock is never
/// held across an await.
#[derive(Debug)]
pub(super) struct Draw {
    pub(super) delay: Duration,
    pub(super) fail: bool,
}

pub(super) struct Responder {
    config: MockConfig,
    pub(super) rng: Mutex<StdRng>,
}

impl Responder {
    pub(super) fn new(config: MockConfig) -> Self {
        Self {
            rng: Mutex::new(config.rng()),
            config,
        }
    }

    pub(super) fn draw(&self) -> Draw {
        let mut rng = self.rng.lock().unwrap_or_else(|poisoned| {
            warn!("Mock RNG lock was poisoned; reusing its state.");
            poisoned.into_inner()
        });
        let delay = self
            .config
            .delay
            .map(|distribution| distribution.sample(&mut *rng))
            .and_then(|secs| Duration::try_from_secs_f64(secs).ok())
            .unwrap_or(Duration::ZERO);
        let fail = rng.r#gen::<f64>() < self.config.error_rate;
        Draw { delay, fail }
    }
}

pub struct MockServer {
    listener: TcpListener,
    responder: Arc<Responder>,
}

impl MockServer {
    /// # Errors
    ///
    /// Returns an error when the address cannot be bound.
    pub async fn bind(addr: &str, config: MockConfig) -> AppResult<Self> {
        let listener = TcpListener::bind(addr).await.map_err(|err| {
            AppError::http(HttpError::BindMockServer {
                addr: addr.to_owned(),
                source: err,
            })
        })?;
        Ok(Self {
            listener,
            responder: Arc::new(Responder::new(config)),
        })
    }

    /// # Errors
    ///
    /// Returns an error when the bound address cannot be read.
    pub fn local_addr(&self) -> AppResult<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    /// Accepts connections until a shutdown is broadcast.
    pub async fn serve(self, mut shutdown_rx: ShutdownReceiver) {
        if let Ok(addr) = self.listener.local_addr() {
            info!("Mock endpoint listening on http://{}/", addr);
        }
        loop {
            tokio::select! {
                _ = shutdown_rx.recv() => {
                    info!("Mock endpoint shutting down.");
                    break;
                }
                accepted = self.listener.accept() => {
                    let (socket, peer) = match accepted {
                        Ok(result) => result,
                        Err(err) => {
                            warn!("Failed to accept mock connection: {}", err);
                            continue;
                        }
                    };
                    let responder = Arc::clone(&self.responder);
                    tokio::spawn(async move {
                        if let Err(err) = handle_connection(socket, &responder).await {
                            debug!("Mock connection from {} failed: {}", peer, err);
                        }
                    });
                }
            }
        }
    }
}

async fn handle_connection(mut socket: TcpStream, responder: &Responder) -> AppResult<()> {
    let request = match read_request(&mut socket).await {
        Ok(request) => request,
        Err(err) => return write_error_response(&mut socket, err.status, &err.message).await,
    };

    if request.path != "/" {
        return write_error_response(&mut socket, 404, "Not found").await;
    }
    if request.method != "GET" && request.method != "POST" {
        return write_error_response(&mut socket, 405, "Method not allowed").await;
    }

    let draw = responder.draw();
    if !draw.delay.is_zero() {
        tokio::time::sleep(draw.delay).await;
    }
    if draw.fail {
        write_status_response(&mut socket, 500, "error").await
    } else {
        write_status_response(&mut socket, 200, "ok").await
    }
}
