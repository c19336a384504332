// Server loop module
// Accept loop, woken either by a new connection or by a shutdown signal

use std::sync::Arc;
use tokio::net::TcpListener;

use super::connection::accept_connection;
use super::signal::SignalHandler;
use crate::config::AppState;
use crate::logger;

/// Run the accept loop until a shutdown signal arrives.
///
/// Each accepted connection is served on its own task; the loop itself
/// never blocks on a request. On shutdown the listener is dropped and the
/// function returns `Ok`, letting `main` exit with code 0. In-flight
/// connections finish on their own tasks.
pub async fn start_server_loop(
    listener: TcpListener,
    state: Arc<AppState>,
    signals: Arc<SignalHandler>,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        tokio::select! {
            accept_result = listener.accept() => {
                match accept_result {
                    Ok((stream, peer_addr)) => {
                        accept_connection(stream, peer_addr, &state);
                    }
                    Err(e) => {
                        logger::log_error(&format!("Failed to accept connection: {e}"));
                    }
                }
            }

            () = signals.shutdown.notified() => {
                logger::log_server_stop();
                break;
            }
        }
    }

    Ok(())
}
