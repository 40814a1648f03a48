//! Server lifecycle management.

use std::{net::SocketAddr, sync::Arc};

use anyhow::{Result, anyhow};
use tiny_http::Server;

use crate::core::register_server;
use crate::log;

/// Maximum number of port binding attempts.
const MAX_PORT_RETRIES: u16 = 10;

/// Request handler threads.
const WORKERS: usize = 4;

/// Bind to the specified interface and port, with automatic port retry.
pub fn bind_with_retry(
    interface: std::net::IpAddr,
    base_port: u16,
) -> Result<(Server, SocketAddr)> {
    let mut last_error = None;

    for offset in 0..MAX_PORT_RETRIES {
        let port = base_port.saturating_add(offset);
        let addr = SocketAddr::new(interface, port);

        match Server::http(addr) {
            Ok(server) => {
                if offset > 0 {
                    log!("serve"; "port {} in use, using {} instead", base_port, port);
                }
                return Ok((server, addr));
            }
            Err(e) => last_error = Some(e),
        }
    }

    Err(anyhow!(
        "Failed to bind after {} attempts (ports {}-{}): {}",
        MAX_PORT_RETRIES,
        base_port,
        base_port.saturating_add(MAX_PORT_RETRIES - 1),
        last_error.map_or_else(|| "no attempt made".to_string(), |e| e.to_string())
    ))
}

/// Register server for graceful shutdown.
///
/// When Ctrl+C is pressed, the handler set up in `main` unblocks the server
/// and the request loop returns.
pub fn register_server_for_shutdown(server: &Arc<Server>) {
    register_server(Arc::clone(server));
}

/// Worker pool serving requests concurrently.
pub fn request_pool() -> Result<rayon::ThreadPool> {
    rayon::ThreadPoolBuilder::new()
        .num_threads(WORKERS)
        .thread_name(|i| format!("serve-{i}"))
        .build()
        .map_err(|e| anyhow!("failed to create request pool: {e}"))
}
