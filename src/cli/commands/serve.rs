//! Web server command.

use console::style;

use crate::config::Settings;
use crate::ocr::OcrBackend;
use crate::server::AppState;

/// Port used when the bind address names only a host.
const DEFAULT_PORT: u16 = 5000;

/// Start the web server.
pub async fn cmd_serve(settings: &Settings, bind: &str) -> anyhow::Result<()> {
    let (host, port) = parse_bind_address(bind)?;

    let state = AppState::from_settings(settings)?;
    println!(
        "{} Knowledge base: {}",
        style("→").cyan(),
        state.knowledge.name()
    );

    if !state.ocr.is_available() {
        eprintln!(
            "  {} {}",
            style("!").yellow(),
            state.ocr.availability_hint()
        );
    }

    println!(
        "{} Starting errorlens server at http://{}:{}",
        style("→").cyan(),
        host,
        port
    );
    println!("  Press Ctrl+C to stop");

    crate::server::serve(state, &host, port).await
}

/// Parse a bind address that can be:
/// - Just a port: "5000" -> 127.0.0.1:5000
/// - Just a host: "0.0.0.0" -> 0.0.0.0:5000
/// - Host and port: "0.0.0.0:5000" -> 0.0.0.0:5000
fn parse_bind_address(bind: &str) -> anyhow::Result<(String, u16)> {
    if bind.trim().is_empty() {
        anyhow::bail!("Empty bind address");
    }

    // Try parsing as just a port number
    if let Ok(port) = bind.parse::<u16>() {
        return Ok(("127.0.0.1".to_string(), port));
    }

    // Try parsing as host:port
    if let Some((host, port_str)) = bind.rsplit_once(':') {
        if let Ok(port) = port_str.parse::<u16>() {
            return Ok((host.to_string(), port));
        }
    }

    // Must be just a host, use default port
    Ok((bind.to_string(), DEFAULT_PORT))
}
