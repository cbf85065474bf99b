// metrics/mod.rs
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;

pub fn setup_metrics(port: u16) -> anyhow::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()
        .map_err(|e| anyhow::anyhow!("Failed to setup metrics: {}", e))?;
    tracing::info!("Metrics exporter listening on {}", addr);
    Ok(())
}

pub fn record_command(command: &'static str, outcome: &'static str) {
    ::metrics::counter!("garage_commands_total", "command" => command, "outcome" => outcome)
        .increment(1);
}

pub fn record_discovery(outcome: &'static str) {
    ::metrics::counter!("garage_discovery_total", "outcome" => outcome).increment(1);
}
