mod cli;

use std::time::Duration;

use clap::Parser;
use eyre::{eyre, WrapErr};
use serde_json::Value;

use cnrpc_core::catalog::{Operation, Presence};
use cnrpc_core::{ClientConfig, CoreError, DaemonClient};

use cli::{Cli, Command};

#[tokio::main]
async fn main() -> eyre::Result<()> {
    let args = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_file(true)
        .with_line_number(true)
        .with_level(true)
        .with_writer(std::io::stderr)
        .init();

    let config = build_config(&args)?;
    let base_url = config.base_url();

    match args.command {
        Command::Operations => print_operations(),
        Command::Call { operation, args } => {
            let client = connect(config)?;
            let call_args = parse_call_args(args.as_deref())?;
            let result = client
                .call_named(&operation, call_args)
                .await
                .map_err(|err| connect_error(&base_url, err))?;
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        Command::Status => {
            let client = connect(config)?;
            let height = client
                .height()
                .await
                .map_err(|err| connect_error(&base_url, err))?;
            let info = client
                .info()
                .await
                .map_err(|err| connect_error(&base_url, err))?;
            tracing::info!(
                height = height.height,
                network_height = height.network_height,
                "daemon reachable"
            );
            if !height.is_synced() {
                tracing::warn!(
                    behind = height.network_height.saturating_sub(height.height),
                    "daemon is still syncing"
                );
            }

            println!();
            println!("  Daemon at {base_url}:");
            println!("    Version:   {}", display_or_unknown(&info.version));
            println!(
                "    Height:    {} / {}",
                height.height, height.network_height
            );
            println!("    Synced:    {}", height.is_synced());
            println!(
                "    Peers:     {} in / {} out",
                info.incoming_connections_count, info.outgoing_connections_count
            );
            println!("    Pool size: {}", info.tx_pool_size);
            println!();
        }
    }

    Ok(())
}

fn build_config(args: &Cli) -> eyre::Result<ClientConfig> {
    let mut config = ClientConfig::default()
        .with_host(args.host.clone())
        .with_port(args.port)
        .with_timeout(Duration::from_millis(args.timeout_ms))
        .with_tls(args.tls)
        .with_keep_alive(!args.no_keep_alive)
        .with_requests_per_second(args.requests_per_second);
    if let Some(user_agent) = &args.user_agent {
        config = config.with_user_agent(user_agent.clone());
    }
    config.validated().context("invalid connection settings")
}

fn connect(config: ClientConfig) -> eyre::Result<DaemonClient> {
    let base_url = config.base_url();
    let client = DaemonClient::new(config).context("configure daemon client")?;
    tracing::debug!(url = %base_url, "daemon client ready");
    Ok(client)
}

fn parse_call_args(raw: Option<&str>) -> eyre::Result<Value> {
    let Some(raw) = raw else {
        return Ok(Value::Null);
    };
    let value: Value = serde_json::from_str(raw).context("--args must be valid JSON")?;
    if !value.is_object() {
        return Err(eyre!("--args must be a JSON object, got: {value}"));
    }
    Ok(value)
}

fn print_operations() {
    for op in Operation::ALL {
        let spec = op.spec();
        let args: Vec<String> = spec
            .args
            .iter()
            .map(|arg| match arg.presence {
                Presence::Required => arg.name.to_owned(),
                _ => format!("[{}]", arg.name),
            })
            .collect();
        println!(
            "{:<24} {:<40} {}",
            spec.name,
            spec.endpoint.to_string(),
            args.join(" ")
        );
    }
}

fn display_or_unknown(value: &str) -> &str {
    if value.is_empty() {
        "unknown"
    } else {
        value
    }
}

/// Attach a hint to transport failures; other errors pass through as-is.
fn connect_error(base_url: &str, err: CoreError) -> eyre::Report {
    match err {
        CoreError::Network(network) => {
            let message =
                format_connect_error(base_url, &network.to_string(), &format!("{network:?}"));
            eyre!(message).wrap_err("while talking to the daemon")
        }
        other => eyre::Report::new(other),
    }
}

fn format_connect_error(base_url: &str, source_error: &str, debug_error: &str) -> String {
    let mut lines = vec![
        format!("could not reach daemon at `{base_url}`"),
        format!("error: {source_error}"),
    ];

    if debug_error.contains("Timeout") {
        lines.push(
            "hint: the daemon did not answer in time; raise --timeout-ms or check that it is not busy syncing"
                .into(),
        );
    } else if debug_error.contains("dns error") || debug_error.contains("failed to lookup") {
        lines.push(
            "hint: hostname resolution failed; verify --host and your DNS/network".into(),
        );
    } else if debug_error.contains("Connection refused") || debug_error.contains("ConnectionRefused")
    {
        lines.push(
            "hint: nothing is listening there; verify --port and that the daemon runs with RPC enabled"
                .into(),
        );
    } else if debug_error.contains("certificate") || debug_error.contains("tls") {
        lines.push(
            "hint: TLS handshake failed; drop --tls for plain HTTP daemons or check the certificate"
                .into(),
        );
    } else if source_error.contains("HTTP 404") {
        lines.push(
            "hint: endpoint not found; the daemon may be an older release without this call".into(),
        );
    }

    lines.join("\n")
}
