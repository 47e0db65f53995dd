//! l2trace - MAC address path tracer
//!
//! Entry point for the l2trace command.

use anyhow::{Context, Result};
use clap::Parser;
use inquire::{Password, Select, Text};
use std::net::Ipv4Addr;
use std::path::PathBuf;
use std::process::ExitCode;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error};

use l2trace::{SearchTarget, TopologyWalker, Trace, TraceConfig, HOP_SEPARATOR};
use l2trace_device::{Credentials, SshConnector, TemplateParser};
use l2trace_types::{MacAddress, OsFamily};

const BANNER: &str = "\
==============================================================
  l2trace - follow a MAC address across Cisco switches via CDP
==============================================================";

/// Trace the switch path to a host by following its MAC address
#[derive(Parser, Debug)]
#[command(name = "l2trace")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Switch to start from
    #[arg(short = 's', long)]
    start: Option<Ipv4Addr>,

    /// IP address of the host to locate
    #[arg(short = 'd', long)]
    destination: Option<Ipv4Addr>,

    /// MAC address of the host to locate
    #[arg(short = 'm', long)]
    mac: Option<MacAddress>,

    /// OS family of the starting switch (ios, nxos)
    #[arg(short = 'o', long)]
    os: Option<OsFamily>,

    /// Login username
    #[arg(short = 'u', long)]
    username: Option<String>,

    /// YAML configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Per-session timeout in seconds
    #[arg(long)]
    timeout: Option<u64>,

    /// Multiplier applied to the pause before each command
    #[arg(long)]
    delay_factor: Option<f64>,

    /// SSH port
    #[arg(long)]
    port: Option<u16>,

    /// Directory of parser templates overriding the built-in ones
    #[arg(long)]
    template_dir: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,
}

impl Args {
    /// File configuration with command-line overrides applied.
    fn load_config(&self) -> Result<TraceConfig> {
        let mut config = match &self.config {
            Some(path) => TraceConfig::from_file(path)?,
            None => TraceConfig::default(),
        };

        if let Some(timeout) = self.timeout {
            config.timeout_secs = timeout;
        }
        if let Some(delay_factor) = self.delay_factor {
            config.delay_factor = delay_factor;
        }
        if let Some(port) = self.port {
            config.ssh_port = port;
        }
        if let Some(dir) = &self.template_dir {
            config.template_dir = Some(dir.clone());
        }
        if let Some(level) = &self.log_level {
            config.log_level = level.clone();
        }

        config.validate()?;
        Ok(config)
    }
}

/// Initializes tracing/logging subsystem
fn init_logging(log_level: &str) {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .init();
}

fn prompt_parsed<T>(message: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let answer = Text::new(message).prompt()?;
    answer
        .trim()
        .parse()
        .with_context(|| format!("invalid answer {:?}", answer.trim()))
}

fn or_prompt<T>(value: Option<T>, message: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match value {
        Some(value) => Ok(value),
        None => prompt_parsed(message),
    }
}

/// Console report of a finished trace.
fn report(mac: &MacAddress, trace: &Trace) -> String {
    let mut out = format!(
        "\n** Trace path for mac address: {}\n\n",
        mac.to_string().to_uppercase()
    );
    let path = trace.render();
    match (path.is_empty(), trace.tail()) {
        (true, None) => out.push_str("(no hops resolved)"),
        (true, Some(tail)) => out.push_str(&format!("({tail})")),
        (false, None) => out.push_str(&path),
        (false, Some(tail)) => out.push_str(&format!("{path}{HOP_SEPARATOR}({tail})")),
    }
    out.push_str(&format!("\n\nTrace ended: {}", trace.reason));
    out
}

async fn run(args: Args) -> Result<Trace> {
    let config = args.load_config()?;
    init_logging(&config.log_level);
    debug!(?config, "Loaded configuration");

    println!("{BANNER}");

    let start = or_prompt(args.start, "Starting switch IP:")?;
    let destination = or_prompt(args.destination, "Destination IP:")?;
    let mac = or_prompt(args.mac, "Destination MAC address:")?;
    let os = match args.os {
        Some(os) => os,
        None => Select::new("Starting switch OS:", vec![OsFamily::Ios, OsFamily::Nxos]).prompt()?,
    };
    let username = match args.username {
        Some(username) => username,
        None => Text::new("Username:").prompt()?,
    };
    let password = Password::new("Password:")
        .without_confirmation()
        .prompt()?;

    let parser = TemplateParser::new(&config.parser_config())
        .context("failed to load parser templates")?;
    let connector = Arc::new(SshConnector::new(Arc::new(parser)));
    let settings = config.session_settings(Credentials::new(username, password));
    let walker = TopologyWalker::new(connector, settings);

    let target = SearchTarget::new(destination, mac, start, os);
    let started = Instant::now();
    let trace = walker.walk(&target).await.context("trace aborted")?;

    println!("{}", report(&mac, &trace));
    println!(
        "Transaction time: {:.2} seconds",
        started.elapsed().as_secs_f64()
    );

    Ok(trace)
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    match run(args).await {
        Ok(trace) if trace.reason.is_located() => ExitCode::SUCCESS,
        // The walk ended before reaching the host's edge port
        Ok(_) => ExitCode::from(2),
        Err(e) => {
            error!("{:#}", e);
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
