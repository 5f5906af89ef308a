//! CLI entrypoint for delib
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result, anyhow};
use clap::{CommandFactory, Parser};
use delib_application::{
    ActionDispatcher, ActionName, AgentResponseOrchestrator, CompositeModelLog, ExperimenterGuard,
    ModelLogSink, NoModelLog, ProcessModelResponseInput, SystemClock,
};
use delib_domain::RetryPolicy;
use delib_infrastructure::{
    ConfigLoader, DocumentStoreModelLog, FileConfig, InMemoryDocumentStore, JsonlModelLogWriter,
    build_adapters,
};
use delib_presentation::{CallArgs, Cli, Command, GenerateArgs, OutputFormatter, formatter_for};
use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    if cli.show_config {
        ConfigLoader::print_config_sources(cli.config.as_ref());
        return Ok(ExitCode::SUCCESS);
    }

    let config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_ref())
            .map_err(|e| anyhow!("Failed to load configuration: {e}"))?
    };
    config.validate().context("Invalid configuration")?;

    let _log_guard = init_tracing(cli.verbose, config.logging.diagnostics_dir.as_deref());
    info!("Starting delib");

    let formatter = formatter_for(cli.output);

    match cli.command {
        None => {
            Cli::command().print_help()?;
            Ok(ExitCode::SUCCESS)
        }
        Some(Command::Actions) => {
            println!("{}", formatter.format_actions(&ActionName::all()));
            Ok(ExitCode::SUCCESS)
        }
        Some(Command::Call(args)) => run_call(&config, &args, formatter.as_ref()).await,
        Some(Command::Generate(args)) => run_generate(&config, &args, formatter.as_ref()).await,
    }
}

/// Initialize logging based on verbosity level; `RUST_LOG` wins when set.
///
/// The returned guard flushes the diagnostics file on drop.
fn init_tracing(verbose: u8, diagnostics_dir: Option<&Path>) -> Option<WorkerGuard> {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace", // -vvv or more
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let (file_layer, guard) = match diagnostics_dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, "delib.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer().with_ansi(false).with_writer(writer);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .with(file_layer)
        .init();

    guard
}

fn open_store(config: &FileConfig) -> Result<Arc<InMemoryDocumentStore>> {
    let store = match &config.store.path {
        Some(path) => InMemoryDocumentStore::load(path)
            .with_context(|| format!("Failed to load store from {}", path.display()))?,
        None => InMemoryDocumentStore::new(),
    };
    Ok(Arc::new(store))
}

fn persist_store(config: &FileConfig, store: &InMemoryDocumentStore) -> Result<()> {
    if let Some(path) = &config.store.path {
        store
            .persist(path)
            .with_context(|| format!("Failed to save store to {}", path.display()))?;
    }
    Ok(())
}

async fn run_call(
    config: &FileConfig,
    args: &CallArgs,
    formatter: &dyn OutputFormatter,
) -> Result<ExitCode> {
    let payload = args.payload()?;
    let store = open_store(config)?;

    // === Dependency Injection ===
    let dispatcher = ActionDispatcher::new(
        store.clone(),
        Arc::new(SystemClock),
        Arc::new(ExperimenterGuard),
        &config.execution_params(),
    );

    match dispatcher.dispatch(&args.action, &args.caller(), payload).await {
        Ok(response) => {
            persist_store(config, &store)?;
            println!("{}", formatter.format_action(&args.action, &response));
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            println!("{}", formatter.format_action_error(&args.action, &e));
            Ok(ExitCode::FAILURE)
        }
    }
}

async fn run_generate(
    config: &FileConfig,
    args: &GenerateArgs,
    formatter: &dyn OutputFormatter,
) -> Result<ExitCode> {
    let params = config.execution_params();
    let store = open_store(config)?;

    // === Dependency Injection ===
    let adapters = build_adapters(&config.providers).context("Failed to build HTTP client")?;

    let mut sinks: Vec<Arc<dyn ModelLogSink>> = Vec::new();
    if let Some(path) = &config.logging.model_log_path {
        let writer = JsonlModelLogWriter::open(path)
            .with_context(|| format!("Failed to open model log {}", path.display()))?;
        sinks.push(Arc::new(writer));
    }
    if config.logging.log_to_store {
        sinks.push(Arc::new(DocumentStoreModelLog::new(store.clone())));
    }
    let audit_log: Arc<dyn ModelLogSink> = if sinks.is_empty() {
        warn!("Model call audit logging is disabled");
        Arc::new(NoModelLog)
    } else {
        Arc::new(CompositeModelLog::new(sinks))
    };

    let orchestrator = AgentResponseOrchestrator::new(adapters, audit_log, Arc::new(SystemClock))
        .with_retry_policy(RetryPolicy::new(params.retry_base_delay));

    let request = args.to_request(config.providers.resolve_credentials());
    let input = ProcessModelResponseInput::new(args.context(), request)
        .with_max_retries(args.retries.unwrap_or(params.max_retries));

    let response = orchestrator.execute(input).await;

    if config.logging.log_to_store {
        persist_store(config, &store)?;
    }
    println!("{}", formatter.format_model_response(&response));

    Ok(if response.is_ok() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
