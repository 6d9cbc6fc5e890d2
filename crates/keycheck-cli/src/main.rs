use anyhow::{anyhow, Result};
use clap::Parser;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use keycheck_core::config::Config;
use keycheck_core::env::Environment;
use keycheck_core::output::{write_banner, OutputFormat};
use keycheck_core::paths::default_env_path;
use keycheck_core::{report, run_probes, ProbeSettings, Prober, ProviderDescriptor};
use litellm_rs::LiteLLM;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "keycheck",
    version,
    about = "Check that configured LLM provider API keys work"
)]
struct Cli {
    /// Secrets file (defaults to .env next to the executable)
    #[arg(long, value_name = "PATH")]
    env_file: Option<PathBuf>,

    /// Extra TOML config merged after the default locations
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    #[arg(long, default_value = "text", value_name = "text|json")]
    format: String,

    #[arg(long)]
    timeout_secs: Option<u64>,

    #[arg(long)]
    max_tokens: Option<u32>,

    #[arg(long)]
    prompt: Option<String>,

    /// Only probe providers with this display name (repeatable)
    #[arg(long, value_name = "NAME")]
    only: Vec<String>,

    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match run(cli).await {
        Ok(code) => ExitCode::from(code),
        Err(err) => {
            eprintln!("❌ {err:#}");
            ExitCode::from(1)
        }
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| default.into()))
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

async fn run(cli: Cli) -> Result<u8> {
    let format: OutputFormat = cli.format.parse()?;
    let config = Config::load(cli.config.as_deref())?;
    let settings = apply_overrides(config.settings.clone(), &cli);
    let descriptors = select_descriptors(config.descriptors(), &cli.only)?;

    // Human-facing progress goes to stderr when stdout carries JSON.
    let mut console: Box<dyn Write> = match format {
        OutputFormat::Text => Box::new(io::stdout()),
        OutputFormat::Json => Box::new(io::stderr()),
    };

    write_banner(&mut console, "API Key Validation")?;

    let env_path = match cli.env_file {
        Some(path) => path,
        None => default_env_path()?,
    };
    let env = match Environment::load(
        &env_path,
        descriptors.iter().map(|d| d.credential_var.as_str()),
    ) {
        Ok(env) => env,
        Err(err) => {
            writeln!(console, "❌ {err}")?;
            return Ok(1);
        }
    };
    writeln!(console, "✅ Loaded environment from {}\n", env_path.display())?;

    let mut llm = LiteLLM::new()?.with_client(build_client(&settings)?);
    for (name, provider) in config.provider_overrides()? {
        tracing::debug!(provider = %name, base_url = ?provider.base_url, "endpoint override");
        llm = llm.with_provider(name, provider);
    }
    let prober = Prober::new(llm, settings);

    writeln!(console, "Running API Tests:")?;
    writeln!(console, "{}", "-".repeat(60))?;
    let results = run_probes(&prober, &descriptors, &env, &mut console).await;
    console.flush()?;

    let mut stdout = io::stdout().lock();
    let code = report(
        &results,
        format,
        prober.settings().report_detail_chars,
        &mut stdout,
    )?;
    stdout.flush()?;
    Ok(code)
}

fn apply_overrides(mut settings: ProbeSettings, cli: &Cli) -> ProbeSettings {
    if let Some(timeout_secs) = cli.timeout_secs {
        settings.timeout_secs = timeout_secs;
    }
    if let Some(max_tokens) = cli.max_tokens {
        settings.max_tokens = max_tokens;
    }
    if let Some(prompt) = cli.prompt.clone() {
        settings.prompt = prompt;
    }
    settings
}

fn select_descriptors(
    descriptors: Vec<ProviderDescriptor>,
    only: &[String],
) -> Result<Vec<ProviderDescriptor>> {
    if only.is_empty() {
        return Ok(descriptors);
    }
    let selected: Vec<_> = descriptors
        .into_iter()
        .filter(|d| only.iter().any(|n| n.eq_ignore_ascii_case(&d.display_name)))
        .collect();
    if selected.is_empty() {
        return Err(anyhow!("no provider matches --only {}", only.join(", ")));
    }
    Ok(selected)
}

fn build_client(settings: &ProbeSettings) -> Result<reqwest::Client> {
    Ok(client_builder(settings).build()?)
}

fn client_builder(settings: &ProbeSettings) -> reqwest::ClientBuilder {
    let timeout = settings.timeout();
    reqwest::Client::builder()
        .timeout(timeout)
        .connect_timeout(timeout)
}
