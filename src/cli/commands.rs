use crate::contract::ApiContract;
use crate::hot_reload::from_config;
use crate::request::IncomingRequest;
use crate::runtime_config::RuntimeConfig;
use anyhow::{anyhow, Context};
use clap::{Parser, Subcommand};
use serde_json::{json, Map, Value};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Command-line interface for the contract engine
#[derive(Parser, Debug)]
#[command(name = "apicontract")]
#[command(about = "Compile an OpenAPI contract and check requests against it", long_about = None)]
pub struct Cli {
    /// Skip `$ref` expansion (the document is already dereferenced)
    #[arg(long, global = true, default_value_t = false)]
    pub no_dereference: bool,

    /// The subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Compile the spec and report the number of endpoints
    Check {
        /// Path to the OpenAPI specification file (YAML or JSON)
        #[arg(short, long, env = "APICONTRACT_SPEC")]
        spec: PathBuf,
    },
    /// List endpoint keys in compiled order
    Routes {
        #[arg(short, long, env = "APICONTRACT_SPEC")]
        spec: PathBuf,
    },
    /// Print compiled endpoint schemas as JSON
    Schema {
        #[arg(short, long, env = "APICONTRACT_SPEC")]
        spec: PathBuf,

        /// Only print this endpoint, e.g. `get:/pets/{id}`
        #[arg(short, long)]
        endpoint: Option<String>,
    },
    /// Resolve a method and path to an endpoint key
    Route {
        #[arg(short, long, env = "APICONTRACT_SPEC")]
        spec: PathBuf,

        #[arg(short, long)]
        method: String,

        #[arg(short, long)]
        path: String,
    },
    /// Route and validate one request
    Validate {
        #[arg(short, long, env = "APICONTRACT_SPEC")]
        spec: PathBuf,

        #[arg(short, long)]
        method: String,

        /// Request path, optionally with `?query`
        #[arg(short, long)]
        path: String,

        /// Raw query string
        #[arg(short, long)]
        query: Option<String>,

        /// JSON request body
        #[arg(short, long)]
        body: Option<String>,
    },
    /// Load the spec and keep reloading it whenever the file changes
    Watch {
        #[arg(short, long, env = "APICONTRACT_SPEC")]
        spec: PathBuf,
    },
}

/// How a command finished when it did not hit an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Success,
    /// Route miss or validation failure; the binary exits with 1
    Rejected,
}

/// Parse arguments and run the selected command against stdout.
///
/// # Errors
///
/// Returns any load, compile or output error.
pub fn run_cli() -> Result<Outcome, Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = RuntimeConfig::from_env();
    let stdout = std::io::stdout();
    let outcome = execute(&cli, &config, &mut stdout.lock())?;
    Ok(outcome)
}

fn load(spec: &Path, dereference: bool) -> anyhow::Result<ApiContract> {
    ApiContract::load(spec, dereference)
}

fn print_json<W: Write>(out: &mut W, value: &Value) -> anyhow::Result<()> {
    let text = serde_json::to_string_pretty(value)?;
    writeln!(out, "{text}")?;
    Ok(())
}

/// Run one parsed command, writing its output to `out`.
///
/// # Errors
///
/// Returns any load, compile or output error.
pub fn execute<W: Write>(cli: &Cli, config: &RuntimeConfig, out: &mut W) -> anyhow::Result<Outcome> {
    let dereference = config.dereference && !cli.no_dereference;

    match &cli.command {
        Commands::Check { spec } => {
            let contract = load(spec, dereference)?;
            writeln!(
                out,
                "{}: {} endpoint(s) compiled",
                spec.display(),
                contract.len()
            )?;
            Ok(Outcome::Success)
        }
        Commands::Routes { spec } => {
            let contract = load(spec, dereference)?;
            for key in contract.endpoints().keys() {
                writeln!(out, "{key}")?;
            }
            Ok(Outcome::Success)
        }
        Commands::Schema { spec, endpoint } => {
            let contract = load(spec, dereference)?;
            let value = match endpoint {
                Some(key) => {
                    let schema = contract
                        .endpoint(key)
                        .ok_or_else(|| anyhow!("unknown endpoint key '{key}'"))?;
                    serde_json::to_value(schema)?
                }
                None => serde_json::to_value(contract.endpoints())?,
            };
            print_json(out, &value)?;
            Ok(Outcome::Success)
        }
        Commands::Route { spec, method, path } => {
            let contract = load(spec, dereference)?;
            match contract.route(method, path) {
                Ok(matched) => {
                    print_json(
                        out,
                        &json!({
                            "endpoint": matched.endpoint_key.as_ref(),
                            "pathParams": matched.path_params_value(),
                        }),
                    )?;
                    Ok(Outcome::Success)
                }
                Err(_) => {
                    writeln!(out, "not found")?;
                    Ok(Outcome::Rejected)
                }
            }
        }
        Commands::Validate {
            spec,
            method,
            path,
            query,
            body,
        } => {
            let contract = load(spec, dereference)?;
            let mut req = IncomingRequest::new(method.as_str(), path.as_str());
            if let Some(query) = query {
                req = req.with_query(query.as_str());
            }
            if let Some(body) = body {
                let body: Value =
                    serde_json::from_str(body).context("--body is not valid JSON")?;
                req = req.with_body(body);
            }

            match contract.check_request(req) {
                Ok(validated) => {
                    print_json(
                        out,
                        &json!({
                            "status": 200,
                            "endpoint": validated.endpoint_key(),
                        }),
                    )?;
                    Ok(Outcome::Success)
                }
                Err(resp) => {
                    let mut report = Map::new();
                    report.insert("status".to_string(), json!(resp.status.as_u16()));
                    report.insert("body".to_string(), resp.body);
                    print_json(out, &Value::Object(report))?;
                    Ok(Outcome::Rejected)
                }
            }
        }
        Commands::Watch { spec } => {
            let watch_config = RuntimeConfig {
                spec_path: Some(spec.clone()),
                hot_reload: true,
                dereference,
            };
            let (contract, _watcher) = from_config(&watch_config)?;
            writeln!(
                out,
                "watching {} ({} endpoint(s))",
                spec.display(),
                contract.load().len()
            )?;
            out.flush()?;
            loop {
                std::thread::sleep(Duration::from_secs(60));
            }
        }
    }
}
