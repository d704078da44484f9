//! Command-line harness for the cost engine
//!
//! ```text
//! crossborder-cost calculate <session.json|->
//! crossborder-cost simulate <session.json|-> '<params json>'
//! crossborder-cost tool <name> <session.json|-> ['<args json>']
//! crossborder-cost schema
//! ```
//!
//! Output is pretty-printed JSON on stdout; logs go to stderr and follow
//! `RUST_LOG`.

use anyhow::{bail, Context, Result};
use crossborder_cost_core_rs::scenario::{simulate_with, RawScenarioParameters};
use crossborder_cost_core_rs::tools::{call_tool, TOOL_NAMES};
use crossborder_cost_core_rs::{get_factor_schema, ScenarioParameters, ToolSession};
use serde_json::Value;
use std::io::Read;
use tracing::info;

const USAGE: &str = "usage:
  crossborder-cost calculate <session.json|->
  crossborder-cost simulate <session.json|-> '<params json>'
  crossborder-cost tool <name> <session.json|-> ['<args json>']
  crossborder-cost schema";

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let output = run(&args)?;
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn run(args: &[String]) -> Result<Value> {
    let command = args.first().map(String::as_str).unwrap_or("");

    match command {
        "calculate" => {
            let session = load_session(arg(args, 1)?)?;
            let params = session.scenario_parameters()?;
            simulate_session(&session, &params)
        }
        "simulate" => {
            let session = load_session(arg(args, 1)?)?;
            let raw: RawScenarioParameters =
                serde_json::from_str(arg(args, 2)?).context("Invalid scenario parameters")?;
            let params = ScenarioParameters::try_from(raw)?;
            simulate_session(&session, &params)
        }
        "tool" => {
            let name = arg(args, 1)?;
            if !TOOL_NAMES.contains(&name) {
                bail!("Unknown tool '{}'; available: {}", name, TOOL_NAMES.join(", "));
            }
            let session = load_session(arg(args, 2)?)?;
            let tool_args: Value = match args.get(3) {
                Some(json) => serde_json::from_str(json).context("Invalid tool arguments")?,
                None => Value::Null,
            };
            let source = session.source();
            let ctx = session.context(&source)?;
            info!(tool = name, "running tool");
            Ok(call_tool(&ctx, name, &tool_args)?)
        }
        "schema" => Ok(serde_json::from_str(&get_factor_schema()?)?),
        _ => bail!("{}", USAGE),
    }
}

fn arg(args: &[String], index: usize) -> Result<&str> {
    args.get(index)
        .map(String::as_str)
        .with_context(|| format!("missing argument\n{}", USAGE))
}

fn load_session(path: &str) -> Result<ToolSession> {
    let json = if path == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read session from stdin")?;
        buf
    } else {
        std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path))?
    };

    let session = ToolSession::from_json_str(&json).context("Invalid session JSON")?;
    for warning in session.scope.validate() {
        tracing::warn!(%warning, "scope warning");
    }
    Ok(session)
}

fn simulate_session(session: &ToolSession, params: &ScenarioParameters) -> Result<Value> {
    let result = simulate_with(
        &session.scope,
        &session.factor,
        session.overrides.as_ref(),
        params,
        &session.config,
    )?;
    Ok(serde_json::to_value(result)?)
}
