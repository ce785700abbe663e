//! CLI command implementations
//!
//! Each invocation loads the config, opens the store, runs exactly one
//! command, closes the store, and prints one JSON response.

use std::path::Path;

use serde_json::{json, Value};

use crate::config::StoreConfig;
use crate::document::{Attributes, Document};
use crate::observability::{Event, Logger};
use crate::query::AttributeFilter;
use crate::store::{DocumentStore, StoreError, StoreResult};

use super::args::{Cli, Command};
use super::errors::{CliError, CliResult};
use super::io::write_response;

/// Parse arguments and run the requested command
pub fn run() -> CliResult<()> {
    let cli = Cli::parse_args();
    run_command(&cli.config, cli.command)
}

/// Run a command against the store described by the config file
pub fn run_command(config_path: &Path, command: Command) -> CliResult<()> {
    let config = StoreConfig::load(config_path)?;
    Logger::info(
        Event::ConfigLoaded.as_str(),
        &[("path", config_path.display().to_string().as_str())],
    );

    let mut store = DocumentStore::open_config(&config)?;
    let result = execute(&mut store, command);
    let closed = store.close();

    write_response(settle(result, closed)?)
}

/// The command's own error wins over a failure to close.
fn settle(result: CliResult<Value>, closed: StoreResult<()>) -> CliResult<Value> {
    let data = result?;
    closed?;
    Ok(data)
}

/// Execute one command against an open store, returning the response data
pub fn execute(store: &mut DocumentStore, command: Command) -> CliResult<Value> {
    match command {
        Command::Init => Ok(json!({ "documents": store.count() })),

        Command::Put {
            doc_type,
            key,
            data,
        } => {
            let data = data.as_deref().map(parse_data).transpose()?;
            let mut doc = store.create(key.as_deref(), doc_type, data);
            store.persist(&mut doc)?;
            Ok(render(&doc))
        }

        Command::Get { key, doc_type } => Ok(store
            .find(&key, doc_type.as_deref())?
            .map(|doc| render(&doc))
            .unwrap_or(Value::Null)),

        Command::Update {
            key,
            data,
            doc_type,
        } => {
            let fields = parse_data(&data)?;
            let mut doc = find_existing(store, &key, doc_type.as_deref())?;
            store.update(&mut doc, fields)?;
            store.persist(&mut doc)?;
            Ok(render(&doc))
        }

        Command::Delete { key, doc_type } => {
            let mut doc = find_existing(store, &key, doc_type.as_deref())?;
            store.delete(&mut doc)?;
            Ok(json!({ "deleted": key }))
        }

        Command::Search { doc_type, filters } => {
            let filters = filters
                .iter()
                .map(|pair| {
                    AttributeFilter::parse(pair).ok_or_else(|| {
                        CliError::invalid_input(format!(
                            "Invalid filter '{}': expected name=value",
                            pair
                        ))
                    })
                })
                .collect::<CliResult<Vec<_>>>()?;

            let docs = store.search(&doc_type, &filters)?;
            Ok(Value::Array(docs.iter().map(render).collect()))
        }
    }
}

fn find_existing(
    store: &DocumentStore,
    key: &str,
    doc_type: Option<&str>,
) -> CliResult<Document> {
    store
        .find(key, doc_type)?
        .ok_or_else(|| StoreError::not_found(key).into())
}

/// Parse a JSON object into an attribute bag
fn parse_data(text: &str) -> CliResult<Attributes> {
    match serde_json::from_str::<Value>(text) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(other) => Err(CliError::invalid_input(format!(
            "data must be a JSON object, got: {}",
            other
        ))),
        Err(e) => Err(CliError::invalid_input(format!("Invalid data JSON: {}", e))),
    }
}

fn render(doc: &Document) -> Value {
    serde_json::to_value(doc).unwrap_or(Value::Null)
}
