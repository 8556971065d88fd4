//! CLI command implementations
//!
//! Commands are thin: load config, read input, call the library. The
//! dispatcher writes exactly one JSON envelope for every command, an error
//! envelope included. Lifecycle events go to stderr through the logger.

use std::io::{self, Read, Write};
use std::path::Path;

use serde_json::{json, Value};

use crate::collator::{Classifier, Collation, Collator};
use crate::config::CollatorConfig;
use crate::observability::{log_event_with_fields, Event};
use crate::transaction::{Mutation, TransactionLog};

use super::args::Command;
use super::errors::{CliError, CliResult};
use super::io::{read_log, read_request, write_error, write_response};

/// Parse CLI args and run the selected command
pub fn run() -> CliResult<()> {
    let cli = super::args::Cli::parse_args();
    run_command(cli.command)
}

/// Run a command against the process stdin and stdout
pub fn run_command(cmd: Command) -> CliResult<()> {
    let stdin = io::stdin();
    let stdout = io::stdout();
    execute(cmd, &mut stdin.lock(), &mut stdout.lock())
}

/// Run a command, writing its result or its error as one envelope to `out`.
///
/// Failures are returned after the envelope is written so the caller can
/// still exit non-zero.
pub fn execute<R: Read, W: Write>(cmd: Command, input: &mut R, out: &mut W) -> CliResult<()> {
    let outcome = match cmd {
        Command::Collate {
            document_ids,
            input: path,
            config,
        } => collate(&document_ids, path.as_deref(), config.as_deref(), input),
        Command::Classify { index } => classify(index, input),
    };

    match outcome {
        Ok(data) => write_response(out, &data),
        Err(err) => {
            write_error(out, err.code_str(), err.message())?;
            Err(err)
        }
    }
}

/// Load configuration from `path`, or defaults when none is given
pub fn load_config(path: Option<&Path>) -> CliResult<CollatorConfig> {
    let Some(path) = path else {
        return Ok(CollatorConfig::default());
    };

    let config = CollatorConfig::load(path)?;
    let window = config.edit_merge_window_ms.to_string();
    let path_str = path.display().to_string();
    log_event_with_fields(
        Event::ConfigLoaded,
        &[
            ("edit_merge_window_ms", window.as_str()),
            ("path", path_str.as_str()),
        ],
    );
    Ok(config)
}

/// Collate a log read from `path` (or `stdin`) into a timeline
pub fn collate<R: Read>(
    document_ids: &[String],
    path: Option<&Path>,
    config: Option<&Path>,
    stdin: &mut R,
) -> CliResult<Value> {
    let config = load_config(config)?;
    let log = read_log(path, stdin)?;
    let collation = collate_log(document_ids, &log, config)?;
    Ok(serde_json::to_value(&collation.events)?)
}

/// Run the pipeline over raw log bytes, logging start and completion
pub fn collate_log(
    document_ids: &[String],
    log: &[u8],
    config: CollatorConfig,
) -> CliResult<Collation> {
    let documents = document_ids.join(",");
    log_event_with_fields(Event::CollateStart, &[("documents", documents.as_str())]);

    let collator = Collator::new(config);
    let collation = collator
        .collate_detailed(document_ids, TransactionLog::Raw(log))
        .map_err(|err| {
            let line = err.line().to_string();
            log_event_with_fields(
                Event::ParseFailed,
                &[("code", err.code().code()), ("line", line.as_str())],
            );
            CliError::from(err)
        })?;

    let read = collation.transactions_read.to_string();
    let relevant = collation.transactions_relevant.to_string();
    let events = collation.events.len().to_string();
    log_event_with_fields(
        Event::CollateComplete,
        &[
            ("events", events.as_str()),
            ("transactions_read", read.as_str()),
            ("transactions_relevant", relevant.as_str()),
        ],
    );

    Ok(collation)
}

/// Classify one JSON array of mutations read from `stdin`
pub fn classify<R: Read>(index: usize, stdin: &mut R) -> CliResult<Value> {
    let request = read_request(stdin)?;
    classify_value(request, index)
}

/// Classify a JSON array of mutations at the given position
pub fn classify_value(request: Value, index: usize) -> CliResult<Value> {
    let mutations: Vec<Mutation> = serde_json::from_value(request)
        .map_err(|e| CliError::parse_error(format!("Invalid mutations: {}", e)))?;

    let classification = Classifier::classify(&mutations, index);
    Ok(json!({
        "type": classification.event_type,
        "documentId": classification.document_id,
    }))
}
