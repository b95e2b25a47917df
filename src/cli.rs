//! Minimal CLI: stringify documents, inspect handler events.
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow, bail};
use clap::{Args, Parser, Subcommand};
use rayon::prelude::*;
use serde_json::{Value, json};
use tracing::{debug, info};

use cfn_resource::encoding;
use cfn_resource::event::Event;
use cfn_resource::handler::Action;
use cfn_resource::request::stack_name_from_arn;

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

/// convert resource models to the all-string wire form and inspect handler events
#[derive(Parser, Debug)]
pub struct CommandLineInterface {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// stringify every scalar of each input document
    Stringify(StringifyOut),
    /// decode and validate handler events, print a redacted summary
    Event(EventOut),
}

#[derive(Args, Debug, Clone)]
struct InputSettings {
    /// treat input as newline-delimited JSON (NDJSON)
    #[arg(long, default_value_t = false)]
    ndjson: bool,

    /// JSON Pointer to select a subnode in each document (e.g. /requestData/resourceProperties)
    #[arg(long)]
    json_pointer: Option<String>,

    /// JQ pre-process filter for each document.
    #[arg(long)]
    jq_expr: Option<String>,

    /// One or more inputs. May be literal paths or quoted glob patterns
    #[arg(long, short, num_args = 1.., required = true)]
    input: Vec<String>,
}

#[derive(clap::Parser, Debug)]
struct StringifyOut {
    #[command(flatten)]
    input_settings: InputSettings,

    /// pretty-print each document instead of one per line
    #[arg(long)]
    pretty: bool,

    /// output file (stdout if omitted)
    #[arg(short, long)]
    out: Option<PathBuf>,
}

#[derive(clap::Parser, Debug)]
struct EventOut {
    /// One or more event files. May be literal paths or quoted glob patterns
    #[arg(long, short, num_args = 1.., required = true)]
    input: Vec<String>,

    /// output file (stdout if omitted)
    #[arg(short, long)]
    out: Option<PathBuf>,
}

// ————————————————————————————————————————————————————————————————————————————
// IMPLEMENTATION
// ————————————————————————————————————————————————————————————————————————————

impl InputSettings {
    /// Every selected document of every input, in input order.
    fn load(&self) -> Result<Vec<Value>> {
        let source_paths = resolve_file_path_patterns(&self.input)?;
        let per_file = source_paths
            .par_iter()
            .map(|path| self.load_file(path))
            .collect::<Result<Vec<_>>>()?;
        Ok(per_file.into_iter().flatten().collect())
    }

    fn load_file(&self, source_path: &Path) -> Result<Vec<Value>> {
        let shown = source_path.display();
        let source = std::fs::read_to_string(source_path)
            .with_context(|| format!("failed to read source file {shown}"))?;
        let mut documents = Vec::new();
        if self.ndjson {
            for (index, line) in source.lines().enumerate().filter(|(_, l)| !l.trim().is_empty()) {
                let value = serde_json::from_str::<Value>(line)
                    .with_context(|| format!("failed to parse {shown}:{}", index + 1))?;
                documents.push(value);
            }
        } else {
            let value = serde_json::from_str::<Value>(&source)
                .with_context(|| format!("failed to parse JSON source file {shown}"))?;
            documents.push(value);
        }
        debug!(path = %shown, documents = documents.len(), "loaded");

        let documents = match self.json_pointer.as_deref() {
            Some(pointer) => documents
                .iter()
                .map(|document| {
                    document
                        .pointer(pointer)
                        .cloned()
                        .ok_or_else(|| anyhow!("JSON pointer {pointer} selects nothing in {shown}"))
                })
                .collect::<Result<Vec<_>>>()?,
            None => documents,
        };
        match self.jq_expr.as_deref() {
            Some(jq_expr) => crate::jq_exec::run_jaq(jq_expr, documents)
                .with_context(|| format!("failed to apply jq expression to {shown}")),
            None => Ok(documents),
        }
    }
}

impl CommandLineInterface {
    pub fn load() -> Self {
        Self::parse()
    }

    pub fn run(&self) -> Result<()> {
        match &self.cmd {
            Command::Stringify(target) => {
                let documents = target.input_settings.load()?;
                let mut rendered = String::new();
                for document in &documents {
                    let tree = encoding::stringify(document)?;
                    let text = if target.pretty {
                        serde_json::to_string_pretty(&tree)?
                    } else {
                        serde_json::to_string(&tree)?
                    };
                    rendered.push_str(&text);
                    rendered.push('\n');
                }
                info!(documents = documents.len(), "stringified");
                emit(target.out.as_deref(), &rendered)
            }
            Command::Event(target) => {
                let source_paths = resolve_file_path_patterns(&target.input)?;
                let summaries = source_paths
                    .par_iter()
                    .map(|path| summarize_event(path))
                    .collect::<Result<Vec<_>>>()?;
                let rendered = serde_json::to_string_pretty(&summaries)?;
                emit(target.out.as_deref(), &format!("{rendered}\n"))
            }
        }
    }
}

// ————————————————————————————————————————————————————————————————————————————
// INTERNAL HELPERS
// ————————————————————————————————————————————————————————————————————————————

fn summarize_event(source_path: &Path) -> Result<Value> {
    let shown = source_path.display();
    let bytes = std::fs::read(source_path)
        .with_context(|| format!("failed to read event file {shown}"))?;
    let event = Event::from_slice(&bytes).with_context(|| format!("invalid event {shown}"))?;
    event.validate().with_context(|| format!("invalid event {shown}"))?;
    let action: Action = event
        .action
        .parse()
        .with_context(|| format!("invalid event {shown}"))?;
    let data = &event.request_data;
    Ok(json!({
        "file": shown.to_string(),
        "action": action.as_str(),
        "region": event.region,
        "stackName": stack_name_from_arn(&event.stack_id),
        "logicalResourceId": data.logical_resource_id,
        "resourceType": event.resource_type,
        "hasCallerCredentials": data.caller_credentials.is_some(),
        "resourceProperties": data.resource_properties,
        "previousResourceProperties": data.previous_resource_properties,
        "callbackContext": event.callback_context,
    }))
}

fn emit(out: Option<&Path>, rendered: &str) -> Result<()> {
    match out {
        Some(out) => {
            if let Some(parent) = out.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("failed to create {}", parent.display()))?;
            }
            std::fs::write(out, rendered)
                .with_context(|| format!("failed to write {}", out.display()))
        }
        None => {
            print!("{rendered}");
            Ok(())
        }
    }
}

fn resolve_file_path_patterns<I>(patterns: I) -> Result<Vec<PathBuf>>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    fn has_glob_chars(s: &str) -> bool {
        // Minimal glob detection for the `glob` crate syntax.
        s.bytes().any(|b| matches!(b, b'*' | b'?' | b'[' | b'{' ))
    }

    let mut out = Vec::<PathBuf>::new();

    for raw in patterns {
        let pattern = raw.as_ref();

        if has_glob_chars(pattern) {
            let mut matched_any = false;
            for entry in glob::glob(pattern)? {
                out.push(entry?);
                matched_any = true;
            }
            if !matched_any {
                bail!("glob pattern matched no files: {pattern}");
            }
        } else {
            out.push(PathBuf::from(pattern));
        }
    }

    Ok(out)
}
