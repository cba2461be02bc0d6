use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use describekit::picklist::{ControllerValues, MapOptions};
use describekit::{ExampleOptions, ObjectDescribe, SelectionContext};
use tracing_subscriber::EnvFilter;

/// Example payloads and picklist mapping from describe metadata
#[derive(Parser, Debug)]
#[command(name = "describekit", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print generated query and request bodies as JSON
    Examples {
        /// Describe document (JSON)
        describe: PathBuf,
        /// Object API name, when the document does not carry one
        #[arg(long)]
        object: Option<String>,
        /// Example options (JSON, camelCase keys)
        #[arg(long)]
        options: Option<PathBuf>,
    },
    /// Print the picklist values of the object
    Picklists {
        describe: PathBuf,
    },
    /// Replace picklist labels with API codes in a record or array of records
    Map {
        describe: PathBuf,
        /// Record or array of records (JSON)
        payload: PathBuf,
        /// Current controller value, as FIELD=VALUE
        #[arg(long = "controller", value_parser = parse_controller)]
        controllers: Vec<(String, String)>,
        /// Take controller values from the record itself
        #[arg(long)]
        controllers_from_record: bool,
        /// Also match inactive values
        #[arg(long)]
        include_inactive: bool,
        /// Return the payload untouched
        #[arg(long)]
        no_auto_map: bool,
    },
}

fn parse_controller(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((field, value)) if !field.is_empty() => Ok((field.to_string(), value.to_string())),
        _ => Err(format!("expected FIELD=VALUE, got '{}'", s)),
    }
}

fn read_json(path: &Path) -> Result<serde_json::Value> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("Invalid JSON in {}", path.display()))
}

fn load_describe(path: &Path) -> Result<ObjectDescribe> {
    ObjectDescribe::from_value(read_json(path)?)
        .with_context(|| format!("Failed to load describe {}", path.display()))
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Examples {
            describe,
            object,
            options,
        } => {
            let describe_doc = load_describe(&describe)?;
            let Some(name) = object.or_else(|| describe_doc.name.clone()) else {
                bail!("{} has no object name; pass --object", describe.display());
            };
            let selection = SelectionContext::select(name, describe_doc);
            let options: ExampleOptions = match options {
                Some(path) => serde_json::from_value(read_json(&path)?)
                    .with_context(|| format!("Invalid options in {}", path.display()))?,
                None => ExampleOptions::default(),
            };
            let examples = selection.examples(&options);
            println!("{}", serde_json::to_string_pretty(&examples)?);
            println!();
            println!("Upsert field: {}", examples.upsert_external_field());
            println!("CSV:\n{}", examples.csv());
        }
        Command::Picklists { describe } => {
            let selection = SelectionContext::from_describe(load_describe(&describe)?);
            println!("{}", selection.picklist_report());
        }
        Command::Map {
            describe,
            payload,
            controllers,
            controllers_from_record,
            include_inactive,
            no_auto_map,
        } => {
            let selection = SelectionContext::from_describe(load_describe(&describe)?);
            let payload = read_json(&payload)?;

            // explicit --controller values win over the record's own
            let mut controller_values = match payload.as_object() {
                Some(record) if controllers_from_record => {
                    ControllerValues::from_record(record, selection.picklists())
                }
                _ => ControllerValues::new(),
            };
            for (field, value) in controllers {
                controller_values.insert(field, value);
            }

            let options = MapOptions {
                auto_map: !no_auto_map,
                active_only: !include_inactive,
            };
            let mapped = selection
                .resolver(&controller_values, options)
                .map_value(&payload);
            println!("{}", serde_json::to_string_pretty(&mapped)?);
        }
    }

    Ok(())
}
