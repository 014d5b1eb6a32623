//! CLI logic for the Stratus diagram tool.
//!
//! This module contains the core CLI logic: each [`Command`] reads its
//! input, runs it through the library and writes JSON or plain text.

pub mod error_adapter;

mod args;
mod config;

pub use args::{Args, Command};

use std::fs;

use log::{debug, info};
use serde::{Deserialize, Deserializer, Serialize};

use stratus::{
    Stratus, StratusError, get_suggested_placements, new_session,
    node::{NodeKind, SubnetPolarity},
};

/// One recorded placement attempt in a replay file.
#[derive(Debug, Deserialize)]
struct PlacementStep {
    service: String,
    #[serde(default, deserialize_with = "parse_target")]
    target: Option<NodeKind>,
    #[serde(default)]
    polarity: Option<SubnetPolarity>,
}

/// Reads targets in their command-line form, e.g. `"public-subnet"`.
fn parse_target<'de, D>(deserializer: D) -> Result<Option<NodeKind>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer)?
        .map(|target| target.parse().map_err(serde::de::Error::custom))
        .transpose()
}

/// Writes `value` as pretty JSON to `output`, or to stdout without a path.
fn write_json<T: Serialize>(value: &T, output: Option<&String>) -> Result<(), StratusError> {
    let json = serde_json::to_string_pretty(value)?;
    match output {
        Some(path) => {
            fs::write(path, json)?;
            info!(output_file = path; "Result written");
        }
        None => println!("{json}"),
    }
    Ok(())
}

/// Run the Stratus CLI application
///
/// # Arguments
///
/// * `args` - Command-line arguments
///
/// # Errors
///
/// Returns `StratusError` for:
/// - File I/O errors
/// - Configuration loading errors
/// - Malformed diagram or replay documents
/// - Diagrams with duplicate ids or parent cycles
pub fn run(args: &Args) -> Result<(), StratusError> {
    let app_config = config::load_config(args.config.as_ref())?;
    let stratus = Stratus::new(&app_config);

    match &args.command {
        Command::Layout { input, output } => {
            info!(input_path = input, output_path = output; "Laying out diagram");

            let source = fs::read_to_string(input)?;
            let diagram = stratus.layout_json(&source)?;
            fs::write(output, diagram.to_json_pretty()?)?;

            info!(output_file = output; "Diagram exported successfully");
        }
        Command::Validate {
            service,
            target,
            polarity,
            output,
        } => {
            let verdict =
                stratus
                    .validator()
                    .validate_placement(service, target.as_ref(), *polarity);
            debug!(service, valid = verdict.is_valid(); "Validated placement");
            write_json(&verdict, output.as_ref())?;
        }
        Command::Suggest { service } => {
            let suggestions = get_suggested_placements(service);
            info!(service, count = suggestions.len(); "Suggested placements");
            for suggestion in suggestions {
                println!("{suggestion}");
            }
        }
        Command::Replay { input, output } => {
            info!(input_path = input; "Replaying placements");

            let source = fs::read_to_string(input)?;
            let steps: Vec<PlacementStep> = serde_json::from_str(&source)
                .map_err(|err| StratusError::new_document_error(err, source.as_str()))?;

            let state = steps.iter().fold(new_session(), |state, step| {
                let (verdict, state) = stratus.place(
                    &state,
                    &step.service,
                    step.target.as_ref(),
                    step.polarity,
                );
                debug!(
                    service = step.service,
                    valid = verdict.is_valid(),
                    total = state.total_points();
                    "Replayed placement"
                );
                state
            });

            write_json(&state.stats(), output.as_ref())?;
        }
    }

    Ok(())
}
