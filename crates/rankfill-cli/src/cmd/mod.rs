//! Subcommand handlers.
//!
//! Every command reads the same JSON input, runs the full pipeline, then
//! renders one view of the result.

pub mod candidates;
pub mod chains;
pub mod infer;

use std::path::Path;

use rankfill_core::{ItemSet, RankfillConfig};
use rankfill_infer::{RunSummary, infer};

use crate::input::load_specs;
use crate::output::{CliError, OutputMode, render_error};

/// Load `input` and run inference, rendering domain errors with their code.
pub fn run_pipeline(
    input: &Path,
    output: OutputMode,
    config: &RankfillConfig,
) -> anyhow::Result<(ItemSet, RunSummary)> {
    let specs = load_specs(input)?;
    match infer(specs, config) {
        Ok(result) => Ok(result),
        Err(err) => {
            render_error(output, &CliError::from(&err))?;
            anyhow::bail!("inference failed: {}", err.code().code());
        }
    }
}
