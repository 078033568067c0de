//! `rankfill chains`: unranked runs pinned between two ranked anchors.

use std::io::Write;
use std::path::PathBuf;

use clap::Args;
use rankfill_core::{ItemId, ItemSet, RankfillConfig};
use rankfill_infer::anchor_chains;
use serde::Serialize;

use crate::cmd::run_pipeline;
use crate::output::{OutputMode, pretty_section, render_mode};

/// Arguments for `rankfill chains`.
#[derive(Args, Debug)]
pub struct ChainsArgs {
    /// JSON array of `{title, year, group_seq?, rank?}` objects.
    pub input: PathBuf,
}

#[derive(Debug, Serialize)]
struct ChainRow {
    ids: Vec<ItemId>,
    low: u32,
    high: u32,
    span: u32,
    unranked: usize,
    rendered: String,
}

#[derive(Debug, Serialize)]
struct ChainsOutput {
    chains: Vec<ChainRow>,
}

/// Execute `rankfill chains`.
pub fn run_chains(
    args: &ChainsArgs,
    output: OutputMode,
    config: &RankfillConfig,
) -> anyhow::Result<()> {
    let (items, _) = run_pipeline(&args.input, output, config)?;
    let payload = build_output(&items);
    render_mode(output, &payload, render_chains_text, render_chains_pretty)
}

fn build_output(items: &ItemSet) -> ChainsOutput {
    let chains = anchor_chains(items)
        .into_iter()
        .map(|chain| ChainRow {
            rendered: chain.render(items),
            span: chain.span(),
            unranked: chain.unranked_len(),
            low: chain.low,
            high: chain.high,
            ids: chain.ids,
        })
        .collect();
    ChainsOutput { chains }
}

fn render_chains_text(payload: &ChainsOutput, w: &mut dyn Write) -> std::io::Result<()> {
    for chain in &payload.chains {
        writeln!(w, "{}\t{}\t{}", chain.low, chain.high, chain.rendered)?;
    }
    Ok(())
}

fn render_chains_pretty(payload: &ChainsOutput, w: &mut dyn Write) -> std::io::Result<()> {
    pretty_section(w, "Anchor chains")?;
    if payload.chains.is_empty() {
        writeln!(w, "(none)")?;
        return Ok(());
    }
    for chain in &payload.chains {
        let free = chain.span.saturating_sub(1);
        writeln!(
            w,
            "{} items in {free} ranks  {}",
            chain.unranked, chain.rendered
        )?;
    }
    Ok(())
}
