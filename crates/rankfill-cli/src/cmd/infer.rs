//! `rankfill infer`: run the pipeline and print every annotated item.

use std::io::Write;
use std::path::PathBuf;

use clap::Args;
use rankfill_core::{Item, ItemId, ItemSet, RankfillConfig};
use rankfill_infer::RunSummary;
use serde::Serialize;

use crate::cmd::run_pipeline;
use crate::output::{OutputMode, pretty_kv, pretty_rule, pretty_section, render_mode};

/// Arguments for `rankfill infer`.
#[derive(Args, Debug)]
pub struct InferArgs {
    /// JSON array of `{title, year, group_seq?, rank?}` objects.
    pub input: PathBuf,

    /// Also list every ordering edge.
    #[arg(long)]
    pub edges: bool,
}

#[derive(Debug, Serialize)]
struct EdgeRow {
    from: ItemId,
    to: ItemId,
}

#[derive(Debug, Serialize)]
struct InferOutput<'a> {
    summary: &'a RunSummary,
    items: &'a [Item],
    #[serde(skip_serializing_if = "Vec::is_empty")]
    edges: Vec<EdgeRow>,
}

/// Execute `rankfill infer`.
pub fn run_infer(
    args: &InferArgs,
    output: OutputMode,
    config: &RankfillConfig,
) -> anyhow::Result<()> {
    let (items, summary) = run_pipeline(&args.input, output, config)?;
    let payload = build_output(&items, &summary, args.edges);
    render_mode(output, &payload, render_infer_text, render_infer_pretty)
}

fn build_output<'a>(
    items: &'a ItemSet,
    summary: &'a RunSummary,
    with_edges: bool,
) -> InferOutput<'a> {
    let edges = if with_edges {
        items
            .edges()
            .into_iter()
            .map(|edge| EdgeRow {
                from: items.get(edge.from).id().clone(),
                to: items.get(edge.to).id().clone(),
            })
            .collect()
    } else {
        Vec::new()
    };
    InferOutput {
        summary,
        items: items.items(),
        edges,
    }
}

fn level_cell(item: &Item) -> String {
    item.approx_level()
        .map_or_else(|| "-".to_string(), |level| level.to_string())
}

fn range_cell(item: &Item) -> String {
    match (item.rank(), item.range()) {
        (Some(rank), _) => format!("@{rank}"),
        (None, Some(range)) => range.to_string(),
        (None, None) => "-".to_string(),
    }
}

fn render_infer_text(payload: &InferOutput<'_>, w: &mut dyn Write) -> std::io::Result<()> {
    for item in payload.items {
        writeln!(
            w,
            "{}\t{}\t{}\t{}\t{}",
            item.id(),
            item.year(),
            level_cell(item),
            range_cell(item),
            item.title()
        )?;
    }
    for edge in &payload.edges {
        writeln!(w, "edge\t{}\t{}", edge.from, edge.to)?;
    }
    Ok(())
}

fn render_infer_pretty(payload: &InferOutput<'_>, w: &mut dyn Write) -> std::io::Result<()> {
    let summary = payload.summary;
    pretty_section(w, "Inference")?;
    pretty_kv(
        w,
        "Items",
        format!("{} ranked, {} unranked", summary.ranked, summary.unranked),
    )?;
    pretty_kv(
        w,
        "Edges",
        format!(
            "{} built, {} after reduction ({} promoted)",
            summary.edges_built, summary.edges_reduced, summary.promoted
        ),
    )?;
    pretty_kv(w, "Layers", summary.layer_count.to_string())?;
    pretty_kv(
        w,
        "Ranges",
        format!(
            "{} anchored both sides, {} unanchored",
            summary.bounded_both, summary.unbounded
        ),
    )?;
    pretty_kv(
        w,
        "No evidence",
        format!(
            "{} isolated, {} without lower, {} without upper",
            summary.isolated, summary.no_info, summary.no_upper_limit
        ),
    )?;
    pretty_kv(w, "Fingerprint", &summary.fingerprint)?;
    writeln!(w)?;

    writeln!(w, "{:<4}  {:>6}  {:>5}  {:<12}  TITLE", "ID", "YEAR", "LAYER", "RANK")?;
    pretty_rule(w)?;
    for item in payload.items {
        writeln!(
            w,
            "{:<4}  {:>6}  {:>5}  {:<12}  {}",
            item.id().as_str(),
            item.year(),
            level_cell(item),
            range_cell(item),
            item.title()
        )?;
    }

    if !payload.edges.is_empty() {
        writeln!(w)?;
        pretty_section(w, "Edges")?;
        for edge in &payload.edges {
            writeln!(w, "{} -> {}", edge.from, edge.to)?;
        }
    }
    Ok(())
}
