//! `rankfill candidates`: candidate ranks per item and items per rank.

use std::io::Write;
use std::path::PathBuf;

use clap::Args;
use rankfill_core::RankfillConfig;
use rankfill_infer::{CandidateReport, enumerate_candidates};

use crate::cmd::run_pipeline;
use crate::output::{OutputMode, pretty_kv, pretty_section, render_mode};

/// Arguments for `rankfill candidates`.
#[derive(Args, Debug)]
pub struct CandidatesArgs {
    /// JSON array of `{title, year, group_seq?, rank?}` objects.
    pub input: PathBuf,

    /// Show at most this many entries per pretty section.
    #[arg(long, default_value_t = 20)]
    pub limit: usize,
}

/// Execute `rankfill candidates`.
pub fn run_candidates(
    args: &CandidatesArgs,
    output: OutputMode,
    config: &RankfillConfig,
) -> anyhow::Result<()> {
    let (items, _) = run_pipeline(&args.input, output, config)?;
    let report = enumerate_candidates(&items);
    let limit = args.limit;
    render_mode(output, &report, render_candidates_text, |report, w| {
        render_candidates_pretty(report, limit, w)
    })
}

fn join_ranks(ranks: &[u32]) -> String {
    ranks
        .iter()
        .map(u32::to_string)
        .collect::<Vec<_>>()
        .join(",")
}

fn render_candidates_text(report: &CandidateReport, w: &mut dyn Write) -> std::io::Result<()> {
    for entry in &report.items {
        writeln!(w, "item\t{}\t{}\t{}", entry.id, entry.range, join_ranks(&entry.free))?;
    }
    for entry in &report.by_rank {
        let ids = entry
            .items
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(",");
        writeln!(w, "rank\t{}\t{ids}", entry.rank)?;
    }
    Ok(())
}

fn render_candidates_pretty(
    report: &CandidateReport,
    limit: usize,
    w: &mut dyn Write,
) -> std::io::Result<()> {
    pretty_section(w, "Candidates")?;
    pretty_kv(
        w,
        "Items",
        format!(
            "{} ({} anchored, {} unanchored)",
            report.items.len(),
            report.bounded,
            report.unbounded
        ),
    )?;
    pretty_kv(w, "Free ranks", report.by_rank.len().to_string())?;
    pretty_kv(
        w,
        "Forced",
        format!(
            "{} items, {} ranks",
            report.forced_items.len(),
            report.forced_ranks.len()
        ),
    )?;
    if !report.without_candidates.is_empty() {
        let ids = report
            .without_candidates
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ");
        pretty_kv(w, "No candidates", ids)?;
    }
    writeln!(w)?;

    pretty_section(w, "Most constrained items")?;
    for entry in report.items.iter().take(limit) {
        writeln!(
            w,
            "{:<4}  {:<12}  {:>4} free  {}{}",
            entry.id.as_str(),
            entry.range.to_string(),
            entry.free.len(),
            join_ranks(&entry.free),
            if entry.is_forced() { "  (forced)" } else { "" }
        )?;
    }
    writeln!(w)?;

    pretty_section(w, "Scarcest ranks")?;
    for rank in report.scarcest_ranks.iter().take(limit) {
        let Some(entry) = report.for_rank(*rank) else {
            continue;
        };
        let ids = entry
            .items
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ");
        writeln!(w, "@{rank}  {:>4} items  {ids}", entry.items.len())?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use rankfill_core::ItemSpec;
    use rankfill_infer::infer;

    #[derive(Parser)]
    struct Wrapper {
        #[command(flatten)]
        args: CandidatesArgs,
    }

    fn sample_report() -> CandidateReport {
        let specs = vec![
            ItemSpec::new("one", 2000).with_group_seq(1).with_rank(1001),
            ItemSpec::new("two", 2000).with_group_seq(2),
            ItemSpec::new("three", 2000).with_group_seq(3).with_rank(1003),
            ItemSpec::new("loose", 1990),
        ];
        let mut config = RankfillConfig::default();
        config.ranks.high = 1005;
        let (items, _) = infer(specs, &config).expect("consistent");
        enumerate_candidates(&items)
    }

    #[test]
    fn args_default_limit() {
        let w = Wrapper::parse_from(["test", "items.json"]);
        assert_eq!(w.args.limit, 20);
    }

    #[test]
    fn text_lists_items_then_ranks() {
        let report = sample_report();
        let mut out = Vec::new();
        render_candidates_text(&report, &mut out).expect("render");
        let text = String::from_utf8(out).expect("utf8");
        let lines: Vec<&str> = text.lines().collect();
        assert!(lines[0].starts_with("item\t"));
        assert!(lines[0].ends_with("\t1002"), "most constrained first: {}", lines[0]);
        assert_eq!(lines.iter().filter(|l| l.starts_with("rank\t")).count(), 3);
    }

    #[test]
    fn pretty_reports_forced_counts() {
        let report = sample_report();
        let mut out = Vec::new();
        render_candidates_pretty(&report, 5, &mut out).expect("render");
        let text = String::from_utf8(out).expect("utf8");
        assert!(text.contains("Most constrained items"));
        assert!(text.contains("Scarcest ranks"));
        assert!(text.contains("1 items"));
        assert!(text.contains("(forced)"));
    }
}
