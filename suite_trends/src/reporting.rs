use std::{
    collections::BTreeMap,
    fs::File,
    io::{self, ErrorKind, Write},
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use itertools::Itertools;
use log::info;
use readable::num::*;
use sparklines::spark;

use crate::{
    config,
    data::{EpochMillis, RunSummary, SuiteKind},
    filter::{apply_filter, MatrixFilter, MatrixView},
    format::{chart_value, format_day, format_minutes, split_day_time, tooltip_run_label, PassBand},
    import::load_report,
    matrix::build_matrix,
    normalize::runs_by_kind,
    parsers::TestReport,
    serialization::{build_matrix_csv, export_file_name},
    series::{duration_chart, extract_passing_series, pass_rate_chart, ChartRow},
    stats::{suite_health, SuiteHealth},
    trend::TrendClassification,
};

/// Write to stdout for `-`, else to the file. A closed stdout pipe is not an
/// error.
fn write_output(output: &Path, bytes: &[u8]) -> Result<()> {
    if output == Path::new("-") {
        match io::stdout().write_all(bytes) {
            Err(e) if e.kind() == ErrorKind::BrokenPipe => Ok(()),
            res => res,
        }?;
    } else {
        File::create(output)
            .and_then(|mut f| f.write_all(bytes))
            .with_context(|| format!("Failed to write {}", output.display()))?;
    }
    Ok(())
}

fn with_newline(mut text: String) -> String {
    if !text.is_empty() && !text.ends_with('\n') {
        text.push('\n');
    }
    text
}

fn health_card(health: &SuiteHealth, title: &str, pass_percents: &[f64]) -> String {
    let mut lines = vec![format!("{title} ({})", health.kind)];

    let Some(latest) = &health.latest else {
        lines.push("  No runs".to_string());
        return lines.join("\n");
    };

    lines.push(format!(
        "  Latest: {:.0}% ({}/{}) {} [{}]",
        latest.pass_percent,
        Unsigned::from(latest.passes),
        Unsigned::from(latest.total),
        tooltip_run_label(latest.start),
        PassBand::of(latest.pass_percent)
    ));
    lines.push(format!("  {}", health.overall));
    lines.extend(
        health
            .windows
            .iter()
            .filter(|w| w.pct.is_some())
            .map(|w| format!("  {w}")),
    );
    lines.push(format!("  {}", spark(pass_percents)));
    lines.join("\n")
}

/// Health cards of all suite kinds, evaluated at `now`.
pub fn render_summary(
    runs: &BTreeMap<SuiteKind, Vec<RunSummary>>,
    now: EpochMillis,
    windows: &[u32],
    title_of: impl Fn(SuiteKind) -> String,
) -> String {
    let series = extract_passing_series(runs);
    SuiteKind::ALL
        .into_iter()
        .map(|kind| {
            let kind_runs = runs.get(&kind).map(Vec::as_slice).unwrap_or_default();
            let health = suite_health(kind, kind_runs, now, windows);
            let pass_percents: Vec<f64> = series
                .get(&kind)
                .into_iter()
                .flatten()
                .map(|p| p.pass_percent)
                .collect();
            health_card(&health, &title_of(kind), &pass_percents)
        })
        .join("\n\n")
}

/// Tab-separated chart rows: the date, then one column per suite kind.
pub fn render_chart(rows: &[ChartRow], render: impl Fn(f64) -> String) -> String {
    let header = std::iter::once("date")
        .chain(SuiteKind::ALL.iter().map(|k| k.label()))
        .join("\t");
    let body = rows.iter().map(|row| {
        std::iter::once(format_day(row.date))
            .chain(
                SuiteKind::ALL
                    .iter()
                    .map(|k| chart_value(row.get(*k), &render)),
            )
            .join("\t")
    });
    std::iter::once(header).chain(body).join("\n")
}

fn truncate_title(title: &str, width: usize) -> String {
    if title.chars().count() <= width {
        title.to_string()
    } else {
        let mut truncated: String = title.chars().take(width.saturating_sub(1)).collect();
        truncated.push('…');
        truncated
    }
}

fn trend_flags(trend: &TrendClassification) -> String {
    [
        (trend.is_flaky, "flaky"),
        (trend.latest_fail, "latest-fail"),
        (trend.new_failure, "new-failure"),
        (trend.recovered, "recovered"),
    ]
    .into_iter()
    .filter_map(|(set, name)| set.then_some(name))
    .join(",")
}

/// Tab-separated matrix table with one row per test.
pub fn render_matrix(view: &MatrixView, title_width: usize) -> String {
    let header = std::iter::once("test".to_string())
        .chain(view.columns.iter().map(|run| {
            let (day, time) = split_day_time(run.start);
            format!("{day} {time}")
        }))
        .chain(["pass rate".to_string(), "flags".to_string()])
        .join("\t");

    let body = view.rows.iter().map(|row| {
        std::iter::once(truncate_title(&row.title, title_width))
            .chain(row.cells.iter().map(|c| c.to_string()))
            .chain([
                format!(
                    "{}% [{}]",
                    row.trend.pass_rate,
                    PassBand::of(f64::from(row.trend.pass_rate))
                ),
                trend_flags(&row.trend),
            ])
            .join("\t")
    });

    std::iter::once(header).chain(body).join("\n")
}

pub fn summary(input: &Path, now: EpochMillis, windows: &[u32]) -> Result<()> {
    let report = load_report(input)?;
    let text = render_summary(&runs_by_kind(&report), now, windows, config::suite_title);
    write_output(Path::new("-"), with_newline(text).as_bytes())
}

pub fn trend(input: &Path, durations: bool) -> Result<()> {
    let report = load_report(input)?;
    let text = if durations {
        render_chart(&duration_chart(&report), format_minutes)
    } else {
        let series = extract_passing_series(&runs_by_kind(&report));
        render_chart(&pass_rate_chart(&series), |v| format!("{v:.1}"))
    };
    write_output(Path::new("-"), with_newline(text).as_bytes())
}

fn kind_runs(report: &TestReport, kind: SuiteKind) -> Vec<RunSummary> {
    runs_by_kind(report).remove(&kind).unwrap_or_default()
}

pub fn matrix(input: &Path, kind: SuiteKind, filter: &MatrixFilter) -> Result<()> {
    let report = load_report(input)?;
    let runs = kind_runs(&report, kind);
    let matrix = build_matrix(report.runs(kind));

    let view = apply_filter(&runs, &matrix, filter);
    info!(
        "Showing {} of {} tests over {} of {} runs",
        view.rows.len(),
        matrix.len(),
        view.columns.len(),
        runs.len()
    );

    let text = render_matrix(&view, config::title_width());
    write_output(Path::new("-"), with_newline(text).as_bytes())
}

pub fn export(input: &Path, kind: SuiteKind, output: Option<PathBuf>) -> Result<()> {
    let report = load_report(input)?;
    let runs = kind_runs(&report, kind);
    let matrix = build_matrix(report.runs(kind));
    let title = config::suite_title(kind);

    let csv = build_matrix_csv(&title, &runs, &matrix);
    let output = output.unwrap_or_else(|| PathBuf::from(export_file_name(&title, &runs)));
    write_output(&output, csv.as_bytes())?;

    info!(
        "Exported {} tests over {} runs of {} to {}",
        matrix.len(),
        runs.len(),
        kind,
        output.display()
    );
    Ok(())
}
