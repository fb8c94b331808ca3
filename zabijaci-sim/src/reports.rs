use anyhow::Result;
use colored::Colorize;
use serde::Serialize;
use std::io::Write;
use std::time::Duration;

use zabijaci_game::{ShuffleStrategy, TrialRun};

/// Serializable digest of a run, without the full table.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub seed: u64,
    pub strategy: ShuffleStrategy,
    pub games: usize,
    pub players: usize,
    pub random_draws: u64,
    pub shape: (usize, usize),
    pub columns: Vec<String>,
    pub cycle_totals: Vec<u64>,
    pub column_means: Vec<f64>,
    pub head: Vec<Vec<u64>>,
}

impl RunReport {
    #[must_use]
    pub fn from_run(run: &TrialRun, head: usize) -> Self {
        Self {
            seed: run.seed,
            strategy: run.strategy,
            games: run.games,
            players: run.players,
            random_draws: run.random_draws,
            shape: run.table.shape(),
            columns: run.table.columns().to_vec(),
            cycle_totals: run.cycle_totals(),
            column_means: run.table.column_means(),
            head: run.table.head(head).to_vec(),
        }
    }
}

pub fn generate_console_report(
    out: &mut dyn Write,
    run: &TrialRun,
    head: usize,
    elapsed: Duration,
) -> Result<()> {
    writeln!(out, "{}", "🎲 Zabijaci Cycle Simulation".bright_cyan().bold())?;
    writeln!(out, "{}", "============================".cyan())?;
    writeln!(out, "Seed: {}", run.seed)?;
    writeln!(out, "Strategy: {}", run.strategy)?;
    writeln!(out, "Games: {}, players: {}", run.games, run.players)?;
    writeln!(out, "Random draws: {}", run.random_draws)?;
    let (rows, cols) = run.table.shape();
    writeln!(out, "Shape: ({rows}, {cols})")?;
    writeln!(out)?;

    let preview = run.table.head(head);
    if !preview.is_empty() {
        writeln!(
            out,
            "{}",
            format!("First {} game(s):", preview.len()).bright_yellow().bold()
        )?;
        write_preview(out, run.table.columns(), preview)?;
        writeln!(out)?;
    }

    let totals = run.cycle_totals();
    writeln!(
        out,
        "{}",
        format!("Cycle totals by length ({}):", totals.len())
            .bright_yellow()
            .bold()
    )?;
    writeln!(out, "{totals:?}")?;
    writeln!(out)?;

    writeln!(out, "{}", "Mean per game:".bright_yellow().bold())?;
    for (name, mean) in run.table.columns().iter().zip(run.table.column_means()) {
        if mean > 0.0 {
            writeln!(out, "  {name:14} {mean:.4}")?;
        }
    }
    writeln!(out)?;
    writeln!(out, "🏁 Total time: {elapsed:?}")?;
    Ok(())
}

fn write_preview(out: &mut dyn Write, columns: &[String], rows: &[Vec<u64>]) -> Result<()> {
    let index_width = (rows.len().saturating_sub(1)).to_string().len();
    let widths: Vec<usize> = columns
        .iter()
        .enumerate()
        .map(|(i, name)| {
            rows.iter()
                .map(|row| row[i].to_string().len())
                .max()
                .unwrap_or(0)
                .max(name.len())
        })
        .collect();

    write!(out, "{:index_width$}", "")?;
    for (name, width) in columns.iter().zip(&widths) {
        write!(out, "  {name:>width$}")?;
    }
    writeln!(out)?;

    for (index, row) in rows.iter().enumerate() {
        write!(out, "{index:>index_width$}")?;
        for (value, width) in row.iter().zip(&widths) {
            write!(out, "  {value:>width$}")?;
        }
        writeln!(out)?;
    }
    Ok(())
}

pub fn generate_json_report(out: &mut dyn Write, run: &TrialRun, head: usize) -> Result<()> {
    let report = RunReport::from_run(run, head);
    serde_json::to_writer_pretty(&mut *out, &report)?;
    writeln!(out)?;
    Ok(())
}

pub fn generate_csv_report(out: &mut dyn Write, run: &TrialRun) -> Result<()> {
    writeln!(out, "{}", run.table.columns().join(","))?;
    for row in run.table.rows() {
        let line: Vec<String> = row.iter().map(u64::to_string).collect();
        writeln!(out, "{}", line.join(","))?;
    }
    Ok(())
}

pub fn generate_markdown_report(out: &mut dyn Write, run: &TrialRun) -> Result<()> {
    writeln!(out, "# Zabijaci Cycle Simulation\n")?;

    writeln!(out, "## Summary\n")?;
    writeln!(out, "- **Seed**: {}", run.seed)?;
    writeln!(out, "- **Strategy**: {}", run.strategy)?;
    writeln!(out, "- **Games**: {}", run.games)?;
    writeln!(out, "- **Players**: {}", run.players)?;
    let (rows, cols) = run.table.shape();
    writeln!(out, "- **Shape**: {rows} x {cols}\n")?;

    writeln!(out, "## Cycles by Length\n")?;
    writeln!(out, "| Length | Total | Mean per game |")?;
    writeln!(out, "|-------:|------:|--------------:|")?;
    let means = run.table.column_means();
    for (offset, (length, total)) in run
        .table
        .lengths()
        .iter()
        .zip(run.cycle_totals())
        .enumerate()
    {
        // `means[0]` belongs to `cycles_count`.
        let mean = means.get(offset + 1).copied().unwrap_or(0.0);
        writeln!(out, "| {length} | {total} | {mean:.4} |")?;
    }
    writeln!(out)?;
    Ok(())
}
