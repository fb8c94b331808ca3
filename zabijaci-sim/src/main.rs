mod reports;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use std::fs::File;
use std::io::{BufWriter, Write, stdout};
use std::path::PathBuf;
use std::time::Instant;

use zabijaci_game::{ShuffleStrategy, TrialConfig, TrialRun, TrialRunner};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StrategyArg {
    /// Shuffle everyone until nobody holds their own name (uniform)
    Reshuffle,
    /// Players draw from a box in turn, redrawing their own name (non-uniform)
    Box,
}

impl From<StrategyArg> for ShuffleStrategy {
    fn from(value: StrategyArg) -> Self {
        match value {
            StrategyArg::Reshuffle => Self::Reshuffle,
            StrategyArg::Box => Self::BoxDraw,
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "zabijaci-sim", version = "0.1.0")]
#[command(about = "Simulate Zabijaci target assignments and tabulate their hunting cycles")]
struct Args {
    /// Number of games to simulate [default: 10000]
    #[arg(long)]
    games: Option<usize>,

    /// Players per game [default: 60]
    #[arg(long)]
    players: Option<usize>,

    /// Strategy used to deal targets [default: box]
    #[arg(long, value_enum)]
    strategy: Option<StrategyArg>,

    /// Run seed; fresh entropy is used when omitted
    #[arg(long)]
    seed: Option<u64>,

    /// JSON run configuration; command-line flags override its values
    #[arg(long)]
    config: Option<PathBuf>,

    /// Number of games to preview in the console report
    #[arg(long, default_value_t = 10)]
    head: usize,

    /// Report format
    #[arg(long, default_value = "console")]
    #[arg(value_parser = ["json", "markdown", "console", "csv"])]
    report: String,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Output file path (defaults to stdout)
    #[arg(long)]
    output: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    if args.output.is_some() {
        colored::control::set_override(false);
    }

    let config = resolve_config(&args)?;
    let runner = TrialRunner::new(config).context("invalid run configuration")?;
    log::info!(
        "running {} game(s) of {} players with seed {}",
        runner.config().games,
        runner.config().players,
        runner.seed()
    );

    let start_time = Instant::now();
    let run = runner.run().context("simulation failed")?;
    write_reports(&args, &run, start_time)
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "warn" };
    let env = env_logger::Env::default().default_filter_or(default_filter);
    let _ = env_logger::Builder::from_env(env).try_init();
}

fn resolve_config(args: &Args) -> Result<TrialConfig> {
    let mut config = match &args.config {
        Some(path) => {
            let raw = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            // Validated after flags are merged, in `TrialRunner::new`.
            serde_json::from_str::<TrialConfig>(&raw)
                .with_context(|| format!("failed to parse {}", path.display()))?
        }
        None => TrialConfig::default(),
    };

    if let Some(games) = args.games {
        config.games = games;
    }
    if let Some(players) = args.players {
        config.players = players;
    }
    if let Some(strategy) = args.strategy {
        config.strategy = strategy.into();
    }
    if let Some(seed) = args.seed {
        config.seed = Some(seed);
    }

    Ok(config)
}

fn write_reports(args: &Args, run: &TrialRun, start_time: Instant) -> Result<()> {
    let mut output_target = OutputTarget::new(args.output.clone())?;

    match args.report.as_str() {
        "json" => reports::generate_json_report(&mut output_target, run, args.head)?,
        "markdown" => reports::generate_markdown_report(&mut output_target, run)?,
        "csv" => reports::generate_csv_report(&mut output_target, run)?,
        _ => reports::generate_console_report(
            &mut output_target,
            run,
            args.head,
            start_time.elapsed(),
        )?,
    }

    output_target.flush_inner()?;
    Ok(())
}

enum OutputTarget {
    Stdout(BufWriter<std::io::Stdout>),
    File(BufWriter<File>),
}

impl OutputTarget {
    fn new(path: Option<PathBuf>) -> Result<Self> {
        if let Some(path) = path {
            let file = File::create(&path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            Ok(Self::File(BufWriter::new(file)))
        } else {
            Ok(Self::Stdout(BufWriter::new(stdout())))
        }
    }

    fn writer(&mut self) -> &mut dyn Write {
        match self {
            Self::Stdout(w) => w,
            Self::File(w) => w,
        }
    }

    fn flush_inner(&mut self) -> std::io::Result<()> {
        match self {
            Self::Stdout(w) => w.flush(),
            Self::File(w) => w.flush(),
        }
    }
}

impl Write for OutputTarget {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.writer().write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.flush_inner()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn base_args() -> Args {
        Args {
            games: Some(20),
            players: Some(6),
            strategy: Some(StrategyArg::Reshuffle),
            seed: Some(1337),
            config: None,
            head: 5,
            report: "json".to_string(),
            verbose: false,
            output: None,
        }
    }

    fn temp_path(label: &str) -> PathBuf {
        std::env::temp_dir().join(format!(
            "zabijaci-sim-{label}-{}",
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .unwrap_or_default()
                .as_nanos()
        ))
    }

    fn sample_run(args: &Args) -> TrialRun {
        let config = resolve_config(args).unwrap();
        TrialRunner::new(config).unwrap().run().unwrap()
    }

    #[test]
    fn strategy_arg_maps_to_library_selector() {
        assert_eq!(
            ShuffleStrategy::from(StrategyArg::Reshuffle),
            ShuffleStrategy::Reshuffle
        );
        assert_eq!(ShuffleStrategy::from(StrategyArg::Box), ShuffleStrategy::BoxDraw);
    }

    #[test]
    fn resolve_config_uses_defaults_without_flags() {
        let args = Args {
            games: None,
            players: None,
            strategy: None,
            seed: None,
            ..base_args()
        };
        assert_eq!(resolve_config(&args).unwrap(), TrialConfig::default());
    }

    #[test]
    fn resolve_config_flags_override_file() {
        let path = temp_path("config.json");
        std::fs::write(
            &path,
            r#"{ "games": 3, "players": 9, "strategy": "box", "seed": 5 }"#,
        )
        .unwrap();
        let args = Args {
            config: Some(path),
            games: None,
            strategy: None,
            seed: None,
            ..base_args()
        };
        let config = resolve_config(&args).unwrap();
        assert_eq!(config.games, 3);
        assert_eq!(config.players, 6);
        assert_eq!(config.strategy, ShuffleStrategy::BoxDraw);
        assert_eq!(config.seed, Some(5));
    }

    #[test]
    fn resolve_config_reports_missing_file() {
        let args = Args {
            config: Some(temp_path("missing.json")),
            ..base_args()
        };
        let err = resolve_config(&args).unwrap_err();
        assert!(format!("{err:#}").contains("failed to read"));
    }

    #[test]
    fn resolve_config_reports_malformed_file() {
        let path = temp_path("broken.json");
        std::fs::write(&path, r#"{ "players": "#).unwrap();
        let args = Args {
            config: Some(path),
            ..base_args()
        };
        let err = resolve_config(&args).unwrap_err();
        assert!(format!("{err:#}").contains("failed to parse"));
    }

    #[test]
    fn players_flag_overrides_undersized_file() {
        let path = temp_path("small.json");
        std::fs::write(&path, r#"{ "players": 1, "games": 4 }"#).unwrap();
        let args = Args {
            config: Some(path.clone()),
            players: Some(5),
            games: None,
            ..base_args()
        };
        let config = resolve_config(&args).unwrap();
        assert_eq!(config.players, 5);
        assert_eq!(config.games, 4);
        assert!(TrialRunner::new(config).is_ok());

        let args = Args {
            config: Some(path),
            players: None,
            ..base_args()
        };
        let config = resolve_config(&args).unwrap();
        let err = TrialRunner::new(config).unwrap_err();
        assert!(err.to_string().contains("at least 2 players"));
    }

    #[test]
    fn write_reports_emits_json() {
        let path = temp_path("report.json");
        let args = Args {
            output: Some(path.clone()),
            ..base_args()
        };
        let run = sample_run(&args);
        write_reports(&args, &run, Instant::now()).unwrap();
        let content = std::fs::read_to_string(path).unwrap();
        assert!(content.contains("\"cycle_totals\""));
        assert!(content.contains("\"seed\": 1337"));
    }

    #[test]
    fn write_reports_emits_csv() {
        let path = temp_path("report.csv");
        let args = Args {
            report: "csv".to_string(),
            output: Some(path.clone()),
            ..base_args()
        };
        let run = sample_run(&args);
        write_reports(&args, &run, Instant::now()).unwrap();
        let content = std::fs::read_to_string(path).unwrap();
        assert!(content.starts_with("cycles_count,cycle_1,"));
        assert_eq!(content.lines().count(), 21);
    }

    #[test]
    fn write_reports_emits_markdown() {
        let path = temp_path("report.md");
        let args = Args {
            report: "markdown".to_string(),
            output: Some(path.clone()),
            ..base_args()
        };
        let run = sample_run(&args);
        write_reports(&args, &run, Instant::now()).unwrap();
        let content = std::fs::read_to_string(path).unwrap();
        assert!(content.contains("## Cycles by Length"));
    }

    #[test]
    fn write_reports_emits_console_summary() {
        colored::control::set_override(false);
        let path = temp_path("report.txt");
        let args = Args {
            report: "console".to_string(),
            output: Some(path.clone()),
            ..base_args()
        };
        let run = sample_run(&args);
        write_reports(&args, &run, Instant::now()).unwrap();
        let content = std::fs::read_to_string(path).unwrap();
        assert!(content.contains("Shape: (20, 7)"));
        assert!(content.contains("Total time"));
    }

    #[test]
    fn output_target_stdout_writes() {
        let mut target = OutputTarget::new(None).unwrap();
        target.write_all(b"ok").unwrap();
        target.flush().unwrap();
    }

    #[test]
    fn output_target_reports_bad_path() {
        let dir = temp_path("no-such-dir");
        let result = OutputTarget::new(Some(dir.join("report.txt")));
        assert!(result.is_err());
    }
}
