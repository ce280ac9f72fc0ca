mod common;
mod logic;
mod realtime;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use colored::Colorize;
use std::fs::File;
use std::io::{BufWriter, Write, stdout};
use std::path::PathBuf;
use std::time::{Duration, Instant};

use common::parse_seeds;
use common::scenario::{expand_scenarios, get_scenario, list_scenarios};
use dayloop_game::{SessionConfig, Speed};
use logic::{GameplayStrategy, LogicTester, ScenarioResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    Console,
    Json,
    Markdown,
}

#[derive(Debug, Parser)]
#[command(name = "dayloop-tester", version)]
#[command(about = "Automated QA testing for the Dayloop daily-routine engine")]
struct Args {
    /// Scenarios to run (comma-separated, `all` for every scenario)
    #[arg(long, default_value = "smoke")]
    scenarios: String,

    /// List all available scenarios and exit
    #[arg(long)]
    list_scenarios: bool,

    /// Seeds to run (comma-separated, decimal or 0x-prefixed hex)
    #[arg(long, default_value = "1337")]
    seeds: String,

    /// Number of iterations per scenario and seed
    #[arg(long, default_value_t = 10)]
    iterations: usize,

    /// Output report format
    #[arg(long, value_enum, default_value_t = ReportFormat::Console)]
    report: ReportFormat,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Optional path to write the report output instead of stdout
    #[arg(long)]
    output: Option<PathBuf>,

    /// Run a live session against the wall clock for this many seconds instead of scenarios
    #[arg(long)]
    realtime_secs: Option<u64>,

    /// Clock speed for the live session (1x, 2x, 4x)
    #[arg(long, default_value = "1x")]
    speed: Speed,

    /// JSON session configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the clock's base tick interval in milliseconds
    #[arg(long)]
    base_tick_ms: Option<u64>,
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let args = Args::parse();

    if maybe_list_scenarios(&args)? {
        return Ok(());
    }

    announce_banner();

    let config = load_config(&args)?;

    if let Some(secs) = args.realtime_secs {
        let seed = parse_seeds(&args.seeds)?.first().copied().unwrap_or_default();
        let state = realtime::run_realtime(
            config,
            args.speed,
            GameplayStrategy::Diligent,
            seed,
            Duration::from_secs(secs),
        )
        .await?;
        println!(
            "🏁 Finished on day {} ({}) with {} points",
            state.day(),
            state.time_of_day(),
            state.score()
        );
        return Ok(());
    }

    let start_time = Instant::now();
    let scenarios = expand_scenarios(&args.scenarios);
    let seeds = parse_seeds(&args.seeds)?;

    let results = run_logic_scenarios(&args, &config, &scenarios, &seeds);
    write_reports(&args, &results, start_time)?;

    if results.iter().any(|r| !r.passed) {
        std::process::exit(1);
    }

    Ok(())
}

fn maybe_list_scenarios(args: &Args) -> Result<bool> {
    if !args.list_scenarios {
        return Ok(false);
    }
    let mut output_target = OutputTarget::new(args.output.clone())?;
    writeln!(output_target.writer(), "Available scenarios:")?;
    for (key, description) in list_scenarios() {
        writeln!(output_target.writer(), "  {key:25} - {description}")?;
    }
    output_target.flush_inner()?;
    Ok(true)
}

fn announce_banner() {
    println!("{}", "🎮 Dayloop Automated Tester".bright_cyan().bold());
    println!("{}", "================================".cyan());
}

fn load_config(args: &Args) -> Result<SessionConfig> {
    let mut config = match &args.config {
        Some(path) => {
            let raw = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            SessionConfig::from_json(&raw)
                .with_context(|| format!("invalid session config in {}", path.display()))?
        }
        None => SessionConfig::default(),
    };
    if let Some(base_tick_ms) = args.base_tick_ms {
        config.clock.base_tick_ms = base_tick_ms;
    }
    config.validate()?;
    Ok(config)
}

fn run_logic_scenarios(
    args: &Args,
    config: &SessionConfig,
    scenarios: &[String],
    seeds: &[u64],
) -> Vec<ScenarioResult> {
    println!("{}", "🧠 Running Routine Scenarios".bright_yellow().bold());
    println!("{}", "-".repeat(30).yellow());

    let tester = LogicTester::new(args.verbose);
    let mut results = Vec::new();
    for scenario_name in scenarios {
        let Some(mut scenario) = get_scenario(scenario_name) else {
            eprintln!("⚠️  Unknown scenario: {}", scenario_name.yellow());
            continue;
        };
        if args.config.is_some() || args.base_tick_ms.is_some() {
            let plan = scenario.plan.with_config(*config);
            scenario.plan = plan;
        }
        results.extend(tester.run_scenario(&scenario, seeds, args.iterations));
    }
    results
}

fn write_reports(args: &Args, results: &[ScenarioResult], start_time: Instant) -> Result<()> {
    let mut output_target = OutputTarget::new(args.output.clone())?;

    match args.report {
        ReportFormat::Json => {
            logic::reports::generate_json_report(&mut output_target, results)?;
        }
        ReportFormat::Markdown => {
            if results.is_empty() {
                writeln!(
                    &mut output_target,
                    "# Dayloop Routine Test Results\n\n_No scenarios executed._"
                )?;
            } else {
                logic::reports::generate_markdown_report(&mut output_target, results)?;
            }
        }
        ReportFormat::Console => {
            if results.is_empty() {
                writeln!(&mut output_target, "No scenarios executed.")?;
            } else {
                logic::reports::generate_console_report(
                    &mut output_target,
                    results,
                    start_time.elapsed(),
                )?;
            }
            writeln!(&mut output_target)?;
            writeln!(&mut output_target, "🏁 Total time: {:?}", start_time.elapsed())?;
        }
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

    fn base_args() -> Args {
        Args {
            scenarios: "smoke".to_string(),
            list_scenarios: false,
            seeds: "1337".to_string(),
            iterations: 1,
            report: ReportFormat::Json,
            verbose: false,
            output: None,
            realtime_secs: None,
            speed: Speed::X1,
            config: None,
            base_tick_ms: None,
        }
    }

    fn temp_path(label: &str) -> PathBuf {
        std::env::temp_dir().join(format!("dayloop-main-{label}-{}", std::process::id()))
    }

    #[test]
    fn args_parse_speed_and_report() {
        let args = Args::parse_from([
            "dayloop-tester",
            "--speed",
            "4x",
            "--report",
            "markdown",
            "--base-tick-ms",
            "500",
        ]);
        assert_eq!(args.speed, Speed::X4);
        assert_eq!(args.report, ReportFormat::Markdown);
        assert_eq!(load_config(&args).unwrap().clock.base_tick_ms, 500);
    }

    #[test]
    fn load_config_rejects_zero_tick() {
        let args = Args {
            base_tick_ms: Some(0),
            ..base_args()
        };
        assert!(load_config(&args).is_err());
    }

    #[test]
    fn load_config_reads_json_file() {
        let path = temp_path("config.json");
        std::fs::write(&path, r#"{"clock":{"base_tick_ms":2000},"history_limit":4}"#).unwrap();
        let args = Args {
            config: Some(path.clone()),
            ..base_args()
        };
        let config = load_config(&args).unwrap();
        assert_eq!(config.clock.base_tick_ms, 2000);
        assert_eq!(config.history_limit, 4);
        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn run_logic_scenarios_skips_unknown_names() {
        let args = base_args();
        let results = run_logic_scenarios(
            &args,
            &SessionConfig::default(),
            &["smoke".to_string(), "missing".to_string()],
            &[42],
        );
        assert_eq!(results.len(), 1);
        assert!(results[0].passed, "{:?}", results[0].failures);
    }

    #[test]
    fn write_reports_emits_empty_json_array() {
        let path = temp_path("report.json");
        let args = Args {
            output: Some(path.clone()),
            ..base_args()
        };
        write_reports(&args, &[], Instant::now()).unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content.trim(), "[]");
        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn maybe_list_scenarios_writes_output() {
        let path = temp_path("scenarios.txt");
        let args = Args {
            list_scenarios: true,
            output: Some(path.clone()),
            ..base_args()
        };
        assert!(maybe_list_scenarios(&args).unwrap());
        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("Available scenarios"));
        assert!(content.contains("undo-replay"));
        let _ = std::fs::remove_file(path);
    }
}
