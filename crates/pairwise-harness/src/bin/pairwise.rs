//! CLI entrypoint for the pairwise covering-set generator.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use pairwise_core::{GeneratorConfig, parse_seed};
use pairwise_harness::structured_log::LogEmitter;
use pairwise_harness::{count_summary, generate_report, parse_scenario, read_input, verify_rows};

/// N-wise covering sets for combinatorial test design.
#[derive(Debug, Parser)]
#[command(name = "pairwise")]
#[command(about = "Generate and check N-wise covering sets")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Format {
    Json,
    Tsv,
    Markdown,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Generate a covering set for a scenario file.
    Generate {
        /// Scenario file, one `Name: v1, v2` line per dimension (`-` for stdin).
        #[arg(long)]
        input: PathBuf,
        /// Combination size (overrides PAIRWISE_ARITY).
        #[arg(long)]
        arity: Option<usize>,
        /// Candidates per iteration (overrides PAIRWISE_POOL_SIZE).
        #[arg(long)]
        pool_size: Option<usize>,
        /// RNG seed, decimal or 0x... (overrides PAIRWISE_SEED).
        #[arg(long)]
        seed: Option<String>,
        #[arg(long, value_enum, default_value = "json")]
        format: Format,
        /// Output path (if omitted, prints to stdout).
        #[arg(long)]
        output: Option<PathBuf>,
        /// Structured JSONL build log path.
        #[arg(long)]
        log: Option<PathBuf>,
        /// Run id used in log trace ids.
        #[arg(long, default_value = "run-1")]
        run_id: String,
    },
    /// Count molecules and the exhaustive cross product.
    Count {
        #[arg(long)]
        input: PathBuf,
        #[arg(long)]
        arity: Option<usize>,
    },
    /// Check that rows (JSON array or report) cover every molecule.
    Verify {
        #[arg(long)]
        input: PathBuf,
        /// Rows JSON path.
        #[arg(long)]
        rows: PathBuf,
        #[arg(long)]
        arity: Option<usize>,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let env = GeneratorConfig::from_env();

    match cli.command {
        Command::Generate {
            input,
            arity,
            pool_size,
            seed,
            format,
            output,
            log,
            run_id,
        } => {
            let scenario = parse_scenario(&read_input(&input)?)?;
            let mut config = env;
            if let Some(arity) = arity {
                config.arity = arity;
            }
            if let Some(pool_size) = pool_size {
                config.pool_size = pool_size;
            }
            if let Some(seed) = seed {
                config.seed = parse_seed(&seed)
                    .ok_or_else(|| format!("invalid seed '{seed}', expected decimal or 0x..."))?;
            }

            let mut emitter = match &log {
                Some(path) => {
                    if let Some(parent) = path.parent() {
                        std::fs::create_dir_all(parent)?;
                    }
                    Some(LogEmitter::to_file(path, "pairwise", &run_id)?)
                }
                None => None,
            };

            let report = generate_report(&scenario, &config, emitter.as_mut())?;
            eprintln!(
                "Generated {} vector(s) covering {} molecule(s) at arity {}",
                report.vector_count, report.molecule_count, report.arity
            );

            let out = match format {
                Format::Json => report.to_json() + "\n",
                Format::Tsv => report.to_tsv(),
                Format::Markdown => report.to_markdown(),
            };
            if let Some(path) = output {
                if let Some(parent) = path.parent() {
                    std::fs::create_dir_all(parent)?;
                }
                std::fs::write(&path, out)?;
                eprintln!("Wrote {}", path.display());
            } else {
                print!("{out}");
            }
        }
        Command::Count { input, arity } => {
            let scenario = parse_scenario(&read_input(&input)?)?;
            let summary = count_summary(&scenario, arity.unwrap_or(env.arity))?;
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
        Command::Verify { input, rows, arity } => {
            let scenario = parse_scenario(&read_input(&input)?)?;
            let arity = arity.unwrap_or(env.arity);
            let check = verify_rows(&scenario, arity, &std::fs::read_to_string(&rows)?)?;
            println!("{}", serde_json::to_string_pretty(&check)?);
            if !check.is_complete() {
                return Err(format!(
                    "{} of {} molecule(s) not covered",
                    check.missing.len(),
                    check.required
                )
                .into());
            }
            eprintln!("All {} molecule(s) covered", check.required);
        }
    }

    Ok(())
}
