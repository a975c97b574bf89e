use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use filterop::{filter_op_table, EmitConfig, FilterOpError, Generator, OutputFormat, Strictness};
use tracing::error;

/// Generate the filter opcode registry
#[derive(Parser, Debug)]
#[command(name = "filterop-gen", version)]
struct Cli {
    /// Output file
    #[arg(short, long, default_value = "filter_op.gen.rs")]
    out: PathBuf,
    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Rust)]
    format: OutputFormat,
    /// TOML file with emitter settings
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Report missing operand types as warnings instead of failing
    #[arg(long)]
    lenient: bool,
    /// Fail if the output file is missing or out of date, without writing it
    #[arg(long, conflicts_with = "stdout")]
    check: bool,
    /// Print the artifact instead of writing it
    #[arg(long)]
    stdout: bool,
}

fn run(cli: &Cli) -> Result<(), FilterOpError> {
    let config = match &cli.config {
        Some(path) => EmitConfig::load(path)?,
        None => EmitConfig::default(),
    };
    let strictness = if cli.lenient { Strictness::Lenient } else { Strictness::Strict };
    let generator = Generator::new(config).strictness(strictness).format(cli.format);
    let table = filter_op_table();

    if cli.check {
        generator.check(&table, &cli.out)
    } else if cli.stdout {
        print!("{}", generator.render(&table)?);
        Ok(())
    } else {
        generator.run(&table, &cli.out).map(|_| ())
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("filterop=info,filterop_gen=info")),
        )
        .init();

    let cli = Cli::parse();
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(FilterOpError::Validation(diags)) => {
            for diag in &diags {
                eprintln!("{}", diag);
            }
            error!(errors = diags.len(), "definition table is inconsistent");
            ExitCode::FAILURE
        }
        Err(e) => {
            eprintln!("{}", e);
            ExitCode::FAILURE
        }
    }
}
