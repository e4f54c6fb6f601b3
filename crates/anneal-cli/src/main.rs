use anneal_core::{
    Matrix, PrecisionConfig, adjust_ising_matrix_precision, adjust_qubo_matrix_precision,
    calculate_ising_matrix_bit_width, enable_logging, ising_matrix_to_qubo_matrix,
    qubo_matrix_to_ising_matrix, qubo_matrix_to_qubo_model,
};
use anneal_solver::{BruteForceOptimizer, OptimizerConfig, QuboSolver, SimpleSolver};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, Write};
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "QUBO and Ising matrix conversion, precision and brute-force solving"
)]
struct Cli {
    /// Log filter (for example `debug` or `anneal_core=trace`); falls back to ANNEAL_TRACE
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Pretty-print JSON output
    #[arg(long, global = true)]
    pretty: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Convert a matrix between QUBO and Ising form
    Convert(ConvertArgs),
    /// Report the signed bit width a matrix needs
    CheckBitWidth(PrecisionArgs),
    /// Rescale a matrix into a signed bit width
    AdjustPrecision(PrecisionArgs),
    /// Solve a QUBO matrix by exhaustive search
    Solve(SolveArgs),
}

#[derive(Parser, Debug)]
struct ConvertArgs {
    /// JSON file holding a nested array matrix
    #[arg(long)]
    input: PathBuf,

    /// Form of the input matrix
    #[arg(long, value_enum)]
    from: MatrixKind,

    /// Keep the last Ising row and column as a variable instead of linear fields
    #[arg(long)]
    keep_linear_bit: bool,
}

#[derive(Parser, Debug)]
struct PrecisionArgs {
    /// JSON file holding a nested array matrix
    #[arg(long)]
    input: PathBuf,

    /// Form of the input matrix
    #[arg(long, value_enum, default_value = "qubo")]
    kind: MatrixKind,

    /// Signed bit width including the sign bit
    #[arg(long)]
    bit_width: Option<u32>,
}

#[derive(Parser, Debug)]
struct SolveArgs {
    /// JSON file holding a nested array QUBO matrix
    #[arg(long)]
    input: PathBuf,

    /// Largest Ising dimension to enumerate
    #[arg(long)]
    max_variables: Option<usize>,
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, ValueEnum)]
enum MatrixKind {
    Qubo,
    Ising,
}

impl MatrixKind {
    fn as_str(self) -> &'static str {
        match self {
            MatrixKind::Qubo => "qubo",
            MatrixKind::Ising => "ising",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
struct ConvertOutput {
    kind: &'static str,
    matrix: Matrix,
    offset: f64,
}

#[derive(Debug, Clone, Serialize)]
struct BitWidthOutput {
    kind: &'static str,
    bit_width: u32,
    /// `None` when no integer scaling fits.
    precision: Option<f64>,
    multiplier: Option<f64>,
    fits: bool,
}

#[derive(Debug, Clone, Serialize)]
struct AdjustOutput {
    kind: &'static str,
    bit_width: u32,
    matrix: Matrix,
}

#[derive(Debug, Clone, Serialize)]
struct SolveOutput {
    solution: Option<BTreeMap<String, f64>>,
    qubo_value: Option<f64>,
    candidates: usize,
}

fn main() {
    if let Err(err) = run() {
        eprintln!("{err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    enable_logging(cli.log_level.as_deref())?;
    match cli.command {
        Command::Convert(args) => {
            let matrix = load_matrix(&args.input)?;
            emit(&convert_command(&matrix, &args)?, cli.pretty)
        }
        Command::CheckBitWidth(args) => {
            let matrix = load_matrix(&args.input)?;
            let output = check_bit_width_command(&matrix, &args)?;
            emit(&output, cli.pretty)?;
            if !output.fits {
                return Err(boxed_input_error(&format!(
                    "matrix needs more than a signed {}-bit number",
                    output.bit_width
                )));
            }
            Ok(())
        }
        Command::AdjustPrecision(args) => {
            let matrix = load_matrix(&args.input)?;
            emit(&adjust_precision_command(&matrix, &args)?, cli.pretty)
        }
        Command::Solve(args) => {
            let matrix = load_matrix(&args.input)?;
            emit(&solve_command(&matrix, &args)?, cli.pretty)
        }
    }
}

fn load_matrix(path: &Path) -> Result<Matrix, Box<dyn std::error::Error>> {
    let file = File::open(path)
        .map_err(|err| boxed_input_error(&format!("cannot open {}: {err}", path.display())))?;
    let matrix: Matrix = serde_json::from_reader(BufReader::new(file))?;
    tracing::debug!(
        component = "cli",
        operation = "load_matrix",
        status = "success",
        path = %path.display(),
        rows = matrix.rows(),
        cols = matrix.cols(),
        "Loaded matrix"
    );
    Ok(matrix)
}

fn emit<T: Serialize>(value: &T, pretty: bool) -> Result<(), Box<dyn std::error::Error>> {
    let rendered = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "{rendered}")?;
    Ok(())
}

fn finite(value: f64) -> Option<f64> {
    value.is_finite().then_some(value)
}

fn bit_width_of(requested: Option<u32>) -> u32 {
    let config = match requested {
        Some(bit_width) => PrecisionConfig::new().with_bit_width(bit_width),
        None => PrecisionConfig::new(),
    };
    config.bit_width()
}

fn convert_command(
    matrix: &Matrix,
    args: &ConvertArgs,
) -> Result<ConvertOutput, Box<dyn std::error::Error>> {
    let (converted, offset, kind) = match args.from {
        MatrixKind::Qubo => {
            let (ising, offset) = qubo_matrix_to_ising_matrix(matrix)?;
            (ising, offset, MatrixKind::Ising)
        }
        MatrixKind::Ising => {
            let (qubo, offset) = ising_matrix_to_qubo_matrix(matrix, !args.keep_linear_bit)?;
            (qubo, offset, MatrixKind::Qubo)
        }
    };
    Ok(ConvertOutput {
        kind: kind.as_str(),
        matrix: converted,
        offset,
    })
}

fn check_bit_width_command(
    matrix: &Matrix,
    args: &PrecisionArgs,
) -> Result<BitWidthOutput, Box<dyn std::error::Error>> {
    let bit_width = bit_width_of(args.bit_width);
    let ising = match args.kind {
        MatrixKind::Qubo => qubo_matrix_to_ising_matrix(matrix)?.0,
        MatrixKind::Ising => matrix.clone(),
    };
    let report = calculate_ising_matrix_bit_width(&ising, bit_width)?;
    Ok(BitWidthOutput {
        kind: args.kind.as_str(),
        bit_width,
        precision: finite(report.precision),
        multiplier: finite(report.multiplier),
        fits: report.fits(bit_width),
    })
}

fn adjust_precision_command(
    matrix: &Matrix,
    args: &PrecisionArgs,
) -> Result<AdjustOutput, Box<dyn std::error::Error>> {
    let bit_width = bit_width_of(args.bit_width);
    let adjusted = match args.kind {
        MatrixKind::Qubo => adjust_qubo_matrix_precision(matrix, bit_width)?,
        MatrixKind::Ising => adjust_ising_matrix_precision(matrix, bit_width)?,
    };
    Ok(AdjustOutput {
        kind: args.kind.as_str(),
        bit_width,
        matrix: adjusted,
    })
}

fn solve_command(
    matrix: &Matrix,
    args: &SolveArgs,
) -> Result<SolveOutput, Box<dyn std::error::Error>> {
    let mut qubo = qubo_matrix_to_qubo_model(matrix)?;
    let mut config = OptimizerConfig::new();
    if let Some(limit) = args.max_variables {
        config = config.with_max_variables(limit);
    }
    let mut solver = SimpleSolver::new(BruteForceOptimizer::with_config(config));
    let output = match solver.solve_qubo(&mut qubo)? {
        Some(result) => SolveOutput {
            solution: Some(result.solution),
            qubo_value: Some(result.qubo_value),
            candidates: result.candidates,
        },
        None => SolveOutput {
            solution: None,
            qubo_value: None,
            candidates: 0,
        },
    };
    Ok(output)
}

fn boxed_input_error(message: &str) -> Box<dyn std::error::Error> {
    Box::new(std::io::Error::new(
        std::io::ErrorKind::InvalidInput,
        message.to_string(),
    ))
}
