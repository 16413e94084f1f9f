use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;

use chunkwise::{compare, linspace, square_plus_cos, Backend, ChunkedEvaluator, Elementwise, EvalConfig};

/// Evaluate x² + cos(x) over a linear sequence, single pass vs chunked in parallel
#[derive(Parser, Debug)]
#[command(name = "chunkwise", version)]
struct Args {
    /// Number of input values
    #[arg(long, default_value_t = 1_000_000)]
    len: usize,

    /// First input value
    #[arg(long, default_value_t = 0.0)]
    start: f64,

    /// Last input value
    #[arg(long, default_value_t = 120245.0)]
    end: f64,

    /// Number of chunks and workers
    #[arg(long, short = 'p', default_value_t = 12)]
    workers: usize,

    /// Execution backend (channels or rayon)
    #[arg(long, default_value_t = Backend::Channels)]
    backend: Backend,

    /// Upper bound on waiting for workers, in seconds; 0 waits forever
    #[arg(long, default_value_t = 300)]
    timeout_secs: u64,
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_secs()
        .init();

    let args = Args::parse();
    log::info!("chunkwise v{}", chunkwise::VERSION);

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> chunkwise::Result<()> {
    let mut config = EvalConfig::with_workers(args.workers).backend(args.backend);
    config = match args.timeout_secs {
        0 => config.without_timeout(),
        secs => config.timeout(Duration::from_secs(secs)),
    };
    let evaluator = ChunkedEvaluator::new(config)?;

    let input: Arc<[f64]> = linspace(args.start, args.end, args.len).to_vec().into();
    let report = compare(&evaluator, input, Arc::new(Elementwise(square_plus_cos::<f64>)))?;

    println!("Sequential time: {:.6} s", report.sequential.as_secs_f64());
    println!(
        "Parallel time:   {:.6} s ({} workers, {} backend)",
        report.parallel.as_secs_f64(),
        report.n_workers,
        report.backend
    );
    println!("Speedup:         {:.2}x", report.speedup());
    println!("Outputs match within tolerance for all {} values", report.len);

    Ok(())
}
