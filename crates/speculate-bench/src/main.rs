use speculate_bench::cli;
use speculate_bench::{write_report, BenchConfig, Harness, ReportSummary};
use speculate_core::{Scenario, SequentialRunner, SpeculativeRunner};
use speculate_workload::{CancelSignal, CancellationScope, MatrixTrace, PrimeSearch, ProofOfWork};

fn main() -> anyhow::Result<()> {
    let args = match cli::parse_from(std::env::args_os()) {
        Ok(args) => args,
        Err(err) => {
            // Usage problems are reported, not signalled through the exit code.
            let _ = err.print();
            return Ok(());
        }
    };

    if let Err(err) = speculate_bench::logging::init(args.log_level.as_deref()) {
        println!("Error: {err}");
        println!("{}", cli::command().render_usage());
        return Ok(());
    }

    let config = match args.into_config() {
        Ok(config) => config,
        Err(err) => {
            println!("Error: {err}");
            println!("{}", cli::command().render_usage());
            return Ok(());
        }
    };

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    runtime.block_on(run(config));
    Ok(())
}

async fn run(config: BenchConfig) {
    println!("{}", config.banner());

    let shutdown = CancellationScope::new();
    let shutdown_signal = shutdown.signal();
    let interrupt = tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                tracing::warn!("interrupt received, cancelling in-flight trials");
                shutdown.fire();
                // Sequential trials cannot be cancelled; a second interrupt exits.
                if tokio::signal::ctrl_c().await.is_ok() {
                    std::process::exit(130);
                }
            }
            Err(err) => {
                tracing::warn!(error = %err, "cannot listen for interrupts");
                // Keep the scope alive so the benchmark is not cancelled.
                std::future::pending::<()>().await;
            }
        }
    });

    let harness = build_harness(&config, shutdown_signal.clone()).with_shutdown(shutdown_signal);
    let outcome = harness.run().await;
    interrupt.abort();

    if outcome.interrupted {
        println!("\nInterrupted: reporting completed trials only");
    }

    let summary = match ReportSummary::from_samples(
        &outcome.sequential.durations,
        &outcome.speculative.durations,
    ) {
        Ok(summary) => summary,
        Err(err) => {
            println!("\nCannot build report: {err}");
            return;
        }
    };

    let report = summary.render(&config.params);
    println!("\n{report}");

    match write_report(&config.report_path, &report).await {
        Ok(()) => println!("Report saved to '{}'", config.report_path.display()),
        Err(err) => {
            tracing::error!(error = %err, "report write failed");
            println!("Error writing report file: {err}");
        }
    }
}

fn build_harness(
    config: &BenchConfig,
    shutdown: CancelSignal,
) -> Harness<
    impl Fn(usize) -> SequentialRunner<MatrixTrace, ProofOfWork, PrimeSearch> + '_,
    impl Fn(usize) -> SpeculativeRunner<MatrixTrace, ProofOfWork, PrimeSearch> + '_,
> {
    let sequential = move |trial: usize| {
        SequentialRunner::new(Scenario::standard(&config.params, config.seed_for_trial(trial)))
    };
    let speculative = move |trial: usize| {
        SpeculativeRunner::new(Scenario::standard(&config.params, config.seed_for_trial(trial)))
            .with_parent(shutdown.clone())
    };
    Harness::new(config.trials, config.pause, sequential, speculative)
}
