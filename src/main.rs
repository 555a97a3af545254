use anyhow::Result;
use javamap::cli::{self, setup, Commands};
use javamap::commands::{analyze, init};

fn main() -> Result<()> {
    let cli = cli::parse_args();

    match cli.command {
        Commands::Analyze {
            path,
            format,
            output,
            exclude,
            coupling_threshold,
            max_file_size,
            jobs,
            no_parallel,
            verbosity,
        } => {
            setup::init_logging(verbosity);
            setup::configure_thread_pool(jobs);
            if !no_parallel {
                log::debug!(
                    "Using {} worker threads",
                    setup::get_worker_count(jobs)
                );
            }

            let config = analyze::AnalyzeConfig {
                path,
                format,
                output,
                exclude: exclude.unwrap_or_default(),
                coupling_threshold,
                max_file_size,
                parallel: !no_parallel,
            };
            analyze::handle_analyze(config)
        }
        Commands::Init { force } => init::init_config(force),
    }
}
