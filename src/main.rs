use clap::Parser;
use tokio::runtime::Runtime;

use capitulation_watch::utils::time_utils::utc_now_as_timestamp_ms;
use capitulation_watch::{Cli, EXIT_CONFIG_ERROR, EXIT_OK, EXIT_RUN_FAILED, run};

fn main() {
    std::process::exit(real_main());
}

fn real_main() -> i32 {
    // A. Init Logging
    // Info by default, RUST_LOG overrides
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    // B. Parse Args
    let args = Cli::parse();
    #[cfg(debug_assertions)]
    log::debug!("Parsed arguments: symbol={} dry_run={}", args.symbol(), args.dry_run);

    if let Err(e) = args.validate() {
        log::error!("{}", e);
        return EXIT_CONFIG_ERROR;
    }

    // C. One evaluation run (blocking)
    let rt = match Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            log::error!("Failed to create Tokio runtime: {}", e);
            return EXIT_RUN_FAILED;
        }
    };

    match rt.block_on(run(&args, utc_now_as_timestamp_ms())) {
        Ok(report) => {
            if args.json {
                match serde_json::to_string_pretty(&report) {
                    Ok(json) => println!("{}", json),
                    Err(e) => {
                        log::error!("Failed to serialise report: {}", e);
                        return EXIT_RUN_FAILED;
                    }
                }
            }
            EXIT_OK
        }
        Err(e) => {
            log::error!("Error: {:#}", e);
            EXIT_RUN_FAILED
        }
    }
}
