use std::{io::Write, time::Instant};

use clap::Parser;
use draft_release_notes::{get_error_chain, run, Args, Settings};
use env_logger::{Env, Target};
use humantime::format_duration;
use log::{debug, info, LevelFilter};
use tokio::runtime;

fn initialize_logger(debug: bool) {
    let mut builder = env_logger::Builder::from_env(Env::default().default_filter_or("info"));
    if debug {
        builder.filter_module("draft_release_notes", LevelFilter::Debug);
    }

    // operators read these lines as-is, so no level or timestamp
    builder
        .target(Target::Stdout)
        .format(|buf, record| writeln!(buf, "{}", record.args()))
        .init();
}

async fn inner_main(settings: Settings) {
    let start = Instant::now();

    match run(&settings).await {
        Ok(outcome) => debug!("finished with {outcome:?}"),
        Err(err) => {
            info!("🔴 Failed to update the draft release");
            info!("errors: {}", get_error_chain(&err));
        }
    }

    debug!("took {}", format_duration(start.elapsed()));
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    initialize_logger(args.debug);

    let rt = runtime::Builder::new_current_thread()
        .enable_io()
        .enable_time()
        .build()?;

    rt.block_on(inner_main(args.into()));

    Ok(())
}
