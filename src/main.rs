// src/main.rs

use dropvisor::{cli, logging, run};

#[tokio::main]
async fn main() {
    if let Err(err) = run_main().await {
        eprintln!("dropvisor error: {err:?}");
        std::process::exit(1);
    }
}

async fn run_main() -> anyhow::Result<()> {
    let args = cli::parse();
    if args.version {
        println!("{}", cli::version_text());
        return Ok(());
    }

    logging::init_logging(args.log_level)?;
    run(args).await
}
