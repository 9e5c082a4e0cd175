use anyhow::Context;
use car_auction::config::Arguments;
use car_auction::web::app::{init_app_state, run_app};
use clap::Parser;
use log::info;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Arguments::parse();
    info!("running car-auction with validated arguments:\n{}", args);

    let app_state = init_app_state(&args).context("failed to restore auction state")?;

    run_app(args.bind_address, app_state)
        .await
        .with_context(|| format!("server on {} failed", args.bind_address))
}
