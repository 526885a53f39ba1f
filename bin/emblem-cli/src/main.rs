use emblem_common::logging;
use tokio::runtime::Handle;
use tracing::*;

use crate::{
    args::{Args, EnvArgs},
    cmd::exec_subc,
    helpers::get_config,
};

mod args;
mod cmd;
mod errors;
mod helpers;

fn main() -> anyhow::Result<()> {
    let args: Args = argh::from_env();
    if let Err(e) = main_inner(args) {
        eprintln!("FATAL ERROR: {e:#}");
        return Err(e);
    }

    Ok(())
}

fn main_inner(args: Args) -> anyhow::Result<()> {
    // Start runtime for async IO tasks.
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .thread_name("emblem-rt")
        .build()?;

    // Init the logging before we do anything else.
    init_logging(runtime.handle())?;

    let config = get_config(&args, &EnvArgs::from_env())?;
    debug!(
        deployment = %config.deployment.name,
        indexer = %config.indexer.endpoint,
        "loaded config"
    );

    let res = runtime.block_on(exec_subc(args.subc, &config));
    logging::finalize();
    res
}

fn init_logging(rt: &Handle) -> anyhow::Result<()> {
    let mut lconfig = logging::LoggerConfig::with_base_name("emblem-cli");

    // Set the OpenTelemetry URL if set.
    let otlp_url = logging::get_otlp_url_from_env();
    if let Some(url) = &otlp_url {
        lconfig.set_otlp_url(url.clone());
    }

    {
        // The OTLP exporter spawns onto the ambient runtime.
        let _g = rt.enter();
        logging::init(lconfig)?;
    }

    // Have to log this after we start the logging formally.
    if let Some(url) = &otlp_url {
        info!(%url, "using OpenTelemetry tracing output");
    }

    Ok(())
}
