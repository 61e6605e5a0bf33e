//! `clinic-server` binary: configure, open the pool, serve, tear down.

use std::sync::Arc;

use anyhow::Context;
use clinic_core::{logging, ClinicConfig, ClinicService, Gateway};
use clinic_server::HttpServer;
use log::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ClinicConfig::from_env().context("loading configuration")?;
    logging::init_logging(&config.log_level).context("starting logger")?;

    let gateway = Arc::new(Gateway::open(config.pool_config()).context("opening database pool")?);
    let service = ClinicService::new(Arc::clone(&gateway));

    let result = HttpServer::new(config, service).start().await;

    gateway.shutdown();
    info!("event=app_stop module=server status=ok");
    result.context("serving HTTP")
}
