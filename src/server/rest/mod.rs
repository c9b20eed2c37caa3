//! Code supporting the `server rest` sub command.

use std::sync::Mutex;

use actix_web::web::Data;
use clap::Parser;
use tracing::info;

use crate::{
    common::trace_rss_now,
    conf::ConfArgs,
    err::SessionError,
    mutations::load::{load_dataset, InputLocations},
    session::Session,
    sync::{sink_from_conf, SharedSink},
};

pub mod actix_server;

/// State shared between the request handlers.
pub struct WebServerData {
    /// The viewer session; commands are serialized through the lock.
    pub session: Mutex<Session>,
    /// Receiver of annotation updates.
    pub sink: SharedSink,
    /// Locations the session was loaded from, used on reload.
    pub inputs: InputLocations,
}

impl WebServerData {
    /// Lock the session.
    pub fn session(&self) -> Result<std::sync::MutexGuard<'_, Session>, SessionError> {
        self.session.lock().map_err(|_| SessionError::Poisoned)
    }
}

/// Command line arguments for `server rest` sub command.
#[derive(Parser, Debug)]
#[command(author, version, about = "Run REST API server", long_about = None)]
pub struct Args {
    /// Configuration and overrides.
    #[command(flatten)]
    pub conf: ConfArgs,
    /// IP to listen on.
    #[arg(long, default_value = "127.0.0.1")]
    pub listen_host: String,
    /// Port to listen on.
    #[arg(long, default_value_t = 8081)]
    pub listen_port: u16,
}

/// Main entry point for `server rest` sub command.
pub fn run(args_common: &crate::common::Args, args: &Args) -> Result<(), anyhow::Error> {
    info!("args_common = {:?}", &args_common);
    info!("args = {:?}", &args);

    if let Some(level) = args_common.verbose.log_level() {
        match level {
            log::Level::Trace | log::Level::Debug => {
                std::env::set_var("RUST_LOG", "debug");
                env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));
            }
            _ => (),
        }
    }

    let conf = args.conf.resolve()?;

    let dataset = load_dataset(&conf.inputs)?;
    trace_rss_now();

    // The sink must be built before the runtime starts as the HTTP transport
    // is blocking.
    let sink = sink_from_conf(&conf.sync)?;

    let data = Data::new(WebServerData {
        session: Mutex::new(Session::new(dataset, conf.view, conf.igv)),
        sink,
        inputs: conf.inputs,
    });

    info!(
        "Launching server main on http://{}:{} ...",
        args.listen_host.as_str(),
        args.listen_port
    );
    info!(
        "  try: http://{}:{}/api/mutations",
        args.listen_host.as_str(),
        args.listen_port
    );
    actix_server::main(args, data)?;

    info!("All done. Have a nice day!");
    Ok(())
}
