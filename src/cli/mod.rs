//! One-shot sub commands working on a freshly loaded session.

pub mod annotate;
pub mod chart;
pub mod table;

use std::io::Write;

use crate::{
    common::io::open_write_maybe_gz, conf::ConfArgs, mutations::load::load_dataset,
    session::Session,
};

/// Resolve the configuration and load a session from it.
pub fn load_session(conf: &ConfArgs) -> Result<(crate::conf::Top, Session), anyhow::Error> {
    let conf = conf.resolve()?;
    let dataset = load_dataset(&conf.inputs)?;
    crate::common::trace_rss_now();
    let session = Session::new(dataset, conf.view, conf.igv.clone());
    Ok((conf, session))
}

/// Open `path` for writing, or stdout if `None`.
pub fn open_output(path: Option<&str>) -> Result<Box<dyn Write>, anyhow::Error> {
    Ok(match path {
        Some(path) => open_write_maybe_gz(path)
            .map_err(|e| anyhow::anyhow!("could not open {:?} for writing: {}", path, e))?,
        None => Box::new(std::io::stdout().lock()),
    })
}
