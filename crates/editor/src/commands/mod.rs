#![forbid(unsafe_code)]

pub(crate) mod charts;
pub(crate) mod edit;
pub(crate) mod graph;

use crate::config;
use om_storage::ChartStore;

pub(crate) fn open_store(args: &[String]) -> Result<ChartStore, Box<dyn std::error::Error>> {
    Ok(ChartStore::open(config::storage_dir(args))?)
}
