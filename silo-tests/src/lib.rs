mod bulk;
mod constraints;
mod hooks;
mod lifecycle;
mod mutations;
mod queries;
mod simple;
mod transactions;

use crate::{
    bulk::bulk,
    constraints::constraints,
    hooks::hooks,
    lifecycle::lifecycle,
    mutations::mutations,
    queries::queries,
    simple::{scenario, simple},
    transactions::transactions,
};
use log::LevelFilter;
use silo_core::Client;
use std::env;

pub fn init_logs() {
    let mut logger = env_logger::builder();
    logger
        .is_test(true)
        .format_file(true)
        .format_line_number(true);
    if env::var("RUST_LOG").is_err() {
        logger.filter_level(LevelFilter::Warn);
    }
    let _ = logger.try_init();
}

/// Run the whole conformance suite against a client over a fresh, empty
/// store. Scenarios use disjoint entity kinds; the lifecycle scenario runs
/// last because it closes the client.
pub async fn execute_tests(client: Client) {
    simple(&client).await;
    scenario(&client).await;
    queries(&client).await;
    mutations(&client).await;
    bulk(&client).await;
    constraints(&client).await;
    transactions(&client).await;
    hooks(&client).await;
    lifecycle(client).await;
}
