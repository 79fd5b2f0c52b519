#[macro_use]
extern crate rocket;

pub mod config;
pub mod error;
pub mod forms;
pub mod history;
pub mod registry;
pub mod routes;
pub mod station;
pub mod tally;
pub mod views;

/// Runs a handler body, logging the failure before it turns into a response.
#[macro_export]
macro_rules! execute {
    ($block:block) => {
        {
            let res = || -> Result<_, $crate::error::PollError> {
                $block
            };
            res().map_err(|e| {
                ::tracing::warn!("{e}");
                e
            })
        }
    };
}
