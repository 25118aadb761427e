pub mod config;
pub mod logging;

pub mod daemon;
pub mod fetch;
pub mod index;
pub mod item;
pub mod naming;
pub mod pipeline;
pub mod scheduler;
pub mod shutdown;
pub mod store;

#[cfg(test)]
pub(crate) mod test_support;
