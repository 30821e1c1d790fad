pub mod cli;
pub mod config;
pub mod events;
pub mod logging;
pub mod report;
pub mod runner;
pub mod state;
pub mod time;
pub mod trx;
pub mod utils;

pub use config::ReporterOptions;
pub use report::{Reporter, TrxReporter};
pub use runner::{Run, RunnerEvent};
