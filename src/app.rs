pub mod bootstrap;
pub mod pipeline;

pub use bootstrap::{run, RunReport};
pub use pipeline::{FetchFailure, Outcome, Pipeline, RunResult};
