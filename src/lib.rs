pub mod dispatcher;
pub mod error;
pub mod log;
pub mod model;
pub mod worker;

pub use dispatcher::run;
pub use error::Error;
pub use model::{Config, Outcome, Summary, WorkerReport};
