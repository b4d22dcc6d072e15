pub mod config;
pub mod context;
pub mod error;
pub mod failure;
pub mod frame;
pub mod render;
pub mod report;
pub mod source;
pub mod syntax;
pub mod tracer;
pub mod value;
pub mod variables;
pub mod walker;

pub use config::Config;
pub use failure::{Diagnose, Failure};
pub use frame::{Bindings, Frame};
pub use render::Sink;
pub use report::{Reporter, report, report_failure, with_diagnostics};
pub use value::Value;
