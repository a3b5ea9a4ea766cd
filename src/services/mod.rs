pub mod bounds_resolver;
pub mod markup;
pub mod number_generator;
pub mod operation_engine;
pub mod step_formatter;

pub use bounds_resolver::{resolve_bounds, Bounds};
pub use number_generator::NumberGenerator;
pub use operation_engine::{EngineOutcome, OperationEngine};
pub use step_formatter::format_steps;
