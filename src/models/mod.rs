pub mod number;
pub mod operation;
pub mod question;
pub mod step_trace;
pub mod term_spec;

pub use number::Number;
pub use operation::{Layout, Operation};
pub use question::{Question, QuestionBatch};
pub use step_trace::StepTrace;
pub use term_spec::{parse_range_limits, parse_term_specs, TermSpec};
