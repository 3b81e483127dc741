pub mod evaluate;
pub mod fill;

pub use evaluate::{evaluate, evaluate_all, highlight_rows, EvaluationResult, Pricing, RowHighlight};
pub use fill::{fill, FillOutcome};
