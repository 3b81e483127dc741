//! Allocation simulator for a tiered, pro-rata token sale.
//!
//! Tier registry -> fill model -> tier evaluator -> (greedy allocator, price sweep).
//! Terminal prompts, tables and CSV export sit at the edges in [prompt], [report],
//! [cli] and [sweep::export_csv].

pub mod cli;
pub mod data;
pub mod optimizer;
pub mod prompt;
pub mod report;
pub mod sale;
pub mod sweep;
