// Resume scoring engine: ATS check, keyword gap and resume optimization.
// Everything below `handlers` is pure and synchronous; no I/O, no shared state.

pub mod checker;
pub mod handlers;
pub mod keyword_gap;
pub mod models;
pub mod optimizer;
pub mod tokenizer;
