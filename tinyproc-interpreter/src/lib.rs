pub mod context;
pub mod error;
pub mod evaluator;
pub mod io;
