pub mod cli;
pub mod error;
pub mod git;
pub mod graph;
pub mod model;
pub mod util;
