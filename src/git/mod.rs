pub mod repo;
pub mod source;

pub use repo::GixSource;
pub use source::{CommitIter, CommitSource, GitLogSource, MemorySource};
