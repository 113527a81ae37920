//! Domain Services
//!
//! Pure logic over domain entities, no I/O.

mod graph;

pub use graph::DependencyGraph;
