//! Domain Layer
//!
//! The asset graph's vocabulary, free of I/O.
//!
//! ## Structure
//!
//! - `entities/` - Content, parents, state records, lifecycle states
//! - `value_objects/` - Asset kinds and content hashes
//! - `services/` - Dependency graph construction and queries
//! - `ports/` - Interfaces implemented by assets and infrastructure

pub mod entities;
pub mod ports;
pub mod services;
pub mod value_objects;
