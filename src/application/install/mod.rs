//! Install Use Case
//!
//! Drives one installer invocation against an install directory:
//! - Locks the state directory
//! - Resolves the target's root assets through a session
//! - Writes the roots' files into the install directory
//! - Purges transient assets that have been consumed

mod options;
mod result;
mod use_case;

pub use options::{InstallOptions, InstallTarget, DEFAULT_STATE_DIR};
pub use result::InstallResult;
pub use use_case::InstallUseCase;
