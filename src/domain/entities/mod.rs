//! Domain Entities
//!
//! - `AssetContent` / `AssetFile` - what an asset generates
//! - `Parents` - generated dependencies handed to an asset
//! - `StateRecord` - persisted content with integrity marker
//! - `AssetState` / `Origin` - per-session lifecycle

mod content;
mod parents;
mod record;
mod state;

pub use content::{AssetContent, AssetFile};
pub use parents::Parents;
pub use record::{StateRecord, RECORD_FORMAT_VERSION};
pub use state::{AssetState, Origin};
