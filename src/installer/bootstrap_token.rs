//! bootstrap-token asset
//!
//! One-time credential the bootstrap node uses to join the cluster. It is
//! transient: once the bootstrap payload embedding it has been generated,
//! the token is purged from memory, the state store and the install dir.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::entities::{AssetContent, AssetFile, Parents};
use crate::domain::ports::{Asset, GenerateContext};
use crate::domain::value_objects::AssetKind;
use crate::error::GenerateError;

pub const BOOTSTRAP_TOKEN: &str = "bootstrap-token";

/// Where the token lands if it is ever materialized
pub const TOKEN_FILE: &str = "auth/bootstrap-token";

const TOKEN_ID_LEN: usize = 6;
const TOKEN_SECRET_LEN: usize = 16;

/// `<id>.<secret>` with a 6 character id and a 16 character secret
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BootstrapToken {
    pub id: String,
    pub secret: String,
}

impl BootstrapToken {
    pub fn random() -> Self {
        let id = Uuid::new_v4().simple().to_string();
        let secret = Uuid::new_v4().simple().to_string();
        Self {
            id: id[..TOKEN_ID_LEN].to_string(),
            secret: secret[..TOKEN_SECRET_LEN].to_string(),
        }
    }

    pub fn token(&self) -> String {
        format!("{}.{}", self.id, self.secret)
    }
}

#[derive(Debug, Default)]
pub struct BootstrapTokenAsset;

impl Asset for BootstrapTokenAsset {
    fn kind(&self) -> AssetKind {
        AssetKind::from_static(BOOTSTRAP_TOKEN)
    }

    fn name(&self) -> String {
        "Bootstrap Token".to_string()
    }

    fn generate(
        &self,
        _parents: &Parents,
        _ctx: &GenerateContext,
    ) -> Result<AssetContent, GenerateError> {
        let token = BootstrapToken::random();
        let file = AssetFile::new(TOKEN_FILE, format!("{}\n", token.token())).with_mode(0o600);
        Ok(AssetContent::from_data(&token)?.with_file(file))
    }

    fn is_transient(&self) -> bool {
        true
    }
}
