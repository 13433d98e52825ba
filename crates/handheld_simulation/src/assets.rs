//! Asset availability for pooled equipment models.
//!
//! Модели ищутся сначала в primary folder, затем в backup folder.
//! `Unchecked` (default) принимает любое имя, host сам разбирается с загрузкой.

use bevy::prelude::*;
use std::collections::HashSet;

#[derive(Resource, Debug, Clone, Default)]
pub enum AssetManifest {
    #[default]
    Unchecked,
    Listed {
        primary_prefix: String,
        backup_prefix: String,
        /// Full paths known to exist
        available: HashSet<String>,
    },
}

impl AssetManifest {
    pub fn listed<'a>(primary_prefix: &str, backup_prefix: &str, available: impl IntoIterator<Item = &'a str>) -> Self {
        AssetManifest::Listed {
            primary_prefix: primary_prefix.to_string(),
            backup_prefix: backup_prefix.to_string(),
            available: available.into_iter().map(str::to_string).collect(),
        }
    }

    /// Full path of `asset`, or `None` if neither folder has it
    pub fn resolve(&self, asset: &str) -> Option<String> {
        match self {
            AssetManifest::Unchecked => Some(asset.to_string()),
            AssetManifest::Listed {
                primary_prefix,
                backup_prefix,
                available,
            } => [primary_prefix, backup_prefix]
                .into_iter()
                .map(|prefix| format!("{}/{}", prefix, asset))
                .find(|path| available.contains(path)),
        }
    }
}
