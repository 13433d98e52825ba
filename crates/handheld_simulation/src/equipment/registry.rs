//! Equipment registry: pool of pre-spawned instances keyed by kind
//!
//! # Architecture
//!
//! - Free-list per kind: `PoolSlot { entity, bound }`, idle ⇔ `bound == None`
//! - Lookup: сначала по kind, затем по bound identity
//! - `equipped` — глобальное множество bound instances
//!
//! Инвариант: equipped instances одного kind ≤ pooled count (pool не растёт
//! после `initialize`).

use bevy::prelude::*;
use std::collections::{HashMap, HashSet};

use crate::assets::AssetManifest;
use crate::error::EquipError;
use crate::item_catalog::{EquipmentKind, InventoryItem, ItemCatalog, ItemUid, KindDefinition};
use crate::logger::{log, log_once, LogLevel};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolSlot {
    pub entity: Entity,
    pub bound: Option<ItemUid>,
}

impl PoolSlot {
    pub fn is_idle(&self) -> bool {
        self.bound.is_none()
    }
}

#[derive(Resource, Debug, Default)]
pub struct EquipmentRegistry {
    pools: HashMap<EquipmentKind, Vec<PoolSlot>>,
    equipped: HashSet<Entity>,
    /// Kinds без модели (asset не найден): equip для них невозможен
    disabled: HashSet<EquipmentKind>,
    initialized: bool,
}

impl EquipmentRegistry {
    /// Pre-spawn pooled instances for every catalog kind.
    ///
    /// `spawn(definition, asset_path)` создаёт entity одного instance.
    /// Kind без asset'а (или с не найденным asset'ом) логируется и остаётся
    /// unequippable; остальные kinds инициализируются как обычно.
    ///
    /// Повторный вызов = no-op. Returns number of spawned instances.
    pub fn initialize(
        &mut self,
        catalog: &ItemCatalog,
        assets: &AssetManifest,
        mut spawn: impl FnMut(&KindDefinition, &str) -> Entity,
    ) -> usize {
        if self.initialized {
            return 0;
        }
        self.initialized = true;

        let mut spawned = 0;
        for definition in catalog.kinds() {
            let resolved = definition.asset.as_deref().and_then(|asset| assets.resolve(asset));
            let Some(path) = resolved else {
                log_once(
                    &format!("equipment/missing-asset/{}", definition.kind.0),
                    LogLevel::Error,
                    &format!(
                        "❌ Equipment asset {:?} for kind '{}' not found, kind disabled",
                        definition.asset, definition.kind.0
                    ),
                );
                self.disabled.insert(definition.kind.clone());
                continue;
            };

            let slots = (0..definition.handedness.pool_size())
                .map(|_| PoolSlot {
                    entity: spawn(definition, &path),
                    bound: None,
                })
                .collect::<Vec<_>>();

            spawned += slots.len();
            self.pools.insert(definition.kind.clone(), slots);
        }

        log(&format!(
            "✅ Equipment pool initialized: {} instances, {} kinds ({} disabled)",
            spawned,
            self.pools.len(),
            self.disabled.len()
        ));
        spawned
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Resolve kind + claim the first idle instance
    pub fn equip(&mut self, catalog: &ItemCatalog, item: &InventoryItem) -> Result<Entity, EquipError> {
        let kind = catalog.resolve_kind(item)?;
        self.claim(&kind, item.uid)
    }

    /// Resolve kind + release the instance bound to the item
    pub fn unequip(&mut self, catalog: &ItemCatalog, item: &InventoryItem) -> Result<Entity, EquipError> {
        let kind = catalog.resolve_kind(item)?;
        self.release(&kind, item.uid)
    }

    /// Bind the first idle instance of `kind` to `uid`
    pub fn claim(&mut self, kind: &EquipmentKind, uid: ItemUid) -> Result<Entity, EquipError> {
        if self.bound_instance(uid).is_some() {
            return Err(EquipError::AlreadyBound { uid });
        }

        let Some(slots) = self.pools.get_mut(kind) else {
            return Err(EquipError::NoPool { kind: kind.clone() });
        };

        let pooled = slots.len();
        let Some(slot) = slots.iter_mut().find(|slot| slot.is_idle()) else {
            return Err(EquipError::PoolExhausted {
                kind: kind.clone(),
                pooled,
            });
        };

        slot.bound = Some(uid);
        self.equipped.insert(slot.entity);
        Ok(slot.entity)
    }

    /// Return the instance bound to `uid` to idle
    pub fn release(&mut self, kind: &EquipmentKind, uid: ItemUid) -> Result<Entity, EquipError> {
        let Some(slots) = self.pools.get_mut(kind) else {
            return Err(EquipError::NoPool { kind: kind.clone() });
        };

        let Some(slot) = slots.iter_mut().find(|slot| slot.bound == Some(uid)) else {
            return Err(EquipError::NotEquipped {
                uid,
                kind: kind.clone(),
            });
        };

        slot.bound = None;
        self.equipped.remove(&slot.entity);
        Ok(slot.entity)
    }

    /// Instance currently bound to `uid`
    pub fn bound_instance(&self, uid: ItemUid) -> Option<Entity> {
        self.pools
            .values()
            .flatten()
            .find(|slot| slot.bound == Some(uid))
            .map(|slot| slot.entity)
    }

    pub fn pooled_count(&self, kind: &EquipmentKind) -> usize {
        self.pools.get(kind).map_or(0, Vec::len)
    }

    pub fn idle_count(&self, kind: &EquipmentKind) -> usize {
        self.pools
            .get(kind)
            .map_or(0, |slots| slots.iter().filter(|slot| slot.is_idle()).count())
    }

    pub fn equipped_count(&self) -> usize {
        self.equipped.len()
    }

    pub fn is_equipped(&self, entity: Entity) -> bool {
        self.equipped.contains(&entity)
    }

    pub fn is_disabled(&self, kind: &EquipmentKind) -> bool {
        self.disabled.contains(kind)
    }

    /// Pooled instances of `kind` (pool order)
    pub fn instances(&self, kind: &EquipmentKind) -> impl Iterator<Item = Entity> + '_ {
        self.pools.get(kind).into_iter().flatten().map(|slot| slot.entity)
    }
}
