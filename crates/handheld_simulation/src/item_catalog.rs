//! Item catalog: static equipment definitions supplied by the host game.
//!
//! # Архитектура
//!
//! **KindDefinition** — blueprint одного вида снаряжения:
//! - Ключ пула (`EquipmentKind`), handedness, asset name, base strike damage
//! - Material zones (hard/soft sub-colliders) для impact audio
//! - Attachment policy (как предмет ведёт себя при pickup)
//!
//! **InventoryItem** — конкретный предмет из инвентаря (внешняя система):
//! - Stable `ItemUid`, шаблон (обычный kind или artifact), equip slot, материал
//!
//! **Artifacts** не имеют собственных моделей, они резолвятся в ближайший
//! обычный kind через таблицу `artifacts` и используют его пул.
//!
//! `ItemCatalog::default()`: hardcoded каталог (клинки, дробящее, луки, щиты).

use bevy::math::bounding::Aabb3d;
use bevy::prelude::*;
use std::collections::HashMap;

use crate::components::equipment::AttachmentPolicy;
use crate::components::hand::HandSide;
use crate::error::EquipError;
use crate::feedback::material::{MaterialZone, MaterialZones};

// ============================================================================
// Identifiers
// ============================================================================

/// Equipment kind (pool key)
///
/// # Examples
/// - "dagger"
/// - "long_bow"
/// - "tower_shield"
#[derive(Clone, Debug, PartialEq, Eq, Hash, Reflect)]
pub struct EquipmentKind(pub String);

impl From<&str> for EquipmentKind {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Stable identity of an inventory item (survives save/load on the host side)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Reflect)]
pub struct ItemUid(pub u64);

/// Artifact identifier (unique items without their own pooled model)
#[derive(Clone, Debug, PartialEq, Eq, Hash, Reflect)]
pub struct ArtifactId(pub String);

impl From<&str> for ArtifactId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl ArtifactId {
    /// Appearance of the artifact's pooled model (Daedric unless listed)
    pub fn material(&self) -> MaterialTag {
        match self.0.as_str() {
            "auriels_bow" | "auriels_shield" => MaterialTag::Elven,
            "chrysamere" => MaterialTag::Adamantium,
            "lords_mail" => MaterialTag::Mithril,
            "ebony_blade" | "ebony_mail" => MaterialTag::Ebony,
            "mehrunes_razor" => MaterialTag::Orcish,
            "volendrung" | "spell_breaker" => MaterialTag::Dwarven,
            _ => MaterialTag::Daedric,
        }
    }
}

// ============================================================================
// Classification
// ============================================================================

/// How an item occupies the hands
#[derive(Clone, Copy, Debug, PartialEq, Eq, Reflect)]
pub enum Handedness {
    /// One-handed weapon, can be dual wielded, pooled twice
    OneHanded,
    /// Two-handed weapon or bow
    TwoHanded,
    /// Shield: held in one hand, never duplicated
    OffHand,
}

impl Handedness {
    /// Pooled instances per kind
    pub fn pool_size(self) -> usize {
        match self {
            Handedness::OneHanded => 2,
            Handedness::TwoHanded | Handedness::OffHand => 1,
        }
    }
}

/// Inventory equip slot (only the hand slots matter here)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Reflect)]
pub enum EquipSlot {
    LeftHand,
    RightHand,
    /// Body armour, rings, amulets, ...
    Other,
}

impl EquipSlot {
    pub fn hand_side(self) -> Option<HandSide> {
        match self {
            EquipSlot::LeftHand => Some(HandSide::Left),
            EquipSlot::RightHand => Some(HandSide::Right),
            EquipSlot::Other => None,
        }
    }
}

/// Material/appearance tag of an inventory item
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Reflect)]
pub enum MaterialTag {
    #[default]
    None,
    Leather,
    Chain,
    Iron,
    Steel,
    Silver,
    Elven,
    Dwarven,
    Mithril,
    Adamantium,
    Ebony,
    Orcish,
    Daedric,
}

impl MaterialTag {
    /// Linear RGB tint for the item's metal mesh
    pub fn tint(self) -> [f32; 3] {
        match self {
            MaterialTag::None => [1.0, 1.0, 1.0],
            MaterialTag::Leather => [0.667, 0.667, 0.0],
            MaterialTag::Chain | MaterialTag::Iron | MaterialTag::Steel => [0.5, 0.5, 0.5],
            MaterialTag::Silver | MaterialTag::Elven => [1.0, 1.0, 1.0],
            MaterialTag::Dwarven => [0.5, 0.5, 0.0],
            MaterialTag::Mithril => [0.0, 1.0, 1.0],
            MaterialTag::Adamantium => [0.0, 1.0, 0.0],
            MaterialTag::Ebony => [0.333, 0.333, 0.333],
            MaterialTag::Orcish => [0.5, 0.5, 0.167],
            MaterialTag::Daedric => [0.5, 0.0, 0.0],
        }
    }
}

// ============================================================================
// InventoryItem (runtime, external)
// ============================================================================

/// Template of an inventory item
#[derive(Clone, Debug, PartialEq, Eq, Reflect)]
pub enum ItemTemplate {
    /// Ordinary item, its kind is the pool key directly
    Kind(EquipmentKind),
    /// Unique artifact, pooled through its ordinary equivalent
    Artifact(ArtifactId),
}

/// Inventory item as reported by the host's equip events
#[derive(Clone, Debug, PartialEq, Reflect)]
pub struct InventoryItem {
    pub uid: ItemUid,
    pub name: String,
    pub template: ItemTemplate,
    pub equip_slot: EquipSlot,
    pub material: MaterialTag,
}

impl InventoryItem {
    /// Ordinary item in a hand slot
    pub fn new(uid: u64, kind: impl Into<EquipmentKind>, equip_slot: EquipSlot) -> Self {
        let kind = kind.into();
        Self {
            uid: ItemUid(uid),
            name: kind.0.clone(),
            template: ItemTemplate::Kind(kind),
            equip_slot,
            material: MaterialTag::None,
        }
    }

    /// Artifact in a hand slot
    pub fn artifact(uid: u64, artifact: impl Into<ArtifactId>, equip_slot: EquipSlot) -> Self {
        let artifact = artifact.into();
        Self {
            uid: ItemUid(uid),
            name: artifact.0.clone(),
            material: artifact.material(),
            template: ItemTemplate::Artifact(artifact),
            equip_slot,
        }
    }

    pub fn with_material(mut self, material: MaterialTag) -> Self {
        self.material = material;
        self
    }
}

// ============================================================================
// KindDefinition (static)
// ============================================================================

/// Static definition of one equipment kind
#[derive(Clone, Debug)]
pub struct KindDefinition {
    pub kind: EquipmentKind,
    pub name: String,
    pub handedness: Handedness,
    /// Visual asset name; `None` = kind has no model and is never pooled
    pub asset: Option<String>,
    /// Damage of a qualifying strike (before any host-side modifiers)
    pub base_damage: u32,
    /// Mass (kg) used to turn inherited hand velocity into a throw impulse
    pub mass: f32,
    pub zones: MaterialZones,
    pub policy: AttachmentPolicy,
}

impl KindDefinition {
    /// Bladed/blunt weapon: hard head/blade in front of a soft grip
    pub fn weapon(id: &str, name: &str, handedness: Handedness, reach: f32, base_damage: u32, mass: f32) -> Self {
        Self {
            kind: EquipmentKind::from(id),
            name: name.to_string(),
            handedness,
            asset: Some(name.replace(' ', "_")),
            base_damage,
            mass,
            zones: MaterialZones::blade_and_grip(reach),
            policy: AttachmentPolicy::default(),
        }
    }

    /// Wooden weapon (staff, bows): soft zone only
    pub fn wooden(id: &str, name: &str, handedness: Handedness, reach: f32, base_damage: u32, mass: f32) -> Self {
        let half = reach * 0.5;
        Self {
            zones: MaterialZones::new().with_zone(
                "shaft",
                MaterialZone::Soft,
                Aabb3d::new(Vec3::new(0.0, 0.0, -half + 0.1), Vec3::new(0.03, 0.03, half)),
            ),
            ..Self::weapon(id, name, handedness, reach, base_damage, mass)
        }
    }

    /// Shield: hard plate
    pub fn shield(id: &str, name: &str, radius: f32, mass: f32) -> Self {
        Self {
            kind: EquipmentKind::from(id),
            name: name.to_string(),
            handedness: Handedness::OffHand,
            asset: Some(name.replace(' ', "_")),
            base_damage: 1,
            mass,
            zones: MaterialZones::new().with_zone(
                "plate",
                MaterialZone::Hard,
                Aabb3d::new(Vec3::ZERO, Vec3::new(radius, radius, 0.04)),
            ),
            policy: AttachmentPolicy::default(),
        }
    }

    pub fn with_asset(mut self, asset: Option<&str>) -> Self {
        self.asset = asset.map(str::to_string);
        self
    }

    pub fn with_policy(mut self, policy: AttachmentPolicy) -> Self {
        self.policy = policy;
        self
    }
}

// ============================================================================
// ItemCatalog resource
// ============================================================================

/// Equipment catalog (kinds + artifact equivalence table)
#[derive(Resource, Clone, Debug)]
pub struct ItemCatalog {
    kinds: Vec<KindDefinition>,
    artifacts: HashMap<ArtifactId, EquipmentKind>,
}

impl ItemCatalog {
    /// Empty catalog (hosts that build everything themselves)
    pub fn empty() -> Self {
        Self {
            kinds: Vec::new(),
            artifacts: HashMap::new(),
        }
    }

    pub fn with_kind(mut self, definition: KindDefinition) -> Self {
        self.kinds.retain(|k| k.kind != definition.kind);
        self.kinds.push(definition);
        self
    }

    pub fn with_artifact(mut self, artifact: &str, kind: &str) -> Self {
        self.artifacts.insert(ArtifactId::from(artifact), EquipmentKind::from(kind));
        self
    }

    /// Kinds in definition order (pool initialization order)
    pub fn kinds(&self) -> &[KindDefinition] {
        &self.kinds
    }

    pub fn get(&self, kind: &EquipmentKind) -> Option<&KindDefinition> {
        self.kinds.iter().find(|k| &k.kind == kind)
    }

    /// Ordinary equivalent of an artifact
    pub fn artifact_equivalent(&self, artifact: &ArtifactId) -> Option<&EquipmentKind> {
        self.artifacts.get(artifact)
    }

    /// Resolve the pool key for an inventory item.
    ///
    /// # Errors
    /// - `NotHandHeld` — item is not in a hand slot
    /// - `UnmappedKind` — artifact without an ordinary equivalent
    pub fn resolve_kind(&self, item: &InventoryItem) -> Result<EquipmentKind, EquipError> {
        if item.equip_slot.hand_side().is_none() {
            return Err(EquipError::NotHandHeld { uid: item.uid });
        }

        match &item.template {
            ItemTemplate::Kind(kind) => Ok(kind.clone()),
            ItemTemplate::Artifact(artifact) => self
                .artifact_equivalent(artifact)
                .cloned()
                .ok_or(EquipError::UnmappedKind { uid: item.uid }),
        }
    }
}

impl Default for ItemCatalog {
    fn default() -> Self {
        use Handedness::*;

        Self::empty()
            // === Blades ===
            .with_kind(KindDefinition::weapon("dagger", "Dagger", OneHanded, 0.25, 3, 0.4))
            .with_kind(KindDefinition::weapon("tanto", "Tanto", OneHanded, 0.28, 3, 0.4))
            .with_kind(KindDefinition::weapon("shortsword", "Shortsword", OneHanded, 0.55, 5, 1.0))
            .with_kind(KindDefinition::weapon("wakazashi", "Wakazashi", OneHanded, 0.5, 5, 0.9))
            .with_kind(KindDefinition::weapon("broadsword", "Broadsword", OneHanded, 0.8, 6, 1.4))
            .with_kind(KindDefinition::weapon("saber", "Saber", OneHanded, 0.8, 6, 1.2))
            .with_kind(KindDefinition::weapon("longsword", "Longsword", OneHanded, 0.9, 7, 1.5))
            .with_kind(KindDefinition::weapon("katana", "Katana", OneHanded, 0.85, 8, 1.2))
            .with_kind(KindDefinition::weapon("dai_katana", "Dai Katana", TwoHanded, 1.1, 10, 2.0))
            .with_kind(KindDefinition::weapon("claymore", "Claymore", TwoHanded, 1.3, 9, 2.5))
            // === Blunt / axes ===
            .with_kind(KindDefinition::weapon("mace", "Mace", OneHanded, 0.6, 6, 1.8))
            .with_kind(KindDefinition::weapon("flail", "Flail", TwoHanded, 0.7, 7, 2.2))
            .with_kind(KindDefinition::weapon("warhammer", "Warhammer", TwoHanded, 0.9, 9, 3.0))
            .with_kind(KindDefinition::weapon("battle_axe", "Battle Axe", OneHanded, 0.7, 7, 2.0))
            .with_kind(KindDefinition::weapon("war_axe", "War Axe", TwoHanded, 1.0, 9, 3.0))
            // === Wood ===
            .with_kind(KindDefinition::wooden("staff", "Staff", TwoHanded, 1.8, 4, 1.5))
            .with_kind(KindDefinition::wooden("short_bow", "Short Bow", TwoHanded, 1.0, 2, 0.8))
            .with_kind(KindDefinition::wooden("long_bow", "Long Bow", TwoHanded, 1.5, 2, 1.1))
            // === Shields ===
            .with_kind(KindDefinition::shield("buckler", "Buckler", 0.2, 2.0))
            .with_kind(KindDefinition::shield("round_shield", "Round Shield", 0.3, 3.5))
            .with_kind(KindDefinition::shield("kite_shield", "Kite Shield", 0.35, 4.5))
            .with_kind(KindDefinition::shield("tower_shield", "Tower Shield", 0.5, 7.0))
            // === Artifacts → ordinary equivalents ===
            .with_artifact("mehrunes_razor", "dagger")
            .with_artifact("mace_of_molag_bal", "mace")
            .with_artifact("wabbajack", "staff")
            .with_artifact("skull_of_corruption", "staff")
            .with_artifact("staff_of_magnus", "staff")
            .with_artifact("volendrung", "warhammer")
            .with_artifact("auriels_bow", "long_bow")
            .with_artifact("chrysamere", "claymore")
            .with_artifact("ebony_blade", "katana")
            .with_artifact("lords_mail", "cuirass")
            .with_artifact("ebony_mail", "cuirass")
            .with_artifact("auriels_shield", "tower_shield")
            .with_artifact("spell_breaker", "tower_shield")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pool_size_by_handedness() {
        assert_eq!(Handedness::OneHanded.pool_size(), 2);
        assert_eq!(Handedness::TwoHanded.pool_size(), 1);
        assert_eq!(Handedness::OffHand.pool_size(), 1);
    }

    #[test]
    fn test_resolve_ordinary_kind() {
        let catalog = ItemCatalog::default();
        let item = InventoryItem::new(1, "longsword", EquipSlot::RightHand);

        assert_eq!(catalog.resolve_kind(&item), Ok(EquipmentKind::from("longsword")));
    }

    #[test]
    fn test_resolve_artifact_to_equivalent() {
        let catalog = ItemCatalog::default();
        let razor = InventoryItem::artifact(7, "mehrunes_razor", EquipSlot::LeftHand);
        let shield = InventoryItem::artifact(8, "spell_breaker", EquipSlot::LeftHand);

        assert_eq!(catalog.resolve_kind(&razor), Ok(EquipmentKind::from("dagger")));
        assert_eq!(catalog.resolve_kind(&shield), Ok(EquipmentKind::from("tower_shield")));
    }

    #[test]
    fn test_artifact_material_tints() {
        let material = |id: &str| InventoryItem::artifact(1, id, EquipSlot::RightHand).material;

        assert_eq!(material("auriels_bow"), MaterialTag::Elven);
        assert_eq!(material("chrysamere"), MaterialTag::Adamantium);
        assert_eq!(material("volendrung"), MaterialTag::Dwarven);
        assert_eq!(material("spell_breaker"), MaterialTag::Dwarven);
        assert_eq!(material("mehrunes_razor"), MaterialTag::Orcish);
        assert_eq!(material("ebony_blade"), MaterialTag::Ebony);
        assert_eq!(material("wabbajack"), MaterialTag::Daedric);
        assert_ne!(MaterialTag::Elven.tint(), MaterialTag::Daedric.tint());
    }

    #[test]
    fn test_unknown_artifact_is_unmapped() {
        let catalog = ItemCatalog::default();
        let ring = InventoryItem::artifact(9, "ring_of_namira", EquipSlot::RightHand);

        assert_eq!(
            catalog.resolve_kind(&ring),
            Err(EquipError::UnmappedKind { uid: ItemUid(9) })
        );
    }

    #[test]
    fn test_non_hand_slot_rejected() {
        let catalog = ItemCatalog::default();
        let mail = InventoryItem::artifact(10, "lords_mail", EquipSlot::Other);

        assert_eq!(
            catalog.resolve_kind(&mail),
            Err(EquipError::NotHandHeld { uid: ItemUid(10) })
        );
    }

    #[test]
    fn test_with_kind_replaces_existing_definition() {
        let catalog = ItemCatalog::default()
            .with_kind(KindDefinition::weapon("dagger", "Dagger", Handedness::TwoHanded, 0.3, 4, 0.5));

        let dagger = catalog.get(&EquipmentKind::from("dagger")).expect("dagger defined");
        assert_eq!(dagger.handedness, Handedness::TwoHanded);
        assert_eq!(catalog.kinds().iter().filter(|k| k.kind.0 == "dagger").count(), 1);
    }

    #[test]
    fn test_default_catalog_shapes() {
        let catalog = ItemCatalog::default();
        let staff = catalog.get(&EquipmentKind::from("staff")).expect("staff defined");
        let mace = catalog.get(&EquipmentKind::from("mace")).expect("mace defined");

        assert!(staff.zones.has(MaterialZone::Soft));
        assert!(!staff.zones.has(MaterialZone::Hard));
        assert!(mace.zones.has(MaterialZone::Hard));
        assert!(mace.zones.has(MaterialZone::Soft));
    }
}
