//! Target classification: "что я ударил"
//!
//! Вычисляется один раз на Impact Event, до применения эффекта.

use crate::components::{ActionTrigger, Door, Health};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetClass {
    Damageable { invulnerable: bool, alive: bool },
    Openable { will_be_bashed: bool },
    Activatable { enabled: bool },
    Inert,
}

impl TargetClass {
    /// Door > creature > trigger (дверь со здоровьем всё равно дверь)
    pub fn classify(health: Option<&Health>, invulnerable: bool, door: Option<&Door>, trigger: Option<&ActionTrigger>) -> Self {
        if let Some(door) = door {
            return TargetClass::Openable {
                will_be_bashed: door.will_be_bashed(),
            };
        }
        if let Some(health) = health {
            return TargetClass::Damageable {
                invulnerable,
                alive: health.is_alive(),
            };
        }
        if let Some(trigger) = trigger {
            return TargetClass::Activatable {
                enabled: trigger.enabled,
            };
        }
        TargetClass::Inert
    }

    /// Strike against this target changes game state
    pub fn will_change_state(&self) -> bool {
        match *self {
            TargetClass::Damageable { invulnerable, alive } => alive && !invulnerable,
            TargetClass::Openable { will_be_bashed } => will_be_bashed,
            TargetClass::Activatable { enabled } => enabled,
            TargetClass::Inert => false,
        }
    }

    /// Damageable target that shrugs the hit off
    pub fn is_no_damage(&self) -> bool {
        matches!(self, TargetClass::Damageable { invulnerable: true, .. })
    }
}
