//! Hand компоненты: два tracked controller'а

use bevy::prelude::*;

use crate::pointer::HandPointer;

#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Hash, Reflect)]
pub enum HandSide {
    Left,
    Right,
}

impl HandSide {
    pub fn as_str(&self) -> &'static str {
        match self {
            HandSide::Left => "left",
            HandSide::Right => "right",
        }
    }
}

/// Tracked hand controller
///
/// `Transform`: поза контроллера в world space, пишется хостом каждый кадр.
/// Инвариант: не больше одного attached item.
#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
#[require(Transform, HandInput, HandPointer)]
pub struct Hand {
    pub side: HandSide,
    pub attached: Option<Entity>,
}

impl Hand {
    pub fn new(side: HandSide) -> Self {
        Self { side, attached: None }
    }

    pub fn is_empty(&self) -> bool {
        self.attached.is_none()
    }
}

/// Raw input state of a hand (written by the host every frame)
///
/// Все поля это уровни (pressed/not pressed); фронты считает pointer controller.
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
pub struct HandInput {
    pub grip: bool,
    pub interact: bool,
    pub select: bool,
    /// Tracked linear velocity (world space, m/s)
    pub velocity: Vec3,
    /// Tracked angular velocity (world space, rad/s)
    pub angular_velocity: Vec3,
}
