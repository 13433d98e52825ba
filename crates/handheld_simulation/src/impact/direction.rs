//! Strike direction bucketing
//!
//! Contact-point velocity в пространстве камеры → один из шести
//! дискретных animation states. Угол в плоскости экрана (x = right, y = up):
//!
//! ```text
//!            Up (22.5°..157.5°)
//!   Left ─────────┼───────── Right (−22.5°..22.5°)
//!   DownLeft    Down    DownRight
//! ```
//!
//! Шесть направлений на окружности не равномерны (нет up-left/up-right),
//! поэтому секторы не по 60°: они зеркально симметричны относительно
//! вертикали. Down, DownLeft, DownRight, Left и Right по 45°, Up забирает
//! обе верхние диагонали (135°).

use bevy::prelude::*;

/// Скорость ниже этой: направление не определено
const MIN_DIRECTION_SPEED: f32 = 1e-3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Reflect)]
pub enum StrikeDirection {
    Down,
    DownLeft,
    DownRight,
    Up,
    Left,
    Right,
}

impl StrikeDirection {
    /// Bucket a camera-space velocity
    pub fn from_camera_velocity(velocity: Vec3) -> Option<Self> {
        let screen = Vec2::new(velocity.x, velocity.y);
        if screen.length() < MIN_DIRECTION_SPEED {
            return None;
        }

        let degrees = screen.y.atan2(screen.x).to_degrees().rem_euclid(360.0);

        Some(match degrees {
            d if d < 22.5 => StrikeDirection::Right,
            d if d < 157.5 => StrikeDirection::Up,
            d if d < 202.5 => StrikeDirection::Left,
            d if d < 247.5 => StrikeDirection::DownLeft,
            d if d < 292.5 => StrikeDirection::Down,
            d if d < 337.5 => StrikeDirection::DownRight,
            _ => StrikeDirection::Right,
        })
    }

    /// Bucket a world-space velocity as seen from `camera`
    pub fn from_world_velocity(velocity: Vec3, camera: &Transform) -> Option<Self> {
        Self::from_camera_velocity(camera.rotation.inverse() * velocity)
    }
}
