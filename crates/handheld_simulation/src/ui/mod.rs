//! UI window tracking и global pause
//!
//! # Flow
//! 1. Host UI шлёт `WindowCountChanged { count }`
//! 2. `UiPauseState` обновляется (pause ⇔ хотя бы одно окно открыто)
//! 3. 0 → N: floating panel ставится перед head camera (`UiPanelPlaced`)
//! 4. N → 0: `UiPanelHidden`
//!
//! Pointer controller читает `UiPauseState` и переключается в `UI` mode.

use bevy::prelude::*;

use crate::components::HeadCamera;
use crate::config::HandheldConfig;
use crate::{log, log_once, HandheldSet, LogLevel};

#[derive(Resource, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UiPauseState {
    pub window_count: u32,
    /// Pause set by the host (menus outside the window stack, cutscenes)
    pub host_paused: bool,
}

impl UiPauseState {
    pub fn is_paused(&self) -> bool {
        self.host_paused || self.window_count > 0
    }
}

#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowCountChanged {
    pub count: u32,
}

/// Floating panel pose (world space), facing the head camera
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct UiPanelPlaced {
    pub transform: Transform,
}

#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct UiPanelHidden;

/// System: apply window count changes
pub fn track_window_count(
    mut events: EventReader<WindowCountChanged>,
    mut placed_events: EventWriter<UiPanelPlaced>,
    mut hidden_events: EventWriter<UiPanelHidden>,
    mut pause: ResMut<UiPauseState>,
    config: Res<HandheldConfig>,
    cameras: Query<&Transform, With<HeadCamera>>,
) {
    for event in events.read() {
        let previous = pause.window_count;
        pause.window_count = event.count;

        if previous == 0 && event.count > 0 {
            log(&format!("🪟 UI opened ({} windows), simulation paused", event.count));

            let Some(camera) = cameras.iter().next() else {
                log_once(
                    "ui/missing-head-camera",
                    LogLevel::Warning,
                    "⚠️ No HeadCamera: floating UI panel cannot be placed",
                );
                continue;
            };

            placed_events.write(UiPanelPlaced {
                transform: panel_pose(camera, config.ui.panel_distance),
            });
        } else if previous > 0 && event.count == 0 {
            log("🪟 UI closed, simulation resumed");
            hidden_events.write(UiPanelHidden);
        }
    }
}

/// Pose `distance` metres in front of the camera, facing back at it
pub fn panel_pose(camera: &Transform, distance: f32) -> Transform {
    let position = camera.translation + *camera.forward() * distance;
    Transform::from_translation(position).looking_at(camera.translation, Vec3::Y)
}

pub struct UiPlugin;

impl Plugin for UiPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<UiPauseState>()
            .add_event::<WindowCountChanged>()
            .add_event::<UiPanelPlaced>()
            .add_event::<UiPanelHidden>()
            .add_systems(Update, track_window_count.in_set(HandheldSet::Ui));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_pause_follows_window_count() {
        assert!(!UiPauseState::default().is_paused());
        assert!(UiPauseState { window_count: 2, host_paused: false }.is_paused());
        assert!(UiPauseState { window_count: 0, host_paused: true }.is_paused());
    }

    #[test]
    fn test_panel_in_front_of_camera() {
        let camera = Transform::from_xyz(0.0, 1.6, 0.0);

        let panel = panel_pose(&camera, 3.0);

        assert_relative_eq!(panel.translation.z, -3.0, epsilon = 1e-5);
        assert_relative_eq!(panel.translation.y, 1.6, epsilon = 1e-5);
        // Панель смотрит на камеру (+Z)
        assert_relative_eq!(panel.forward().z, 1.0, epsilon = 1e-5);
    }
}
