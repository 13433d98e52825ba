//! Ray queries
//!
//! Ray casting принадлежит host physics engine. Симуляция видит его только
//! через [`RayCaster`] в ресурсе [`PhysicsQueries`].
//!
//! [`ProxyRayCaster`] — backend на bounding boxes для headless прогонов:
//! статические boxes задаются явно, entity с [`RayProxy`] пересобираются
//! в snapshot каждый tick.

use bevy::math::bounding::{Aabb3d, BoundingVolume, RayCast3d};
use bevy::prelude::*;

use crate::components::{AttachState, EquipmentItem};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayQuery {
    pub origin: Vec3,
    pub direction: Dir3,
    pub max_distance: f32,
    /// Layer mask (hit only colliders whose layer intersects it)
    pub mask: u32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    pub entity: Entity,
    pub point: Vec3,
    pub normal: Vec3,
    pub distance: f32,
    pub layer: u32,
}

/// Physics ray backend
pub trait RayCaster: Send + Sync {
    /// Nearest hit along the ray, if any
    fn cast_ray(&self, query: &RayQuery) -> Option<RayHit>;

    /// Proxy backend access (snapshot refresh)
    fn as_proxy_mut(&mut self) -> Option<&mut ProxyRayCaster> {
        None
    }
}

/// Ray backend resource
///
/// Отсутствие ресурса = pointer и hit confirmation неактивны (логируется один раз).
#[derive(Resource)]
pub struct PhysicsQueries {
    backend: Box<dyn RayCaster>,
}

impl PhysicsQueries {
    pub fn new(backend: impl RayCaster + 'static) -> Self {
        Self {
            backend: Box::new(backend),
        }
    }

    pub fn proxy() -> Self {
        Self::new(ProxyRayCaster::default())
    }

    pub fn cast_ray(&self, query: &RayQuery) -> Option<RayHit> {
        self.backend.cast_ray(query)
    }

    pub fn proxy_mut(&mut self) -> Option<&mut ProxyRayCaster> {
        self.backend.as_proxy_mut()
    }
}

// ============================================================================
// Proxy backend
// ============================================================================

/// Axis-aligned ray proxy of an entity (centered on its translation)
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct RayProxy {
    pub half_extents: Vec3,
    pub layer: u32,
}

impl RayProxy {
    pub fn new(half_extents: Vec3, layer: u32) -> Self {
        Self { half_extents, layer }
    }
}

#[derive(Debug, Clone, Copy)]
struct ProxyShape {
    entity: Entity,
    bounds: Aabb3d,
    layer: u32,
    /// Пересобирается из `RayProxy` components
    tracked: bool,
}

#[derive(Debug, Default, Clone)]
pub struct ProxyRayCaster {
    shapes: Vec<ProxyShape>,
}

impl ProxyRayCaster {
    pub fn with_box(mut self, entity: Entity, center: Vec3, half_extents: Vec3, layer: u32) -> Self {
        self.insert(entity, center, half_extents, layer);
        self
    }

    /// Static box (level geometry, UI panels placed by the host)
    pub fn insert(&mut self, entity: Entity, center: Vec3, half_extents: Vec3, layer: u32) {
        self.shapes.push(ProxyShape {
            entity,
            bounds: Aabb3d::new(center, half_extents),
            layer,
            tracked: false,
        });
    }

    /// Replace every tracked box with a fresh snapshot
    pub fn sync_tracked(&mut self, proxies: impl IntoIterator<Item = (Entity, Vec3, RayProxy)>) {
        self.shapes.retain(|shape| !shape.tracked);
        self.shapes.extend(proxies.into_iter().map(|(entity, center, proxy)| ProxyShape {
            entity,
            bounds: Aabb3d::new(center, proxy.half_extents),
            layer: proxy.layer,
            tracked: true,
        }));
    }

    pub fn clear(&mut self) {
        self.shapes.clear();
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }
}

impl RayCaster for ProxyRayCaster {
    fn cast_ray(&self, query: &RayQuery) -> Option<RayHit> {
        let cast = RayCast3d::new(query.origin, query.direction, query.max_distance);

        self.shapes
            .iter()
            .filter(|shape| shape.layer & query.mask != 0)
            .filter_map(|shape| {
                let distance = cast.aabb_intersection_at(&shape.bounds)?;
                let point = query.origin + *query.direction * distance;
                Some(RayHit {
                    entity: shape.entity,
                    point,
                    normal: face_normal(&shape.bounds, point),
                    distance,
                    layer: shape.layer,
                })
            })
            .min_by(|a, b| a.distance.total_cmp(&b.distance))
    }

    fn as_proxy_mut(&mut self) -> Option<&mut ProxyRayCaster> {
        Some(self)
    }
}

/// Outward normal of the box face nearest to `point`
fn face_normal(bounds: &Aabb3d, point: Vec3) -> Vec3 {
    let center = Vec3::from(bounds.center());
    let half = Vec3::from(bounds.half_size()).max(Vec3::splat(f32::EPSILON));
    let local = (point - center) / half;
    let abs = local.abs();

    if abs.x >= abs.y && abs.x >= abs.z {
        Vec3::X * local.x.signum()
    } else if abs.y >= abs.z {
        Vec3::Y * local.y.signum()
    } else {
        Vec3::Z * local.z.signum()
    }
}

/// System: rebuild tracked proxies from `RayProxy` entities
///
/// Stowed equipment не участвует. No-op для engine-backed backend'ов.
pub fn refresh_ray_proxies(
    queries: Option<ResMut<PhysicsQueries>>,
    proxies: Query<(Entity, &Transform, &RayProxy, Option<&EquipmentItem>)>,
) {
    let Some(mut queries) = queries else {
        return;
    };
    let Some(proxy) = queries.proxy_mut() else {
        return;
    };

    proxy.sync_tracked(
        proxies
            .iter()
            .filter(|(_, _, _, item)| item.is_none_or(|item| item.state != AttachState::Stowed))
            .map(|(entity, transform, shape, _)| (entity, transform.translation, *shape)),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::layers::*;
    use approx::assert_relative_eq;

    fn query(origin: Vec3, direction: Vec3, mask: u32) -> RayQuery {
        RayQuery {
            origin,
            direction: Dir3::new(direction).expect("non-zero direction"),
            max_distance: 10.0,
            mask,
        }
    }

    #[test]
    fn test_nearest_hit_wins() {
        let near = Entity::from_raw(1);
        let far = Entity::from_raw(2);
        let caster = ProxyRayCaster::default()
            .with_box(far, Vec3::new(0.0, 0.0, -5.0), Vec3::splat(0.5), LAYER_WORLD)
            .with_box(near, Vec3::new(0.0, 0.0, -2.0), Vec3::splat(0.5), LAYER_WORLD);

        let hit = caster
            .cast_ray(&query(Vec3::ZERO, Vec3::NEG_Z, LAYER_WORLD))
            .expect("ray hits near box");

        assert_eq!(hit.entity, near);
        assert_relative_eq!(hit.distance, 1.5, epsilon = 1e-5);
        assert_relative_eq!(hit.normal.z, 1.0);
    }

    #[test]
    fn test_mask_filters_layers() {
        let ui = Entity::from_raw(1);
        let caster =
            ProxyRayCaster::default().with_box(ui, Vec3::new(0.0, 0.0, -2.0), Vec3::new(1.0, 1.0, 0.01), LAYER_UI);

        assert!(caster.cast_ray(&query(Vec3::ZERO, Vec3::NEG_Z, MASK_POINTER_WORLD)).is_none());
        assert!(caster.cast_ray(&query(Vec3::ZERO, Vec3::NEG_Z, MASK_POINTER_UI)).is_some());
    }

    #[test]
    fn test_sync_tracked_keeps_static_boxes() {
        let wall = Entity::from_raw(1);
        let sword = Entity::from_raw(2);
        let mut caster =
            ProxyRayCaster::default().with_box(wall, Vec3::new(0.0, 0.0, -5.0), Vec3::splat(0.5), LAYER_WORLD);

        caster.sync_tracked([(sword, Vec3::new(0.0, 0.0, -1.0), RayProxy::new(Vec3::splat(0.1), LAYER_EQUIPMENT))]);
        caster.sync_tracked([(sword, Vec3::new(0.0, 0.0, -2.0), RayProxy::new(Vec3::splat(0.1), LAYER_EQUIPMENT))]);

        assert_eq!(caster.len(), 2);
        let hit = caster
            .cast_ray(&query(Vec3::ZERO, Vec3::NEG_Z, MASK_POINTER_WORLD))
            .expect("sword in front of wall");
        assert_eq!(hit.entity, sword);
        assert_relative_eq!(hit.distance, 1.9, epsilon = 1e-5);
    }

    #[test]
    fn test_max_distance_respected() {
        let wall = Entity::from_raw(1);
        let caster =
            ProxyRayCaster::default().with_box(wall, Vec3::new(0.0, 0.0, -20.0), Vec3::splat(0.5), LAYER_WORLD);

        assert!(caster.cast_ray(&query(Vec3::ZERO, Vec3::NEG_Z, LAYER_WORLD)).is_none());
    }
}
