//! Physics boundary: collision layers, ray queries, physics-tick bookkeeping
//!
//! Broad/narrow phase и solver у host engine. Здесь только то, что
//! симуляция у него спрашивает (rays) и что сама ведёт (frame counter,
//! pre-contact velocity samples).

pub mod frame;
pub mod layers;
pub mod ray;

pub use frame::{advance_physics_frame, sample_strike_velocities, PhysicsFrame};
pub use layers::*;
pub use ray::{refresh_ray_proxies, PhysicsQueries, ProxyRayCaster, RayCaster, RayHit, RayProxy, RayQuery};
