//! Impact audio pools

use bevy::prelude::*;
use rand::Rng;

use crate::feedback::material::MaterialZone;

/// Clip pools, выбор случайный (через `DeterministicRng`)
#[derive(Resource, Debug, Clone)]
pub struct ImpactAudio {
    pub hard: Vec<String>,
    pub soft: Vec<String>,
    /// Удар по неуязвимой цели
    pub no_damage: Vec<String>,
}

impl Default for ImpactAudio {
    fn default() -> Self {
        Self {
            hard: numbered("impact_hard", 4),
            soft: numbered("impact_soft", 3),
            no_damage: numbered("impact_parry", 2),
        }
    }
}

fn numbered(prefix: &str, count: usize) -> Vec<String> {
    (1..=count).map(|i| format!("{}_{:02}", prefix, i)).collect()
}

impl ImpactAudio {
    pub fn pool(&self, zone: MaterialZone) -> &[String] {
        match zone {
            MaterialZone::Hard => &self.hard,
            MaterialZone::Soft => &self.soft,
        }
    }

    pub fn pick_material(&self, zone: MaterialZone, rng: &mut impl Rng) -> Option<&str> {
        pick(self.pool(zone), rng)
    }

    pub fn pick_no_damage(&self, rng: &mut impl Rng) -> Option<&str> {
        pick(&self.no_damage, rng)
    }
}

fn pick<'a>(pool: &'a [String], rng: &mut impl Rng) -> Option<&'a str> {
    if pool.is_empty() {
        return None;
    }
    Some(pool[rng.gen_range(0..pool.len())].as_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_pick_from_matching_pool() {
        let audio = ImpactAudio::default();
        let mut rng = ChaCha8Rng::seed_from_u64(7);

        for _ in 0..20 {
            let clip = audio.pick_material(MaterialZone::Soft, &mut rng).expect("soft pool not empty");
            assert!(clip.starts_with("impact_soft_"));
        }
    }

    #[test]
    fn test_empty_pool_picks_nothing() {
        let audio = ImpactAudio {
            hard: Vec::new(),
            ..default()
        };
        let mut rng = ChaCha8Rng::seed_from_u64(7);

        assert_eq!(audio.pick_material(MaterialZone::Hard, &mut rng), None);
    }
}
