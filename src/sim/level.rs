//! Level layout and contact tracking
//!
//! A [`LevelDesc`] is plain data (JSON on disk). Loading it resolves every
//! collider tag into a typed [`ColliderKind`] once; after that the physics step
//! never looks at tags again.

use std::collections::BTreeSet;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::body::RigidBody;
use super::classify::{ColliderId, ColliderKind, Contact, ContactPhase, PickupId};
use super::collision::{Aabb, sphere_box_collision, sphere_box_overlap};
use crate::error::ConfigError;

/// Collider tag as authored in level data
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColliderTag {
    Ground,
    Wall,
    Pickup,
    EndZone,
    FallPlane,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColliderDesc {
    pub tag: ColliderTag,
    pub center: Vec3,
    pub half_extents: Vec3,
}

impl ColliderDesc {
    pub fn new(tag: ColliderTag, center: Vec3, half_extents: Vec3) -> Self {
        Self {
            tag,
            center,
            half_extents,
        }
    }
}

/// Authored level
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LevelDesc {
    pub name: String,
    /// Ball center at start
    pub spawn: Vec3,
    pub colliders: Vec<ColliderDesc>,
}

impl LevelDesc {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let desc: LevelDesc = serde_json::from_str(json)?;
        if desc.colliders.is_empty() {
            return Err(ConfigError::Invalid(format!("level '{}' has no colliders", desc.name)));
        }
        Ok(desc)
    }

    /// Small arena: floor, four walls, two pickups and an end zone
    pub fn demo() -> Self {
        use ColliderTag::*;
        let wall_h = Vec3::new(10.0, 1.0, 0.5);
        let wall_v = Vec3::new(0.5, 1.0, 10.0);
        Self {
            name: "Demo".into(),
            spawn: Vec3::new(0.0, 0.5, 0.0),
            colliders: vec![
                ColliderDesc::new(Ground, Vec3::new(0.0, -0.5, 0.0), Vec3::new(10.0, 0.5, 10.0)),
                ColliderDesc::new(Wall, Vec3::new(0.0, 1.0, 10.5), wall_h),
                ColliderDesc::new(Wall, Vec3::new(0.0, 1.0, -10.5), wall_h),
                ColliderDesc::new(Wall, Vec3::new(10.5, 1.0, 0.0), wall_v),
                ColliderDesc::new(Wall, Vec3::new(-10.5, 1.0, 0.0), wall_v),
                ColliderDesc::new(Pickup, Vec3::new(0.0, 0.5, 3.0), Vec3::splat(0.25)),
                ColliderDesc::new(Pickup, Vec3::new(0.0, 0.5, 6.0), Vec3::splat(0.25)),
                ColliderDesc::new(EndZone, Vec3::new(0.0, 0.5, 8.5), Vec3::new(2.0, 0.5, 0.5)),
                ColliderDesc::new(FallPlane, Vec3::new(0.0, -20.0, 0.0), Vec3::new(100.0, 1.0, 100.0)),
            ],
        }
    }
}

/// Resolved collider
#[derive(Debug, Clone)]
pub struct Collider {
    pub id: ColliderId,
    pub kind: ColliderKind,
    pub shape: Aabb,
}

/// Loaded level instance with live contact state
#[derive(Debug, Clone)]
pub struct Level {
    pub name: String,
    pub spawn: Vec3,
    pub colliders: Vec<Collider>,
    pickups_active: Vec<bool>,
    /// Solid colliders currently touching the ball
    touching: BTreeSet<ColliderId>,
    /// Trigger volumes currently overlapping the ball
    overlapping: BTreeSet<ColliderId>,
}

impl Level {
    pub fn load(desc: &LevelDesc) -> Self {
        let mut next_pickup: PickupId = 0;
        let colliders = desc
            .colliders
            .iter()
            .enumerate()
            .map(|(i, c)| {
                let kind = match c.tag {
                    ColliderTag::Ground => ColliderKind::Ground,
                    ColliderTag::Wall => ColliderKind::Wall,
                    ColliderTag::EndZone => ColliderKind::EndZone,
                    ColliderTag::FallPlane => ColliderKind::FallPlane,
                    ColliderTag::Pickup => {
                        let id = next_pickup;
                        next_pickup += 1;
                        ColliderKind::Pickup(id)
                    }
                };
                Collider {
                    id: i as ColliderId,
                    kind,
                    shape: Aabb::new(c.center, c.half_extents),
                }
            })
            .collect();

        Self {
            name: desc.name.clone(),
            spawn: desc.spawn,
            colliders,
            pickups_active: vec![true; next_pickup as usize],
            touching: BTreeSet::new(),
            overlapping: BTreeSet::new(),
        }
    }

    pub fn pickup_count(&self) -> usize {
        self.pickups_active.len()
    }

    pub fn is_pickup_active(&self, id: PickupId) -> bool {
        self.pickups_active.get(id as usize).copied().unwrap_or(false)
    }

    /// Deactivate a pickup; false if it was already gone
    pub fn collect(&mut self, id: PickupId) -> bool {
        match self.pickups_active.get_mut(id as usize) {
            Some(active) if *active => {
                *active = false;
                true
            }
            _ => false,
        }
    }

    /// Resolve the ball against the level and report contact changes
    ///
    /// Solid colliders push the ball out and report `Enter` on first touch
    /// (with the closing speed) and `Exit` when the touch ends. Triggers report
    /// `Enter`/`Exit` on overlap changes; collected pickups are skipped.
    pub fn step_contacts(
        &mut self,
        body: &mut RigidBody,
        skin: f32,
        restitution: f32,
    ) -> Vec<Contact> {
        let mut contacts = Vec::new();

        for collider in &self.colliders {
            let id = collider.id;
            let kind = collider.kind;

            if kind.is_trigger() {
                let active = match kind {
                    ColliderKind::Pickup(p) => self.is_pickup_active(p),
                    _ => true,
                };
                let inside =
                    active && sphere_box_overlap(body.position, body.radius, &collider.shape);
                let phase = match (inside, self.overlapping.contains(&id)) {
                    (true, false) => {
                        self.overlapping.insert(id);
                        Some(ContactPhase::Enter)
                    }
                    (false, true) => {
                        self.overlapping.remove(&id);
                        Some(ContactPhase::Exit)
                    }
                    _ => None,
                };
                if let Some(phase) = phase {
                    contacts.push(Contact::Trigger { collider: id, kind, phase });
                }
                continue;
            }

            let result = sphere_box_collision(body.position, body.radius, &collider.shape, skin);
            let was_touching = self.touching.contains(&id);
            if result.hit {
                let closing_speed = body.velocity.length();
                let bounce = if kind == ColliderKind::Wall { restitution } else { 0.0 };
                body.resolve_contact(result.normal, result.penetration, bounce);
                if kind == ColliderKind::Ground {
                    body.roll_on(result.normal);
                }
                if !was_touching {
                    self.touching.insert(id);
                    contacts.push(Contact::Collision {
                        collider: id,
                        kind,
                        phase: ContactPhase::Enter,
                        relative_speed: closing_speed,
                    });
                }
            } else if was_touching {
                self.touching.remove(&id);
                contacts.push(Contact::Collision {
                    collider: id,
                    kind,
                    phase: ContactPhase::Exit,
                    relative_speed: 0.0,
                });
            }
        }

        contacts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tags_resolved_once() {
        let level = Level::load(&LevelDesc::demo());
        let pickups: Vec<_> = level
            .colliders
            .iter()
            .filter_map(|c| match c.kind {
                ColliderKind::Pickup(id) => Some(id),
                _ => None,
            })
            .collect();
        assert_eq!(pickups, vec![0, 1]);
        assert_eq!(level.pickup_count(), 2);
    }

    #[test]
    fn test_collect_is_idempotent() {
        let mut level = Level::load(&LevelDesc::demo());
        assert!(level.collect(1));
        assert!(!level.collect(1));
        assert!(!level.is_pickup_active(1));
        assert!(!level.collect(99));
    }

    #[test]
    fn test_resting_ball_touches_ground_once() {
        let mut level = Level::load(&LevelDesc::demo());
        let mut body = RigidBody::new(level.spawn, 1.0, 0.5);

        let first = level.step_contacts(&mut body, 0.02, 0.0);
        assert!(matches!(
            first.as_slice(),
            [Contact::Collision { kind: ColliderKind::Ground, phase: ContactPhase::Enter, .. }]
        ));

        for _ in 0..10 {
            body.integrate(0.02, Vec3::new(0.0, -9.81, 0.0), 0.0);
            let contacts = level.step_contacts(&mut body, 0.02, 0.0);
            assert!(contacts.is_empty(), "unexpected {contacts:?}");
        }
        assert!((body.position.y - 0.5).abs() < 0.01);
    }

    #[test]
    fn test_trigger_enter_and_exit() {
        let mut level = Level::load(&LevelDesc::demo());
        let mut body = RigidBody::new(Vec3::new(0.0, 0.5, 8.5), 1.0, 0.5);
        let contacts = level.step_contacts(&mut body, 0.02, 0.0);
        assert!(contacts.iter().any(|c| matches!(
            c,
            Contact::Trigger { kind: ColliderKind::EndZone, phase: ContactPhase::Enter, .. }
        )));
        // Still inside: nothing new
        let contacts = level.step_contacts(&mut body, 0.02, 0.0);
        assert!(!contacts.iter().any(|c| matches!(c, Contact::Trigger { .. })));

        body.position = Vec3::new(0.0, 0.5, 0.0);
        let contacts = level.step_contacts(&mut body, 0.02, 0.0);
        assert!(contacts.iter().any(|c| matches!(
            c,
            Contact::Trigger { kind: ColliderKind::EndZone, phase: ContactPhase::Exit, .. }
        )));
    }

    #[test]
    fn test_level_json() {
        let json = r#"{
            "name": "Flat",
            "spawn": [0.0, 0.5, 0.0],
            "colliders": [
                { "tag": "ground", "center": [0.0, -0.5, 0.0], "half_extents": [5.0, 0.5, 5.0] },
                { "tag": "end_zone", "center": [0.0, 0.5, 4.0], "half_extents": [1.0, 0.5, 0.5] }
            ]
        }"#;
        let desc = LevelDesc::from_json(json).expect("valid level");
        let level = Level::load(&desc);
        assert_eq!(level.colliders[1].kind, ColliderKind::EndZone);

        let empty = r#"{ "name": "Empty", "spawn": [0.0, 0.0, 0.0], "colliders": [] }"#;
        assert!(matches!(LevelDesc::from_json(empty), Err(ConfigError::Invalid(_))));
    }
}
