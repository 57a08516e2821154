//! Collision/trigger classification
//!
//! Colliders carry a [`ColliderKind`] resolved once when the level loads. The
//! physics step reports raw [`Contact`]s on two channels (solid collisions with
//! an impact speed, trigger overlaps without one); [`classify`] maps them to the
//! [`GameEvent`]s the core reacts to.

use serde::{Deserialize, Serialize};

/// Index of a collider within its level
pub type ColliderId = u32;

/// Index of a pickup within its level
pub type PickupId = u32;

/// Semantic category of a collider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ColliderKind {
    Ground,
    Wall,
    Pickup(PickupId),
    EndZone,
    FallPlane,
}

impl ColliderKind {
    /// Triggers report overlap only and never push the ball
    pub fn is_trigger(self) -> bool {
        matches!(
            self,
            ColliderKind::Pickup(_) | ColliderKind::EndZone | ColliderKind::FallPlane
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactPhase {
    Enter,
    Exit,
}

/// Raw physics callback
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Contact {
    /// Solid collision; `relative_speed` is the closing speed at first touch
    Collision {
        collider: ColliderId,
        kind: ColliderKind,
        phase: ContactPhase,
        relative_speed: f32,
    },
    /// Trigger volume overlap
    Trigger {
        collider: ColliderId,
        kind: ColliderKind,
        phase: ContactPhase,
    },
}

/// What the core reacts to
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GameEvent {
    GroundEnter(ColliderId),
    GroundExit(ColliderId),
    WallImpact { speed: f32 },
    PickupCollected(PickupId),
    EndZoneReached,
    OutOfBounds,
}

/// Map a raw contact to a game event, if it means anything
pub fn classify(contact: &Contact) -> Option<GameEvent> {
    match *contact {
        Contact::Collision {
            collider,
            kind,
            phase,
            relative_speed,
        } => match (kind, phase) {
            (ColliderKind::Ground, ContactPhase::Enter) => Some(GameEvent::GroundEnter(collider)),
            (ColliderKind::Ground, ContactPhase::Exit) => Some(GameEvent::GroundExit(collider)),
            (ColliderKind::Wall, ContactPhase::Enter) => Some(GameEvent::WallImpact {
                speed: relative_speed,
            }),
            _ => None,
        },
        Contact::Trigger { kind, phase, .. } => match (kind, phase) {
            (ColliderKind::Pickup(id), ContactPhase::Enter) => Some(GameEvent::PickupCollected(id)),
            (ColliderKind::EndZone, ContactPhase::Enter) => Some(GameEvent::EndZoneReached),
            (ColliderKind::FallPlane, ContactPhase::Enter) => Some(GameEvent::OutOfBounds),
            _ => None,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collision(kind: ColliderKind, phase: ContactPhase, speed: f32) -> Contact {
        Contact::Collision {
            collider: 7,
            kind,
            phase,
            relative_speed: speed,
        }
    }

    fn trigger(kind: ColliderKind, phase: ContactPhase) -> Contact {
        Contact::Trigger {
            collider: 3,
            kind,
            phase,
        }
    }

    #[test]
    fn test_solid_channel() {
        use ContactPhase::*;
        assert_eq!(
            classify(&collision(ColliderKind::Ground, Enter, 1.0)),
            Some(GameEvent::GroundEnter(7))
        );
        assert_eq!(
            classify(&collision(ColliderKind::Ground, Exit, 0.0)),
            Some(GameEvent::GroundExit(7))
        );
        assert_eq!(
            classify(&collision(ColliderKind::Wall, Enter, 4.5)),
            Some(GameEvent::WallImpact { speed: 4.5 })
        );
        assert_eq!(classify(&collision(ColliderKind::Wall, Exit, 0.0)), None);
    }

    #[test]
    fn test_trigger_channel() {
        use ContactPhase::*;
        assert_eq!(
            classify(&trigger(ColliderKind::Pickup(2), Enter)),
            Some(GameEvent::PickupCollected(2))
        );
        assert_eq!(
            classify(&trigger(ColliderKind::EndZone, Enter)),
            Some(GameEvent::EndZoneReached)
        );
        assert_eq!(
            classify(&trigger(ColliderKind::FallPlane, Enter)),
            Some(GameEvent::OutOfBounds)
        );
        assert_eq!(classify(&trigger(ColliderKind::EndZone, Exit)), None);
    }

    #[test]
    fn test_trigger_kinds() {
        assert!(ColliderKind::EndZone.is_trigger());
        assert!(ColliderKind::Pickup(0).is_trigger());
        assert!(!ColliderKind::Ground.is_trigger());
        assert!(!ColliderKind::Wall.is_trigger());
    }
}
