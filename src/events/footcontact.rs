//! Foot sensor contact notifications.
//!
//! The physics system triggers one [`FootContactEvent`] per begin/end of a
//! contact involving a [`FixtureTag::FootSensor`](crate::physics::FixtureTag)
//! fixture. [`observe_foot_contact`] keeps the owner's [`Character`] ground
//! contact list in sync with them.
use bevy_ecs::observer::On;
use bevy_ecs::prelude::*;

use crate::components::character::Character;
use crate::physics::{ContactId, ContactPhase};

/// A foot sensor owned by `owner` began or ended touching something.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct FootContactEvent {
    pub owner: Entity,
    pub contact: ContactId,
    pub phase: ContactPhase,
}

/// Global observer applying foot contacts to the owning [`Character`].
///
/// Events for owners that no longer exist, or no longer have a
/// [`Character`], are dropped.
pub fn observe_foot_contact(
    trigger: On<FootContactEvent>,
    mut characters: Query<&mut Character>,
) {
    let event = *trigger.event();
    let Ok(mut character) = characters.get_mut(event.owner) else {
        log::trace!(
            "contact {:?} for missing character {}",
            event.contact,
            event.owner
        );
        return;
    };
    match event.phase {
        ContactPhase::Begin => {
            character.begin_foot_contact(event.contact);
            log::trace!(
                "foot contact {:?} began on {} ({} live)",
                event.contact,
                event.owner,
                character.foot_contacts_count()
            );
        }
        ContactPhase::End => {
            if character.end_foot_contact(event.contact) {
                log::trace!(
                    "foot contact {:?} ended on {} ({} live)",
                    event.contact,
                    event.owner,
                    character.foot_contacts_count()
                );
            } else {
                log::warn!(
                    "end of untracked foot contact {:?} on {}",
                    event.contact,
                    event.owner
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn world_with_observer() -> World {
        let mut world = World::new();
        world.add_observer(observe_foot_contact);
        world.flush();
        world
    }

    fn contact(owner: Entity, id: u32, phase: ContactPhase) -> FootContactEvent {
        FootContactEvent {
            owner,
            contact: ContactId(id),
            phase,
        }
    }

    #[test]
    fn test_begin_and_end_update_character() {
        let mut world = world_with_observer();
        let hero = world.spawn(Character::new()).id();

        world.trigger(contact(hero, 1, ContactPhase::Begin));
        world.trigger(contact(hero, 2, ContactPhase::Begin));
        let character = world.get::<Character>(hero).unwrap();
        assert_eq!(character.foot_contacts(), &[ContactId(1), ContactId(2)]);

        world.trigger(contact(hero, 1, ContactPhase::End));
        let character = world.get::<Character>(hero).unwrap();
        assert_eq!(character.foot_contacts(), &[ContactId(2)]);
        assert_eq!(character.foot_contacts_count(), 1);
    }

    #[test]
    fn test_missing_owner_is_ignored() {
        let mut world = world_with_observer();
        let gone = world.spawn(Character::new()).id();
        world.despawn(gone);

        world.trigger(contact(gone, 1, ContactPhase::Begin));
        assert_eq!(world.query::<&Character>().iter(&world).count(), 0);
    }

    #[test]
    fn test_unknown_end_leaves_count_alone() {
        let mut world = world_with_observer();
        let hero = world.spawn(Character::new()).id();

        world.trigger(contact(hero, 1, ContactPhase::Begin));
        world.trigger(contact(hero, 9, ContactPhase::End));
        assert_eq!(world.get::<Character>(hero).unwrap().foot_contacts_count(), 1);
    }
}
