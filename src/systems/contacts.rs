//! Foot sensor contact routing.
//!
//! The physics engine reports every begin/end of a contact between two
//! fixtures. Only sides tagged [`FixtureTag::FootSensor`] matter here: each
//! one becomes a [`FootContactEvent`] for the sensor's owner. Every other
//! pairing is left to whoever else listens.

use bevy_ecs::prelude::*;

use crate::events::footcontact::FootContactEvent;
use crate::physics::{ContactEvent, FixtureTag};

/// Foot contact events carried by a batch of drained contact events, in order.
pub fn foot_contact_events(
    events: &[ContactEvent],
) -> impl Iterator<Item = FootContactEvent> + '_ {
    events.iter().flat_map(|event| {
        [event.tag_a, event.tag_b]
            .into_iter()
            .filter_map(move |tag| match tag {
                FixtureTag::FootSensor { owner } => Some(FootContactEvent {
                    owner,
                    contact: event.contact,
                    phase: event.phase,
                }),
                _ => None,
            })
    })
}

/// Trigger a [`FootContactEvent`] for every foot sensor side of `events`.
pub fn trigger_foot_contacts(commands: &mut Commands, events: &[ContactEvent]) {
    for foot in foot_contact_events(events) {
        commands.trigger(foot);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::character::Character;
    use crate::events::footcontact::observe_foot_contact;
    use crate::physics::{ContactId, ContactPhase};

    #[derive(Resource, Default)]
    struct Pending(Vec<ContactEvent>);

    fn route(mut pending: ResMut<Pending>, mut commands: Commands) {
        let events = std::mem::take(&mut pending.0);
        trigger_foot_contacts(&mut commands, &events);
    }

    fn event(phase: ContactPhase, id: u32, tag_a: FixtureTag, tag_b: FixtureTag) -> ContactEvent {
        ContactEvent {
            phase,
            contact: ContactId(id),
            tag_a,
            tag_b,
        }
    }

    fn deliver(world: &mut World, events: Vec<ContactEvent>) {
        world.resource_mut::<Pending>().0 = events;
        let mut schedule = Schedule::default();
        schedule.add_systems(route);
        schedule.run(world);
    }

    #[test]
    fn test_foot_sensor_on_either_side() {
        let mut world = World::new();
        let hero = world.spawn_empty().id();
        let foot = FixtureTag::FootSensor { owner: hero };
        let events = [
            event(ContactPhase::Begin, 1, foot, FixtureTag::LevelGeometry),
            event(ContactPhase::Begin, 2, FixtureTag::LevelGeometry, foot),
            event(ContactPhase::End, 1, foot, FixtureTag::LevelGeometry),
        ];
        let routed: Vec<_> = foot_contact_events(&events).collect();
        assert_eq!(routed.len(), 3);
        assert!(routed.iter().all(|e| e.owner == hero));
        assert_eq!(
            routed.iter().map(|e| e.contact).collect::<Vec<_>>(),
            vec![ContactId(1), ContactId(2), ContactId(1)]
        );
        assert_eq!(routed[2].phase, ContactPhase::End);
    }

    #[test]
    fn test_untagged_pairs_are_ignored() {
        let events = [event(
            ContactPhase::Begin,
            7,
            FixtureTag::None,
            FixtureTag::LevelGeometry,
        )];
        assert_eq!(foot_contact_events(&events).count(), 0);
    }

    #[test]
    fn test_triggered_contacts_reach_the_observer() {
        let mut world = World::new();
        world.init_resource::<Pending>();
        world.add_observer(observe_foot_contact);
        world.flush();
        let hero = world.spawn(Character::new()).id();
        let foot = FixtureTag::FootSensor { owner: hero };

        deliver(
            &mut world,
            vec![
                event(ContactPhase::Begin, 1, foot, FixtureTag::LevelGeometry),
                event(ContactPhase::Begin, 2, FixtureTag::LevelGeometry, foot),
            ],
        );
        let character = world.get::<Character>(hero).unwrap();
        assert_eq!(character.foot_contacts(), &[ContactId(1), ContactId(2)]);

        deliver(
            &mut world,
            vec![event(ContactPhase::End, 1, foot, FixtureTag::LevelGeometry)],
        );
        let character = world.get::<Character>(hero).unwrap();
        assert_eq!(character.foot_contacts(), &[ContactId(2)]);
    }
}
