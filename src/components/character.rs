//! Ground-sensing character state.
//!
//! A character's foot sensor reports begin/end contact events; every live
//! contact is kept in `foot_contacts` so friction can be refreshed on each of
//! them, and `foot_contacts_count` mirrors the list length. More than one
//! contact can be live at a time (standing across two platforms), so
//! "grounded" means "count > 0", not a flag.

use bevy_ecs::prelude::Component;

use crate::physics::ContactId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    Left,
    #[default]
    Right,
}

#[derive(Component, Debug, Clone, Default)]
pub struct Character {
    pub view_direction: Direction,
    foot_contacts: Vec<ContactId>,
    foot_contacts_count: usize,
}

impl Character {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn foot_contacts(&self) -> &[ContactId] {
        &self.foot_contacts
    }

    pub fn foot_contacts_count(&self) -> usize {
        self.foot_contacts_count
    }

    pub fn is_grounded(&self) -> bool {
        self.foot_contacts_count > 0
    }

    pub fn begin_foot_contact(&mut self, contact: ContactId) {
        self.foot_contacts.push(contact);
        self.foot_contacts_count += 1;
    }

    /// Returns `false` (and changes nothing) when `contact` is not tracked.
    pub fn end_foot_contact(&mut self, contact: ContactId) -> bool {
        let Some(index) = self.foot_contacts.iter().position(|c| *c == contact) else {
            return false;
        };
        self.foot_contacts.remove(index);
        self.foot_contacts_count -= 1;
        true
    }
}
