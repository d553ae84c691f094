//! Event types and the observers that react to them.
//!
//! Submodules:
//! - [`footcontact`] – a character's foot sensor touched or left the ground
pub mod footcontact;
