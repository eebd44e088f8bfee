//! Generates fantasy football lineups anchored on the defenses most likely to keep a clean sheet.
//! Each selected defense is completed with offensive players drawn league-wide under several
//! ranking strategies, without repeating offensive players across variations.

#![allow(clippy::too_many_arguments)]

pub mod availability;
pub mod domain;
pub mod exhaustion;
pub mod file;
pub mod fixtures;
pub mod generator;
pub mod market;
pub mod potential;
pub mod print;
pub mod probable;
pub mod scouting;
pub mod selector;
pub mod session;

#[cfg(test)]
pub(crate) mod testing;

#[doc = include_str!("../README.md")]
#[cfg(doc)]
fn readme() {}
