//! A small fixed-grid invaders game.
//!
//! `compute` holds the simulation, `display` turns it into drawing commands
//! for any `Surface`, and `terminal` is the crossterm-backed surface the
//! binary uses.

pub mod compute;
pub mod config;
pub mod display;
pub mod entities;
pub mod error;
pub mod game;
pub mod input;
pub mod surface;
pub mod terminal;
