#![deny(clippy::all, clippy::pedantic)]

pub mod action;
pub mod jams;
pub mod preview;
