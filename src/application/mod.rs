//! Request/response flows driven by the editor page.

pub mod actions;
pub mod error;
pub mod jams;
pub mod preview;

#[cfg(test)]
pub(crate) mod testing;
