//! Editor page collaborators and the rules applied to their contents.

pub mod input;
pub mod surfaces;
