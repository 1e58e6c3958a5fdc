//! Query modules, one per entity.

pub mod avatars;
pub mod faculties;
pub mod students;
