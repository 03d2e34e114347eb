//! Application services: one function per operation, called inside a
//! transaction by the HTTP layer.

pub mod courses;
pub mod matches;
pub mod projector;
pub mod roster;
pub mod scoring;
