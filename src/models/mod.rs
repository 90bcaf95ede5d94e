//! Data models for the wedding site content API.
//!
//! These models match the frontend TypeScript interfaces exactly for seamless interoperability.

mod collection;
mod compliment;
mod dua;
mod gallery;
mod guestbook;
mod journey;

pub use collection::*;
pub use compliment::*;
pub use dua::*;
pub use gallery::*;
pub use guestbook::*;
pub use journey::*;
