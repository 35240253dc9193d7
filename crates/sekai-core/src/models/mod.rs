//! Data models for the Sekai sticker library.
//!
//! Wire shapes follow the repository documents (`meta.json`,
//! `characters.json`); derived types use camelCase names when serialized so
//! host UIs receive the same field names the documents use.

mod character;
mod repository;
mod sticker;

pub use character::*;
pub use repository::*;
pub use sticker::*;
