//! Persisted row shapes, one module per cache table.

pub mod character;
pub mod character_detail;
pub mod location;

pub use character::CharacterRow;
pub use character_detail::CharacterDetailRow;
pub use location::LocationRow;
