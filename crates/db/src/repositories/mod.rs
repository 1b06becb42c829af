//! SQL access, one zero-sized repo per cache table.

pub mod character_detail_repo;
pub mod character_repo;
pub mod location_repo;

pub use character_detail_repo::CharacterDetailRepo;
pub use character_repo::CharacterRepo;
pub use location_repo::LocationRepo;
