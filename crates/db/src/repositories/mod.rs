//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument. Methods that must run
//! inside a caller's transaction take `&mut PgConnection` instead.

pub mod city_repo;
pub mod quest_repo;
pub mod reflection_repo;
pub mod skill_repo;
pub mod user_repo;

pub use city_repo::CityRepo;
pub use quest_repo::QuestRepo;
pub use reflection_repo::ReflectionRepo;
pub use skill_repo::SkillRepo;
pub use user_repo::UserRepo;
