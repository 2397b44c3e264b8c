//! NOVA domain core.
//!
//! Pure business rules with no I/O: the skill XP/level engine, the quest
//! lifecycle, reward distribution, and the reflection and city domain
//! constants. The database and HTTP layers call into this crate and persist
//! whatever state it returns.

pub mod city;
pub mod error;
pub mod quest;
pub mod reflection;
pub mod rewards;
pub mod skill;
pub mod types;
