//! XP and reward engine.
//!
//! Applies the pure rules from `nova_core` (skill levelling, quest
//! lifecycle, reward distribution) to persisted rows, inside one database
//! transaction per operation with the affected rows locked.

pub mod rewards;
