//! Worker tasks that back the runtime orchestration.
//!
//! The NPC worker runs enemy ticks, either as the repeating background loop
//! or as the single tick that follows each player action.

mod npc;

pub(crate) use npc::{player_phase, spawn_npc_loop};
