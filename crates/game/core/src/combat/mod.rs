//! Combat resolution.
//!
//! Pure rules: an attack connects only on the living defender standing one
//! step ahead of the attacker. Robot attacks deal extra damage from behind;
//! enemy strikes always deal a flat amount.

pub mod damage;
pub mod result;

pub use damage::{apply_damage, attack_damage, is_back_attack};
pub use result::{AttackOutcome, AttackResult, resolve_attack, resolve_enemy_strike};
