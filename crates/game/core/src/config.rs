use core::time::Duration;

/// Game rule constants and tunable pacing parameters.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct GameConfig {
    /// Animation pacing applied by the runtime between actions.
    pub pacing: PacingConfig,
}

impl GameConfig {
    // ===== fixed rules =====
    pub const ROBOT_MAX_HEALTH: f64 = 6.0;
    pub const ENEMY_MAX_HEALTH: f64 = 2.0;
    pub const ROBOT_ATTACK_DAMAGE: f64 = 1.0;
    pub const BACK_ATTACK_DAMAGE: f64 = 4.0;
    pub const ENEMY_ATTACK_DAMAGE: f64 = 1.2;

    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_pacing(pacing: PacingConfig) -> Self {
        Self { pacing }
    }
}

/// Suspension lengths used to pace turns, expressed in milliseconds so the
/// values read naturally in TOML.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PacingConfig {
    /// Delay after every robot move or turn.
    pub player_move_ms: u64,
    /// Delay after every robot attack, hit or miss.
    pub player_attack_ms: u64,
    /// Pace between NPC ticks after a scripted move.
    pub enemy_move_ms: u64,
    /// Pace between NPC ticks after an enemy attack.
    pub enemy_attack_ms: u64,
    /// Wind-up before an enemy hit lands.
    pub enemy_telegraph_ms: u64,
    /// Suspension per second of a `say_message` notification.
    pub message_ms_per_second: u64,
}

impl PacingConfig {
    pub const DEFAULT_PLAYER_MOVE_MS: u64 = 300;
    pub const DEFAULT_PLAYER_ATTACK_MS: u64 = 300;
    pub const DEFAULT_ENEMY_MOVE_MS: u64 = 500;
    pub const DEFAULT_ENEMY_ATTACK_MS: u64 = 300;
    pub const DEFAULT_ENEMY_TELEGRAPH_MS: u64 = 300;
    pub const DEFAULT_MESSAGE_MS_PER_SECOND: u64 = 250;

    /// All delays set to zero. Useful for headless batch runs.
    pub const fn instant() -> Self {
        Self {
            player_move_ms: 0,
            player_attack_ms: 0,
            enemy_move_ms: 0,
            enemy_attack_ms: 0,
            enemy_telegraph_ms: 0,
            message_ms_per_second: 0,
        }
    }

    pub fn player_move(&self) -> Duration {
        Duration::from_millis(self.player_move_ms)
    }

    pub fn player_attack(&self) -> Duration {
        Duration::from_millis(self.player_attack_ms)
    }

    pub fn enemy_move(&self) -> Duration {
        Duration::from_millis(self.enemy_move_ms)
    }

    pub fn enemy_attack(&self) -> Duration {
        Duration::from_millis(self.enemy_attack_ms)
    }

    pub fn enemy_telegraph(&self) -> Duration {
        Duration::from_millis(self.enemy_telegraph_ms)
    }

    /// Suspension for a message shown for `seconds`. Negative or non-finite
    /// inputs collapse to zero.
    pub fn message(&self, seconds: f64) -> Duration {
        if !seconds.is_finite() || seconds <= 0.0 {
            return Duration::ZERO;
        }
        Duration::from_secs_f64(seconds * self.message_ms_per_second as f64 / 1000.0)
    }
}

impl Default for PacingConfig {
    fn default() -> Self {
        Self {
            player_move_ms: Self::DEFAULT_PLAYER_MOVE_MS,
            player_attack_ms: Self::DEFAULT_PLAYER_ATTACK_MS,
            enemy_move_ms: Self::DEFAULT_ENEMY_MOVE_MS,
            enemy_attack_ms: Self::DEFAULT_ENEMY_ATTACK_MS,
            enemy_telegraph_ms: Self::DEFAULT_ENEMY_TELEGRAPH_MS,
            message_ms_per_second: Self::DEFAULT_MESSAGE_MS_PER_SECOND,
        }
    }
}
