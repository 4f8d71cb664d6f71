/// MicroAlgos per Algo
pub const MICRO_ALGOS_PER_ALGO: u64 = 1_000_000;

/// Rounds to wait for a transaction before reporting it as pending
pub const DEFAULT_CONFIRMATION_ROUNDS: u64 = 4;

/// Minimum goal name length, in characters
pub const MIN_GOAL_NAME_CHARS: usize = 3;

/// Currency label for on-chain goals
pub const VAULT_CURRENCY: &str = "ALGO";

/// Currency label for flexible goals
pub const FLEXIBLE_CURRENCY: &str = "INR";

/// Seconds in a week
pub const SECONDS_PER_WEEK: i64 = 7 * 24 * 60 * 60;
