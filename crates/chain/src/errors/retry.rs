/// Classification for retry policy.
///
/// Used by callers to decide what to do after a ledger operation fails.
///
/// # Behavior Summary
///
/// | Class | Resubmit? | Re-read state first? |
/// |-------|-----------|----------------------|
/// | `Never` | No | No |
/// | `Retry` | Yes, after inspection | No |
/// | `RepollState` | No | Yes |
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum RetryClass {
    /// Never retry - bad input, rejected by the node or the user, or an
    /// incompatible contract. Retrying the same request cannot succeed.
    Never,

    /// Transient failure (network, fee too low, node 5xx). Building and
    /// submitting a fresh transaction is sensible.
    Retry,

    /// The outcome is unknown: the transaction may still confirm.
    ///
    /// Resubmitting an already-accepted transaction is unsafe, so the caller
    /// must re-read ledger state (or poll the transaction) instead.
    RepollState,
}
