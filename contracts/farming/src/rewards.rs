/// Denominator for basis-point rates: `10_000` bps is 100 %.
pub const BPS_DENOMINATOR: i128 = 10_000;

/// Highest accepted per-epoch reward rate (100 %).
pub const MAX_RATE_BPS: u32 = 10_000;

// ── Core reward engine ──────────────────────────────────────────────────────

/// Fixed reward owed on `principal` after the full schedule.
///
/// ```text
/// reward = principal × rate_bps × epoch_count / 10_000
/// ```
///
/// Division is floor division and happens last, so truncation only ever
/// drops the fractional remainder of the final quotient. The same formula
/// sizes the reward budget when called with the pool cap as `principal`,
/// which makes every individual entitlement bounded by the budget share of
/// its principal.
///
/// Returns `None` on overflow or when `principal` is negative.
pub fn reward_for(principal: i128, rate_bps: u32, epoch_count: u32) -> Option<i128> {
    if principal < 0 {
        return None;
    }
    principal
        .checked_mul(rate_bps as i128)?
        .checked_mul(epoch_count as i128)?
        .checked_div(BPS_DENOMINATOR)
}

/// Timestamp at which withdrawals and claims unlock.
///
/// Returns `None` if `start + epoch_duration × epoch_count` does not fit in a `u64`.
pub fn schedule_end(start: u64, epoch_duration: u64, epoch_count: u32) -> Option<u64> {
    epoch_duration
        .checked_mul(epoch_count as u64)
        .and_then(|span| start.checked_add(span))
}

/// Range checks applied to pool parameters before anything is stored.
pub fn params_in_range(
    total_cap: i128,
    rate_bps: u32,
    epoch_duration: u64,
    epoch_count: u32,
) -> bool {
    total_cap > 0 && rate_bps <= MAX_RATE_BPS && epoch_duration > 0 && epoch_count > 0
}

// ── Unit tests ──────────────────────────────────────────────────────────────
