//! User accounts: bonus balances and referral bookkeeping.

use common::UserId;
use serde::{Deserialize, Serialize};

/// A user account record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserAccount {
    pub id: UserId,

    pub name: String,

    /// Bonus point balance. Kept non-negative by clamped debits.
    pub bonus_points: i64,

    /// This user's own referral code.
    pub referral_code: String,

    /// Referral code of the user who referred this one, if any.
    pub referred_by: Option<String>,

    /// How many referred users this account has been paid commission for.
    pub referral_count: u32,

    /// Set once a referral commission has been paid out for this buyer,
    /// supporting the first-order-only qualification policy.
    pub referral_commissioned: bool,
}

impl UserAccount {
    /// Creates an account with a zero balance and no referrer.
    pub fn new(name: impl Into<String>, referral_code: impl Into<String>) -> Self {
        Self {
            id: UserId::new(),
            name: name.into(),
            bonus_points: 0,
            referral_code: referral_code.into(),
            referred_by: None,
            referral_count: 0,
            referral_commissioned: false,
        }
    }

    /// Sets the referrer code on a new account.
    pub fn referred_by(mut self, code: impl Into<String>) -> Self {
        self.referred_by = Some(code.into());
        self
    }

    /// Adds points to the balance.
    pub fn credit(&mut self, points: i64) {
        self.bonus_points += points;
    }

    /// Subtracts points from the balance, flooring at zero.
    ///
    /// Returns the amount actually debited, which is less than `points`
    /// when the balance could not cover the full debit.
    pub fn debit_clamped(&mut self, points: i64) -> i64 {
        let debited = points.min(self.bonus_points).max(0);
        self.bonus_points -= debited;
        debited
    }
}
