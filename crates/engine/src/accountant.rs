//! Bonus and referral accountant: signed point deltas against user balances.

use common::UserId;
use domain::{BonusConfig, Money, UserAccount};
use store::{RecordStore, StoreError};
use thiserror::Error;

/// Errors from accounting operations.
#[derive(Debug, Error)]
pub enum AccountingError {
    /// The user account does not exist.
    #[error("user not found: {0}")]
    UserNotFound(UserId),

    /// A record store read or write failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Receipt for a paid referral commission, used for notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommissionReceipt {
    pub referrer_id: UserId,
    pub amount: i64,
    pub total_referrals: u32,
}

/// Applies configured percentages to order totals and writes the resulting
/// point deltas to user accounts.
///
/// Each operation re-reads the account before mutating, so concurrent
/// credits to the same balance are not silently overwritten by stale reads
/// held across operations.
pub struct Accountant<S> {
    store: S,
}

impl<S: RecordStore> Accountant<S> {
    /// Creates a new accountant over the given record store.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Credits the purchase bonus for an approved order and returns the
    /// amount credited, which the caller persists for exact reversal.
    #[tracing::instrument(skip(self, config))]
    pub async fn credit_purchase_bonus(
        &self,
        user_id: UserId,
        total: Money,
        config: &BonusConfig,
    ) -> Result<i64, AccountingError> {
        let points = config.purchase_bonus(total);
        let mut user = self.load(user_id).await?;
        user.credit(points);
        self.store.update_user(user).await?;
        Ok(points)
    }

    /// Debits points from a balance, flooring at zero.
    ///
    /// Returns the amount actually debited. A shortfall (debit larger than
    /// the balance) is logged rather than failing, so the transition that
    /// requested it can complete.
    #[tracing::instrument(skip(self))]
    pub async fn debit_points(&self, user_id: UserId, points: i64) -> Result<i64, AccountingError> {
        let mut user = self.load(user_id).await?;
        let debited = user.debit_clamped(points);
        if debited < points {
            tracing::warn!(
                %user_id,
                requested = points,
                debited,
                "bonus debit clamped at zero balance"
            );
        }
        self.store.update_user(user).await?;
        Ok(debited)
    }

    /// Credits the referral commission to a referrer, increments their
    /// referral count, and returns a receipt for notification.
    #[tracing::instrument(skip(self, config))]
    pub async fn credit_referral_commission(
        &self,
        referrer_id: UserId,
        total: Money,
        config: &BonusConfig,
    ) -> Result<CommissionReceipt, AccountingError> {
        let amount = config.referral_commission(total);
        let mut referrer = self.load(referrer_id).await?;
        referrer.credit(amount);
        referrer.referral_count += 1;
        let total_referrals = referrer.referral_count;
        self.store.update_user(referrer).await?;
        Ok(CommissionReceipt {
            referrer_id,
            amount,
            total_referrals,
        })
    }

    /// Resolves a referral code to the owning account.
    ///
    /// An unknown code is not an error here; the caller decides how loud
    /// to be about it.
    pub async fn resolve_referrer(
        &self,
        code: &str,
    ) -> Result<Option<UserAccount>, AccountingError> {
        Ok(self.store.find_user_by_referral_code(code).await?)
    }

    async fn load(&self, user_id: UserId) -> Result<UserAccount, AccountingError> {
        match self.store.get_user(user_id).await {
            Ok(Some(user)) => Ok(user),
            Ok(None) => Err(AccountingError::UserNotFound(user_id)),
            Err(e) => Err(e.into()),
        }
    }
}
