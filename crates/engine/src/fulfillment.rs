//! The order state machine orchestrator.

use common::OrderId;
use domain::{BonusConfig, Order, OrderStatus, ReferralPolicy, alert};
use store::{RecordStore, UpdateGuard};

use crate::accountant::{Accountant, CommissionReceipt};
use crate::error::{EngineError, Result, Warning};
use crate::ledger::{InventoryLedger, LedgerEntry};
use crate::services::notification::NotificationGateway;
use crate::services::settings::SettingsProvider;

/// Result of a completed state transition.
///
/// Sub-step failures that did not abort the transition are carried as
/// warnings for the caller to surface.
#[derive(Debug, Clone)]
pub struct TransitionOutcome {
    pub order_id: OrderId,

    /// The status the order now holds.
    pub status: OrderStatus,

    /// Purchase-bonus points credited to the buyer, if any.
    pub bonus_credited: Option<i64>,

    /// Points debited from the buyer by a compensating reversal, if any.
    pub points_debited: Option<i64>,

    /// Referral commission paid out, if the order qualified.
    pub commission: Option<CommissionReceipt>,

    pub warnings: Vec<Warning>,
}

impl TransitionOutcome {
    fn new(order_id: OrderId, status: OrderStatus) -> Self {
        Self {
            order_id,
            status,
            bonus_credited: None,
            points_debited: None,
            commission: None,
            warnings: Vec::new(),
        }
    }
}

/// Orchestrates order lifecycle transitions and keeps the dependent
/// ledgers consistent.
///
/// `approve` and `reject` form a compensating pair: approval deducts stock
/// and credits points, rejection restores stock and debits exactly the
/// credited amount. Every status write is a compare-and-swap on the order
/// version, so a concurrent transition surfaces as a conflict instead of a
/// double-approve.
pub struct FulfillmentEngine<S, N, C>
where
    S: RecordStore,
    N: NotificationGateway,
    C: SettingsProvider,
{
    store: S,
    ledger: InventoryLedger<S>,
    accountant: Accountant<S>,
    notifier: N,
    settings: C,
}

impl<S, N, C> FulfillmentEngine<S, N, C>
where
    S: RecordStore + Clone,
    N: NotificationGateway,
    C: SettingsProvider,
{
    /// Creates a new engine over the given store and collaborators.
    pub fn new(store: S, notifier: N, settings: C) -> Self {
        let ledger = InventoryLedger::new(store.clone());
        let accountant = Accountant::new(store.clone());
        Self {
            store,
            ledger,
            accountant,
            notifier,
            settings,
        }
    }

    /// Approves a pending order.
    ///
    /// Stock deductions run first: a failed deduction must be on record
    /// before any bonus crediting happens for the order. Per-item and
    /// per-account failures become warnings; only a missing order, an
    /// illegal transition, or the final status write abort the operation.
    #[tracing::instrument(skip(self))]
    pub async fn approve(&self, order_id: OrderId) -> Result<TransitionOutcome> {
        metrics::counter!("fulfillment_approvals_total").increment(1);
        let started = std::time::Instant::now();

        // Latest rates, never cached across operations.
        let config = self.settings.bonus_config().await;
        let threshold = self.settings.low_stock_threshold().await;

        let mut order = self.load_order(order_id).await?;
        order.validate_transition(OrderStatus::Approved)?;

        let mut outcome = TransitionOutcome::new(order_id, OrderStatus::Approved);

        if !order.inventory_applied {
            for item in order.items.clone() {
                match self
                    .ledger
                    .deduct(&item.product_id, item.variant.as_ref(), item.quantity)
                    .await
                {
                    Ok(entry) => {
                        self.dispatch_stock_alert(&entry, threshold, &mut outcome.warnings)
                            .await;
                    }
                    Err(e) => {
                        tracing::warn!(
                            %order_id,
                            product_id = %item.product_id,
                            error = %e,
                            "stock deduction skipped"
                        );
                        outcome.warnings.push(Warning::StockUpdateSkipped {
                            product_id: item.product_id.clone(),
                            reason: e.to_string(),
                        });
                    }
                }
            }
            order.inventory_applied = true;
            // Persist the idempotence guard before any accounting, so an
            // interrupted approval can be re-run without double-deducting.
            // This write also claims the order against concurrent approvers.
            order.version = self
                .store
                .update_order(order.clone(), UpdateGuard::expect_version(order.version))
                .await?;
        }

        match order.bonus_credited {
            Some(points) => outcome.bonus_credited = Some(points),
            None => {
                match self
                    .accountant
                    .credit_purchase_bonus(order.user_id, order.total, &config)
                    .await
                {
                    Ok(points) => {
                        order.bonus_credited = Some(points);
                        outcome.bonus_credited = Some(points);
                    }
                    Err(e) => {
                        tracing::warn!(%order_id, error = %e, "purchase bonus credit failed");
                        outcome.warnings.push(Warning::BonusCreditFailed {
                            user_id: order.user_id,
                            reason: e.to_string(),
                        });
                    }
                }
            }
        }

        outcome.commission = self
            .settle_referral(&order, &config, &mut outcome.warnings)
            .await;

        // The status write comes last: if it fails, the transition is
        // incomplete from the caller's view and can be retried.
        order.status = OrderStatus::Approved;
        order.version = self
            .store
            .update_order(order.clone(), UpdateGuard::expect_version(order.version))
            .await?;

        self.notify_status(&order, &mut outcome.warnings).await;
        if let Some(receipt) = outcome.commission.clone() {
            self.notify_commission(&receipt, &mut outcome.warnings).await;
        }

        metrics::histogram!("fulfillment_transition_duration_seconds")
            .record(started.elapsed().as_secs_f64());
        tracing::info!(
            %order_id,
            bonus = ?outcome.bonus_credited,
            warnings = outcome.warnings.len(),
            "order approved"
        );
        Ok(outcome)
    }

    /// Rejects a pending order, undoing whatever an interrupted approval
    /// already applied.
    ///
    /// Stock is restored only when the order's deductions were applied, and
    /// the buyer is debited exactly the persisted credited amount, never a
    /// recomputation from current rates.
    #[tracing::instrument(skip(self))]
    pub async fn reject(&self, order_id: OrderId) -> Result<TransitionOutcome> {
        metrics::counter!("fulfillment_rejections_total").increment(1);
        let started = std::time::Instant::now();

        let threshold = self.settings.low_stock_threshold().await;

        let mut order = self.load_order(order_id).await?;
        order.validate_transition(OrderStatus::Rejected)?;

        let mut outcome = TransitionOutcome::new(order_id, OrderStatus::Rejected);

        if order.inventory_applied {
            for item in order.items.clone() {
                match self
                    .ledger
                    .restore(&item.product_id, item.variant.as_ref(), item.quantity)
                    .await
                {
                    Ok(entry) => {
                        self.dispatch_stock_alert(&entry, threshold, &mut outcome.warnings)
                            .await;
                    }
                    Err(e) => {
                        tracing::warn!(
                            %order_id,
                            product_id = %item.product_id,
                            error = %e,
                            "stock restore skipped"
                        );
                        outcome.warnings.push(Warning::StockUpdateSkipped {
                            product_id: item.product_id.clone(),
                            reason: e.to_string(),
                        });
                    }
                }
            }
            order.inventory_applied = false;
        }

        if let Some(points) = order.bonus_credited {
            match self.accountant.debit_points(order.user_id, points).await {
                Ok(debited) => {
                    outcome.points_debited = Some(debited);
                    order.bonus_credited = None;
                }
                Err(e) => {
                    tracing::warn!(%order_id, error = %e, "compensating debit failed");
                    outcome.warnings.push(Warning::BonusDebitFailed {
                        user_id: order.user_id,
                        reason: e.to_string(),
                    });
                }
            }
        }

        order.status = OrderStatus::Rejected;
        order.version = self
            .store
            .update_order(order.clone(), UpdateGuard::expect_version(order.version))
            .await?;

        self.notify_status(&order, &mut outcome.warnings).await;

        metrics::histogram!("fulfillment_transition_duration_seconds")
            .record(started.elapsed().as_secs_f64());
        tracing::info!(
            %order_id,
            debited = ?outcome.points_debited,
            warnings = outcome.warnings.len(),
            "order rejected"
        );
        Ok(outcome)
    }

    /// Progresses an approved order through the courier stages:
    /// `approved → shipped` and `shipped → delivered`.
    ///
    /// Pure status mutation plus buyer notification; no ledger or
    /// accounting side effects.
    #[tracing::instrument(skip(self))]
    pub async fn update_status(
        &self,
        order_id: OrderId,
        new_status: OrderStatus,
    ) -> Result<TransitionOutcome> {
        metrics::counter!("fulfillment_status_updates_total").increment(1);

        let mut order = self.load_order(order_id).await?;

        // Approval and rejection have their own ledger-touching paths;
        // only courier progressions come through here.
        if !matches!(new_status, OrderStatus::Shipped | OrderStatus::Delivered) {
            return Err(domain::OrderError::InvalidTransition {
                from: order.status,
                to: new_status,
            }
            .into());
        }
        order.validate_transition(new_status)?;

        let mut outcome = TransitionOutcome::new(order_id, new_status);

        order.status = new_status;
        order.version = self
            .store
            .update_order(order.clone(), UpdateGuard::expect_version(order.version))
            .await?;

        self.notify_status(&order, &mut outcome.warnings).await;

        tracing::info!(%order_id, status = %new_status, "order status updated");
        Ok(outcome)
    }

    /// Deletes an order that has reached a terminal status.
    ///
    /// No ledger effects: a delivered or rejected order is already
    /// reconciled.
    #[tracing::instrument(skip(self))]
    pub async fn delete(&self, order_id: OrderId) -> Result<()> {
        let order = self.load_order(order_id).await?;
        order.validate_delete()?;

        self.store.delete_order(order_id).await?;
        metrics::counter!("fulfillment_deletes_total").increment(1);
        tracing::info!(%order_id, "order deleted");
        Ok(())
    }

    async fn load_order(&self, order_id: OrderId) -> Result<Order> {
        self.store
            .get_order(order_id)
            .await?
            .ok_or(EngineError::OrderNotFound(order_id))
    }

    /// Pays the referral commission when the buyer's order qualifies under
    /// the configured policy. Every failure mode here is non-fatal.
    async fn settle_referral(
        &self,
        order: &Order,
        config: &BonusConfig,
        warnings: &mut Vec<Warning>,
    ) -> Option<CommissionReceipt> {
        let buyer = match self.store.get_user(order.user_id).await {
            Ok(Some(buyer)) => buyer,
            // A missing buyer already surfaced through the bonus step.
            Ok(None) | Err(_) => return None,
        };
        let code = buyer.referred_by.clone()?;

        if config.referral_policy == ReferralPolicy::FirstOrderOnly && buyer.referral_commissioned {
            return None;
        }

        let referrer = match self.accountant.resolve_referrer(&code).await {
            Ok(Some(referrer)) => referrer,
            Ok(None) => {
                tracing::warn!(code = %code, "referral code did not resolve");
                warnings.push(Warning::ReferrerNotFound { code });
                return None;
            }
            Err(e) => {
                warnings.push(Warning::CommissionFailed {
                    code,
                    reason: e.to_string(),
                });
                return None;
            }
        };

        match self
            .accountant
            .credit_referral_commission(referrer.id, order.total, config)
            .await
        {
            Ok(receipt) => {
                let mut buyer = buyer;
                buyer.referral_commissioned = true;
                if let Err(e) = self.store.update_user(buyer).await {
                    tracing::warn!(error = %e, "failed to mark buyer as commissioned");
                }
                Some(receipt)
            }
            Err(e) => {
                tracing::warn!(code = %code, error = %e, "referral commission failed");
                warnings.push(Warning::CommissionFailed {
                    code,
                    reason: e.to_string(),
                });
                None
            }
        }
    }

    async fn dispatch_stock_alert(
        &self,
        entry: &LedgerEntry,
        threshold: u32,
        warnings: &mut Vec<Warning>,
    ) {
        let Some(alert) = alert::classify(entry.change.before, entry.change.after, threshold)
        else {
            return;
        };
        metrics::counter!("low_stock_alerts_total").increment(1);
        if let Err(e) = self
            .notifier
            .notify_low_stock(
                &entry.product_id,
                &entry.product_name,
                alert,
                entry.change.variant_label.as_deref(),
            )
            .await
        {
            tracing::warn!(product_id = %entry.product_id, error = %e, "low-stock notification failed");
            warnings.push(Warning::NotificationFailed {
                reason: e.to_string(),
            });
        }
    }

    async fn notify_status(&self, order: &Order, warnings: &mut Vec<Warning>) {
        if let Err(e) = self.notifier.notify_order_status(order, order.status).await {
            tracing::warn!(order_id = %order.id, error = %e, "status notification failed");
            warnings.push(Warning::NotificationFailed {
                reason: e.to_string(),
            });
        }
    }

    async fn notify_commission(&self, receipt: &CommissionReceipt, warnings: &mut Vec<Warning>) {
        let referrer = match self.store.get_user(receipt.referrer_id).await {
            Ok(Some(referrer)) => referrer,
            Ok(None) | Err(_) => return,
        };
        if let Err(e) = self
            .notifier
            .notify_referral_reward(&referrer, receipt.amount, receipt.total_referrals)
            .await
        {
            tracing::warn!(referrer_id = %receipt.referrer_id, error = %e, "referral notification failed");
            warnings.push(Warning::NotificationFailed {
                reason: e.to_string(),
            });
        }
    }
}
