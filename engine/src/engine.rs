//! The detection engine.
//!
//! One engine instance serves both transport adapters; a detection arriving
//! over HTTP and one arriving over the reader socket run exactly the same
//! path. The engine is stateless between calls.

use crate::environment::DetectionEnvironment;
use crate::fanout::NotificationFanout;
use crate::providers::{
    AuditSink, InventoryStore, MovementLedger, NotificationStore, PushGateway, ReaderDirectory,
    RealtimeEvent, RealtimePublisher, TagRegistry, UserDirectory,
};
use crate::retry::RetryPolicy;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tagstream_core::{
    detection, threshold, ActorContext, AuditEntry, DetectionError, Direction, InventoryItem,
    ItemId, ItemSnapshot, LifecycleStatus, LocationLabels, LocationView, MovementId,
    MovementRecord, ReaderId, Result, TenantId,
};
use tracing::{debug, info, instrument, warn};

/// Authoritative result of one processed detection, returned to the
/// transport adapter.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectionOutcome {
    /// Item identity.
    pub item_id: ItemId,
    /// Item display name.
    pub name: String,
    /// Stock-keeping unit.
    pub sku: String,
    /// The detected tag.
    pub tag_id: String,
    /// Lifecycle status after the detection.
    pub status: LifecycleStatus,
    /// Quantity after the detection.
    pub quantity: u32,
    /// Configured low-stock threshold.
    pub threshold: u32,
    /// Location after the detection, flattened with display names.
    pub location: LocationView,
    /// Whether this detection raised a low-stock alert.
    pub low_stock_alert: bool,
    /// Ledger entry recorded for this detection.
    pub movement_id: MovementId,
    /// When the detection was processed.
    pub timestamp: DateTime<Utc>,
}

/// A quantity adjustment from the manual-update or shipment flows.
///
/// Those flows live outside this pipeline but share its threshold and
/// fanout semantics through [`DetectionEngine::process_quantity_change`],
/// so the latch logic exists in exactly one place.
#[derive(Debug, Clone)]
pub struct QuantityChange {
    /// Item to adjust.
    pub item_id: ItemId,
    /// Absolute new quantity.
    pub new_quantity: u32,
    /// Reason text recorded in the movement ledger.
    pub reason: String,
}

/// Orchestrates the tag-detection → location-transition → stock-alert
/// pipeline.
#[derive(Clone)]
pub struct DetectionEngine<RD, TR, IS, ML, AU, NS, PG, RT, UD>
where
    RD: ReaderDirectory + Clone,
    TR: TagRegistry + Clone,
    IS: InventoryStore + Clone,
    ML: MovementLedger + Clone,
    AU: AuditSink + Clone,
    NS: NotificationStore + Clone,
    PG: PushGateway + Clone,
    RT: RealtimePublisher + Clone,
    UD: UserDirectory + Clone,
{
    env: DetectionEnvironment<RD, TR, IS, ML, AU, NS, PG, RT, UD>,
    retry: RetryPolicy,
}

impl<RD, TR, IS, ML, AU, NS, PG, RT, UD> DetectionEngine<RD, TR, IS, ML, AU, NS, PG, RT, UD>
where
    RD: ReaderDirectory + Clone + 'static,
    TR: TagRegistry + Clone + 'static,
    IS: InventoryStore + Clone + 'static,
    ML: MovementLedger + Clone + 'static,
    AU: AuditSink + Clone + 'static,
    NS: NotificationStore + Clone + 'static,
    PG: PushGateway + Clone + 'static,
    RT: RealtimePublisher + Clone + 'static,
    UD: UserDirectory + Clone + 'static,
{
    /// Create an engine over the given environment with the default
    /// conflict-retry policy.
    #[must_use]
    pub fn new(env: DetectionEnvironment<RD, TR, IS, ML, AU, NS, PG, RT, UD>) -> Self {
        Self {
            env,
            retry: RetryPolicy::default(),
        }
    }

    /// Override the conflict-retry policy.
    #[must_use]
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Process one detection event.
    ///
    /// Resolves the reader and the tag, applies the pure plan with a
    /// compare-and-swap item write (re-planning from a fresh read on
    /// conflict, bounded by the retry policy), then dispatches the
    /// movement, audit, realtime, and alert side effects as detached
    /// tasks. The returned outcome reflects the committed item state.
    ///
    /// # Errors
    ///
    /// - Precondition rejections: [`DetectionError::ReaderNotFound`],
    ///   [`DetectionError::ReaderInactive`],
    ///   [`DetectionError::TagNotRegistered`]. No state is mutated.
    /// - [`DetectionError::Conflict`] after exhausting write retries.
    /// - [`DetectionError::Store`] on authoritative read/write failure.
    #[instrument(skip(self, actor), fields(tenant = %tenant_id, reader = %reader_id, tag = %tag_id))]
    pub async fn process_detection(
        &self,
        tenant_id: TenantId,
        reader_id: &ReaderId,
        tag_id: &str,
        actor: &ActorContext,
    ) -> Result<DetectionOutcome> {
        let reader = self.env.readers.resolve(tenant_id, reader_id).await?;
        if !reader.is_active() {
            return Err(DetectionError::ReaderInactive {
                reader_id: reader_id.0.clone(),
                status: reader.status_name().to_string(),
            });
        }

        let mut item = self.env.tags.resolve(tenant_id, tag_id).await?;

        // Read-plan-write loop. Each conflict re-reads and re-plans so the
        // decrement, latch, and status transition always apply to a single
        // consistent view of the item.
        let mut attempts: u32 = 0;
        let plan = loop {
            attempts += 1;
            let plan = detection::plan(&item, &reader);
            match self.env.inventory.update(&plan.updated, item.version).await {
                Ok(()) => break plan,
                Err(err) if err.is_conflict() && attempts < self.retry.max_attempts => {
                    debug!(attempts, "item write conflicted, re-reading");
                    tokio::time::sleep(self.retry.delay_for(attempts - 1)).await;
                    item = self.env.inventory.reload(tenant_id, item.item_id).await?;
                }
                Err(err) if err.is_conflict() => {
                    warn!(attempts, "item write conflicted, retries exhausted");
                    return Err(DetectionError::Conflict { attempts });
                }
                Err(err) => return Err(err),
            }
        };

        // The item mutation is committed. Everything below is best-effort
        // and detached: caller cancellation must not lose ledger, audit,
        // or alert records.
        let now = self.env.clock.now();
        let movement = plan.movement_record(&reader, actor, now);
        let movement_id = movement.movement_id;
        let audit = plan.audit_entry(&reader, actor, now);

        self.spawn_touch_last_seen(tenant_id, reader_id.clone(), now);
        self.spawn_ledger_append(movement);
        self.spawn_audit_append(audit);

        let location_view = LocationView::new(&plan.updated.location, &reader.location_labels);
        self.spawn_movement_broadcast(&plan.updated, tag_id, &location_view, now);

        if plan.transition.is_raise() {
            self.spawn_alert_dispatch(&plan, &reader.location_labels, tag_id, now);
        }

        metrics::counter!("tagstream_detections_total").increment(1);
        info!(
            item = %plan.updated.item_id,
            quantity = plan.updated.quantity,
            alert = plan.transition.is_raise(),
            "detection processed"
        );

        Ok(DetectionOutcome {
            item_id: plan.updated.item_id,
            name: plan.updated.name.clone(),
            sku: plan.updated.sku.clone(),
            tag_id: tag_id.to_string(),
            status: plan.updated.lifecycle_status,
            quantity: plan.updated.quantity,
            threshold: plan.updated.threshold,
            location: location_view,
            low_stock_alert: plan.transition.is_raise(),
            movement_id,
            timestamp: now,
        })
    }

    /// Apply a quantity change from the manual-update or shipment flows.
    ///
    /// Shares the CAS write, threshold evaluation, and alert fanout with
    /// the detection path. Unlike detections this path can replenish, so a
    /// `Clear` transition (latch reset, no notification) is reachable here.
    ///
    /// # Errors
    ///
    /// - [`DetectionError::TagNotRegistered`] if the item does not exist.
    /// - [`DetectionError::Conflict`] after exhausting write retries.
    /// - [`DetectionError::Store`] on authoritative read/write failure.
    #[instrument(skip(self, change, actor), fields(tenant = %tenant_id, item = %change.item_id))]
    pub async fn process_quantity_change(
        &self,
        tenant_id: TenantId,
        change: QuantityChange,
        actor: &ActorContext,
    ) -> Result<DetectionOutcome> {
        let mut item = self.env.inventory.reload(tenant_id, change.item_id).await?;

        let mut attempts: u32 = 0;
        let (updated, transition) = loop {
            attempts += 1;
            let transition = threshold::evaluate(
                item.quantity,
                change.new_quantity,
                item.threshold,
                item.low_stock_alert_sent,
            );
            let updated = InventoryItem {
                quantity: change.new_quantity,
                low_stock_alert_sent: transition.latch_after(item.low_stock_alert_sent),
                version: item.version + 1,
                ..item.clone()
            };
            match self.env.inventory.update(&updated, item.version).await {
                Ok(()) => break (updated, transition),
                Err(err) if err.is_conflict() && attempts < self.retry.max_attempts => {
                    tokio::time::sleep(self.retry.delay_for(attempts - 1)).await;
                    item = self.env.inventory.reload(tenant_id, change.item_id).await?;
                }
                Err(err) if err.is_conflict() => {
                    return Err(DetectionError::Conflict { attempts });
                }
                Err(err) => return Err(err),
            }
        };

        let now = self.env.clock.now();
        let (direction, delta) = if change.new_quantity >= item.quantity {
            (Direction::In, change.new_quantity - item.quantity)
        } else {
            (Direction::Out, item.quantity - change.new_quantity)
        };

        let movement = MovementRecord {
            movement_id: MovementId::new(),
            tenant_id,
            item_id: updated.item_id,
            quantity_delta: delta,
            direction,
            reason: change.reason,
            source: Some(updated.location.clone()),
            destination: Some(updated.location.clone()),
            actor_id: actor.user_id,
            recorded_at: now,
        };
        let movement_id = movement.movement_id;
        self.spawn_ledger_append(movement);

        self.spawn_audit_append(AuditEntry {
            tenant_id,
            actor_id: actor.user_id,
            actor_name: actor.name.clone(),
            actor_role: actor.role.clone(),
            action: "quantity_changed".to_string(),
            module: "inventory".to_string(),
            description: format!(
                "Quantity of '{}' ({}) set to {}",
                updated.name, updated.sku, updated.quantity
            ),
            details: serde_json::json!({
                "previousQuantity": item.quantity,
                "newQuantity": updated.quantity,
            }),
            recorded_at: now,
        });

        let labels = LocationLabels::default();
        let location_view = LocationView::new(&updated.location, &labels);

        if transition.is_raise() {
            let plan = detection::DetectionPlan {
                updated: updated.clone(),
                before: ItemSnapshot {
                    status: item.lifecycle_status,
                    location: item.location.clone(),
                    quantity: item.quantity,
                },
                after: ItemSnapshot {
                    status: updated.lifecycle_status,
                    location: updated.location.clone(),
                    quantity: updated.quantity,
                },
                transition,
                movement_delta: delta,
            };
            self.spawn_alert_dispatch(&plan, &labels, updated.tag_id.as_deref().unwrap_or(""), now);
        }

        Ok(DetectionOutcome {
            item_id: updated.item_id,
            name: updated.name.clone(),
            sku: updated.sku.clone(),
            tag_id: updated.tag_id.clone().unwrap_or_default(),
            status: updated.lifecycle_status,
            quantity: updated.quantity,
            threshold: updated.threshold,
            location: location_view,
            low_stock_alert: transition.is_raise(),
            movement_id,
            timestamp: now,
        })
    }

    fn spawn_touch_last_seen(&self, tenant_id: TenantId, reader_id: ReaderId, at: DateTime<Utc>) {
        let readers = self.env.readers.clone();
        tokio::spawn(async move {
            if let Err(error) = readers.touch_last_seen(tenant_id, &reader_id, at).await {
                debug!(%reader_id, %error, "failed to update reader last-seen timestamp");
            }
        });
    }

    fn spawn_ledger_append(&self, movement: MovementRecord) {
        let ledger = self.env.movements.clone();
        tokio::spawn(async move {
            if let Err(error) = ledger.record(&movement).await {
                warn!(
                    tenant_id = %movement.tenant_id,
                    item_id = %movement.item_id,
                    movement_id = %movement.movement_id,
                    %error,
                    "failed to append movement record"
                );
            }
        });
    }

    fn spawn_audit_append(&self, entry: AuditEntry) {
        let audit = self.env.audit.clone();
        tokio::spawn(async move {
            if let Err(error) = audit.record(&entry).await {
                warn!(
                    tenant_id = %entry.tenant_id,
                    actor_id = %entry.actor_id,
                    action = %entry.action,
                    %error,
                    "failed to append audit entry"
                );
            }
        });
    }

    fn spawn_movement_broadcast(
        &self,
        updated: &InventoryItem,
        tag_id: &str,
        location: &LocationView,
        at: DateTime<Utc>,
    ) {
        let realtime = self.env.realtime.clone();
        let tenant_id = updated.tenant_id;
        let event = RealtimeEvent::ItemMovement {
            item_id: updated.item_id,
            name: updated.name.clone(),
            sku: updated.sku.clone(),
            tag_id: Some(tag_id.to_string()),
            status: updated.lifecycle_status,
            quantity: updated.quantity,
            location: location.clone(),
            timestamp: at,
        };
        tokio::spawn(async move {
            let delivered = realtime.publish(tenant_id, event).await;
            debug!(%tenant_id, delivered, "item-movement broadcast");
        });
    }

    fn spawn_alert_dispatch(
        &self,
        plan: &detection::DetectionPlan,
        labels: &LocationLabels,
        tag_id: &str,
        at: DateTime<Utc>,
    ) {
        let users = self.env.users.clone();
        let fanout = NotificationFanout::new(
            self.env.notifications.clone(),
            self.env.push.clone(),
            self.env.realtime.clone(),
        );
        let updated = plan.updated.clone();
        let plan = plan.clone();
        let event = RealtimeEvent::LowStockAlert {
            item_id: updated.item_id,
            name: updated.name.clone(),
            sku: updated.sku.clone(),
            tag_id: Some(tag_id.to_string()),
            quantity: updated.quantity,
            threshold: updated.threshold,
            location: LocationView::new(&updated.location, labels),
            timestamp: at,
        };

        tokio::spawn(async move {
            // Recipients are resolved at notification creation time.
            let recipients = match users.alert_recipients(updated.tenant_id).await {
                Ok(recipients) => recipients,
                Err(error) => {
                    warn!(
                        tenant_id = %updated.tenant_id,
                        item_id = %updated.item_id,
                        %error,
                        "failed to resolve alert recipients"
                    );
                    Vec::new()
                }
            };

            if let Some(notification) = plan.notification(recipients.clone(), at) {
                fanout.dispatch(&notification, &recipients, event).await;
            }
        });
    }
}
