// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Reconciliation entry points
//!
//! Delivered events, response events, and the one-shot cold-start query all
//! feed the same pipeline: resolve the event against the live collection,
//! apply the reconciler's dedup/lock rules, reschedule repeating alarms,
//! and request navigation for at most one ringing session. Failures in here
//! are logged and swallowed; no synchronous caller is waiting.

use crate::error::EngineError;
use crate::events::EngineEvent;
use crate::service::{AlarmService, Inner};
use chime_adapters::{DeliveryAdapter, NavAdapter, StoreAdapter};
use chime_core::{AlarmId, Clock, DeliveryEvent, Outcome};
use chrono::{DateTime, Utc};

impl<S, D, V, C> AlarmService<S, D, V, C>
where
    S: StoreAdapter,
    D: DeliveryAdapter,
    V: NavAdapter,
    C: Clock,
{
    /// A notification reached the device
    pub async fn handle_delivered(&self, event: DeliveryEvent) {
        let mut inner = self.inner.lock().await;
        let now = self.clock.now();
        self.process_event(&mut inner, &event, now).await;
    }

    /// The user tapped a notification
    pub async fn handle_response(&self, event: DeliveryEvent) {
        let mut inner = self.inner.lock().await;
        let now = self.clock.now();
        self.process_event(&mut inner, &event, now).await;
    }

    /// One-shot cold-start query: if a notification response launched the
    /// app, feed it through the same pipeline.
    pub async fn check_cold_start(&self) {
        match self.delivery.last_response().await {
            Ok(Some(event)) => {
                let mut inner = self.inner.lock().await;
                let now = self.clock.now();
                self.process_event(&mut inner, &event, now).await;
            }
            Ok(None) => {}
            Err(e) => tracing::warn!(error = %e, "cold-start query failed"),
        }
    }

    /// UI confirmation that the ringing screen is presented; releases the
    /// navigation lock.
    pub async fn mark_ringing(&self, id: &AlarmId) {
        let mut inner = self.inner.lock().await;
        inner.reconciler.mark(id);
    }

    /// Dismiss the ringing session for this specific alarm. Always
    /// completes: notification cleanup is best-effort so the UI can never
    /// get stuck unable to dismiss.
    pub async fn clear_ringing(&self, id: &AlarmId) -> bool {
        let mut inner = self.inner.lock().await;
        if !inner.reconciler.clear(id) {
            tracing::debug!(%id, "clear for non-active ringing session ignored");
            return false;
        }

        // Only one alarm rings at a time, so everything still presented
        // belongs to this firing.
        match self.delivery.list_presented().await {
            Ok(handles) => {
                for handle in handles {
                    if let Err(e) = self.delivery.dismiss(&handle).await {
                        tracing::debug!(%handle, error = %e, "failed to dismiss notification");
                    }
                }
            }
            Err(e) => tracing::debug!(error = %e, "failed to list presented notifications"),
        }

        self.emit(EngineEvent::RingingCleared { id: id.clone() });
        true
    }

    /// The alarm currently presented to the user, if any
    pub async fn active_ringing(&self) -> Option<AlarmId> {
        self.inner.lock().await.reconciler.active().cloned()
    }

    pub(crate) async fn process_event(
        &self,
        inner: &mut Inner,
        event: &DeliveryEvent,
        now: DateTime<Utc>,
    ) {
        let outcome = inner.reconciler.resolve(event, &inner.alarms, now);
        match outcome {
            Outcome::Queued => {
                tracing::debug!(handle = %event.handle, source = %event.source, "event queued");
                self.emit(EngineEvent::TriggerQueued {
                    handle: event.handle.clone(),
                });
            }
            Outcome::Discarded(reason) => {
                tracing::debug!(
                    handle = %event.handle,
                    source = %event.source,
                    %reason,
                    "event discarded"
                );
                self.emit(EngineEvent::TriggerDiscarded {
                    handle: event.handle.clone(),
                    reason,
                });
            }
            Outcome::Ring {
                alarm_id,
                reschedule,
            } => {
                if reschedule {
                    // Queue next week's occurrence before the session begins
                    if let Err(e) = self.reschedule_alarm(inner, &alarm_id, now).await {
                        tracing::error!(id = %alarm_id, error = %e, "reschedule before ring failed");
                    }
                }
                match self.nav.navigate_to_ringing(&alarm_id).await {
                    Ok(()) => {
                        tracing::info!(id = %alarm_id, "alarm ringing");
                        self.emit(EngineEvent::AlarmRinging {
                            id: alarm_id.clone(),
                        });
                    }
                    Err(e) => {
                        tracing::error!(id = %alarm_id, error = %e, "navigation failed, rolling back session");
                        inner.reconciler.abort(&alarm_id);
                    }
                }
            }
        }
    }

    /// Cancel-then-schedule an alarm in place (reconciliation path)
    async fn reschedule_alarm(
        &self,
        inner: &mut Inner,
        id: &AlarmId,
        now: DateTime<Utc>,
    ) -> Result<(), EngineError> {
        let Some(index) = inner.alarms.iter().position(|a| &a.id == id) else {
            return Ok(());
        };

        let handles = std::mem::take(&mut inner.alarms[index].scheduled);
        self.scheduler.cancel(id, &handles).await;
        inner.alarms[index].next_trigger_at = None;

        let outcome = self.scheduler.schedule(&inner.alarms[index], now).await?;
        inner.alarms[index].scheduled = outcome.handles;
        inner.alarms[index].next_trigger_at = outcome.next_trigger_at;

        if let Err(e) = self
            .store
            .update(id, inner.alarms[index].to_record())
            .await
        {
            tracing::warn!(%id, error = %e, "failed to persist reschedule");
        }
        self.emit_scheduled(&inner.alarms[index]);
        Ok(())
    }

    /// Retry queued events after the collection changed. Events past the
    /// freshness window were already dropped by the reconciler.
    pub(crate) async fn retry_pending(&self, inner: &mut Inner) {
        let now = self.clock.now();
        let events = inner.reconciler.drain_pending(now);
        for event in events {
            self.process_event(inner, &event, now).await;
        }
    }
}

#[cfg(test)]
#[path = "handler_tests.rs"]
mod tests;
