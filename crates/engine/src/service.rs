// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Alarm service: the owned collection plus CRUD orchestration
//!
//! One `AlarmService` is constructed at process start and injected wherever
//! alarm operations are needed. The alarm collection and the reconciler sit
//! behind a single async mutex, so user-driven CRUD calls and the
//! asynchronous delivery/response sources serialize instead of racing on the
//! lock flags or on cancel-then-reschedule.

use crate::error::EngineError;
use crate::events::EngineEvent;
use crate::scheduler::NotificationScheduler;
use chime_adapters::{DeliveryAdapter, NavAdapter, StoreAdapter};
use chime_core::{
    Alarm, AlarmDraft, AlarmId, AlarmPatch, Clock, EngineConfig, Reconciler,
};
use tokio::sync::{broadcast, Mutex};

pub(crate) struct Inner {
    pub(crate) alarms: Vec<Alarm>,
    pub(crate) reconciler: Reconciler,
}

/// The alarm engine's service object
pub struct AlarmService<S, D, V, C> {
    pub(crate) store: S,
    pub(crate) delivery: D,
    pub(crate) scheduler: NotificationScheduler<D>,
    pub(crate) nav: V,
    pub(crate) clock: C,
    pub(crate) inner: Mutex<Inner>,
    events: broadcast::Sender<EngineEvent>,
}

impl<S, D, V, C> AlarmService<S, D, V, C>
where
    S: StoreAdapter,
    D: DeliveryAdapter,
    V: NavAdapter,
    C: Clock,
{
    pub fn new(store: S, delivery: D, nav: V, clock: C, config: EngineConfig) -> Self {
        let (events, _) = broadcast::channel(64);
        Self {
            scheduler: NotificationScheduler::new(delivery.clone(), &config),
            store,
            delivery,
            nav,
            clock,
            inner: Mutex::new(Inner {
                alarms: Vec::new(),
                reconciler: Reconciler::new(&config),
            }),
            events,
        }
    }

    /// Subscribe to engine events
    pub fn events(&self) -> broadcast::Receiver<EngineEvent> {
        self.events.subscribe()
    }

    pub(crate) fn emit(&self, event: EngineEvent) {
        tracing::debug!(event = event.name(), "engine event");
        let _ = self.events.send(event);
    }

    /// Snapshot of the alarm collection
    pub async fn alarms(&self) -> Vec<Alarm> {
        self.inner.lock().await.alarms.clone()
    }

    /// Look up one alarm
    pub async fn get(&self, id: &AlarmId) -> Option<Alarm> {
        self.inner
            .lock()
            .await
            .alarms
            .iter()
            .find(|a| &a.id == id)
            .cloned()
    }

    /// Sync the collection from the store on startup. Stale handles
    /// persisted by a previous process are cancelled, and enabled alarms are
    /// rescheduled from scratch. Per-alarm scheduling problems degrade to
    /// "alarm may not fire" with a diagnostic; only the initial list fails
    /// the call.
    pub async fn load(&self, owner: &str) -> Result<Vec<Alarm>, EngineError> {
        let records = self.store.list(owner).await?;
        let mut inner = self.inner.lock().await;
        let now = self.clock.now();

        let mut alarms = Vec::with_capacity(records.len());
        for record in records {
            let mut alarm = Alarm::from_record(record);
            if !alarm.scheduled.is_empty() {
                let handles = std::mem::take(&mut alarm.scheduled);
                self.scheduler.cancel(&alarm.id, &handles).await;
                alarm.next_trigger_at = None;
            }
            if alarm.enabled {
                match self.scheduler.schedule(&alarm, now).await {
                    Ok(outcome) => {
                        alarm.scheduled = outcome.handles;
                        alarm.next_trigger_at = outcome.next_trigger_at;
                        self.emit_scheduled(&alarm);
                    }
                    Err(e) => {
                        tracing::error!(id = %alarm.id, error = %e, "failed to reschedule on load");
                    }
                }
                if let Err(e) = self.store.update(&alarm.id, alarm.to_record()).await {
                    tracing::warn!(id = %alarm.id, error = %e, "failed to persist restored handles");
                }
            }
            alarms.push(alarm);
        }

        inner.alarms = alarms.clone();
        self.retry_pending(&mut inner).await;
        Ok(alarms)
    }

    /// Create an alarm: validate, persist, schedule if enabled, append.
    ///
    /// Validation rejects before any side effect. A scheduling failure still
    /// leaves the persisted alarm in the collection (unscheduled, never
    /// silently dropped) and is surfaced to the caller.
    pub async fn create(&self, draft: AlarmDraft) -> Result<Alarm, EngineError> {
        draft.validate()?;
        let mut inner = self.inner.lock().await;

        let record = self.store.create(draft.to_record()).await?;
        let mut alarm = Alarm::from_record(record);

        if alarm.enabled {
            let now = self.clock.now();
            match self.scheduler.schedule(&alarm, now).await {
                Ok(outcome) => {
                    alarm.scheduled = outcome.handles;
                    alarm.next_trigger_at = outcome.next_trigger_at;
                    if let Err(e) = self.store.update(&alarm.id, alarm.to_record()).await {
                        tracing::warn!(id = %alarm.id, error = %e, "failed to persist trigger handles");
                    }
                    self.emit_scheduled(&alarm);
                }
                Err(e) => {
                    inner.alarms.push(alarm.clone());
                    self.emit(EngineEvent::AlarmCreated {
                        id: alarm.id.clone(),
                    });
                    return Err(e.into());
                }
            }
        }

        inner.alarms.push(alarm.clone());
        self.emit(EngineEvent::AlarmCreated {
            id: alarm.id.clone(),
        });
        self.retry_pending(&mut inner).await;
        Ok(alarm)
    }

    /// Update an alarm: cancel outstanding triggers unconditionally, merge
    /// the patch, reschedule if enabled, persist, replace. Unknown ids are a
    /// no-op.
    pub async fn update(
        &self,
        id: &AlarmId,
        patch: AlarmPatch,
    ) -> Result<Option<Alarm>, EngineError> {
        let mut inner = self.inner.lock().await;
        let Some(index) = inner.alarms.iter().position(|a| &a.id == id) else {
            tracing::debug!(%id, "update for unknown alarm ignored");
            return Ok(None);
        };

        let existing = inner.alarms[index].clone();
        let mut merged = patch.apply(&existing)?;

        // Cancel-then-reschedule even when the patch does not touch the
        // time fields; always correct beats incremental.
        self.scheduler.cancel(id, &existing.scheduled).await;
        merged.scheduled.clear();
        merged.next_trigger_at = None;

        if merged.enabled {
            let now = self.clock.now();
            match self.scheduler.schedule(&merged, now).await {
                Ok(outcome) => {
                    merged.scheduled = outcome.handles;
                    merged.next_trigger_at = outcome.next_trigger_at;
                    self.emit_scheduled(&merged);
                }
                Err(e) => {
                    inner.alarms[index] = merged.clone();
                    if let Err(persist) = self.store.update(id, merged.to_record()).await {
                        tracing::warn!(%id, error = %persist, "failed to persist after scheduling failure");
                    }
                    return Err(e.into());
                }
            }
        }

        inner.alarms[index] = merged.clone();
        self.store.update(id, merged.to_record()).await?;
        self.emit(EngineEvent::AlarmUpdated { id: id.clone() });
        self.retry_pending(&mut inner).await;
        Ok(Some(merged))
    }

    /// Delete an alarm: cancel outstanding triggers, delete from the store,
    /// remove from the collection. Returns `false` for unknown ids.
    pub async fn delete(&self, id: &AlarmId) -> Result<bool, EngineError> {
        let mut inner = self.inner.lock().await;
        let Some(index) = inner.alarms.iter().position(|a| &a.id == id) else {
            return Ok(false);
        };

        let handles = std::mem::take(&mut inner.alarms[index].scheduled);
        self.scheduler.cancel(id, &handles).await;
        self.store.delete(id).await?;
        inner.alarms.remove(index);
        self.emit(EngineEvent::AlarmDeleted { id: id.clone() });
        self.retry_pending(&mut inner).await;
        Ok(true)
    }

    /// Sugar for an enabled-only update
    pub async fn toggle(
        &self,
        id: &AlarmId,
        enabled: bool,
    ) -> Result<Option<Alarm>, EngineError> {
        self.update(id, AlarmPatch::new().enabled(enabled)).await
    }

    /// Cancel outstanding triggers without disabling the alarm. Used when
    /// the ringing flow takes over the current firing so the delivery layer
    /// does not re-fire it. Persistence only sees the cleared trigger list.
    pub async fn cancel_future_triggers(&self, id: &AlarmId) -> Result<bool, EngineError> {
        let mut inner = self.inner.lock().await;
        let Some(index) = inner.alarms.iter().position(|a| &a.id == id) else {
            return Ok(false);
        };

        let handles = std::mem::take(&mut inner.alarms[index].scheduled);
        inner.alarms[index].next_trigger_at = None;
        self.scheduler.cancel(id, &handles).await;

        let record = inner.alarms[index].to_record();
        if let Err(e) = self.store.update(id, record).await {
            tracing::warn!(%id, error = %e, "failed to persist cleared trigger list");
        }
        Ok(true)
    }

    pub(crate) fn emit_scheduled(&self, alarm: &Alarm) {
        if let Some(next_trigger_at) = alarm.next_trigger_at {
            self.emit(EngineEvent::AlarmScheduled {
                id: alarm.id.clone(),
                next_trigger_at,
                deliveries: alarm.scheduled.len(),
            });
        }
    }
}

#[cfg(test)]
#[path = "service_tests.rs"]
mod tests;
