//! The orchestrating context.
//!
//! `Registry` owns the record store, the request queue, the undo/redo
//! journal over that queue and the request-id allocator. Every operation
//! runs to completion against those four before returning; queue mutations
//! that should be undoable always go through the journal.

use roster_queue::{
    Mutation, MutationLog, PriorityQueue, QueueError, Request, RequestId, RequestIds, load_queue,
    save_queue,
};
use roster_store::{
    InOrder, IntegrityReport, OrderedStore, Record, RecordKey, StoreError, check_store,
    load_store, normalize_course_code, save_store, store_snapshot_ref, validate_contact,
    validate_course_code,
};
use roster_views::OrderingView;
use tracing::{info, warn};

use crate::config::RegistryConfig;
use crate::error::RegistryError;
use crate::logging::init_logging;

/// A request to be queued; the registry assigns its id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRequest {
    pub record_key: RecordKey,
    pub kind: String,
    pub priority: i32,
    pub details: String,
}

impl NewRequest {
    pub fn new(
        record_key: RecordKey,
        kind: impl Into<String>,
        priority: i32,
        details: impl Into<String>,
    ) -> Self {
        Self {
            record_key,
            kind: kind.into(),
            priority,
            details: details.into(),
        }
    }
}

#[derive(Debug)]
pub struct Registry {
    config: RegistryConfig,
    store: OrderedStore,
    queue: PriorityQueue,
    log: MutationLog,
    ids: RequestIds,
}

impl Registry {
    /// An empty registry. Nothing is read from disk.
    pub fn new(config: RegistryConfig) -> Self {
        Self {
            config,
            store: OrderedStore::new(),
            queue: PriorityQueue::new(),
            log: MutationLog::new(),
            ids: RequestIds::new(),
        }
    }

    /// Load whichever of the two data files exist.
    ///
    /// Installs the process subscriber from `log_filter` unless one is
    /// already in place. The journal always starts empty: undo history does
    /// not survive a restart.
    pub fn open(config: RegistryConfig) -> Result<Self, RegistryError> {
        init_logging(&config.log_filter);
        let mut registry = Self::new(config);
        if registry.config.records_path.exists() {
            registry.store = load_store(&registry.config.records_path)?;
        }
        if registry.config.requests_path.exists() {
            registry.queue = load_queue(&registry.config.requests_path)?;
        }
        for request in registry.queue.list_all() {
            registry.ids.observe(request.id());
        }

        let orphaned = registry
            .queue
            .list_all()
            .into_iter()
            .filter(|request| !registry.store.contains(request.record_key))
            .count();
        if orphaned > 0 {
            warn!(count = orphaned, "loaded requests reference missing records");
        }

        info!(
            records = registry.store.len(),
            requests = registry.queue.len(),
            next_request_id = %registry.ids.peek_next(),
            "registry opened"
        );
        Ok(registry)
    }

    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    pub fn store(&self) -> &OrderedStore {
        &self.store
    }

    pub fn queue(&self) -> &PriorityQueue {
        &self.queue
    }

    // -- records -----------------------------------------------------------

    /// Insert a new record. Seeded course codes are stored normalized.
    pub fn create_record(&mut self, mut record: Record) -> Result<(), RegistryError> {
        if self.config.validate_fields {
            if !record.contact.is_empty() {
                validate_contact(&record.contact)?;
            }
            record.map_courses(validate_course_code)?;
        } else {
            record.map_courses(|course| Ok::<_, RegistryError>(normalize_course_code(course)))?;
        }
        let key = record.key();
        self.store.insert(record)?;
        info!(key, "record created");
        Ok(())
    }

    pub fn record(&self, key: RecordKey) -> Option<&Record> {
        self.store.search(key)
    }

    pub fn contains(&self, key: RecordKey) -> bool {
        self.store.contains(key)
    }

    pub fn record_count(&self) -> usize {
        self.store.len()
    }

    /// Ascending by key.
    pub fn records(&self) -> InOrder<'_> {
        self.store.in_order()
    }

    pub fn find_by_name(&self, name: &str) -> Vec<&Record> {
        self.store.find_by_name(name)
    }

    /// Delete a record together with every request it still owns.
    ///
    /// Journal entries for the record's requests are dropped as well, served
    /// ones included, so a later undo cannot bring back a request for a
    /// record that is gone.
    pub fn delete_record(&mut self, key: RecordKey) -> Result<Record, RegistryError> {
        let record = self
            .store
            .delete(key)
            .ok_or(StoreError::RecordNotFound(key))?;
        let cancelled = self.cancel_requests_for(key);
        let forgotten = self.log.forget_record(key);
        info!(key, cancelled = cancelled.len(), forgotten, "record deleted");
        Ok(record)
    }

    /// Add a course to a record. Returns the code as stored.
    pub fn enroll(&mut self, key: RecordKey, course: &str) -> Result<String, RegistryError> {
        let code = if self.config.validate_fields {
            validate_course_code(course)?
        } else {
            normalize_course_code(course)
        };
        self.store.add_course(key, code.as_str())?;
        Ok(code)
    }

    pub fn withdraw(&mut self, key: RecordKey, course: &str) -> Result<(), RegistryError> {
        let code = normalize_course_code(course);
        self.store.remove_course(key, &code)?;
        Ok(())
    }

    /// Records copied out of the store in the order `view` defines.
    pub fn ordered(&self, view: OrderingView) -> Vec<Record> {
        let snapshot = self.store.snapshot();
        view.apply(&snapshot).into_iter().cloned().collect()
    }

    // -- requests ----------------------------------------------------------

    pub fn submit_request(&mut self, draft: NewRequest) -> Result<RequestId, RegistryError> {
        if !self.store.contains(draft.record_key) {
            return Err(StoreError::RecordNotFound(draft.record_key).into());
        }
        let id = self.ids.issue();
        let request = Request::new(id, draft.record_key, draft.kind, draft.priority, draft.details);
        self.log.enqueue(&mut self.queue, request)?;
        info!(request_id = %id, record_key = draft.record_key, "request submitted");
        Ok(id)
    }

    /// Queue several requests. Every owning record is checked before any
    /// request is queued, so a missing record queues nothing.
    pub fn submit_requests(
        &mut self,
        drafts: impl IntoIterator<Item = NewRequest>,
    ) -> Result<Vec<RequestId>, RegistryError> {
        let drafts: Vec<NewRequest> = drafts.into_iter().collect();
        if let Some(missing) = drafts
            .iter()
            .find(|draft| !self.store.contains(draft.record_key))
        {
            return Err(StoreError::RecordNotFound(missing.record_key).into());
        }
        drafts
            .into_iter()
            .map(|draft| self.submit_request(draft))
            .collect()
    }

    /// Dequeue the most urgent request.
    pub fn serve_next(&mut self) -> Result<Request, RegistryError> {
        let request = self
            .log
            .dequeue(&mut self.queue)
            .ok_or(QueueError::EmptyQueue)?;
        info!(request_id = %request.id(), "request served");
        Ok(request)
    }

    pub fn peek_next(&self) -> Option<&Request> {
        self.queue.peek()
    }

    pub fn pending_len(&self) -> usize {
        self.queue.len()
    }

    /// Pending requests in serving order.
    pub fn pending(&self) -> Vec<&Request> {
        self.queue.list_all()
    }

    /// Withdraw a pending request. Not undoable.
    pub fn cancel_request(&mut self, id: RequestId) -> Result<Request, RegistryError> {
        let request = self
            .queue
            .remove_by_request_id(id)
            .ok_or(QueueError::RequestNotFound(id))?;
        self.log.forget(id);
        info!(request_id = %id, "request cancelled");
        Ok(request)
    }

    /// Withdraw every pending request owned by `key`, in serving order.
    pub fn cancel_requests_for(&mut self, key: RecordKey) -> Vec<Request> {
        let removed = self.queue.remove_by_record_key(key);
        for request in &removed {
            self.log.forget(request.id());
        }
        removed
    }

    pub fn undo(&mut self) -> Result<Mutation, RegistryError> {
        Ok(self.log.undo(&mut self.queue)?)
    }

    pub fn redo(&mut self) -> Result<Mutation, RegistryError> {
        Ok(self.log.redo(&mut self.queue)?)
    }

    pub fn can_undo(&self) -> bool {
        self.log.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.log.can_redo()
    }

    // -- persistence and checks ----------------------------------------------

    /// Write both data files at the configured paths.
    pub fn save(&self) -> Result<(), RegistryError> {
        save_store(&self.config.records_path, &self.store)?;
        save_queue(&self.config.requests_path, &self.queue)?;
        Ok(())
    }

    /// Deterministic reference for the current record state.
    pub fn snapshot_ref(&self) -> String {
        store_snapshot_ref(&self.store)
    }

    pub fn check_integrity(&self) -> IntegrityReport {
        check_store(&self.store)
    }
}
