//! C8 — the transactional shared-memory area: T-Vars, optimistic
//! (TL2-style) transactions, and the pessimistic bulk-lock fallback.
//!
//! Grounded on `ractor_space.c`. Every [`Slot`] carries a version stamped
//! at the global counter each time it commits; a [`Transaction`] records
//! the version it read each slot at and, at commit time, locks every
//! touched slot in descending [`SlotIndex`] order (the crate-wide lock
//! order, also used by bulk-lock mode) and validates that no slot's
//! version moved since it was read.

// Layer 1: Standard library imports
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

// Layer 2: Third-party crate imports
use chrono::Utc;
use dashmap::DashMap;
use parking_lot::{Mutex, MutexGuard};

// Layer 3: Internal module imports
use crate::error::RactorError;
use crate::monitoring::{Monitor, MonitorHandle, TransactionEvent, TransactionEventKind};
use crate::util::SlotIndex;
use crate::value::RValue;

#[derive(Debug)]
struct SlotInner {
    value: RValue,
    version: u64,
}

/// A single transactional variable.
///
/// Cloning a `Slot` shares the same storage — it is a handle, not a
/// value — matching how a T-Var reference is shared across Actors in the
/// source system.
#[derive(Debug, Clone)]
pub struct Slot {
    index: SlotIndex,
    inner: Arc<Mutex<SlotInner>>,
}

impl Slot {
    fn new(index: SlotIndex, value: RValue) -> Self {
        Slot {
            index,
            inner: Arc::new(Mutex::new(SlotInner { value, version: 0 })),
        }
    }

    /// This slot's lock-order index.
    pub fn index(&self) -> SlotIndex {
        self.index
    }

    /// Read the current value and version outside any transaction
    /// (uncontended, used by [`atomically`]'s non-transactional callers
    /// and by tests).
    pub fn peek(&self) -> RValue {
        self.inner.lock().value.clone()
    }
}

/// Holds every live [`Slot`], indexed by its lock-order position, plus
/// the global version counter every commit advances.
///
/// One `Space` is normally owned by a [`crate::system::Runtime`] — never
/// exposed as file-scope global state, unlike the single process-wide
/// struct the source system used.
#[derive(Debug, Default)]
pub struct Space {
    slots: DashMap<SlotIndex, Slot>,
    next_index: AtomicU64,
    global_version: AtomicU64,
    transaction_monitor: MonitorHandle<TransactionEvent>,
}

impl Space {
    /// A fresh, empty space with monitoring disabled.
    pub fn new() -> Self {
        Space::default()
    }

    /// A fresh, empty space configured from a [`crate::system::SystemConfig`].
    pub fn with_config(config: &crate::system::SystemConfig) -> Self {
        Space {
            transaction_monitor: MonitorHandle::new(config.enable_monitoring),
            ..Space::default()
        }
    }

    fn record_transaction_event(&self, kind: TransactionEventKind) {
        let _ = self.transaction_monitor.record(TransactionEvent {
            timestamp: Utc::now(),
            event_kind: kind,
            metadata: std::collections::HashMap::new(),
        });
    }

    /// Allocate a new T-Var holding `initial`.
    pub fn new_tvar(&self, initial: RValue) -> Slot {
        let index = SlotIndex::from_raw(self.next_index.fetch_add(1, Ordering::Relaxed));
        let slot = Slot::new(index, initial);
        self.slots.insert(index, slot.clone());
        slot
    }

    /// Number of live T-Vars.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// True if no T-Vars have been allocated.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    fn current_version(&self) -> u64 {
        self.global_version.load(Ordering::SeqCst)
    }

    fn bump_version(&self) -> u64 {
        self.global_version.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Increment fast-path (§4.7): outside any transaction, lock the slot
    /// directly, add `amount` to its integer value, and advance the global
    /// version — skipping `atomically`'s read/validate/retry machinery
    /// entirely. Falls back to a one-element transaction if the add would
    /// overflow `i64`.
    pub fn increment(&self, slot: &Slot, amount: i64) -> Result<(), RactorError> {
        {
            let mut guard = slot.inner.lock();
            match guard.value {
                RValue::Int(ref current) => {
                    let current = *current;
                    if let Some(next) = current.checked_add(amount) {
                        guard.value = RValue::Int(next);
                        guard.version = self.bump_version();
                        return Ok(());
                    }
                }
                _ => {
                    return Err(RactorError::Transaction(format!(
                        "increment: slot {} does not hold an integer",
                        slot.index()
                    )));
                }
            }
        }
        self.atomically(|tx| match tx.read(slot) {
            RValue::Int(n) => {
                tx.write(slot, RValue::Int(n.wrapping_add(amount)));
                Ok(())
            }
            _ => Err(RactorError::Transaction(format!(
                "increment: slot {} does not hold an integer",
                slot.index()
            ))),
        })
    }

    /// Run `body` as an optimistic transaction, retrying automatically on
    /// conflict. `body` receives a [`Transaction`] to read and write
    /// T-Vars through; its return value becomes `atomically`'s, once a
    /// commit succeeds.
    pub fn atomically<T>(
        &self,
        mut body: impl FnMut(&mut Transaction) -> Result<T, RactorError>,
    ) -> Result<T, RactorError> {
        let mut retries = 0u32;
        loop {
            let mut tx = Transaction::new(self.current_version());
            match body(&mut tx) {
                Ok(value) => {
                    if self.try_commit(&tx)? {
                        self.record_transaction_event(TransactionEventKind::Committed { retries });
                        return Ok(value);
                    }
                    // validation failed: another transaction committed a
                    // slot we read; retry with a fresh snapshot.
                    retries += 1;
                    self.record_transaction_event(TransactionEventKind::Retried);
                }
                Err(RactorError::Transaction(ref msg)) if msg.as_str() == RETRY_SENTINEL => {
                    // explicit retry request from `body` (a T-Var read
                    // that wanted a value another transaction hasn't
                    // committed yet)
                    retries += 1;
                    self.record_transaction_event(TransactionEventKind::Retried);
                    std::thread::yield_now();
                }
                Err(other) => return Err(other),
            }
        }
    }

    /// Try to commit `tx`: lock every touched slot in descending index
    /// order (the same order [`Space::lock_all`] uses), validate every
    /// read's recorded version still matches, then write. Returns `false`
    /// (no slots mutated) on validation failure so [`Space::atomically`]
    /// can retry.
    fn try_commit(&self, tx: &Transaction) -> Result<bool, RactorError> {
        let mut indices: Vec<SlotIndex> = tx.reads.keys().chain(tx.writes.keys()).copied().collect();
        indices.sort_by(|a, b| b.cmp(a));
        indices.dedup();

        let mut guards: Vec<(Slot, MutexGuard<'_, SlotInner>)> = Vec::with_capacity(indices.len());
        for index in indices {
            let slot = self.slot(index)?;
            let guard = slot.inner.lock();
            guards.push((slot, guard));
        }

        for (slot, guard) in &guards {
            if let Some(&read_version) = tx.reads.get(&slot.index()) {
                if guard.version != read_version {
                    return Ok(false);
                }
            }
        }

        let new_version = self.bump_version();
        for (slot, guard) in &mut guards {
            if let Some(value) = tx.writes.get(&slot.index()) {
                guard.value = value.clone();
                guard.version = new_version;
            }
        }
        Ok(true)
    }

    fn slot(&self, index: SlotIndex) -> Result<Slot, RactorError> {
        self.slots
            .get(&index)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| RactorError::Transaction(format!("unknown slot {index}")))
    }

    /// Pessimistic bulk-lock mode: lock every named slot up front (in
    /// descending index order, per §5's lock order for this mode) and
    /// run `body` with exclusive access to all of them — no validation,
    /// no retry, because nothing else can touch them meanwhile.
    pub fn lock_all<T>(
        &self,
        slots: &[Slot],
        body: impl FnOnce(&mut BulkLock) -> T,
    ) -> T {
        let mut ordered = slots.to_vec();
        ordered.sort_by(|a, b| b.index().cmp(&a.index()));

        let mut guards: Vec<(Slot, MutexGuard<'_, SlotInner>)> = Vec::with_capacity(ordered.len());
        for slot in &ordered {
            let guard = slot.inner.lock();
            guards.push((slot.clone(), guard));
        }

        let new_version = self.bump_version();
        self.record_transaction_event(TransactionEventKind::BulkLockAcquired {
            slot_count: ordered.len(),
        });
        let mut bulk = BulkLock { guards, new_version };
        body(&mut bulk)
    }
}

const RETRY_SENTINEL: &str = "__retry__";

/// An in-flight optimistic transaction: the read-set versions it must
/// validate at commit and the write-set it will apply if validation
/// passes.
#[derive(Debug, Default)]
pub struct Transaction {
    base_version: u64,
    reads: std::collections::BTreeMap<SlotIndex, u64>,
    writes: std::collections::BTreeMap<SlotIndex, RValue>,
}

impl Transaction {
    fn new(base_version: u64) -> Self {
        Transaction {
            base_version,
            reads: Default::default(),
            writes: Default::default(),
        }
    }

    /// Read a slot's value, recording the version this transaction
    /// observed it at. Uncommitted writes this same transaction already
    /// made are visible (read-your-own-writes).
    pub fn read(&mut self, slot: &Slot) -> RValue {
        if let Some(value) = self.writes.get(&slot.index()) {
            return value.clone();
        }
        let guard = slot.inner.lock();
        self.reads.entry(slot.index()).or_insert(guard.version);
        guard.value.clone()
    }

    /// Stage a write. Not visible to any other transaction until
    /// [`Space::atomically`] commits.
    pub fn write(&mut self, slot: &Slot, value: RValue) {
        self.writes.insert(slot.index(), value);
    }

    /// Ask the enclosing [`Space::atomically`] call to abandon this
    /// attempt and retry with a fresh snapshot, without treating it as
    /// an error. Used when a transaction discovers it wants to wait for
    /// another Actor's commit (e.g. a condition variable built out of
    /// T-Vars).
    pub fn retry(&self) -> RactorError {
        RactorError::Transaction(RETRY_SENTINEL.to_string())
    }

    /// The global version this transaction's snapshot was taken at.
    pub fn base_version(&self) -> u64 {
        self.base_version
    }
}

/// The body callback's view of an active [`Space::lock_all`] bulk lock:
/// every named slot, held exclusively for the duration.
pub struct BulkLock<'a> {
    guards: Vec<(Slot, MutexGuard<'a, SlotInner>)>,
    new_version: u64,
}

impl BulkLock<'_> {
    /// Read a locked slot's current value. Fails with
    /// [`RactorError::Transaction`] if `slot` was not named in the
    /// [`Space::lock_all`] call that produced this lock (growing the
    /// locked set after the fact is a user error, not a process abort).
    pub fn get(&self, slot: &Slot) -> Result<RValue, RactorError> {
        Ok(self.find(slot)?.value.clone())
    }

    /// Write a locked slot, stamping it with this bulk lock's commit
    /// version. Same failure mode as [`BulkLock::get`].
    pub fn set(&mut self, slot: &Slot, value: RValue) -> Result<(), RactorError> {
        let version = self.new_version;
        let entry = self.find_mut(slot)?;
        entry.value = value;
        entry.version = version;
        Ok(())
    }

    fn find(&self, slot: &Slot) -> Result<&SlotInner, RactorError> {
        self.guards
            .iter()
            .find(|(s, _)| s.index() == slot.index())
            .map(|(_, guard)| &**guard)
            .ok_or_else(|| {
                RactorError::Transaction(format!("slot {} not part of this bulk lock", slot.index()))
            })
    }

    fn find_mut(&mut self, slot: &Slot) -> Result<&mut SlotInner, RactorError> {
        match self.guards.iter_mut().find(|(s, _)| s.index() == slot.index()) {
            Some((_, guard)) => Ok(&mut **guard),
            None => Err(RactorError::Transaction(format!(
                "slot {} not part of this bulk lock",
                slot.index()
            ))),
        }
    }
}

/// A mutual-exclusion primitive built directly on one T-Var: `true` means
/// held. Grounded on `ractor_space.c`'s `Lock` built the same way.
#[derive(Debug, Clone)]
pub struct Lock(Slot);

impl Lock {
    /// Allocate a fresh, unheld lock in `space`.
    pub fn new(space: &Space) -> Self {
        Lock(space.new_tvar(RValue::Bool(false)))
    }

    /// Acquire the lock, retrying the enclosing transaction while held by
    /// someone else.
    pub fn acquire(&self, tx: &mut Transaction) -> Result<(), RactorError> {
        match tx.read(&self.0) {
            RValue::Bool(false) => {
                tx.write(&self.0, RValue::Bool(true));
                Ok(())
            }
            _ => Err(tx.retry()),
        }
    }

    /// Release the lock.
    pub fn release(&self, tx: &mut Transaction) {
        tx.write(&self.0, RValue::Bool(false));
    }
}

/// A single-slot latch variable: parks readers (via retry) until some
/// writer supplies a value. Grounded on `ractor_space.c`'s `LVar`.
#[derive(Debug, Clone)]
pub struct LVar(Slot);

impl LVar {
    /// Allocate a fresh, empty latch.
    pub fn new(space: &Space) -> Self {
        LVar(space.new_tvar(RValue::Nil))
    }

    /// Read the latched value, retrying the transaction until one has
    /// been put.
    pub fn get(&self, tx: &mut Transaction) -> Result<RValue, RactorError> {
        match tx.read(&self.0) {
            RValue::Nil => Err(tx.retry()),
            value => Ok(value),
        }
    }

    /// Put a value, waking anyone retrying on [`LVar::get`].
    pub fn put(&self, tx: &mut Transaction, value: RValue) {
        tx.write(&self.0, value);
    }
}
