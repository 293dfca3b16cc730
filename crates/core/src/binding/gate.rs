use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};

use thiserror::Error;

use crate::binding::key::BindKey;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GateError {
    #[error("gate has already been signaled")]
    AlreadySignaled,
}

/// Why a [`Gate::wait_or`] call returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Wake {
    Signaled,
    Cancelled,
}

/// Lock and condition variable shared by every gate of one registry.
///
/// Flags are flipped and re-checked while holding `lock`, so a waiter can never miss a
/// signal between checking its flags and parking.
#[derive(Debug, Default)]
struct Hub {
    lock: Mutex<()>,
    wakeup: Condvar,
}

impl Hub {
    fn lock(&self) -> MutexGuard<'_, ()> {
        self.lock.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn park<'g>(&self, guard: MutexGuard<'g, ()>) -> MutexGuard<'g, ()> {
        self.wakeup
            .wait(guard)
            .unwrap_or_else(PoisonError::into_inner)
    }
}

/// One-shot broadcast signal.
///
/// A gate moves from unsignaled to signaled exactly once and never resets. Any number of
/// waiters may block on it, including ones that arrive after it was signaled.
#[derive(Debug, Clone)]
pub struct Gate {
    signaled: Arc<AtomicBool>,
    hub: Arc<Hub>,
}

impl Gate {
    /// Create a standalone gate on its own hub.
    pub fn new() -> Self {
        Self::on_hub(Arc::new(Hub::default()))
    }

    fn on_hub(hub: Arc<Hub>) -> Self {
        Self {
            signaled: Arc::new(AtomicBool::new(false)),
            hub,
        }
    }

    /// Signal the gate, releasing every current and future waiter.
    pub fn signal(&self) -> Result<(), GateError> {
        let _guard = self.hub.lock();
        if self.signaled.swap(true, Ordering::AcqRel) {
            return Err(GateError::AlreadySignaled);
        }
        self.hub.wakeup.notify_all();
        Ok(())
    }

    /// Whether [`signal`](Self::signal) has been called.
    pub fn is_signaled(&self) -> bool {
        self.signaled.load(Ordering::Acquire)
    }

    /// Block until the gate is signaled.
    pub fn wait(&self) {
        let mut guard = self.hub.lock();
        while !self.is_signaled() {
            guard = self.hub.park(guard);
        }
    }

    /// Block until either this gate or `cancel` is signaled.
    ///
    /// Both gates must come from the same [`GateRegistry`]. When both are already
    /// signaled this gate wins.
    pub fn wait_or(&self, cancel: &Gate) -> Wake {
        debug_assert!(
            Arc::ptr_eq(&self.hub, &cancel.hub),
            "wait_or requires gates from the same registry"
        );
        let mut guard = self.hub.lock();
        loop {
            if self.is_signaled() {
                return Wake::Signaled;
            }
            if cancel.is_signaled() {
                return Wake::Cancelled;
            }
            guard = self.hub.park(guard);
        }
    }

    /// Check if both handles refer to the same gate
    pub fn same_gate(&self, other: &Gate) -> bool {
        Arc::ptr_eq(&self.signaled, &other.signaled)
    }
}

impl Default for Gate {
    fn default() -> Self {
        Self::new()
    }
}

/// Lazily creates exactly one [`Gate`] per [`BindKey`].
#[derive(Debug, Default)]
pub struct GateRegistry {
    hub: Arc<Hub>,
    gates: Mutex<HashMap<BindKey, Gate>>,
}

impl GateRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The gate for `key`, created on first access.
    pub fn get(&self, key: &BindKey) -> Gate {
        let mut gates = self.gates.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(gate) = gates.get(key) {
            return gate.clone();
        }
        let gate = Gate::on_hub(self.hub.clone());
        gates.insert(key.clone(), gate.clone());
        gate
    }

    /// A gate that shares this registry's hub but is not keyed.
    pub fn detached(&self) -> Gate {
        Gate::on_hub(self.hub.clone())
    }

    pub fn len(&self) -> usize {
        self.gates
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;
    use std::time::Duration;

    #[test]
    fn test_signal_is_one_way() {
        let gate = Gate::new();
        assert!(!gate.is_signaled());
        assert_eq!(gate.signal(), Ok(()));
        assert!(gate.is_signaled());
        assert_eq!(gate.signal(), Err(GateError::AlreadySignaled));
        assert!(gate.is_signaled());
    }

    #[test]
    fn test_late_waiter_is_released_immediately() {
        let gate = Gate::new();
        gate.signal().unwrap();
        gate.wait();
        gate.wait();
    }

    #[test]
    fn test_signal_wakes_every_waiter() {
        let registry = GateRegistry::new();
        let gate = registry.get(&BindKey::of::<String>());

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let gate = gate.clone();
                thread::spawn(move || gate.wait())
            })
            .collect();

        thread::sleep(Duration::from_millis(20));
        gate.signal().unwrap();

        for handle in handles {
            handle.join().expect("waiter should be released");
        }
    }

    #[test]
    fn test_wait_or_cancel() {
        let registry = GateRegistry::new();
        let gate = registry.get(&BindKey::of::<u8>());
        let cancel = registry.detached();

        let waiter = {
            let gate = gate.clone();
            let cancel = cancel.clone();
            thread::spawn(move || gate.wait_or(&cancel))
        };

        thread::sleep(Duration::from_millis(20));
        cancel.signal().unwrap();
        assert_eq!(waiter.join().unwrap(), Wake::Cancelled);
        assert!(!gate.is_signaled());
    }

    #[test]
    fn test_signaled_gate_wins_over_cancel() {
        let registry = GateRegistry::new();
        let gate = registry.get(&BindKey::of::<u8>());
        let cancel = registry.detached();
        gate.signal().unwrap();
        cancel.signal().unwrap();
        assert_eq!(gate.wait_or(&cancel), Wake::Signaled);
    }

    #[test]
    fn test_registry_creates_one_gate_per_key() {
        let registry = Arc::new(GateRegistry::new());
        let key = BindKey::named::<String>("shared");

        let handles: Vec<_> = (0..16)
            .map(|_| {
                let registry = registry.clone();
                let key = key.clone();
                thread::spawn(move || registry.get(&key))
            })
            .collect();
        let gates: Vec<Gate> = handles.into_iter().map(|h| h.join().unwrap()).collect();

        assert_eq!(registry.len(), 1);
        assert!(gates.iter().all(|gate| gate.same_gate(&gates[0])));

        let other = registry.get(&BindKey::named::<String>("other"));
        assert!(!other.same_gate(&gates[0]));
        assert_eq!(registry.len(), 2);
    }
}
