use std::sync::mpsc;
use std::thread::{self, ScopedJoinHandle};

use tracing::Span;
use uuid::Uuid;

use crate::binding::{
    BindKey, BindSummary, Binder, FieldStore, Gate, GateRegistry, StoreError, Wake,
};
use crate::errors::{AggregateBindingError, BindError};
use crate::modules::{Field, Module, Role, Slot};
use crate::producers::{INJECT_TAG, PROVIDE_TAG};

/// Emit a binding event at info level when tracing is enabled, debug otherwise.
macro_rules! bind_event {
    ($ctx:expr, $($arg:tt)+) => {
        if $ctx.binder.config().trace_bindings {
            tracing::info!(target: "modbind", $($arg)+)
        } else {
            tracing::debug!(target: "modbind", $($arg)+)
        }
    };
}

/// How an inject waiter finished.
enum Injection {
    Injected,
    Unbound(BindKey),
}

/// State owned by a single bind call.
pub(crate) struct BindContext<'b> {
    id: Uuid,
    binder: &'b Binder,
    store: FieldStore,
    gates: GateRegistry,
    cancel: Gate,
}

impl<'b> BindContext<'b> {
    pub(crate) fn new(binder: &'b Binder) -> Self {
        let gates = GateRegistry::new();
        let cancel = gates.detached();
        Self {
            id: Uuid::new_v4(),
            binder,
            store: FieldStore::new(),
            gates,
            cancel,
        }
    }

    /// Run the provide/inject scan over `modules` in order.
    ///
    /// Every inject field gets its own waiter thread, so providers may appear before or
    /// after their consumers. The call returns once every waiter has finished.
    pub(crate) fn run(&self, modules: &mut [&mut dyn Module]) -> Result<BindSummary, BindError> {
        let span = tracing::debug_span!("bind", bind_id = %self.id, modules = modules.len());
        let _entered = span.enter();

        check_roles(modules)?;

        thread::scope(move |scope| {
            let (errors_tx, errors_rx) = mpsc::channel::<BindError>();
            let collector = scope.spawn(move || errors_rx.into_iter().collect::<Vec<_>>());

            let mut summary = BindSummary::default();
            let mut waiters: Vec<(BindKey, ScopedJoinHandle<'_, Result<Injection, BindError>>)> =
                Vec::new();

            for module in modules {
                let module = &mut **module;
                let module_name = module.name();

                if let Some(provider) = module.as_provider() {
                    if let Err(source) = provider.provide() {
                        tracing::warn!(
                            target: "modbind",
                            module = module_name,
                            "provide() failed: {}",
                            source
                        );
                        self.raise_cancel();
                        for (_, waiter) in waiters {
                            let _ = waiter.join();
                        }
                        return Err(BindError::provider(module_name, source));
                    }
                }

                for field in module.fields() {
                    match field.role() {
                        Role::Inject { name } => {
                            let key = BindKey::from_parts(field.key_type(), name);
                            if !field.is_writable() {
                                let _ = errors_tx.send(BindError::FieldAccess {
                                    module: module_name.to_string(),
                                    field: field.name().to_string(),
                                    key,
                                });
                                continue;
                            }

                            let gate = self.gates.get(&key);
                            let field_name = field.name();
                            let slot = field.into_slot();
                            let waiter_span = Span::current();
                            let waiter_key = key.clone();
                            let handle = scope.spawn(move || {
                                waiter_span.in_scope(|| {
                                    self.await_injection(module_name, field_name, key, gate, slot)
                                })
                            });
                            waiters.push((waiter_key, handle));
                        }
                        Role::Provide { .. } => match self.provide(module_name, field) {
                            Ok(true) => summary.provided += 1,
                            Ok(false) => {}
                            Err(error) => {
                                let _ = errors_tx.send(error);
                            }
                        },
                        Role::Conflict | Role::Untagged => {}
                    }
                }
            }

            self.raise_cancel();

            for (key, waiter) in waiters {
                match waiter.join() {
                    Ok(Ok(Injection::Injected)) => summary.injected += 1,
                    Ok(Ok(Injection::Unbound(key))) => summary.unbound.push(key),
                    Ok(Err(error)) => {
                        let _ = errors_tx.send(error);
                    }
                    Err(_) => {
                        tracing::error!(target: "modbind", "injection of {} panicked", key);
                        let _ = errors_tx.send(BindError::WaiterPanicked { key });
                    }
                }
            }

            drop(errors_tx);
            let errors = collected_errors(collector.join());

            if errors.is_empty() {
                tracing::debug!(
                    target: "modbind",
                    provided = summary.provided,
                    injected = summary.injected,
                    unbound = summary.unbound.len(),
                    "bind complete"
                );
                Ok(summary)
            } else {
                Err(AggregateBindingError::new(errors).into())
            }
        })
    }

    /// Produce, store, and announce the value of one provide field.
    ///
    /// Returns whether a value was stored. The key's gate is signaled only once a value is
    /// in the store; a failed or empty provide leaves waiters to a later provider or to
    /// cancellation.
    fn provide(&self, module: &'static str, mut field: Field<'_>) -> Result<bool, BindError> {
        let role = field.role();
        let Role::Provide { name, .. } = &role else {
            return Ok(false);
        };
        let key = BindKey::from_parts(field.key_type(), name.as_str());
        let field_name = field.name();

        let (tag, slot) = field.split_mut();
        for (tag_key, option) in tag.pairs() {
            if tag_key == PROVIDE_TAG || tag_key == INJECT_TAG {
                continue;
            }
            let Some(producer) = self.binder.producers().get(tag_key) else {
                continue;
            };

            let produced = producer
                .attempt(&slot.kind(), option)
                .and_then(|value| match value {
                    Some(value) => slot.set_produced(value).map(|()| true),
                    None => Ok(false),
                });
            match produced {
                Ok(true) => {
                    bind_event!(self, module, field = field_name, "{} produced {}", tag_key, key);
                    break;
                }
                Ok(false) => continue,
                Err(source) => {
                    return Err(BindError::Produce {
                        module: module.to_string(),
                        field: field_name.to_string(),
                        key,
                        tag_key: tag_key.to_string(),
                        source,
                    });
                }
            }
        }

        let singleton = role.is_singleton();
        let Some(value) = slot.snapshot(singleton) else {
            bind_event!(self, module, field = field_name, "nothing to provide for {}", key);
            return Ok(false);
        };
        if singleton && slot.kind().is_function() {
            bind_event!(self, module, field = field_name, "{} wrapped as singleton", key);
        }

        if let Err(StoreError::Occupied { key }) = self.store.set(key.clone(), value) {
            return Err(BindError::DuplicateProvide {
                module: module.to_string(),
                field: field_name.to_string(),
                key,
            });
        }
        bind_event!(self, module, "{}.{} -> {}", module, field_name, key);
        self.release(&self.gates.get(&key));
        Ok(true)
    }

    /// Block until `gate` or cancellation, then copy the stored value into `slot`.
    fn await_injection(
        &self,
        module: &'static str,
        field: &'static str,
        key: BindKey,
        gate: Gate,
        mut slot: Box<dyn Slot + '_>,
    ) -> Result<Injection, BindError> {
        if gate.wait_or(&self.cancel) == Wake::Cancelled {
            bind_event!(self, module, field, "nothing bound to {}", key);
            return Ok(Injection::Unbound(key));
        }

        let Some(value) = self.store.get(&key) else {
            bind_event!(self, module, field, "nothing bound to {}", key);
            return Ok(Injection::Unbound(key));
        };
        if !slot.inject(&value) {
            return Err(BindError::FieldAccess {
                module: module.to_string(),
                field: field.to_string(),
                key,
            });
        }
        bind_event!(self, module, "{}.{} <- {}", module, field, key);
        Ok(Injection::Injected)
    }

    fn release(&self, gate: &Gate) {
        if gate.signal().is_err() {
            tracing::warn!(target: "modbind", bind_id = %self.id, "gate signaled twice");
        }
    }

    fn raise_cancel(&self) {
        if self.cancel.signal().is_ok() {
            tracing::trace!(target: "modbind", "cancellation raised");
        }
    }
}

/// Errors gathered by the collector thread, or a single failure if it panicked.
fn collected_errors(joined: thread::Result<Vec<BindError>>) -> Vec<BindError> {
    match joined {
        Ok(errors) => errors,
        Err(_) => {
            tracing::error!(target: "modbind", "error collector panicked");
            vec![BindError::CollectorPanicked]
        }
    }
}

/// Reject any field tagged both provide and inject before binding starts.
fn check_roles(modules: &mut [&mut dyn Module]) -> Result<(), BindError> {
    for module in modules.iter_mut() {
        let name = module.name();
        for field in module.fields() {
            if field.role() == Role::Conflict {
                return Err(BindError::role_conflict(name, field.name()));
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collected_errors_pass_through() {
        let errors = collected_errors(Ok(vec![BindError::role_conflict("m", "f")]));
        assert_eq!(errors.len(), 1);
        assert!(errors[0].is_role_conflict());
        assert!(collected_errors(Ok(Vec::new())).is_empty());
    }

    #[test]
    fn test_collector_panic_is_not_silent() {
        let joined = thread::spawn(|| -> Vec<BindError> { panic!("collector lost") }).join();
        let errors = collected_errors(joined);
        assert_eq!(errors.len(), 1);
        assert!(matches!(errors[0], BindError::CollectorPanicked));
    }
}
