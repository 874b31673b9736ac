//! Per-operation in-flight tracking.
//!
//! A [`Gate`] hands out one token per operation name at a time. Holding the
//! token marks the operation as in flight; dropping it frees the slot. A
//! second identical operation while one is pending is rejected instead of
//! relying on caller discipline.

use std::collections::HashSet;
use std::sync::Mutex;

use crate::error::Error;

#[derive(Default)]
pub(crate) struct Gate {
    active: Mutex<HashSet<&'static str>>,
}

impl Gate {
    /// Mark `op` as in flight, failing if it already is. The returned token
    /// releases the slot on drop.
    pub(crate) fn begin(&self, op: &'static str) -> Result<GateToken<'_>, Error> {
        let mut active = self.active.lock().unwrap_or_else(|e| e.into_inner());
        if !active.insert(op) {
            return Err(Error::InFlight(op));
        }
        Ok(GateToken { gate: self, op })
    }
}

pub(crate) struct GateToken<'a> {
    gate: &'a Gate,
    op: &'static str,
}

impl Drop for GateToken<'_> {
    fn drop(&mut self) {
        let mut active = self
            .gate
            .active
            .lock()
            .unwrap_or_else(|e| e.into_inner());
        active.remove(self.op);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_identical_operation_is_rejected() {
        let gate = Gate::default();

        let token = gate.begin("disks").unwrap();
        assert!(matches!(gate.begin("disks"), Err(Error::InFlight("disks"))));
        drop(token);
    }

    #[test]
    fn distinct_operations_do_not_collide() {
        let gate = Gate::default();

        let _disks = gate.begin("disks").unwrap();
        assert!(gate.begin("partitions").is_ok());
    }

    #[test]
    fn slot_is_freed_on_drop() {
        let gate = Gate::default();

        drop(gate.begin("search").unwrap());
        assert!(gate.begin("search").is_ok());
    }
}
