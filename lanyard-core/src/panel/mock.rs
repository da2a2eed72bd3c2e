//! Recording panel interface for host tests

use alloc::rc::Rc;
use alloc::vec::Vec;
use core::cell::RefCell;

use embassy_time::Duration;

use crate::traits::{PanelError, PanelInterface};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PanelOp {
    Reset,
    Command(u8),
    Data(Vec<u8>),
    WaitIdle,
    Delay(u32),
}

#[derive(Default)]
struct Inner {
    ops: Vec<PanelOp>,
    stuck_busy: bool,
    commands_before_failure: Option<usize>,
    commands_sent: usize,
}

/// Shared view of everything the mock has been asked to do
#[derive(Clone, Default)]
pub struct OpLog(Rc<RefCell<Inner>>);

impl OpLog {
    pub fn ops(&self) -> Vec<PanelOp> {
        self.0.borrow().ops.clone()
    }

    pub fn clear(&self) {
        self.0.borrow_mut().ops.clear();
    }

    pub fn commands(&self) -> Vec<u8> {
        self.0
            .borrow()
            .ops
            .iter()
            .filter_map(|op| match op {
                PanelOp::Command(c) => Some(*c),
                _ => None,
            })
            .collect()
    }

    /// Data bytes following the last occurrence of `command`
    pub fn data_after(&self, command: u8) -> Vec<u8> {
        let inner = self.0.borrow();
        let Some(start) = inner
            .ops
            .iter()
            .rposition(|op| *op == PanelOp::Command(command))
        else {
            return Vec::new();
        };
        let mut out = Vec::new();
        for op in &inner.ops[start + 1..] {
            match op {
                PanelOp::Data(d) => out.extend_from_slice(d),
                PanelOp::Command(_) => break,
                _ => {}
            }
        }
        out
    }

    pub fn count(&self, f: impl Fn(&PanelOp) -> bool) -> usize {
        self.0.borrow().ops.iter().filter(|op| f(op)).count()
    }

    /// Make every busy wait time out
    pub fn set_stuck_busy(&self, stuck: bool) {
        self.0.borrow_mut().stuck_busy = stuck;
    }

    /// Let `n` commands through, then fail every command with a bus error
    pub fn fail_bus_after(&self, n: usize) {
        let mut inner = self.0.borrow_mut();
        inner.commands_before_failure = Some(n);
        inner.commands_sent = 0;
    }
}

pub struct MockPanel {
    log: OpLog,
}

impl MockPanel {
    pub fn new() -> (Self, OpLog) {
        let log = OpLog::default();
        (Self { log: log.clone() }, log)
    }

    fn push(&self, op: PanelOp) {
        self.log.0.borrow_mut().ops.push(op);
    }
}

impl PanelInterface for MockPanel {
    async fn reset(&mut self) -> Result<(), PanelError> {
        self.push(PanelOp::Reset);
        Ok(())
    }

    async fn send_command(&mut self, command: u8) -> Result<(), PanelError> {
        {
            let mut inner = self.log.0.borrow_mut();
            if let Some(limit) = inner.commands_before_failure {
                if inner.commands_sent >= limit {
                    return Err(PanelError::Bus);
                }
            }
            inner.commands_sent += 1;
        }
        self.push(PanelOp::Command(command));
        Ok(())
    }

    async fn send_data(&mut self, data: &[u8]) -> Result<(), PanelError> {
        self.push(PanelOp::Data(data.to_vec()));
        Ok(())
    }

    async fn wait_idle(&mut self, _timeout: Duration) -> Result<(), PanelError> {
        self.push(PanelOp::WaitIdle);
        if self.log.0.borrow().stuck_busy {
            Err(PanelError::Timeout)
        } else {
            Ok(())
        }
    }

    async fn delay_ms(&mut self, ms: u32) {
        self.push(PanelOp::Delay(ms));
    }
}
