use crate::error::BurnError;
use heapless::Vec;
use serde::{Deserialize, Serialize};

const MAX_BURN_HISTORY: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BurnKind {
    ShortCircuit,
    PullUpAndDown,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BurnRecord {
    pub id: u32,
    pub step: u64,
    pub kind: BurnKind,
    pub nets: std::vec::Vec<String>,
    pub drivers: std::vec::Vec<String>,
}

/// Bounded log of burns that aborted a step. The oldest record is evicted
/// once the log is full.
#[derive(Debug)]
pub struct BurnHistory {
    records: Vec<BurnRecord, MAX_BURN_HISTORY>,
    next_id: u32,
}

impl BurnHistory {
    pub fn new() -> Self {
        Self {
            records: Vec::new(),
            next_id: 1,
        }
    }

    pub fn record(&mut self, error: &BurnError, step: u64) -> u32 {
        let id = self.next_id;
        self.next_id = self.next_id.wrapping_add(1);

        let kind = match error {
            BurnError::ShortCircuit { .. } => BurnKind::ShortCircuit,
            BurnError::PullUpAndDown { .. } => BurnKind::PullUpAndDown,
        };
        let record = BurnRecord {
            id,
            step,
            kind,
            nets: error.nets().to_vec(),
            drivers: error.drivers().to_vec(),
        };

        if self.records.is_full() {
            self.records.remove(0);
        }
        let _ = self.records.push(record);
        id
    }

    pub fn records(&self) -> &[BurnRecord] {
        &self.records
    }

    pub fn latest(&self) -> Option<&BurnRecord> {
        self.records.last()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn clear(&mut self) {
        self.records.clear();
    }
}

impl Default for BurnHistory {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn short(net: &str) -> BurnError {
        BurnError::ShortCircuit {
            nets: vec![net.to_string()],
            drivers: vec!["A".into(), "B".into()],
            origins: vec![],
        }
    }

    #[test]
    fn test_record_burn() {
        let mut history = BurnHistory::new();
        let id = history.record(&short("N1"), 7);

        let latest = history.latest().unwrap();
        assert_eq!(latest.id, id);
        assert_eq!(latest.step, 7);
        assert_eq!(latest.kind, BurnKind::ShortCircuit);
        assert_eq!(latest.nets, vec!["N1".to_string()]);
        assert_eq!(latest.drivers, vec!["A".to_string(), "B".to_string()]);
    }

    #[test]
    fn test_history_evicts_oldest() {
        let mut history = BurnHistory::new();
        for step in 0..(MAX_BURN_HISTORY as u64 + 3) {
            history.record(&short("N"), step);
        }
        assert_eq!(history.len(), MAX_BURN_HISTORY);
        assert_eq!(history.records()[0].step, 3);

        history.clear();
        assert!(history.is_empty());
    }

    #[test]
    fn test_pull_conflict_has_no_drivers() {
        let mut history = BurnHistory::new();
        history.record(
            &BurnError::PullUpAndDown {
                nets: vec!["N".into()],
                origins: vec![],
            },
            1,
        );
        let latest = history.latest().unwrap();
        assert_eq!(latest.kind, BurnKind::PullUpAndDown);
        assert!(latest.drivers.is_empty());
    }
}
