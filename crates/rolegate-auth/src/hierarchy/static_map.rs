//! Fixed manager → direct-reports map.

use std::collections::{HashMap, HashSet, VecDeque};

use async_trait::async_trait;

use rolegate_core::result::AppResult;
use rolegate_core::traits::HierarchyLookup;
use rolegate_core::types::UserId;

/// In-process hierarchy built from explicit reporting lines.
///
/// `is_manager_of` is transitive: a manager manages their reports' reports.
/// Cycles in the input are tolerated.
#[derive(Debug, Clone, Default)]
pub struct StaticHierarchy {
    reports: HashMap<UserId, Vec<UserId>>,
}

impl StaticHierarchy {
    /// Creates an empty hierarchy in which nobody manages anybody.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a hierarchy from `(manager, direct report)` pairs.
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (UserId, UserId)>,
    {
        pairs
            .into_iter()
            .fold(Self::new(), |h, (manager, report)| h.with_report(manager, report))
    }

    /// Adds one reporting line.
    pub fn with_report(mut self, manager: UserId, report: UserId) -> Self {
        let direct = self.reports.entry(manager).or_default();
        if !direct.contains(&report) {
            direct.push(report);
        }
        self
    }

    /// Direct reports of `manager`.
    pub fn direct_reports(&self, manager: UserId) -> &[UserId] {
        self.reports.get(&manager).map(Vec::as_slice).unwrap_or(&[])
    }

    fn manages(&self, manager: UserId, employee: UserId) -> bool {
        let mut seen = HashSet::from([manager]);
        let mut queue: VecDeque<UserId> = self.direct_reports(manager).iter().copied().collect();
        while let Some(next) = queue.pop_front() {
            if next == employee {
                return true;
            }
            if seen.insert(next) {
                queue.extend(self.direct_reports(next).iter().copied());
            }
        }
        false
    }
}

#[async_trait]
impl HierarchyLookup for StaticHierarchy {
    async fn is_manager_of(&self, manager_id: UserId, employee_id: UserId) -> AppResult<bool> {
        Ok(self.manages(manager_id, employee_id))
    }
}
