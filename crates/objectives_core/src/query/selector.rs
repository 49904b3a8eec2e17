//! Query selector for objectives due on a given day.
//!
//! # Invariants
//! - Only objectives owned by the requested tenant are yielded, even when the
//!   input set mixes tenants.
//! - Selection is lazy and side-effect free; cloning the returned iterator
//!   restarts it over the same input.

use crate::model::objective::Objective;
use crate::model::tenant::TenantKey;
use crate::query::due::DueProbe;
use chrono::NaiveDate;

/// Filters `objectives` down to those owned by `tenant_key` and due on `today`.
///
/// `today` is the caller's local calendar date with time-of-day discarded.
pub fn select_due_today<'a, I>(
    tenant_key: &'a TenantKey,
    objectives: I,
    today: NaiveDate,
) -> impl Iterator<Item = &'a Objective> + Clone + 'a
where
    I: IntoIterator<Item = &'a Objective>,
    I::IntoIter: Clone + 'a,
{
    let probe = DueProbe::for_date(today);
    objectives.into_iter().filter(move |objective| {
        objective.tenant_key() == tenant_key && probe.matches(&objective.recurrence)
    })
}
