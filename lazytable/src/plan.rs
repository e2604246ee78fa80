use alloc::vec::Vec;

use crate::{Data, Geometry, PageEntry, PageStatus, State, Status, page_status};

/// What the driver should do after a state change.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Plan {
    Idle,
    /// Dispatch `Action::Initialize`.
    Initialize,
    /// Dispatch `Action::Initialized`.
    Initialized,
    /// Dispatch `Action::Load` for these batch indexes, then fetch each of them.
    Load(Vec<usize>),
}

/// Computes the next step of the load loop for `state`.
///
/// While `Loaded`, the batch under the scroll position plus `lookahead` batches on each side
/// are checked; every batch whose status is `Absent` is returned. `lookahead = 1` gives the
/// usual previous/current/next window. Batches already `Loading` or `Loaded` are never
/// returned, so re-running the planner on an unchanged state is always `Idle` once the
/// returned pages have been marked with `Action::Load`.
pub fn plan<T>(state: &State<T>, geometry: Geometry, lookahead: usize) -> Plan {
    match state.status() {
        Status::None | Status::Unavailable => Plan::Initialize,
        Status::Loading => {
            if geometry.is_measured() {
                Plan::Initialized
            } else {
                Plan::Idle
            }
        }
        Status::Loaded => {
            let Some(batch) = geometry.batch_index(state.scroll_top()) else {
                return Plan::Idle;
            };
            let batch_size = geometry.batch_size();
            let first = batch.saturating_sub(lookahead);
            let last = batch.saturating_add(lookahead);
            let pages: Vec<usize> = (first..=last)
                .filter(|&page| needs_load(state.data(), page, batch_size))
                .collect();
            ltrace!(batch, ?pages, "planned batch loads");
            if pages.is_empty() {
                Plan::Idle
            } else {
                Plan::Load(pages)
            }
        }
    }
}

fn needs_load<T>(data: Option<&Data<T>>, page: usize, batch_size: usize) -> bool {
    match data {
        None => true,
        Some(data) if data.page_size == batch_size => {
            page_status(data, page as i64) == PageStatus::Absent
        }
        // No payload yet, or one computed for another batch size: the total count cannot be
        // trusted for this geometry, so only in-flight markers hold a page back.
        Some(data) => !matches!(data.pages.get(&page), Some(PageEntry::Loading)),
    }
}
