use alloc::vec::Vec;

use crate::{Data, PageEntry, Window};

/// Realigns a previously fetched window to `current_offset` without fetching.
///
/// Positions the old window does not cover become `None`. The output always has
/// `window.items.len()` entries:
///
/// ```
/// use lazytable::{Window, slide_items};
///
/// let w = Window { items: vec![0, 1, 2], offset: 3 };
/// assert_eq!(slide_items(4, &w), [Some(1), Some(2), None]);
/// assert_eq!(slide_items(2, &w), [None, Some(0), Some(1)]);
/// assert_eq!(slide_items(7, &w), [None, None, None]);
/// ```
pub fn slide_items<T: Clone>(current_offset: i64, window: &Window<T>) -> Vec<Option<T>> {
    let count = window.items.len();
    if window.offset == current_offset {
        return window.items.iter().cloned().map(Some).collect();
    }

    let diff = window.offset.abs_diff(current_offset);
    if diff >= count as u64 {
        return alloc::vec![None; count];
    }
    let diff = diff as usize;

    let mut out = Vec::with_capacity(count);
    if window.offset < current_offset {
        // Moved forward: the head scrolled out.
        out.extend(window.items[diff..].iter().cloned().map(Some));
        out.resize(count, None);
    } else {
        out.resize(diff, None);
        out.extend(window.items[..count - diff].iter().cloned().map(Some));
    }
    out
}

/// Projects reducer data into a display window starting at item `offset`.
///
/// The window is `data.page_size` positions long, truncated at `data.total_count`. Positions
/// whose page is missing or still loading are `None`.
pub fn window_items<T: Clone>(offset: usize, data: &Data<T>) -> Vec<Option<T>> {
    if data.page_size == 0 {
        return Vec::new();
    }
    let end = offset.saturating_add(data.page_size).min(data.total_count);
    (offset..end)
        .map(|index| match data.pages.get(&(index / data.page_size)) {
            Some(PageEntry::Loaded(items)) => items.get(index % data.page_size).cloned(),
            Some(PageEntry::Loading) | None => None,
        })
        .collect()
}
