//! Language switching.

use crate::locale::{first_segment, Locale};

/// Path to navigate to after switching from `active` to `target`.
///
/// When the current path starts with the active locale's segment, that
/// segment is swapped in place and the rest (including any query) is kept.
/// Otherwise the path carries no recognizable locale and the target's root is
/// returned instead of splicing into an arbitrary segment.
pub fn switch_locale_path(current_path: &str, active: Locale, target: Locale) -> String {
    let (path, query) = match current_path.split_once('?') {
        Some((path, query)) => (path, Some(query)),
        None => (current_path, None),
    };

    if first_segment(path) != Some(active.code()) {
        return format!("/{}", target.code());
    }

    let rest = &path[1 + active.code().len()..];
    let mut switched = format!("/{}{}", target.code(), rest);
    if let Some(q) = query.filter(|q| !q.is_empty()) {
        switched.push('?');
        switched.push_str(q);
    }
    switched
}
