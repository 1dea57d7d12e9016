//! Cyclic next/previous over an album's photo list.
//!
//! The "current photo" comes from the request, so nothing here keeps state.
//! Both functions are total over non-empty lists:
//!
//! | current | `next` | `previous` |
//! |---|---|---|
//! | absent | first | first |
//! | found, inner | following | preceding |
//! | last | first (wrap) | preceding |
//! | first | following | last (wrap) |
//! | not in list | first | first |
//!
//! An absent current photo maps to the first element in both directions, and
//! a name that is not in the list falls back to the first element in both
//! directions. Only the true ends of the list wrap.

use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum NavigationError {
    #[error("album has no displayable media")]
    NotFound,
}

/// The element after `current`, wrapping to the first.
pub fn next<'a, T: AsRef<str>>(
    items: &'a [T],
    current: Option<&str>,
) -> Result<&'a T, NavigationError> {
    let first = items.first().ok_or(NavigationError::NotFound)?;
    let Some(current) = current else {
        return Ok(first);
    };
    Ok(position(items, current)
        .and_then(|i| items.get(i + 1))
        .unwrap_or(first))
}

/// The element before `current`; the first element wraps to the last.
pub fn previous<'a, T: AsRef<str>>(
    items: &'a [T],
    current: Option<&str>,
) -> Result<&'a T, NavigationError> {
    let first = items.first().ok_or(NavigationError::NotFound)?;
    let last = &items[items.len() - 1];
    let Some(current) = current else {
        return Ok(first);
    };
    Ok(match position(items, current) {
        Some(0) => last,
        Some(i) => &items[i - 1],
        None => first,
    })
}

fn position<T: AsRef<str>>(items: &[T], current: &str) -> Option<usize> {
    items.iter().position(|item| item.as_ref() == current)
}
