//! Lookup helpers.

use std::num::NonZeroUsize;

/// First element whose `key` equals `value`.
///
/// ```
/// use hw_core::find_element;
///
/// let names = ["Bash", "Teleport", "Bash"];
/// assert_eq!(find_element(names.iter(), |n| n.len(), &8), Some(&"Teleport"));
/// ```
pub fn find_element<I, K, F>(items: I, key: F, value: &K) -> Option<I::Item>
where
    I: IntoIterator,
    F: Fn(&I::Item) -> K,
    K: PartialEq,
{
    items.into_iter().find(|item| key(item) == *value)
}

/// Lazily yields every element whose `key` equals `value`.
///
/// The returned iterator is single-pass; call again on a fresh iterator to
/// scan anew.
pub fn find_elements<I, K, F>(items: I, key: F, value: K) -> impl Iterator<Item = I::Item>
where
    I: IntoIterator,
    F: Fn(&I::Item) -> K,
    K: PartialEq,
{
    items.into_iter().filter(move |item| key(item) == value)
}

/// Splits `text` into chunks of `size` characters; the last chunk may be shorter.
pub fn split_string(text: &str, size: NonZeroUsize) -> Vec<String> {
    let chars: Vec<char> = text.chars().collect();
    chars
        .chunks(size.get())
        .map(|chunk| chunk.iter().collect())
        .collect()
}
