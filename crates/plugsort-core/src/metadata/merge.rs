/// Appends the elements of `second` to `first`, skipping any element that is
/// already present in the original contents of `first`.
///
/// Elements are compared by full value. Duplicates inside `second` itself are
/// kept, since only the initial part of `first` is searched.
///
/// This is O(n * m). Metadata lists are small (tens of entries is an unusually
/// long list), so nothing smarter is needed.
pub fn merge_vectors<T: PartialEq + Clone>(mut first: Vec<T>, second: &[T]) -> Vec<T> {
    let initial_len = first.len();
    for element in second {
        if !first[..initial_len].contains(element) {
            first.push(element.clone());
        }
    }
    first
}
