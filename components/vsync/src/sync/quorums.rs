/// quorum returns the default resolution threshold:
/// a strict majority of the close-group size.
pub fn quorum(n: usize) -> usize {
    n / 2 + 1
}
