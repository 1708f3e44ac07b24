/// Stable partition: compliant candidates first, each group in its original order.
pub(crate) fn compliant_first<T, F>(candidates: &[T], is_compliant: F) -> Vec<T>
where
    T: Copy,
    F: Fn(&T) -> bool,
{
    let (mut ranked, rest): (Vec<T>, Vec<T>) =
        candidates.iter().copied().partition(|candidate| is_compliant(candidate));
    ranked.extend(rest);
    ranked
}
