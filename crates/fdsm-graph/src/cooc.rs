/// Counts the events shared by two actors via a merge scan of their sorted
/// adjacency lists. Both inputs must be ascending-sorted; this is a
/// precondition, not checked here. O(len(a) + len(b)).
pub fn cooccurrence(a: &[u32], b: &[u32]) -> u32 {
    let mut count = 0;
    let mut pos_a = 0;
    let mut pos_b = 0;
    while pos_a < a.len() && pos_b < b.len() {
        if a[pos_a] < b[pos_b] {
            pos_a += 1;
        } else if a[pos_a] > b[pos_b] {
            pos_b += 1;
        } else {
            count += 1;
            pos_a += 1;
            pos_b += 1;
        }
    }
    count
}

#[cfg(test)]
mod tests {
    use super::cooccurrence;

    #[test]
    fn counts_shared_events() {
        assert_eq!(cooccurrence(&[0, 1, 4], &[1, 2, 4, 7]), 2);
    }

    #[test]
    fn empty_lists_share_nothing() {
        assert_eq!(cooccurrence(&[], &[1, 2]), 0);
        assert_eq!(cooccurrence(&[1, 2], &[]), 0);
        assert_eq!(cooccurrence(&[], &[]), 0);
    }

    #[test]
    fn symmetric_in_its_arguments() {
        let a = [2u32, 3, 5, 9, 11];
        let b = [1u32, 3, 9, 10];
        assert_eq!(cooccurrence(&a, &b), cooccurrence(&b, &a));
    }
}
