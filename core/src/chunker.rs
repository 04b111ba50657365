/// Slice `seq` into contiguous, non-overlapping windows of `window` elements,
/// starting at index 0. The final window may be shorter when the length is
/// not a multiple of `window`; an empty input yields zero chunks.
///
/// Cut points depend only on the sequence length, so the stemmed and raw
/// token sequences of one document (which are index-aligned) always produce
/// chunks with identical boundaries.
///
/// `window` must be greater than zero.
pub fn chunk<T: Clone>(seq: &[T], window: usize) -> Vec<Vec<T>> {
    seq.chunks(window).map(|c| c.to_vec()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cuts_fixed_windows_with_short_tail() {
        let seq: Vec<u32> = (0..25).collect();
        let chunks = chunk(&seq, 10);
        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[0].len(), 10);
        assert_eq!(chunks[1].len(), 10);
        assert_eq!(chunks[2].len(), 5);
        assert_eq!(chunks[1][0], 10);
    }

    #[test]
    fn empty_input_yields_zero_chunks() {
        let chunks = chunk::<u32>(&[], 10);
        assert!(chunks.is_empty());
    }

    #[test]
    fn concatenation_reconstructs_input() {
        let seq: Vec<u32> = (0..17).collect();
        let flat: Vec<u32> = chunk(&seq, 4).into_iter().flatten().collect();
        assert_eq!(flat, seq);
    }

    #[test]
    fn aligned_sequences_share_cut_points() {
        let a: Vec<u32> = (0..13).collect();
        let b: Vec<char> = "abcdefghijklm".chars().collect();
        let ca = chunk(&a, 5);
        let cb = chunk(&b, 5);
        assert_eq!(ca.len(), cb.len());
        for (x, y) in ca.iter().zip(cb.iter()) {
            assert_eq!(x.len(), y.len());
        }
    }
}
