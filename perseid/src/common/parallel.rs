//! Chunked parallel helpers for pixel-wise operations.

use rayon::prelude::*;

/// Multiplier for number of chunks relative to CPU threads.
/// 2x threads gives good load balancing when some chunks finish faster.
const CHUNKS_PER_THREAD: usize = 2;

/// Fill a slice in parallel from a pure index function.
///
/// Each element `data[i]` is set to `f(i)`. The chunking is an implementation
/// detail; the result is identical to a sequential loop.
pub(crate) fn parallel_fill<T, F>(data: &mut [T], f: F)
where
    T: Send + Sync,
    F: Fn(usize) -> T + Sync + Send,
{
    if data.is_empty() {
        return;
    }

    let num_chunks = rayon::current_num_threads() * CHUNKS_PER_THREAD;
    let chunk_size = (data.len() / num_chunks).max(1);

    data.par_chunks_mut(chunk_size)
        .enumerate()
        .for_each(|(chunk_idx, chunk)| {
            let base = chunk_idx * chunk_size;
            for (i, value) in chunk.iter_mut().enumerate() {
                *value = f(base + i);
            }
        });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parallel_fill_matches_sequential() {
        let mut parallel = vec![0u32; 10_000];
        parallel_fill(&mut parallel, |i| (i as u32).wrapping_mul(31));

        let sequential: Vec<u32> = (0..10_000).map(|i| (i as u32).wrapping_mul(31)).collect();
        assert_eq!(parallel, sequential);
    }

    #[test]
    fn test_parallel_fill_empty() {
        let mut data: Vec<i32> = vec![];
        parallel_fill(&mut data, |i| i as i32);
        assert!(data.is_empty());
    }
}
