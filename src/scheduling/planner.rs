// src/scheduling/planner.rs - Memory-aware chunk boundaries
use crate::models::Query;
use crate::utils::batch_config::SchedulerConfig;

/// Chunk size for `request_count` requests at `memory_ratio` (fraction in [0, 1]).
/// Returns `request_count` itself when no splitting happens.
pub fn chunk_size(request_count: usize, memory_ratio: f64, config: &SchedulerConfig) -> usize {
    if request_count <= config.min_chunk_size {
        return request_count;
    }
    if memory_ratio * 100.0 <= config.memory_threshold {
        config.max_chunk_size
    } else {
        config.min_chunk_size.max(config.max_chunk_size / 2)
    }
}

/// Splits `requests` into contiguous, order-preserving, non-empty chunks.
/// Pure: identical inputs always give identical boundaries.
pub fn plan<'a>(requests: &'a [Query], memory_ratio: f64, config: &SchedulerConfig) -> Vec<&'a [Query]> {
    if requests.is_empty() {
        return Vec::new();
    }
    let size = chunk_size(requests.len(), memory_ratio, config).max(1);
    requests.chunks(size).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn queries(n: usize) -> Vec<Query> {
        (0..n)
            .map(|i| Query::new(format!("Person Number{}", i), None).unwrap())
            .collect()
    }

    fn config() -> SchedulerConfig {
        SchedulerConfig {
            min_chunk_size: 5,
            max_chunk_size: 15,
            memory_threshold: 80.0,
            pause_between_chunks: 0.0,
            birth_year_tolerance: 2,
        }
    }

    #[test]
    fn test_empty_requests_have_no_chunks() {
        assert!(plan(&[], 0.1, &config()).is_empty());
    }

    #[test]
    fn test_at_or_below_min_is_single_chunk() {
        for n in 1..=5 {
            let requests = queries(n);
            let chunks = plan(&requests, 0.99, &config());
            assert_eq!(chunks.len(), 1);
            assert_eq!(chunks[0], &requests[..]);
        }
    }

    #[test]
    fn test_low_memory_uses_max_chunk_size() {
        let requests = queries(40);
        let chunks = plan(&requests, 0.5, &config());
        let sizes: Vec<usize> = chunks.iter().map(|c| c.len()).collect();
        assert_eq!(sizes, vec![15, 15, 10]);
        let rejoined: Vec<Query> = chunks.concat();
        assert_eq!(rejoined, requests);
    }

    #[test]
    fn test_fifteen_requests_at_half_memory_is_one_chunk() {
        let requests = queries(15);
        assert_eq!(chunk_size(15, 0.5, &config()), 15);
        assert_eq!(plan(&requests, 0.5, &config()).len(), 1);
    }

    #[test]
    fn test_high_memory_halves_chunk_size() {
        let requests = queries(20);
        assert_eq!(chunk_size(20, 0.85, &config()), 7);
        let sizes: Vec<usize> = plan(&requests, 0.85, &config()).iter().map(|c| c.len()).collect();
        assert_eq!(sizes, vec![7, 7, 6]);
    }

    #[test]
    fn test_half_never_drops_below_min() {
        let cfg = SchedulerConfig {
            min_chunk_size: 4,
            max_chunk_size: 6,
            ..config()
        };
        assert_eq!(chunk_size(10, 0.95, &cfg), 4);
    }

    #[test]
    fn test_threshold_is_inclusive() {
        assert_eq!(chunk_size(20, 0.80, &config()), 15);
        assert_eq!(chunk_size(20, 0.801, &config()), 7);
    }

    #[test]
    fn test_plan_is_deterministic() {
        let requests = queries(33);
        let first: Vec<usize> = plan(&requests, 0.9, &config()).iter().map(|c| c.len()).collect();
        let second: Vec<usize> = plan(&requests, 0.9, &config()).iter().map(|c| c.len()).collect();
        assert_eq!(first, second);
    }
}
