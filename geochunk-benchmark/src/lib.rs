use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::time::{Duration, Instant};

#[derive(Debug, Default)]
pub struct StreamingMetrics {
    // Generation Stats
    pub total_chunks_generated: AtomicUsize,
    pub total_generation_time_us: AtomicU64,
    pub max_generation_time_us: AtomicU64,

    // Resident table
    pub total_fast_path_hits: AtomicUsize,
    pub total_fast_path_misses: AtomicUsize,
    pub total_unloads: AtomicUsize,

    // Cache Stats
    pub total_cache_stores: AtomicUsize,
    pub total_cache_store_time_us: AtomicU64,
    pub total_cache_evictions: AtomicUsize,
    pub total_cache_evict_time_us: AtomicU64,
    pub total_storage_errors: AtomicUsize,

    // Session
    pub start_time: Option<Instant>,
    pub config_summary: String,
}

impl StreamingMetrics {
    pub fn new(config_summary: String) -> Self {
        Self {
            start_time: Some(Instant::now()),
            config_summary,
            ..Default::default()
        }
    }

    pub fn record_generation(&self, duration: Duration) {
        self.total_chunks_generated.fetch_add(1, Ordering::Relaxed);
        let us = duration.as_micros() as u64;
        self.total_generation_time_us.fetch_add(us, Ordering::Relaxed);
        self.max_generation_time_us.fetch_max(us, Ordering::Relaxed);
    }

    pub fn record_fast_path_hit(&self) {
        self.total_fast_path_hits.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_fast_path_miss(&self) {
        self.total_fast_path_misses.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_unload(&self) {
        self.total_unloads.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_cache_store(&self, duration: Duration) {
        self.total_cache_stores.fetch_add(1, Ordering::Relaxed);
        self.total_cache_store_time_us.fetch_add(duration.as_micros() as u64, Ordering::Relaxed);
    }

    pub fn record_cache_evict(&self, duration: Duration) {
        self.total_cache_evictions.fetch_add(1, Ordering::Relaxed);
        self.total_cache_evict_time_us.fetch_add(duration.as_micros() as u64, Ordering::Relaxed);
    }

    pub fn record_storage_error(&self) {
        self.total_storage_errors.fetch_add(1, Ordering::Relaxed);
    }

    /// Number of generator invocations so far.
    pub fn chunks_generated(&self) -> usize {
        self.total_chunks_generated.load(Ordering::Relaxed)
    }

    pub fn fast_path_hits(&self) -> usize {
        self.total_fast_path_hits.load(Ordering::Relaxed)
    }

    pub fn generate_report(&self) -> String {
        let uptime = self.start_time.unwrap_or_else(Instant::now).elapsed();
        let generated = self.chunks_generated();
        // ms
        let gen_time_total = self.total_generation_time_us.load(Ordering::Relaxed) as f64 / 1000.0;
        let gen_max = self.max_generation_time_us.load(Ordering::Relaxed) as f64 / 1000.0; // ms
        let gen_avg = if generated > 0 { gen_time_total / generated as f64 } else { 0.0 };

        let hits = self.fast_path_hits();
        let misses = self.total_fast_path_misses.load(Ordering::Relaxed);
        let total_requests = hits + misses;
        let hit_rate = if total_requests > 0 {
            (hits as f64 / total_requests as f64) * 100.0
        } else {
            0.0
        };

        let stores = self.total_cache_stores.load(Ordering::Relaxed);
        let store_time = self.total_cache_store_time_us.load(Ordering::Relaxed) as f64 / 1000.0;
        let store_avg = if stores > 0 { store_time / stores as f64 } else { 0.0 };

        let evictions = self.total_cache_evictions.load(Ordering::Relaxed);
        let evict_time = self.total_cache_evict_time_us.load(Ordering::Relaxed) as f64 / 1000.0;
        let evict_avg = if evictions > 0 { evict_time / evictions as f64 } else { 0.0 };

        format!(
            "Geochunk Streaming Report\n\
             =========================\n\
             Configuration: {}\n\
             Session Duration: {:.2?}\n\n\
             [Generation]\n\
             Chunks Generated: {}\n\
             Total Time: {:.2} ms\n\
             Avg Time: {:.2} ms/chunk\n\
             Max Time: {:.2} ms\n\n\
             [Resident Table]\n\
             Requests: {}\n\
             Fast-path Hits: {}\n\
             Hit Rate: {:.1}%\n\
             Unloads: {}\n\n\
             [Cache]\n\
             Stores: {}\n\
             Avg Store Time: {:.2} ms\n\
             Evictions: {}\n\
             Avg Evict Time: {:.2} ms\n\
             Storage Errors: {}\n",
            self.config_summary,
            uptime,
            generated, gen_time_total, gen_avg, gen_max,
            total_requests, hits, hit_rate,
            self.total_unloads.load(Ordering::Relaxed),
            stores, store_avg,
            evictions, evict_avg,
            self.total_storage_errors.load(Ordering::Relaxed),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters() {
        let metrics = StreamingMetrics::new("test".into());
        metrics.record_generation(Duration::from_micros(300));
        metrics.record_generation(Duration::from_micros(100));
        metrics.record_fast_path_miss();
        metrics.record_fast_path_hit();

        assert_eq!(metrics.chunks_generated(), 2);
        assert_eq!(metrics.max_generation_time_us.load(Ordering::Relaxed), 300);
        assert_eq!(metrics.fast_path_hits(), 1);
    }

    #[test]
    fn test_report_mentions_sections() {
        let metrics = StreamingMetrics::new("deterministic, no cache".into());
        metrics.record_cache_store(Duration::from_millis(2));
        let report = metrics.generate_report();
        assert!(report.contains("Configuration: deterministic, no cache"));
        assert!(report.contains("[Generation]"));
        assert!(report.contains("Stores: 1"));
        assert!(report.contains("Hit Rate: 0.0%"));
    }
}
