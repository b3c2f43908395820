use prometheus::{CounterVec, Encoder, Opts, Registry, TextEncoder};

pub struct MetricsCollector {
    registry: Registry,

    /// Generation runs by target kind and outcome.
    pub generation_runs: CounterVec,
    /// Ingest parse jobs by outcome.
    pub ingest_jobs: CounterVec,
    /// Publish attempts by outcome.
    pub publish_requests: CounterVec,
}

impl MetricsCollector {
    pub fn new() -> anyhow::Result<Self> {
        let registry = Registry::new();

        let generation_runs = CounterVec::new(
            Opts::new("ergane_generation_runs_total", "Total generation runs"),
            &["kind", "status"],
        )?;
        registry.register(Box::new(generation_runs.clone()))?;

        let ingest_jobs = CounterVec::new(
            Opts::new("ergane_ingest_jobs_total", "Total ingestion parse jobs"),
            &["status"],
        )?;
        registry.register(Box::new(ingest_jobs.clone()))?;

        let publish_requests = CounterVec::new(
            Opts::new("ergane_publish_requests_total", "Total publish requests"),
            &["status"],
        )?;
        registry.register(Box::new(publish_requests.clone()))?;

        Ok(Self {
            registry,
            generation_runs,
            ingest_jobs,
            publish_requests,
        })
    }

    /// Render the registry in Prometheus text format.
    pub fn gather(&self) -> anyhow::Result<String> {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();
        encoder.encode(&metric_families, &mut buffer)?;
        Ok(String::from_utf8(buffer)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters_appear_in_output() {
        let metrics = MetricsCollector::new().expect("collector");
        metrics
            .generation_runs
            .with_label_values(&["form", "success"])
            .inc();
        let text = metrics.gather().expect("gather");
        assert!(text.contains("ergane_generation_runs_total"));
    }
}
