use prometheus::{
    Encoder, HistogramVec, IntCounterVec, IntGauge, Opts, Registry, TextEncoder,
};

#[derive(Clone)]
pub struct Metrics {
    registry: Registry,
    pub reservations_total: IntCounterVec,
    pub agents_available: IntGauge,
    pub acceptances_total: IntCounterVec,
    pub acceptance_latency_seconds: HistogramVec,
}

impl Metrics {
    pub fn new() -> Self {
        let registry = Registry::new();

        let reservations_total = IntCounterVec::new(
            Opts::new("reservations_total", "Agent reservation attempts by outcome"),
            &["outcome"],
        )
        .expect("valid reservations_total metric");

        let agents_available = IntGauge::new(
            "agents_available",
            "Current number of available delivery agents",
        )
        .expect("valid agents_available metric");

        let acceptances_total = IntCounterVec::new(
            Opts::new("acceptances_total", "Order acceptance attempts by outcome"),
            &["outcome"],
        )
        .expect("valid acceptances_total metric");

        let acceptance_latency_seconds = HistogramVec::new(
            prometheus::HistogramOpts::new(
                "acceptance_latency_seconds",
                "Latency of the order acceptance workflow in seconds",
            ),
            &["outcome"],
        )
        .expect("valid acceptance_latency_seconds metric");

        registry
            .register(Box::new(reservations_total.clone()))
            .expect("register reservations_total");
        registry
            .register(Box::new(agents_available.clone()))
            .expect("register agents_available");
        registry
            .register(Box::new(acceptances_total.clone()))
            .expect("register acceptances_total");
        registry
            .register(Box::new(acceptance_latency_seconds.clone()))
            .expect("register acceptance_latency_seconds");

        Self {
            registry,
            reservations_total,
            agents_available,
            acceptances_total,
            acceptance_latency_seconds,
        }
    }

    pub fn encode(&self) -> Result<String, String> {
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();

        TextEncoder::new()
            .encode(&metric_families, &mut buffer)
            .map_err(|err| format!("failed to encode metrics: {err}"))?;

        String::from_utf8(buffer).map_err(|err| format!("metrics are not valid utf8: {err}"))
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}
