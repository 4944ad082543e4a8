//! Observability - running cost and latency metrics per provider
//!
//! State lives for the life of the process. Cost totals only ever grow and
//! the latency log is append-only; reads are snapshots and never mutate.

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt::Write as _;

use crate::models::Provider;

/// One entry of the latency log
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LatencyEntry {
    pub model_id: String,
    pub provider: Provider,
    pub latency_ms: u64,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Default)]
struct MetricsState {
    cost_by_provider: HashMap<Provider, f64>,
    latency_log: Vec<LatencyEntry>,
}

/// Per-model latency figures plus the provider's running cost
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelPerformance {
    pub model_id: String,
    pub provider: Provider,
    pub avg_latency_ms: f64,
    pub min_latency_ms: u64,
    pub max_latency_ms: u64,
    pub requests: usize,
    /// Cumulative cost of the whole provider, not just this model
    pub provider_cost: f64,
}

/// Metrics aggregator
///
/// Interior locking keeps totals consistent if the router is shared between
/// tasks; the single-caller path never contends.
#[derive(Debug, Default)]
pub struct Observability {
    state: RwLock<MetricsState>,
}

impl Observability {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add to a provider's running total
    pub fn record_cost(&self, provider: Provider, amount: f64) {
        // Totals never go down
        let amount = amount.max(0.0);
        let mut state = self.state.write();
        *state.cost_by_provider.entry(provider).or_insert(0.0) += amount;
    }

    /// Append to the latency log, stamped now
    pub fn record_latency(&self, model_id: &str, provider: Provider, latency_ms: u64) {
        self.state.write().latency_log.push(LatencyEntry {
            model_id: model_id.to_string(),
            provider,
            latency_ms,
            timestamp: Utc::now(),
        });
    }

    /// Record one completed call atomically, keeping the caller's timestamp
    pub fn record_execution(&self, entry: LatencyEntry, cost: f64) {
        let mut state = self.state.write();
        *state.cost_by_provider.entry(entry.provider).or_insert(0.0) += cost.max(0.0);
        state.latency_log.push(entry);
    }

    /// Snapshot of provider -> cumulative cost
    pub fn cost_breakdown(&self) -> HashMap<Provider, f64> {
        self.state.read().cost_by_provider.clone()
    }

    pub fn total_cost(&self) -> f64 {
        self.state.read().cost_by_provider.values().sum()
    }

    /// Number of calls recorded in the latency log
    pub fn request_count(&self) -> usize {
        self.state.read().latency_log.len()
    }

    /// Copy of the latency log in recording order
    pub fn latency_log(&self) -> Vec<LatencyEntry> {
        self.state.read().latency_log.clone()
    }

    /// Latency stats grouped by model, keyed by model id
    pub fn performance_summary(&self) -> BTreeMap<String, ModelPerformance> {
        let state = self.state.read();
        let mut summary: BTreeMap<String, ModelPerformance> = BTreeMap::new();
        let mut totals: HashMap<&str, u64> = HashMap::new();

        for entry in &state.latency_log {
            *totals.entry(entry.model_id.as_str()).or_insert(0) += entry.latency_ms;

            let perf = summary
                .entry(entry.model_id.clone())
                .or_insert_with(|| ModelPerformance {
                    model_id: entry.model_id.clone(),
                    provider: entry.provider,
                    avg_latency_ms: 0.0,
                    min_latency_ms: u64::MAX,
                    max_latency_ms: 0,
                    requests: 0,
                    provider_cost: state
                        .cost_by_provider
                        .get(&entry.provider)
                        .copied()
                        .unwrap_or(0.0),
                });
            perf.requests += 1;
            perf.min_latency_ms = perf.min_latency_ms.min(entry.latency_ms);
            perf.max_latency_ms = perf.max_latency_ms.max(entry.latency_ms);
        }

        for perf in summary.values_mut() {
            let total = totals.get(perf.model_id.as_str()).copied().unwrap_or(0);
            perf.avg_latency_ms = total as f64 / perf.requests as f64;
        }

        summary
    }

    /// Export in Prometheus text format
    pub fn to_prometheus(&self) -> String {
        let mut output = String::new();

        let mut costs: Vec<(Provider, f64)> = self.cost_breakdown().into_iter().collect();
        costs.sort_by_key(|(provider, _)| *provider);

        output.push_str("# HELP basecamp_llm_cost_total Cumulative LLM spend per provider\n");
        output.push_str("# TYPE basecamp_llm_cost_total counter\n");
        for (provider, cost) in costs {
            let _ = writeln!(
                output,
                "basecamp_llm_cost_total{{provider=\"{provider}\"}} {cost:.6}"
            );
        }

        let summary = self.performance_summary();

        output.push_str("# HELP basecamp_llm_requests_total Completed LLM calls per model\n");
        output.push_str("# TYPE basecamp_llm_requests_total counter\n");
        for perf in summary.values() {
            let _ = writeln!(
                output,
                "basecamp_llm_requests_total{{model=\"{}\",provider=\"{}\"}} {}",
                perf.model_id, perf.provider, perf.requests
            );
        }

        output.push_str("# HELP basecamp_llm_latency_ms_avg Mean call latency per model\n");
        output.push_str("# TYPE basecamp_llm_latency_ms_avg gauge\n");
        for perf in summary.values() {
            let _ = writeln!(
                output,
                "basecamp_llm_latency_ms_avg{{model=\"{}\",provider=\"{}\"}} {:.1}",
                perf.model_id, perf.provider, perf.avg_latency_ms
            );
        }

        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(model_id: &str, provider: Provider, latency_ms: u64) -> LatencyEntry {
        LatencyEntry {
            model_id: model_id.to_string(),
            provider,
            latency_ms,
            timestamp: Utc::now(),
        }
    }

    #[test]
    fn test_cost_conservation() {
        let obs = Observability::new();
        let costs = [0.0012, 0.00006, 0.25, 0.0];
        for c in costs {
            obs.record_cost(Provider::Anthropic, c);
        }
        obs.record_cost(Provider::Google, 0.5);

        let breakdown = obs.cost_breakdown();
        let expected: f64 = costs.iter().sum();
        assert!((breakdown[&Provider::Anthropic] - expected).abs() < 1e-12);
        assert!((obs.total_cost() - (expected + 0.5)).abs() < 1e-12);
        assert!(!breakdown.contains_key(&Provider::Meta));
    }

    #[test]
    fn test_cost_never_decreases() {
        let obs = Observability::new();
        obs.record_cost(Provider::OpenAi, 1.0);
        obs.record_cost(Provider::OpenAi, -5.0);
        assert_eq!(obs.cost_breakdown()[&Provider::OpenAi], 1.0);
    }

    #[test]
    fn test_performance_summary() {
        let obs = Observability::new();
        for latency in [100, 300, 200] {
            obs.record_execution(entry("openai/gpt-4o", Provider::OpenAi, latency), 0.01);
        }
        obs.record_execution(entry("openai/gpt-4o-mini", Provider::OpenAi, 50), 0.001);

        let summary = obs.performance_summary();
        let perf = &summary["openai/gpt-4o"];
        assert_eq!(perf.avg_latency_ms, 200.0);
        assert_eq!(perf.min_latency_ms, 100);
        assert_eq!(perf.max_latency_ms, 300);
        assert_eq!(perf.requests, 3);
        assert!((perf.provider_cost - 0.031).abs() < 1e-12);

        assert_eq!(summary["openai/gpt-4o-mini"].requests, 1);
    }

    #[test]
    fn test_latency_log_is_ordered() {
        let obs = Observability::new();
        obs.record_latency("a", Provider::Meta, 10);
        obs.record_latency("b", Provider::Google, 20);
        obs.record_latency("a", Provider::Meta, 30);

        let log = obs.latency_log();
        let order: Vec<(&str, u64)> = log
            .iter()
            .map(|e| (e.model_id.as_str(), e.latency_ms))
            .collect();
        assert_eq!(order, vec![("a", 10), ("b", 20), ("a", 30)]);
        assert!(log.windows(2).all(|w| w[0].timestamp <= w[1].timestamp));
        assert_eq!(obs.request_count(), 3);
    }

    #[test]
    fn test_reads_do_not_mutate() {
        let obs = Observability::new();
        obs.record_execution(entry("m", Provider::Meta, 42), 0.5);
        let first = obs.performance_summary();
        let _ = obs.cost_breakdown();
        let _ = obs.to_prometheus();
        assert_eq!(obs.performance_summary(), first);
        assert_eq!(obs.request_count(), 1);
    }

    #[test]
    fn test_prometheus_export() {
        let obs = Observability::new();
        let model = "google/gemini-flash-1.5";
        obs.record_execution(entry(model, Provider::Google, 400), 0.002);

        let text = obs.to_prometheus();
        let labels = format!("{{model=\"{model}\",provider=\"google\"}}");
        assert!(text.contains("# TYPE basecamp_llm_cost_total counter"));
        assert!(text.contains("basecamp_llm_cost_total{provider=\"google\"} 0.002000"));
        assert!(text.contains(&format!("basecamp_llm_requests_total{labels} 1")));
        assert!(text.contains(&format!("basecamp_llm_latency_ms_avg{labels} 400.0")));
    }

    #[test]
    fn test_empty_summary() {
        let obs = Observability::default();
        assert!(obs.performance_summary().is_empty());
        assert_eq!(obs.total_cost(), 0.0);
    }
}
