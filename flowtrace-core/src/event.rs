//! Lineage event data contract
//!
//! This module defines the wire format for lineage events posted to the
//! ingestion endpoint. An event describes one observed execution of a job:
//! the datasets it read, the datasets it wrote, and optional facets such as
//! the SQL text the job ran.
//!
//! Facets are always optional. Producers routinely omit them, so every
//! access goes through `Option`; the engine substitutes an empty string
//! where facet data is absent.

use serde::{Deserialize, Serialize};

/// A set of optional attributes describing an entity in more detail.
///
/// Jobs typically carry a `sql` facet; inputs and outputs typically carry
/// a `dataSource` facet. Either or both may be missing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Facet {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sql: Option<SqlFacet>,

    #[serde(rename = "dataSource", skip_serializing_if = "Option::is_none")]
    pub data_source: Option<DataSourceFacet>,
}

/// SQL text attached to a job
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SqlFacet {
    pub query: String,
}

/// Data-source name attached to an input or output dataset
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataSourceFacet {
    pub name: String,
}

/// An input dataset consumed by a job
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Input {
    pub name: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub facets: Option<Facet>,
}

/// The job a lineage event describes
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Job {
    pub name: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub facets: Option<Facet>,
}

/// An output dataset produced by a job
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Output {
    pub name: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub facets: Option<Facet>,
}

/// One execution of a job, identified by a run id.
///
/// The run id is informational only; it takes no part in graph
/// construction but is preserved end-to-end and echoed in ingestion
/// responses and logs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Run {
    #[serde(rename = "runId")]
    pub run_id: String,
}

/// One lineage record describing a job's inputs and outputs at a point in
/// time. Decoded once per request and consumed exactly once by the merge
/// path.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    #[serde(default)]
    pub inputs: Vec<Input>,

    pub job: Job,

    #[serde(default)]
    pub outputs: Vec<Output>,

    pub run: Run,
}

impl Job {
    /// SQL text for this job, or the empty string when the facet is absent
    pub fn sql_query(&self) -> &str {
        self.facets
            .as_ref()
            .and_then(|f| f.sql.as_ref())
            .map(|s| s.query.as_str())
            .unwrap_or("")
    }
}

impl Input {
    /// Data-source name, or the empty string when the facet is absent
    pub fn data_source_name(&self) -> &str {
        data_source_name(&self.facets)
    }
}

impl Output {
    /// Data-source name, or the empty string when the facet is absent
    pub fn data_source_name(&self) -> &str {
        data_source_name(&self.facets)
    }
}

fn data_source_name(facets: &Option<Facet>) -> &str {
    facets
        .as_ref()
        .and_then(|f| f.data_source.as_ref())
        .map(|d| d.name.as_str())
        .unwrap_or("")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_full_event() {
        let body = serde_json::json!({
            "inputs": [
                { "name": "raw.orders", "facets": { "dataSource": { "name": "postgres://raw" } } }
            ],
            "job": { "name": "sales.load", "facets": { "sql": { "query": "INSERT INTO report SELECT * FROM orders" } } },
            "outputs": [
                { "name": "sales.report", "facets": { "dataSource": { "name": "postgres://sales" } } }
            ],
            "run": { "runId": uuid::Uuid::new_v4().to_string() }
        });

        let event: Event = serde_json::from_value(body).unwrap();
        assert_eq!(event.job.name, "sales.load");
        assert_eq!(event.job.sql_query(), "INSERT INTO report SELECT * FROM orders");
        assert_eq!(event.inputs[0].data_source_name(), "postgres://raw");
        assert_eq!(event.outputs[0].data_source_name(), "postgres://sales");
    }

    #[test]
    fn test_missing_facets_are_tolerated() {
        let body = serde_json::json!({
            "inputs": [{ "name": "raw.orders" }],
            "job": { "name": "sales.load" },
            "outputs": [{ "name": "sales.report" }],
            "run": { "runId": "run-1" }
        });

        let event: Event = serde_json::from_value(body).unwrap();
        assert_eq!(event.job.sql_query(), "");
        assert_eq!(event.inputs[0].data_source_name(), "");
        assert_eq!(event.outputs[0].data_source_name(), "");
    }

    #[test]
    fn test_missing_inputs_and_outputs_default_empty() {
        let body = serde_json::json!({
            "job": { "name": "sales.load" },
            "run": { "runId": "run-1" }
        });

        let event: Event = serde_json::from_value(body).unwrap();
        assert!(event.inputs.is_empty());
        assert!(event.outputs.is_empty());
    }

    #[test]
    fn test_unknown_fields_are_ignored() {
        let body = serde_json::json!({
            "eventType": "COMPLETE",
            "eventTime": "2024-01-01T00:00:00Z",
            "job": { "name": "sales.load", "namespace": "prod" },
            "run": { "runId": "run-1", "facets": {} }
        });

        let event: Event = serde_json::from_value(body).unwrap();
        assert_eq!(event.run.run_id, "run-1");
    }

    #[test]
    fn test_run_id_round_trips() {
        let event = Event {
            inputs: vec![],
            job: Job { name: "sales.load".to_string(), facets: None },
            outputs: vec![],
            run: Run { run_id: "run-42".to_string() },
        };

        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["run"]["runId"], "run-42");

        let decoded: Event = serde_json::from_value(json).unwrap();
        assert_eq!(decoded.run.run_id, "run-42");
    }
}
