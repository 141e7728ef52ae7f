//! Telemetry series endpoint

use serde::Deserialize;

use super::{Resource, path_with_segment};
use crate::{
    client::ApiClient,
    error::{Error, Result},
    http::RequestOptions,
    session::Session,
    types::{TelemetryPoint, TelemetryQuery, TelemetrySeries},
};

/// Telemetry API resource.
#[derive(Debug, Clone)]
pub struct Telemetry {
    session: Session,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum SeriesBody {
    Points(Vec<TelemetryPoint>),
    Series(TelemetrySeries),
}

impl Telemetry {
    /// Create a new Telemetry resource.
    pub(crate) fn new(session: Session) -> Self {
        Self { session }
    }

    /// Points of one metric of one device within a time range.
    ///
    /// A server that answers with a bare array of points gets the query's
    /// device id and metric filled in.
    pub async fn series(&self, query: &TelemetryQuery) -> Result<TelemetrySeries> {
        let path = series_path(query)?;
        let body: SeriesBody = self.session.authorized(&path, &RequestOptions::get()).await?;

        Ok(match body {
            SeriesBody::Series(series) => series,
            SeriesBody::Points(points) => TelemetrySeries {
                device_id: Some(query.device_id.clone()),
                metric: Some(query.metric.clone()),
                points,
            },
        })
    }
}

impl Resource for Telemetry {
    fn client(&self) -> &ApiClient {
        self.session.client()
    }
}

fn series_path(query: &TelemetryQuery) -> Result<String> {
    let path = path_with_segment("/api/v1/devices", &query.device_id, "/telemetry")?;

    let mut url = url::Url::parse("http://path.invalid/").map_err(|e| Error::InvalidUrl(e.to_string()))?;
    {
        let mut pairs = url.query_pairs_mut();
        pairs
            .append_pair("metric", &query.metric)
            .append_pair("from", &query.from.to_string())
            .append_pair("to", &query.to.to_string());
        if let Some(limit) = query.limit.filter(|&limit| limit > 0) {
            pairs.append_pair("limit", &limit.to_string());
        }
    }

    Ok(format!("{path}?{}", url.query().unwrap_or_default()))
}
