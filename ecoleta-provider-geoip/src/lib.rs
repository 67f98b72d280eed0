//! Providers resolving the operator's current position.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use ecoleta_core::{
    config::LocationConfig,
    model::Coordinate,
    ports::{LocationPort, PortError},
};

/// Response from an ip-api compatible endpoint.
#[derive(Debug, Deserialize)]
struct IpLookup {
    status: String,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    lat: Option<f64>,
    #[serde(default)]
    lon: Option<f64>,
}

/// Position lookup from the public IP address.
pub struct IpLocationPort {
    client: Client,
    url: String,
}

impl IpLocationPort {
    /// Create a new port querying `url`.
    #[must_use]
    pub fn new(client: Client, url: &str) -> Self {
        Self {
            client,
            url: url.to_owned(),
        }
    }
}

#[async_trait]
impl LocationPort for IpLocationPort {
    async fn current_position(&self) -> Result<Coordinate, PortError> {
        debug!(url = %self.url, "GET ip geolocation");
        let lookup: IpLookup = self
            .client
            .get(&self.url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        if lookup.status != "success" {
            return Err(PortError::LocationUnavailable(
                lookup.message.unwrap_or(lookup.status),
            ));
        }

        match (lookup.lat, lookup.lon) {
            (Some(latitude), Some(longitude)) => Ok(Coordinate::new(latitude, longitude)),
            _ => Err(PortError::InvalidResponse(
                "geolocation response without coordinates".into(),
            )),
        }
    }
}

/// Position configured up front.
pub struct FixedLocationPort {
    position: Coordinate,
}

impl FixedLocationPort {
    /// Always answer with `position`.
    #[must_use]
    pub fn new(position: Coordinate) -> Self {
        Self { position }
    }
}

#[async_trait]
impl LocationPort for FixedLocationPort {
    async fn current_position(&self) -> Result<Coordinate, PortError> {
        Ok(self.position)
    }
}

/// Build the location port selected by configuration.
#[must_use]
pub fn plugin(client: Client, config: &LocationConfig) -> Arc<dyn LocationPort> {
    match config {
        LocationConfig::Ip { url } => Arc::new(IpLocationPort::new(client, url)),
        LocationConfig::Fixed {
            latitude,
            longitude,
        } => Arc::new(FixedLocationPort::new(Coordinate::new(*latitude, *longitude))),
    }
}

#[cfg(test)]
mod tests {
    use std::net::SocketAddr;

    use axum::{Json, Router, routing::get};
    use serde_json::{Value, json};

    use super::*;

    async fn serve(body: Value) -> SocketAddr {
        let router = Router::new().route("/json/", get(move || async move { Json(body) }));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind test listener");
        let addr = listener.local_addr().expect("local addr");
        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("test server");
        });
        addr
    }

    #[tokio::test]
    async fn reads_coordinates_from_ip_lookup() {
        let addr = serve(json!({
            "status": "success",
            "city": "Campinas",
            "lat": -22.9,
            "lon": -47.06
        }))
        .await;
        let port = IpLocationPort::new(Client::new(), &format!("http://{addr}/json/"));

        let position = port.current_position().await.expect("position resolves");
        assert_eq!(position, Coordinate::new(-22.9, -47.06));
    }

    #[tokio::test]
    async fn failed_lookup_is_unavailable() {
        let addr = serve(json!({ "status": "fail", "message": "private range" })).await;
        let port = IpLocationPort::new(Client::new(), &format!("http://{addr}/json/"));

        match port.current_position().await {
            Err(PortError::LocationUnavailable(reason)) => assert_eq!(reason, "private range"),
            other => panic!("expected unavailable, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn fixed_source_comes_from_config() {
        let port = plugin(
            Client::new(),
            &LocationConfig::Fixed {
                latitude: -23.5,
                longitude: -46.6,
            },
        );
        assert_eq!(
            port.current_position().await.expect("fixed position"),
            Coordinate::new(-23.5, -46.6)
        );
    }
}
