//! Provider implementation for states and municipalities using the IBGE `localidades` API.

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use ecoleta_core::{
    model::{CityName, StateCode},
    ports::{GeographyPort, PortError},
};

/// Public endpoint of the IBGE `localidades` API.
pub const BASE_URL: &str = "https://servicodados.ibge.gov.br/api/v1/localidades";

/// Single entry from /estados
#[derive(Debug, Deserialize)]
struct StateEntry {
    sigla: String,
    // id, nome and regiao are not needed
}

/// Single entry from /estados/{uf}/municipios
#[derive(Debug, Deserialize)]
struct MunicipalityEntry {
    nome: String,
}

/// Geography implementation backed by IBGE.
pub struct IbgeGeographyPort {
    client: Client,
    base_url: String,
}

impl IbgeGeographyPort {
    /// Create a new port against the public IBGE endpoint.
    #[must_use]
    pub fn new(client: Client) -> Self {
        Self::with_base_url(client, BASE_URL)
    }

    /// Create a new port against a custom `localidades` base URL.
    #[must_use]
    pub fn with_base_url(client: Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_owned(),
        }
    }
}

#[async_trait]
impl GeographyPort for IbgeGeographyPort {
    async fn states(&self) -> Result<Vec<StateCode>, PortError> {
        let url = format!("{}/estados", self.base_url);
        debug!(%url, "GET states");
        let entries = fetch_json::<Vec<StateEntry>>(self.client.get(url)).await?;
        Ok(entries
            .into_iter()
            .map(|entry| StateCode(entry.sigla))
            .collect())
    }

    async fn municipalities(&self, uf: &StateCode) -> Result<Vec<CityName>, PortError> {
        if uf.0.trim().is_empty() {
            return Err(PortError::Internal("Empty state code".into()));
        }

        let url = format!("{}/estados/{}/municipios", self.base_url, uf.0);
        debug!(%url, "GET municipalities");
        let entries = fetch_json::<Vec<MunicipalityEntry>>(self.client.get(url)).await?;
        Ok(entries
            .into_iter()
            .map(|entry| CityName(entry.nome))
            .collect())
    }
}

async fn fetch_json<T: DeserializeOwned>(req: RequestBuilder) -> Result<T, PortError> {
    req.send()
        .await
        .map_err(PortError::from)?
        .error_for_status()
        .map_err(PortError::from)?
        .json()
        .await
        .map_err(PortError::from)
}
