use fleetpath_core::InputValidationError;
use serde::Deserialize;
use tracing::debug;

use crate::{
    distance_backend::{
        BackendElement, BlockRequest, BlockResponse, DistanceBackend, ElementStatus,
    },
    error::ExternalServiceError,
};

pub const GOOGLE_DISTANCE_MATRIX_API_URL: &str =
    "https://maps.googleapis.com/maps/api/distancematrix/json";

const API_KEY_ENV_VAR: &str = "DISTANCE_MATRIX_API_KEY";
const API_URL_ENV_VAR: &str = "DISTANCE_MATRIX_API_URL";

#[derive(Deserialize)]
struct DistanceMatrixResponse {
    status: String,
    error_message: Option<String>,
    #[serde(default)]
    rows: Vec<DistanceMatrixRow>,
}

#[derive(Deserialize)]
struct DistanceMatrixRow {
    elements: Vec<DistanceMatrixElement>,
}

#[derive(Deserialize)]
struct DistanceMatrixElement {
    status: ElementStatus,
    distance: Option<TextValue>,
}

#[derive(Deserialize)]
struct TextValue {
    /// Meters
    value: f64,
}

#[derive(Debug, Clone)]
pub struct GoogleDistanceMatrixClientParams {
    pub api_key: String,
    pub api_url: String,
}

impl GoogleDistanceMatrixClientParams {
    /// Reads `DISTANCE_MATRIX_API_KEY` and, optionally, `DISTANCE_MATRIX_API_URL`.
    pub fn from_env() -> Result<Self, InputValidationError> {
        let api_key = std::env::var(API_KEY_ENV_VAR).map_err(|_| {
            InputValidationError::InvalidConfiguration(format!("{} is not set", API_KEY_ENV_VAR))
        })?;
        let api_url = std::env::var(API_URL_ENV_VAR)
            .unwrap_or_else(|_| GOOGLE_DISTANCE_MATRIX_API_URL.to_string());

        Ok(Self { api_key, api_url })
    }
}

pub struct GoogleDistanceMatrixClient {
    params: GoogleDistanceMatrixClientParams,
    client: reqwest::Client,
}

fn format_locations<P>(points: &[P]) -> String
where
    for<'a> &'a P: Into<geo_types::Point>,
{
    points
        .iter()
        .map(|p| {
            let point: geo_types::Point = p.into();
            format!("{},{}", point.y(), point.x())
        })
        .collect::<Vec<_>>()
        .join("|")
}

fn into_block_response(
    response: DistanceMatrixResponse,
) -> Result<BlockResponse, ExternalServiceError> {
    if response.status != "OK" {
        return Err(ExternalServiceError::RequestStatus {
            status: response.status,
            message: response.error_message.unwrap_or_default(),
        });
    }

    let rows = response
        .rows
        .into_iter()
        .map(|row| {
            row.elements
                .into_iter()
                .map(|element| BackendElement {
                    status: element.status,
                    value: element.distance.map(|distance| distance.value),
                })
                .collect()
        })
        .collect();

    Ok(BlockResponse { rows })
}

impl GoogleDistanceMatrixClient {
    pub fn new(params: GoogleDistanceMatrixClientParams) -> Self {
        Self {
            params,
            client: reqwest::Client::new(),
        }
    }

    async fn handle_response(
        &self,
        response: reqwest::Response,
    ) -> Result<BlockResponse, ExternalServiceError> {
        if response.status().is_success() {
            let matrix_response: DistanceMatrixResponse = response.json().await?;
            into_block_response(matrix_response)
        } else {
            let status = response.status().as_u16();
            let message = response.text().await.unwrap_or_default();
            Err(ExternalServiceError::Api { status, message })
        }
    }
}

impl DistanceBackend for GoogleDistanceMatrixClient {
    async fn fetch_block(
        &self,
        request: BlockRequest<'_>,
    ) -> Result<BlockResponse, ExternalServiceError> {
        debug!(
            "DistanceMatrixApi: Requesting {}x{} block ({})",
            request.origins.len(),
            request.destinations.len(),
            request.mode
        );

        let response = self
            .client
            .get(&self.params.api_url)
            .query(&[
                ("origins", format_locations(request.origins)),
                ("destinations", format_locations(request.destinations)),
                ("mode", request.mode.to_string()),
                ("key", self.params.api_key.clone()),
            ])
            .send()
            .await?;

        self.handle_response(response).await
    }
}
