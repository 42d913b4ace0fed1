use fleetpath_core::{Coordinate, InputValidationError, NodeIdx, timer_debug};
use futures::{StreamExt, stream};
use tracing::{debug, info, instrument, warn};

use crate::{
    as_the_crow_flies::as_the_crow_flies_matrix,
    blocks::{Block, block_pairs},
    cost_matrix::{Cost, CostMatrix},
    distance_backend::{BlockRequest, BlockResponse, DistanceBackend},
    error::{CostMatrixError, ExternalServiceError},
    travel_mode::TravelMode,
};

#[derive(Debug, Clone, Copy)]
pub struct DistanceBackendConfig {
    /// Maximum origins (and destinations) per backend request.
    pub max_elements: usize,

    /// Upper bound on block requests in flight at once.
    pub max_concurrent_requests: usize,
}

impl Default for DistanceBackendConfig {
    fn default() -> Self {
        Self {
            max_elements: 10,
            max_concurrent_requests: 4,
        }
    }
}

impl DistanceBackendConfig {
    fn validate(&self) -> Result<(), InputValidationError> {
        if self.max_elements == 0 {
            return Err(InputValidationError::InvalidConfiguration(
                "max_elements must be at least 1".to_string(),
            ));
        }

        if self.max_concurrent_requests == 0 {
            return Err(InputValidationError::InvalidConfiguration(
                "max_concurrent_requests must be at least 1".to_string(),
            ));
        }

        Ok(())
    }
}

/// Builds N×N cost matrices, either analytically or by querying a [`DistanceBackend`]
/// block by block. A build either returns a complete matrix or fails.
pub struct CostMatrixBuilder<B> {
    backend: B,
    config: DistanceBackendConfig,
}

impl<B> CostMatrixBuilder<B>
where
    B: DistanceBackend,
{
    pub fn new(backend: B, config: DistanceBackendConfig) -> Self {
        Self { backend, config }
    }

    pub fn config(&self) -> &DistanceBackendConfig {
        &self.config
    }

    #[instrument(skip_all, level = "info", fields(mode = %mode, nodes = coordinates.len()))]
    pub async fn build(
        &self,
        coordinates: &[Coordinate],
        mode: TravelMode,
    ) -> Result<CostMatrix, CostMatrixError> {
        for coordinate in coordinates {
            coordinate.validate()?;
        }

        if mode.is_analytic() {
            return Ok(timer_debug!(
                "Geodesic cost matrix",
                as_the_crow_flies_matrix(coordinates)
            ));
        }

        self.config.validate()?;

        let matrix = timer_debug!(
            "Queried cost matrix",
            self.build_queried(coordinates, mode).await
        )?;

        Ok(matrix)
    }

    async fn build_queried(
        &self,
        coordinates: &[Coordinate],
        mode: TravelMode,
    ) -> Result<CostMatrix, ExternalServiceError> {
        let num_nodes = coordinates.len();
        let pairs = block_pairs(num_nodes, self.config.max_elements);

        info!(
            "Building {} cost matrix for {} nodes with {} block requests",
            mode,
            num_nodes,
            pairs.len()
        );

        let mut costs: Vec<Cost> = vec![0.0; num_nodes * num_nodes];

        let mut responses = stream::iter(pairs.into_iter().map(|(rows, cols)| async move {
            debug!(
                "Requesting block rows {:?} x cols {:?}",
                rows.range(),
                cols.range()
            );

            let response = self
                .backend
                .fetch_block(BlockRequest {
                    origins: &coordinates[rows.range()],
                    destinations: &coordinates[cols.range()],
                    mode,
                })
                .await?;

            Ok::<_, ExternalServiceError>((rows, cols, response))
        }))
        .buffer_unordered(self.config.max_concurrent_requests);

        // Completion order is irrelevant: every response carries its own offsets.
        while let Some(result) = responses.next().await {
            let (rows, cols, response) = result?;
            stitch_block(&mut costs, coordinates, rows, cols, response)?;
        }

        Ok(CostMatrix::from_flat(costs, num_nodes))
    }
}

fn stitch_block(
    costs: &mut [Cost],
    coordinates: &[Coordinate],
    rows: Block,
    cols: Block,
    response: BlockResponse,
) -> Result<(), ExternalServiceError> {
    let num_nodes = coordinates.len();

    if response.rows.len() != rows.len {
        return Err(ExternalServiceError::MalformedResponse(format!(
            "expected {} rows, got {}",
            rows.len,
            response.rows.len()
        )));
    }

    for (i, row) in response.rows.into_iter().enumerate() {
        if row.len() != cols.len {
            return Err(ExternalServiceError::MalformedResponse(format!(
                "expected {} elements in row {}, got {}",
                cols.len,
                rows.offset + i,
                row.len()
            )));
        }

        for (j, element) in row.into_iter().enumerate() {
            let origin = rows.offset + i;
            let destination = cols.offset + j;

            let value = match (element.status.is_ok(), element.value) {
                (true, Some(value)) => value,
                (true, None) => {
                    return Err(ExternalServiceError::MalformedResponse(format!(
                        "element {} -> {} is OK but carries no value",
                        origin, destination
                    )));
                }
                (false, _) => {
                    warn!(
                        "{} Check origin {} and destination {}",
                        element.status.description(),
                        origin,
                        destination
                    );

                    return Err(ExternalServiceError::Element {
                        origin: NodeIdx::new(origin),
                        destination: NodeIdx::new(destination),
                        origin_coordinate: coordinates[origin],
                        destination_coordinate: coordinates[destination],
                        status: element.status,
                    });
                }
            };

            costs[origin * num_nodes + destination] = value.trunc();
        }
    }

    Ok(())
}
