//! DTOs exposed by the JSON API endpoints.

use serde::Serialize;

use crate::domain::view_model::ClientViewModel;

/// Payload of `/api/v1/clients`.
#[derive(Debug, Serialize)]
pub struct ClientsResponse {
    /// Number of clients in the review queue.
    pub total: usize,
    /// Records of the dataset that could not be turned into cards.
    pub rejected: usize,
    /// Review queue in order.
    pub clients: Vec<ClientViewModel>,
}
