use crate::dto::api::ClientsResponse;
use crate::services::dataset::ReviewDataset;

/// Returns the review queue as served by `/api/v1/clients`.
pub fn list_clients(dataset: &ReviewDataset) -> ClientsResponse {
    ClientsResponse {
        total: dataset.clients.len(),
        rejected: dataset.rejected.len(),
        clients: dataset.clients.to_vec(),
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::domain::transform::RejectedRecord;
    use crate::domain::view_model::fixtures::card;

    #[test]
    fn reports_queue_and_rejections() {
        let dataset = ReviewDataset {
            clients: vec![card(2, "Call"), card(1, "Call")].into(),
            rejected: vec![RejectedRecord {
                index: 2,
                company: None,
                reason: "missing required field `company`".to_string(),
            }],
            today: NaiveDate::from_ymd_opt(2025, 3, 31).unwrap(),
        };

        let response = list_clients(&dataset);

        assert_eq!(response.total, 2);
        assert_eq!(response.rejected, 1);
        assert_eq!(response.clients[0].id.get(), 2);
    }
}
