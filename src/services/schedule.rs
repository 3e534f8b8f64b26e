use crate::domain::schedule::{find_conflicts, layout_block};
use crate::dto::schedule::{ScheduleCheckRequest, ScheduleCheckResponse};
use crate::services::ServiceResult;

/// Checks a dropped work order against the day's orders and lays it out.
pub fn check_schedule(request: ScheduleCheckRequest) -> ServiceResult<ScheduleCheckResponse> {
    let grid = request.grid.unwrap_or_default();
    let conflicts = find_conflicts(&request.orders, &request.candidate)?;
    let layout = layout_block(&request.candidate, &grid)?;

    if !conflicts.is_empty() {
        log::debug!(
            "Order {} conflicts with {:?}",
            request.candidate.id,
            conflicts
        );
    }

    Ok(ScheduleCheckResponse { conflicts, layout })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::schedule::WorkOrder;
    use crate::services::ServiceError;

    fn order(id: &str, technician: &str, start: &str) -> WorkOrder {
        WorkOrder {
            id: id.to_string(),
            technician: technician.to_string(),
            start: start.to_string(),
            service_minutes: 60,
            travel_minutes: 30,
        }
    }

    #[test]
    fn reports_conflicts_and_layout() {
        let request = ScheduleCheckRequest {
            orders: vec![order("a", "juan", "09:00"), order("b", "ana", "09:00")],
            candidate: order("c", "juan", "09:45"),
            grid: None,
        };

        let response = check_schedule(request).unwrap();

        assert_eq!(response.conflicts, vec!["a".to_string()]);
        assert!(response.layout.height > 0.0);
    }

    #[test]
    fn malformed_start_is_rejected() {
        let request = ScheduleCheckRequest {
            orders: vec![],
            candidate: order("c", "juan", "nueve"),
            grid: None,
        };

        assert!(matches!(
            check_schedule(request),
            Err(ServiceError::TypeConstraint(_))
        ));
    }
}
