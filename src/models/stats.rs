//! Dashboard statistics

use serde::Serialize;
use sqlx::FromRow;
use utoipa::ToSchema;

/// PPD dashboard counters
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, ToSchema)]
pub struct PpdStats {
    /// Approved TVPSS versions
    pub approved_tvpss: i64,
    /// TVPSS versions waiting for validation
    pub pending_validation: i64,
    pub schools_in_district: i64,
}

/// Equipment count for one status
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct StatusCount {
    pub status: String,
    pub count: i64,
}

/// School admin dashboard counters
#[derive(Debug, Clone, Default, Serialize, ToSchema)]
pub struct SchoolStats {
    pub equipment_total: i64,
    pub equipment_by_status: Vec<StatusCount>,
    pub students: i64,
    pub pending_crew_applications: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_stats_are_zero() {
        let json = serde_json::to_value(PpdStats::default()).unwrap();
        assert_eq!(json["approved_tvpss"], 0);
        assert_eq!(json["pending_validation"], 0);
        assert_eq!(json["schools_in_district"], 0);

        let school = SchoolStats::default();
        assert_eq!(school.equipment_total, 0);
        assert!(school.equipment_by_status.is_empty());
    }
}
