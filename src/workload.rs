use crate::error::{CostError, Result};
use serde::{Deserialize, Serialize};

/// Billing month used for message volumes
pub const DAYS_PER_MONTH: f64 = 30.0;
/// Billing month used for hourly and per-execution charges
pub const HOURS_PER_MONTH: f64 = 730.0;

const MINUTES_PER_HOUR: f64 = 60.0;
const HOURS_PER_DAY: f64 = 24.0;

/// Workload parameters describing one Digital Twin deployment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct WorkloadInput {
    pub devices: f64,
    /// Minutes between two messages of one device
    pub interval_minutes: f64,
    pub message_size_kb: f64,
    pub hot_months: f64,
    pub cool_months: f64,
    pub archive_months: f64,
    /// Number of 3D scene entities; `None` when no 3D model is needed
    #[serde(default)]
    pub entity_count: Option<f64>,
    pub editors: f64,
    pub viewers: f64,
    pub dashboard_refreshes_per_hour: f64,
    pub dashboard_active_hours_per_day: f64,
}

impl WorkloadInput {
    /// Reject missing, NaN, negative or out-of-order fields before any cost model runs
    pub fn validate(&self) -> Result<()> {
        let mut fields = vec![
            ("devices", self.devices),
            ("intervalMinutes", self.interval_minutes),
            ("messageSizeKb", self.message_size_kb),
            ("hotMonths", self.hot_months),
            ("coolMonths", self.cool_months),
            ("archiveMonths", self.archive_months),
            ("editors", self.editors),
            ("viewers", self.viewers),
            ("dashboardRefreshesPerHour", self.dashboard_refreshes_per_hour),
            ("dashboardActiveHoursPerDay", self.dashboard_active_hours_per_day),
        ];
        if let Some(entities) = self.entity_count {
            fields.push(("entityCount", entities));
        }

        for (name, value) in &fields {
            if !value.is_finite() {
                return Err(CostError::invalid_input(format!("{} must be a number", name)));
            }
            if *value < 0.0 {
                return Err(CostError::invalid_input(format!(
                    "{} cannot be negative, got {}",
                    name, value
                )));
            }
        }

        for (name, value) in [
            ("devices", self.devices),
            ("intervalMinutes", self.interval_minutes),
            ("messageSizeKb", self.message_size_kb),
        ] {
            if value <= 0.0 {
                return Err(CostError::invalid_input(format!(
                    "{} must be positive, got {}",
                    name, value
                )));
            }
        }

        if self.dashboard_active_hours_per_day > HOURS_PER_DAY {
            return Err(CostError::invalid_input(format!(
                "dashboardActiveHoursPerDay cannot exceed 24, got {}",
                self.dashboard_active_hours_per_day
            )));
        }

        if self.hot_months > self.cool_months {
            return Err(CostError::invalid_input(
                "Hot storage duration cannot be longer than cool storage duration",
            ));
        }
        if self.hot_months > self.archive_months {
            return Err(CostError::invalid_input(
                "Hot storage duration cannot be longer than archive storage duration",
            ));
        }
        if self.cool_months > self.archive_months {
            return Err(CostError::invalid_input(
                "Cool storage duration cannot be longer than archive storage duration",
            ));
        }

        // finite inputs can still overflow once scaled to a month
        let monthly_gb = kb_to_gb(self.monthly_executions(), self.message_size_kb);
        for (name, value) in [
            ("monthly message volume", self.monthly_messages()),
            ("monthly execution volume", self.monthly_executions()),
            ("monthly data volume", monthly_gb),
            ("retained data volume", monthly_gb * self.archive_months),
            ("dashboard query volume", self.dashboard_queries_per_month()),
            ("dashboard user count", self.editors + self.viewers),
        ] {
            if !value.is_finite() {
                return Err(CostError::invalid_input(format!(
                    "{} overflows for this workload",
                    name
                )));
            }
        }

        Ok(())
    }

    /// Messages sent by all devices in a 30-day month, rounded up
    pub fn monthly_messages(&self) -> f64 {
        (self.messages_per_hour() * HOURS_PER_DAY * DAYS_PER_MONTH).ceil()
    }

    /// Function executions in a 730-hour month, one per message
    pub fn monthly_executions(&self) -> f64 {
        self.messages_per_hour() * HOURS_PER_MONTH
    }

    /// Queries a dashboard issues against the twin service per month
    pub fn dashboard_queries_per_month(&self) -> f64 {
        self.dashboard_refreshes_per_hour * self.dashboard_active_hours_per_day * DAYS_PER_MONTH
    }

    pub fn needs_3d_model(&self) -> bool {
        self.entity_count.is_some()
    }

    pub fn entities(&self) -> f64 {
        self.entity_count.unwrap_or(0.0)
    }

    fn messages_per_hour(&self) -> f64 {
        self.devices * (MINUTES_PER_HOUR / self.interval_minutes)
    }
}

/// Convert a volume of `count` messages of `size_kb` each into GB
pub fn kb_to_gb(count: f64, size_kb: f64) -> f64 {
    count * size_kb / (1024.0 * 1024.0)
}

#[cfg(test)]
pub(crate) fn sample_workload() -> WorkloadInput {
    WorkloadInput {
        devices: 100.0,
        interval_minutes: 5.0,
        message_size_kb: 1.0,
        hot_months: 1.0,
        cool_months: 3.0,
        archive_months: 12.0,
        entity_count: None,
        editors: 2.0,
        viewers: 5.0,
        dashboard_refreshes_per_hour: 4.0,
        dashboard_active_hours_per_day: 8.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_monthly_volumes() {
        let workload = sample_workload();
        assert_eq!(workload.monthly_messages(), 864_000.0);
        assert_eq!(workload.monthly_executions(), 876_000.0);
        assert_eq!(workload.dashboard_queries_per_month(), 960.0);
    }

    #[test]
    fn test_monthly_messages_rounds_up() {
        let mut workload = sample_workload();
        workload.devices = 1.0;
        workload.interval_minutes = 7.0;
        // 60/7 * 720 = 6171.43
        assert_eq!(workload.monthly_messages(), 6172.0);
    }

    #[test]
    fn test_valid_workload() {
        assert!(sample_workload().validate().is_ok());
    }

    #[test]
    fn test_equal_retentions_are_valid() {
        let mut workload = sample_workload();
        workload.hot_months = 6.0;
        workload.cool_months = 6.0;
        workload.archive_months = 6.0;
        assert!(workload.validate().is_ok());
    }

    #[test]
    fn test_hot_longer_than_cool_is_rejected() {
        let mut workload = sample_workload();
        workload.hot_months = 4.0;
        let err = workload.validate().unwrap_err();
        assert!(matches!(err, CostError::InvalidInput(_)));
        assert!(err.to_string().contains("cool storage"));
    }

    #[test]
    fn test_cool_longer_than_archive_is_rejected() {
        let mut workload = sample_workload();
        workload.cool_months = 13.0;
        assert!(workload.validate().is_err());
    }

    #[test]
    fn test_nan_and_non_positive_acquisition_parameters() {
        let mut workload = sample_workload();
        workload.interval_minutes = f64::NAN;
        assert!(workload.validate().is_err());

        let mut workload = sample_workload();
        workload.devices = 0.0;
        assert!(workload.validate().is_err());

        let mut workload = sample_workload();
        workload.viewers = -1.0;
        assert!(workload.validate().is_err());

        let mut workload = sample_workload();
        workload.editors = 0.0;
        workload.viewers = 0.0;
        assert!(workload.validate().is_ok());
    }

    #[test]
    fn test_overflowing_volumes_are_invalid_input() {
        let mut workload = sample_workload();
        workload.devices = 1e306;
        let err = workload.validate().unwrap_err();
        assert!(matches!(err, CostError::InvalidInput(_)));
        assert!(err.to_string().contains("overflows"));

        let mut workload = sample_workload();
        workload.interval_minutes = 1e-305;
        assert!(matches!(workload.validate(), Err(CostError::InvalidInput(_))));

        let mut workload = sample_workload();
        workload.message_size_kb = 1e300;
        workload.archive_months = 1e300;
        assert!(matches!(workload.validate(), Err(CostError::InvalidInput(_))));

        let mut workload = sample_workload();
        workload.dashboard_refreshes_per_hour = 1e306;
        assert!(matches!(workload.validate(), Err(CostError::InvalidInput(_))));
    }

    #[test]
    fn test_active_hours_cannot_exceed_a_day() {
        let mut workload = sample_workload();
        workload.dashboard_active_hours_per_day = 24.0;
        assert!(workload.validate().is_ok());
        workload.dashboard_active_hours_per_day = 25.0;
        let err = workload.validate().unwrap_err();
        assert!(err.to_string().contains("cannot exceed 24"));
    }

    #[test]
    fn test_missing_field_fails_deserialization() {
        let json = r#"{"devices": 10, "intervalMinutes": 5}"#;
        assert!(serde_json::from_str::<WorkloadInput>(json).is_err());
    }

    #[test]
    fn test_entity_count_is_optional() {
        let json = r#"{
            "devices": 10, "intervalMinutes": 5, "messageSizeKb": 1,
            "hotMonths": 1, "coolMonths": 3, "archiveMonths": 12,
            "editors": 1, "viewers": 2,
            "dashboardRefreshesPerHour": 0, "dashboardActiveHoursPerDay": 0
        }"#;
        let workload: WorkloadInput = serde_json::from_str(json).unwrap();
        assert!(!workload.needs_3d_model());
        assert_eq!(workload.entities(), 0.0);
    }
}
