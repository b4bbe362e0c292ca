//! Hard filters applied to recalled jobs.
//!
//! Jobs whose field cannot be parsed pass the corresponding filter: a
//! posting with negotiable pay or no stated experience is not excluded.

use crate::core::JobRecord;
use crate::core::parse::{parse_salary_range, parse_years};

use super::types::MatchFilters;

/// Filter configuration for one request.
#[derive(Debug, Clone, Default)]
pub struct HardFilters {
    location: Option<String>,
    min_salary: Option<f32>,
    experience_years: Option<f32>,
    company_size: Option<String>,
    experience_tolerance: f32,
}

impl HardFilters {
    pub fn new() -> Self {
        Self {
            experience_tolerance: 1.0,
            ..Default::default()
        }
    }

    /// Build from a request's location and filters.
    pub fn from_request(location: Option<&str>, filters: &MatchFilters, tolerance: f32) -> Self {
        let mut hard = Self::new().experience_tolerance(tolerance);
        if let Some(location) = location {
            hard = hard.location(location);
        }
        if let Some(min_salary) = filters.min_salary {
            hard = hard.min_salary(min_salary);
        }
        if let Some(years) = filters.experience_years {
            hard = hard.experience_years(years);
        }
        if let Some(size) = filters.company_size.as_deref() {
            hard = hard.company_size(size);
        }
        hard
    }

    /// Case-insensitive substring of the job location.
    pub fn location(mut self, location: &str) -> Self {
        let location = location.trim().to_lowercase();
        self.location = (!location.is_empty()).then_some(location);
        self
    }

    pub fn min_salary(mut self, min_salary: f32) -> Self {
        self.min_salary = (min_salary.is_finite() && min_salary > 0.0).then_some(min_salary);
        self
    }

    pub fn experience_years(mut self, years: f32) -> Self {
        self.experience_years = years.is_finite().then_some(years);
        self
    }

    /// Exact company-size label, ignoring case and surrounding whitespace.
    pub fn company_size(mut self, size: &str) -> Self {
        let size = size.trim().to_lowercase();
        self.company_size = (!size.is_empty()).then_some(size);
        self
    }

    pub fn experience_tolerance(mut self, tolerance: f32) -> Self {
        self.experience_tolerance = if tolerance.is_finite() { tolerance.max(0.0) } else { 1.0 };
        self
    }

    /// Check whether a job passes every configured filter.
    pub fn matches(&self, job: &JobRecord) -> bool {
        if let Some(location) = &self.location {
            if !job.location.to_lowercase().contains(location.as_str()) {
                return false;
            }
        }

        if let Some(min_salary) = self.min_salary {
            let (_, max) = parse_salary_range(&job.salary);
            if max > 0.0 && max < min_salary {
                return false;
            }
        }

        if let Some(years) = self.experience_years {
            let required = parse_years(&job.experience);
            if required > 0.0 && (required - years).abs() > self.experience_tolerance {
                return false;
            }
        }

        if let Some(size) = &self.company_size {
            if job.company_size.trim().to_lowercase() != *size {
                return false;
            }
        }

        true
    }

    /// Whether any filter is configured.
    pub fn is_empty(&self) -> bool {
        self.location.is_none()
            && self.min_salary.is_none()
            && self.experience_years.is_none()
            && self.company_size.is_none()
    }
}
