use std::sync::Arc;

use chrono::{Datelike, Months, NaiveDate};
use curatia_core::{AppError, AppResult};

use crate::template_ports::{Clock, DepositStatisticsRepository};

/// One monthly bucket of container creations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthlyCount {
    /// First day of the bucket's month.
    pub month: NaiveDate,
    /// Containers created within the month.
    pub count: u64,
}

/// Container-creation counts bucketed per month over a trailing window.
#[derive(Clone)]
pub struct DepositStatisticsService {
    repository: Arc<dyn DepositStatisticsRepository>,
    clock: Arc<dyn Clock>,
}

impl DepositStatisticsService {
    /// Creates a statistics service.
    #[must_use]
    pub fn new(repository: Arc<dyn DepositStatisticsRepository>, clock: Arc<dyn Clock>) -> Self {
        Self { repository, clock }
    }

    /// Returns one count per month for the trailing `months_back` months,
    /// oldest bucket first, ending with the current month. Each bucket
    /// spans `[month start, next month start)`.
    pub async fn points(&self, months_back: u32) -> AppResult<Vec<MonthlyCount>> {
        let today = self.clock.today();
        let current_month = today.with_day(1).unwrap_or(today);

        let mut points = Vec::with_capacity(months_back as usize);
        for offset in (0..months_back).rev() {
            let start = current_month
                .checked_sub_months(Months::new(offset))
                .ok_or_else(|| {
                    AppError::Internal(format!("month arithmetic overflow at offset {offset}"))
                })?;
            let end = start.checked_add_months(Months::new(1)).ok_or_else(|| {
                AppError::Internal(format!("month arithmetic overflow after {start}"))
            })?;

            let count = self.repository.count_created_between(start, end).await?;
            points.push(MonthlyCount {
                month: start,
                count,
            });
        }

        Ok(points)
    }
}
