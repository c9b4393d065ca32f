//! The resolve query and its validation.

use lineup_core::assignment::{Scenario, TimePoint};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::InvalidQuery;

/// A point in time and scenario to resolve a formation's chart at.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChartQuery {
  pub customer_id:  Uuid,
  pub formation_id: Uuid,
  /// Empty label = baseline.
  #[serde(default)]
  pub scenario:     Scenario,
  #[serde(flatten)]
  pub at:           TimePoint,
}

impl ChartQuery {
  /// Reject malformed coordinates and missing identifiers up front;
  /// no partial results are ever produced from a bad query.
  pub fn validate(&self) -> Result<(), InvalidQuery> {
    if self.customer_id.is_nil() {
      return Err(InvalidQuery::NilCustomer);
    }
    if self.formation_id.is_nil() {
      return Err(InvalidQuery::NilFormation);
    }
    if !self.at.month_in_range() {
      return Err(InvalidQuery::MonthOutOfRange(self.at.month));
    }
    if !self.at.year_in_range() {
      return Err(InvalidQuery::YearOutOfRange(self.at.year));
    }
    Ok(())
  }
}
