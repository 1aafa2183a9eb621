//! Range filters over event timestamps.
//!
//! A filter is a conjunction of `$gte` / `$lt` comparisons against a
//! timestamp field of an event, including the nested
//! `user_info.registration_date`. The same filter can be evaluated in memory
//! or compiled to a SQL `WHERE` clause.

use chrono::{DateTime, Utc};

use crate::event::EventRecord;
use crate::time_utils;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventField {
    EventTime,
    RegistrationDate,
}

impl EventField {
    /// Dotted document path of the field.
    pub fn path(&self) -> &'static str {
        match self {
            Self::EventTime => "event_time",
            Self::RegistrationDate => "user_info.registration_date",
        }
    }

    /// SQL expression reading the field from a `user_events` row.
    fn sql_expr(&self) -> &'static str {
        match self {
            Self::EventTime => "event_time",
            Self::RegistrationDate => "json_extract(user_info, '$.registration_date')",
        }
    }

    fn value_of(&self, event: &EventRecord) -> DateTime<Utc> {
        match self {
            Self::EventTime => event.event_time,
            Self::RegistrationDate => event.user_info.registration_date,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeOp {
    /// `$gte`
    Gte,
    /// `$lt`
    Lt,
}

impl RangeOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Gte => "$gte",
            Self::Lt => "$lt",
        }
    }

    fn sql_op(&self) -> &'static str {
        match self {
            Self::Gte => ">=",
            Self::Lt => "<",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RangeClause {
    pub field: EventField,
    pub op: RangeOp,
    pub bound: DateTime<Utc>,
}

impl RangeClause {
    pub fn matches(&self, event: &EventRecord) -> bool {
        let value = self.field.value_of(event);
        match self.op {
            RangeOp::Gte => value >= self.bound,
            RangeOp::Lt => value < self.bound,
        }
    }
}

impl std::fmt::Display for RangeClause {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} {} {}",
            self.field.path(),
            self.op.as_str(),
            time_utils::to_sqlite(&self.bound)
        )
    }
}

/// Conjunction of range clauses. An empty filter matches every event.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventFilter {
    clauses: Vec<RangeClause>,
}

impl EventFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn gte(mut self, field: EventField, bound: DateTime<Utc>) -> Self {
        self.clauses.push(RangeClause { field, op: RangeOp::Gte, bound });
        self
    }

    pub fn lt(mut self, field: EventField, bound: DateTime<Utc>) -> Self {
        self.clauses.push(RangeClause { field, op: RangeOp::Lt, bound });
        self
    }

    pub fn matches(&self, event: &EventRecord) -> bool {
        self.clauses.iter().all(|c| c.matches(event))
    }

    /// `WHERE` body plus positional parameters (`?1`, `?2`, ...).
    /// Bounds are encoded with `time_utils::to_sqlite` so string comparison is
    /// chronological.
    pub fn to_sql(&self) -> (String, Vec<String>) {
        if self.clauses.is_empty() {
            return ("1 = 1".to_string(), Vec::new());
        }
        let mut parts = Vec::with_capacity(self.clauses.len());
        let mut params = Vec::with_capacity(self.clauses.len());
        for (i, clause) in self.clauses.iter().enumerate() {
            parts.push(format!("{} {} ?{}", clause.field.sql_expr(), clause.op.sql_op(), i + 1));
            params.push(time_utils::to_sqlite(&clause.bound));
        }
        (parts.join(" AND "), params)
    }
}

impl std::fmt::Display for EventFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let rendered: Vec<String> = self.clauses.iter().map(|c| c.to_string()).collect();
        f.write_str(&rendered.join(" AND "))
    }
}
