//! Hourly production entries and their approval lifecycle.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::api::{EntryId, UserId};

/// Approval state of a production entry.
///
/// Entries are created `Pending` and move exactly once to `Approved` or
/// `Rejected` through a supervisor review.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EntryStatus {
    Pending,
    Approved,
    Rejected,
}

impl EntryStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntryStatus::Pending => "PENDING",
            EntryStatus::Approved => "APPROVED",
            EntryStatus::Rejected => "REJECTED",
        }
    }

    pub fn is_final(&self) -> bool {
        !matches!(self, EntryStatus::Pending)
    }
}

impl std::fmt::Display for EntryStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for EntryStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "PENDING" => Ok(Self::Pending),
            "APPROVED" => Ok(Self::Approved),
            "REJECTED" => Ok(Self::Rejected),
            _ => Err(format!("Unknown entry status: {}", s)),
        }
    }
}

/// Which side(s) of a part the line produced during the hour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ProductionType {
    #[default]
    Lh,
    Rh,
    Both,
}

/// One hour-slot record for one production line and shift.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductionEntry {
    pub id: EntryId,
    pub date: NaiveDate,
    pub line: String,
    pub shift: String,
    pub hour: String,
    pub model: String,
    pub production_type: ProductionType,
    /// Planned operating minutes for the hour slot.
    pub available_time: u32,
    /// Minutes lost to stoppages.
    pub loss_time: u32,
    /// Rated output, units per hour.
    pub line_capacity: u32,
    pub good_parts: u32,
    pub rejects: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub good_parts_lh: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub good_parts_rh: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rejects_lh: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rejects_rh: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub downtime_reason: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remarks: Option<String>,
    pub status: EntryStatus,
    pub submitted_by: UserId,
    #[serde(default)]
    pub approved_by: Option<UserId>,
    #[serde(default)]
    pub approved_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rejection_reason: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ProductionEntry {
    /// Build a fresh `PENDING` entry from a submission.
    pub fn from_new(id: EntryId, new: NewEntry, submitted_by: UserId, now: DateTime<Utc>) -> Self {
        let new = new.normalize();
        Self {
            id,
            date: new.date,
            line: new.line,
            shift: new.shift,
            hour: new.hour,
            model: new.model,
            production_type: new.production_type,
            available_time: new.available_time,
            loss_time: new.loss_time,
            line_capacity: new.line_capacity,
            good_parts: new.good_parts,
            rejects: new.rejects,
            good_parts_lh: new.good_parts_lh,
            good_parts_rh: new.good_parts_rh,
            rejects_lh: new.rejects_lh,
            rejects_rh: new.rejects_rh,
            downtime_reason: new.downtime_reason,
            remarks: new.remarks,
            status: EntryStatus::Pending,
            submitted_by,
            approved_by: None,
            approved_at: None,
            rejection_reason: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Overwrite the recorded production data, keeping identity and audit fields.
    pub fn apply_edit(&mut self, new: NewEntry, now: DateTime<Utc>) {
        let new = new.normalize();
        self.date = new.date;
        self.line = new.line;
        self.shift = new.shift;
        self.hour = new.hour;
        self.model = new.model;
        self.production_type = new.production_type;
        self.available_time = new.available_time;
        self.loss_time = new.loss_time;
        self.line_capacity = new.line_capacity;
        self.good_parts = new.good_parts;
        self.rejects = new.rejects;
        self.good_parts_lh = new.good_parts_lh;
        self.good_parts_rh = new.good_parts_rh;
        self.rejects_lh = new.rejects_lh;
        self.rejects_rh = new.rejects_rh;
        self.downtime_reason = new.downtime_reason;
        self.remarks = new.remarks;
        self.updated_at = now;
    }

    /// Good parts plus rejects.
    pub fn total_produced(&self) -> u64 {
        self.good_parts as u64 + self.rejects as u64
    }
}

/// Payload a team leader submits to record (or edit) an hour slot.
///
/// `availableTime` and `lineCapacity` arrive string-encoded from the entry
/// form; every counter is accepted as a string or a number and converted with
/// [`parse_count`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewEntry {
    pub date: NaiveDate,
    pub line: String,
    pub shift: String,
    pub hour: String,
    #[serde(default)]
    pub model: String,
    #[serde(default)]
    pub production_type: ProductionType,
    #[serde(deserialize_with = "deserialize_count")]
    pub available_time: u32,
    #[serde(default, deserialize_with = "deserialize_count")]
    pub loss_time: u32,
    #[serde(deserialize_with = "deserialize_count")]
    pub line_capacity: u32,
    #[serde(default, deserialize_with = "deserialize_count")]
    pub good_parts: u32,
    #[serde(default, deserialize_with = "deserialize_count")]
    pub rejects: u32,
    #[serde(default, deserialize_with = "deserialize_optional_count")]
    pub good_parts_lh: Option<u32>,
    #[serde(default, deserialize_with = "deserialize_optional_count")]
    pub good_parts_rh: Option<u32>,
    #[serde(default, deserialize_with = "deserialize_optional_count")]
    pub rejects_lh: Option<u32>,
    #[serde(default, deserialize_with = "deserialize_optional_count")]
    pub rejects_rh: Option<u32>,
    #[serde(default)]
    pub downtime_reason: Option<String>,
    #[serde(default)]
    pub remarks: Option<String>,
}

impl NewEntry {
    /// For `BOTH` production the whole-entry totals are the LH + RH sums.
    pub fn normalize(mut self) -> Self {
        if self.production_type == ProductionType::Both {
            self.good_parts = self
                .good_parts_lh
                .unwrap_or(0)
                .saturating_add(self.good_parts_rh.unwrap_or(0));
            self.rejects = self
                .rejects_lh
                .unwrap_or(0)
                .saturating_add(self.rejects_rh.unwrap_or(0));
        }
        self
    }

    /// Check that the context fields are present.
    ///
    /// Values are stored verbatim; whitespace is only considered here to
    /// reject blank fields.
    pub fn validate(&self) -> Result<(), String> {
        let required = [
            ("line", &self.line),
            ("shift", &self.shift),
            ("hour", &self.hour),
            ("model", &self.model),
        ];
        for (name, value) in required {
            if value.trim().is_empty() {
                return Err(format!("Field '{}' is required", name));
            }
        }
        Ok(())
    }
}

/// Parse a string-encoded counter, defaulting to zero.
///
/// Leading whitespace and trailing garbage are tolerated (`"480 min"` is
/// 480), a missing or malformed number yields 0, negative values clamp to 0
/// and values beyond `u32::MAX` saturate.
pub fn parse_count(raw: &str) -> u32 {
    let trimmed = raw.trim_start();
    let (negative, digits) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };
    let end = digits
        .bytes()
        .position(|b| !b.is_ascii_digit())
        .unwrap_or(digits.len());
    if end == 0 || negative {
        return 0;
    }
    digits[..end].parse::<u64>().map_or(u32::MAX, |v| {
        u32::try_from(v).unwrap_or(u32::MAX)
    })
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawCount {
    Int(i64),
    Float(f64),
    Text(String),
}

impl RawCount {
    fn into_count(self) -> u32 {
        match self {
            RawCount::Int(v) => u32::try_from(v.max(0)).unwrap_or(u32::MAX),
            RawCount::Float(v) if v.is_finite() && v > 0.0 => {
                u32::try_from(v.trunc() as u64).unwrap_or(u32::MAX)
            }
            RawCount::Float(_) => 0,
            RawCount::Text(s) => parse_count(&s),
        }
    }
}

fn deserialize_count<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<RawCount>::deserialize(deserializer)?;
    Ok(raw.map_or(0, RawCount::into_count))
}

fn deserialize_optional_count<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<RawCount>::deserialize(deserializer)?;
    Ok(raw.map(RawCount::into_count))
}
