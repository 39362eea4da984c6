//! JSON wire shapes for submitted events.
//!
//! # Design
//! `Payload` mirrors the webhook's three body shapes one variant each, with
//! serde renames carrying the receiver's field names. Building it from an
//! `Event` is an exhaustive match, so adding a kind without a wire shape
//! fails to compile. Every value is a JSON string, timestamps included.

use std::str::FromStr;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{Event, EventKind, ToiletAction};

/// How timestamps are rendered into payload strings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimestampFormat {
    /// `2024-01-15 08:30:00 +0000`, the format the receiver already ingests.
    #[default]
    Description,
    /// `2024-01-15T08:30:00+00:00`.
    Rfc3339,
}

impl TimestampFormat {
    pub fn render(self, at: &DateTime<Utc>) -> String {
        match self {
            TimestampFormat::Description => at.format("%Y-%m-%d %H:%M:%S %z").to_string(),
            TimestampFormat::Rfc3339 => at.to_rfc3339_opts(SecondsFormat::Secs, false),
        }
    }
}

impl FromStr for TimestampFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "description" => Ok(TimestampFormat::Description),
            "rfc3339" => Ok(TimestampFormat::Rfc3339),
            other => Err(other.to_string()),
        }
    }
}

/// Request body sent to the webhook, internally tagged by `type`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Payload {
    Food {
        food: String,
        food_amount: String,
        #[serde(rename = "eatenAt")]
        eaten_at: String,
    },
    Drink {
        drink: String,
        amount: String,
        #[serde(rename = "drunkAt")]
        drunk_at: String,
    },
    Toilet {
        action: ToiletAction,
        time: String,
    },
}

impl Payload {
    pub fn kind(&self) -> EventKind {
        match self {
            Payload::Food { .. } => EventKind::Food,
            Payload::Drink { .. } => EventKind::Drink,
            Payload::Toilet { .. } => EventKind::Toilet,
        }
    }
}

impl Event {
    /// Build the wire shape for this event.
    pub fn to_payload(&self, format: TimestampFormat) -> Payload {
        match self {
            Event::Food(intake) => Payload::Food {
                food: intake.item.clone(),
                food_amount: intake.amount.clone(),
                eaten_at: format.render(&intake.occurred_at),
            },
            Event::Drink(intake) => Payload::Drink {
                drink: intake.item.clone(),
                amount: intake.amount.clone(),
                drunk_at: format.render(&intake.occurred_at),
            },
            Event::Toilet(visit) => Payload::Toilet {
                action: visit.action,
                time: format.render(&visit.occurred_at),
            },
        }
    }
}
