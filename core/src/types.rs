//! Domain types for logged health events.
//!
//! # Design
//! `Event` is a closed tagged variant: each kind carries exactly the fields
//! that kind needs, so a toilet visit can never grow an `amount`. Text fields
//! are stored as entered, empty strings included. Validation, if any, belongs
//! to the form that collects them.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The three kinds of loggable events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    Food,
    Drink,
    Toilet,
}

impl EventKind {
    pub const ALL: [EventKind; 3] = [EventKind::Food, EventKind::Drink, EventKind::Toilet];

    /// Wire name, also used as the payload's `type` discriminator.
    pub fn as_str(self) -> &'static str {
        match self {
            EventKind::Food => "food",
            EventKind::Drink => "drink",
            EventKind::Toilet => "toilet",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What happened during a toilet visit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ToiletAction {
    Poop,
    Pee,
}

impl ToiletAction {
    pub fn as_str(self) -> &'static str {
        match self {
            ToiletAction::Poop => "Poop",
            ToiletAction::Pee => "Pee",
        }
    }
}

impl fmt::Display for ToiletAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
#[error("unknown toilet action: {0:?}")]
pub struct UnknownToiletAction(pub String);

impl FromStr for ToiletAction {
    type Err = UnknownToiletAction;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("poop") {
            Ok(ToiletAction::Poop)
        } else if s.eq_ignore_ascii_case("pee") {
            Ok(ToiletAction::Pee)
        } else {
            Err(UnknownToiletAction(s.to_string()))
        }
    }
}

/// Something eaten or drunk. `item` and `amount` are free-form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Intake {
    pub item: String,
    pub amount: String,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToiletVisit {
    pub action: ToiletAction,
    pub occurred_at: DateTime<Utc>,
}

/// A single logged event, built right before submission and dropped after.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Food(Intake),
    Drink(Intake),
    Toilet(ToiletVisit),
}

impl Event {
    pub fn food(item: impl Into<String>, amount: impl Into<String>, occurred_at: DateTime<Utc>) -> Self {
        Event::Food(Intake {
            item: item.into(),
            amount: amount.into(),
            occurred_at,
        })
    }

    pub fn drink(item: impl Into<String>, amount: impl Into<String>, occurred_at: DateTime<Utc>) -> Self {
        Event::Drink(Intake {
            item: item.into(),
            amount: amount.into(),
            occurred_at,
        })
    }

    pub fn toilet(action: ToiletAction, occurred_at: DateTime<Utc>) -> Self {
        Event::Toilet(ToiletVisit { action, occurred_at })
    }

    pub fn kind(&self) -> EventKind {
        match self {
            Event::Food(_) => EventKind::Food,
            Event::Drink(_) => EventKind::Drink,
            Event::Toilet(_) => EventKind::Toilet,
        }
    }

    pub fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            Event::Food(intake) | Event::Drink(intake) => intake.occurred_at,
            Event::Toilet(visit) => visit.occurred_at,
        }
    }
}
