use std::{collections::BTreeSet, fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::{TagParseError, TimeSlotParseError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Weekday {
    Sunday,
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
}

impl Weekday {
    /// Calendar order, Sunday first.
    pub const ALL: [Weekday; 7] = [
        Weekday::Sunday,
        Weekday::Monday,
        Weekday::Tuesday,
        Weekday::Wednesday,
        Weekday::Thursday,
        Weekday::Friday,
        Weekday::Saturday,
    ];

    /// Days exposed for editing. Friday and Saturday keep their defaults.
    pub const EDITABLE: [Weekday; 5] = [
        Weekday::Sunday,
        Weekday::Monday,
        Weekday::Tuesday,
        Weekday::Wednesday,
        Weekday::Thursday,
    ];

    pub fn is_editable(self) -> bool {
        Self::EDITABLE.contains(&self)
    }

    pub fn key(self) -> &'static str {
        match self {
            Weekday::Sunday => "sunday",
            Weekday::Monday => "monday",
            Weekday::Tuesday => "tuesday",
            Weekday::Wednesday => "wednesday",
            Weekday::Thursday => "thursday",
            Weekday::Friday => "friday",
            Weekday::Saturday => "saturday",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Weekday::Sunday => "Sunday",
            Weekday::Monday => "Monday",
            Weekday::Tuesday => "Tuesday",
            Weekday::Wednesday => "Wednesday",
            Weekday::Thursday => "Thursday",
            Weekday::Friday => "Friday",
            Weekday::Saturday => "Saturday",
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One selectable open/close time. Only the hourly slots from 06:00 through
/// 23:00 plus the wrapped 00:00 exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TimeSlot {
    hour: u8,
}

impl TimeSlot {
    pub const COUNT: usize = 19;
    const FIRST_HOUR: u8 = 6;

    pub const DEFAULT_OPEN: TimeSlot = TimeSlot { hour: 9 };
    pub const DEFAULT_CLOSE: TimeSlot = TimeSlot { hour: 17 };
    pub const MIDNIGHT: TimeSlot = TimeSlot { hour: 0 };

    /// All slots in selector order: 06:00 .. 23:00, then 00:00.
    pub fn all() -> impl Iterator<Item = TimeSlot> {
        (Self::FIRST_HOUR..24)
            .chain(std::iter::once(0))
            .map(|hour| TimeSlot { hour })
    }

    pub fn from_hour(hour: u8) -> Option<Self> {
        if hour == 0 || (Self::FIRST_HOUR..24).contains(&hour) {
            Some(Self { hour })
        } else {
            None
        }
    }

    pub fn as_str(self) -> &'static str {
        const LABELS: [&str; 24] = [
            "00:00", "01:00", "02:00", "03:00", "04:00", "05:00", "06:00", "07:00", "08:00",
            "09:00", "10:00", "11:00", "12:00", "13:00", "14:00", "15:00", "16:00", "17:00",
            "18:00", "19:00", "20:00", "21:00", "22:00", "23:00",
        ];
        LABELS[usize::from(self.hour)]
    }
}

impl fmt::Display for TimeSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TimeSlot {
    type Err = TimeSlotParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        TimeSlot::all()
            .find(|slot| slot.as_str() == value)
            .ok_or_else(|| TimeSlotParseError {
                value: value.to_string(),
            })
    }
}

impl TryFrom<String> for TimeSlot {
    type Error = TimeSlotParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<TimeSlot> for String {
    fn from(value: TimeSlot) -> Self {
        value.as_str().to_string()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Tag {
    Coffee,
    ADrink,
    Tapas,
    Dinner,
    ActivityBased,
    Walk,
    ArtBased,
    Music,
    Movie,
    Lunch,
}

impl Tag {
    pub const ALL: [Tag; 10] = [
        Tag::Coffee,
        Tag::ADrink,
        Tag::Tapas,
        Tag::Dinner,
        Tag::ActivityBased,
        Tag::Walk,
        Tag::ArtBased,
        Tag::Music,
        Tag::Movie,
        Tag::Lunch,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Tag::Coffee => "Coffee",
            Tag::ADrink => "A drink",
            Tag::Tapas => "Tapas",
            Tag::Dinner => "Dinner",
            Tag::ActivityBased => "Activity based",
            Tag::Walk => "Walk",
            Tag::ArtBased => "Art based",
            Tag::Music => "Music",
            Tag::Movie => "Movie",
            Tag::Lunch => "Lunch",
        }
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Tag {
    type Err = TagParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Tag::ALL
            .into_iter()
            .find(|tag| tag.label() == value)
            .ok_or_else(|| TagParseError {
                value: value.to_string(),
            })
    }
}

impl TryFrom<String> for Tag {
    type Error = TagParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Tag> for String {
    fn from(value: Tag) -> Self {
        value.label().to_string()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayHours {
    pub is_closed: bool,
    pub open: Option<TimeSlot>,
    pub close: Option<TimeSlot>,
}

impl Default for DayHours {
    fn default() -> Self {
        Self {
            is_closed: false,
            open: Some(TimeSlot::DEFAULT_OPEN),
            close: Some(TimeSlot::DEFAULT_CLOSE),
        }
    }
}

impl DayHours {
    /// Open/close as submitted: empty strings for a closed day, the selected
    /// slots otherwise.
    pub fn submitted_times(&self) -> (String, String) {
        if self.is_closed {
            return (String::new(), String::new());
        }
        let render = |slot: Option<TimeSlot>| slot.map(String::from).unwrap_or_default();
        (render(self.open), render(self.close))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct WeeklyHours {
    days: [DayHours; 7],
}

impl WeeklyHours {
    pub fn get(&self, day: Weekday) -> &DayHours {
        &self.days[day.index()]
    }

    pub fn get_mut(&mut self, day: Weekday) -> &mut DayHours {
        &mut self.days[day.index()]
    }

    pub fn iter(&self) -> impl Iterator<Item = (Weekday, &DayHours)> {
        Weekday::ALL.into_iter().zip(self.days.iter())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Address {
    pub street_line_one: String,
    pub street_line_two: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BusinessListingDraft {
    pub name: String,
    pub address: Address,
    pub weekly_hours: WeeklyHours,
    pub tags: BTreeSet<Tag>,
}

/// A single leaf edit of the draft. Each variant carries the value type of the
/// field it addresses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldEdit {
    Name(String),
    StreetLineOne(String),
    StreetLineTwo(String),
    City(String),
    State(String),
    ZipCode(String),
    DayClosed { day: Weekday, closed: bool },
    DayOpen { day: Weekday, slot: Option<TimeSlot> },
    DayClose { day: Weekday, slot: Option<TimeSlot> },
    Tag { tag: Tag, selected: bool },
}

impl FieldEdit {
    pub fn day(&self) -> Option<Weekday> {
        match self {
            FieldEdit::DayClosed { day, .. }
            | FieldEdit::DayOpen { day, .. }
            | FieldEdit::DayClose { day, .. } => Some(*day),
            _ => None,
        }
    }

    /// Validation keys this edit can resolve.
    pub fn affected_keys(&self) -> Vec<FieldKey> {
        match self {
            FieldEdit::Name(_) => vec![FieldKey::Name],
            FieldEdit::StreetLineOne(_) => vec![FieldKey::StreetLineOne],
            FieldEdit::StreetLineTwo(_) => Vec::new(),
            FieldEdit::City(_) => vec![FieldKey::City],
            FieldEdit::State(_) => vec![FieldKey::State],
            FieldEdit::ZipCode(_) => vec![FieldKey::ZipCode],
            FieldEdit::DayClosed { day, .. } => {
                vec![FieldKey::DayOpen(*day), FieldKey::DayClose(*day)]
            }
            FieldEdit::DayOpen { day, .. } => vec![FieldKey::DayOpen(*day)],
            FieldEdit::DayClose { day, .. } => vec![FieldKey::DayClose(*day)],
            FieldEdit::Tag { .. } => vec![FieldKey::Tags],
        }
    }
}

impl BusinessListingDraft {
    pub fn apply(&mut self, edit: FieldEdit) {
        match edit {
            FieldEdit::Name(value) => self.name = value,
            FieldEdit::StreetLineOne(value) => self.address.street_line_one = value,
            FieldEdit::StreetLineTwo(value) => self.address.street_line_two = value,
            FieldEdit::City(value) => self.address.city = value,
            FieldEdit::State(value) => self.address.state = value,
            FieldEdit::ZipCode(value) => self.address.zip_code = value,
            FieldEdit::DayClosed { day, closed } => {
                self.weekly_hours.get_mut(day).is_closed = closed;
            }
            FieldEdit::DayOpen { day, slot } => self.weekly_hours.get_mut(day).open = slot,
            FieldEdit::DayClose { day, slot } => self.weekly_hours.get_mut(day).close = slot,
            FieldEdit::Tag { tag, selected } => {
                if selected {
                    self.tags.insert(tag);
                } else {
                    self.tags.remove(&tag);
                }
            }
        }
    }
}

/// Identifies a validated field. Renders as the dotted key the form uses,
/// e.g. `name`, `zipCode`, `monday.open`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FieldKey {
    Name,
    StreetLineOne,
    City,
    State,
    ZipCode,
    DayOpen(Weekday),
    DayClose(Weekday),
    Tags,
}

impl FieldKey {
    pub fn label(self) -> String {
        match self {
            FieldKey::Name => "Business Name".to_string(),
            FieldKey::StreetLineOne => "Street Address".to_string(),
            FieldKey::City => "City".to_string(),
            FieldKey::State => "State".to_string(),
            FieldKey::ZipCode => "ZIP Code".to_string(),
            FieldKey::DayOpen(day) => format!("{day} open"),
            FieldKey::DayClose(day) => format!("{day} close"),
            FieldKey::Tags => "Business Tags".to_string(),
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            FieldKey::Name => "Business name is required",
            FieldKey::StreetLineOne => "Street address is required",
            FieldKey::City => "City is required",
            FieldKey::State => "State is required",
            FieldKey::ZipCode => "ZIP code is required",
            FieldKey::DayOpen(_) | FieldKey::DayClose(_) => {
                "Please set business hours or mark as closed"
            }
            FieldKey::Tags => "Please select at least one tag",
        }
    }
}

impl fmt::Display for FieldKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldKey::Name => f.write_str("name"),
            FieldKey::StreetLineOne => f.write_str("streetLineOne"),
            FieldKey::City => f.write_str("city"),
            FieldKey::State => f.write_str("state"),
            FieldKey::ZipCode => f.write_str("zipCode"),
            FieldKey::DayOpen(day) => write!(f, "{}.open", day.key()),
            FieldKey::DayClose(day) => write!(f, "{}.close", day.key()),
            FieldKey::Tags => f.write_str("tags"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldErrorKind {
    MissingValue,
    EmptySelection,
}
