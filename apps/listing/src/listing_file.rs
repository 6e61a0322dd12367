//! TOML listing files: the CLI's stand-in for the three form sections.

use std::{fs, path::Path};

use anyhow::Context;
use client_core::FormController;
use serde::{Deserialize, Serialize};
use shared::domain::{BusinessListingDraft, FieldEdit, Tag, TimeSlot, Weekday};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ListingFile {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub street_line_one: String,
    #[serde(default)]
    pub street_line_two: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub zip_code: String,
    #[serde(default)]
    pub tags: Vec<Tag>,
    #[serde(default)]
    pub hours: HoursSection,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HoursSection {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sunday: Option<DayEntry>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub monday: Option<DayEntry>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tuesday: Option<DayEntry>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wednesday: Option<DayEntry>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thursday: Option<DayEntry>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub friday: Option<DayEntry>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub saturday: Option<DayEntry>,
}

/// Hours for one day. Omitted `open`/`close` keep the form default.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DayEntry {
    #[serde(default)]
    pub closed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub open: Option<TimeSlot>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub close: Option<TimeSlot>,
}

impl HoursSection {
    fn slot(&self, day: Weekday) -> Option<&DayEntry> {
        match day {
            Weekday::Sunday => self.sunday.as_ref(),
            Weekday::Monday => self.monday.as_ref(),
            Weekday::Tuesday => self.tuesday.as_ref(),
            Weekday::Wednesday => self.wednesday.as_ref(),
            Weekday::Thursday => self.thursday.as_ref(),
            Weekday::Friday => self.friday.as_ref(),
            Weekday::Saturday => self.saturday.as_ref(),
        }
    }

    fn slot_mut(&mut self, day: Weekday) -> &mut Option<DayEntry> {
        match day {
            Weekday::Sunday => &mut self.sunday,
            Weekday::Monday => &mut self.monday,
            Weekday::Tuesday => &mut self.tuesday,
            Weekday::Wednesday => &mut self.wednesday,
            Weekday::Thursday => &mut self.thursday,
            Weekday::Friday => &mut self.friday,
            Weekday::Saturday => &mut self.saturday,
        }
    }

    /// Entries present in the file, in calendar order.
    pub fn entries(&self) -> impl Iterator<Item = (Weekday, &DayEntry)> {
        Weekday::ALL
            .into_iter()
            .filter_map(|day| self.slot(day).map(|entry| (day, entry)))
    }
}

impl ListingFile {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read listing file '{}'", path.display()))?;
        toml::from_str(&raw)
            .with_context(|| format!("failed to parse listing file '{}'", path.display()))
    }

    /// A file pre-filled with the form defaults for every editable day.
    pub fn template() -> Self {
        let draft = BusinessListingDraft::default();
        let mut file = Self::default();
        for day in Weekday::EDITABLE {
            let hours = draft.weekly_hours.get(day);
            *file.hours.slot_mut(day) = Some(DayEntry {
                closed: hours.is_closed,
                open: hours.open,
                close: hours.close,
            });
        }
        file
    }

    /// The field edits that turn a fresh form into this listing.
    pub fn edits(&self) -> Vec<FieldEdit> {
        let mut edits = vec![
            FieldEdit::Name(self.name.clone()),
            FieldEdit::StreetLineOne(self.street_line_one.clone()),
            FieldEdit::StreetLineTwo(self.street_line_two.clone()),
            FieldEdit::City(self.city.clone()),
            FieldEdit::State(self.state.clone()),
            FieldEdit::ZipCode(self.zip_code.clone()),
        ];

        for (day, entry) in self.hours.entries() {
            edits.push(FieldEdit::DayClosed {
                day,
                closed: entry.closed,
            });
            if let Some(slot) = entry.open {
                edits.push(FieldEdit::DayOpen {
                    day,
                    slot: Some(slot),
                });
            }
            if let Some(slot) = entry.close {
                edits.push(FieldEdit::DayClose {
                    day,
                    slot: Some(slot),
                });
            }
        }

        edits.extend(self.tags.iter().map(|tag| FieldEdit::Tag {
            tag: *tag,
            selected: true,
        }));
        edits
    }

    pub fn apply_to(&self, controller: &mut FormController) -> anyhow::Result<()> {
        for edit in self.edits() {
            let day = edit.day();
            controller.set_field(edit).with_context(|| match day {
                Some(day) => format!("cannot apply [hours.{}]", day.key()),
                None => "cannot apply listing field".to_string(),
            })?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "tests/listing_file_tests.rs"]
mod tests;
