use serde::{Deserialize, Serialize};

use crate::domain::{BusinessListingDraft, Weekday};

/// Name of the backend procedure that persists a listing.
pub const INSERT_LOCATION_RPC: &str = "insert_location_mktng_site";

/// Flattened parameters of the insert procedure. Every address field and every
/// day's open/close travel as separate named scalars.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InsertLocationParams {
    pub name_input: String,
    pub street_line_one_input: String,
    pub street_line_two_input: Option<String>,
    pub city_input: String,
    pub state_input: String,
    pub zip_code_input: String,
    pub sunday_open_input: String,
    pub sunday_close_input: String,
    pub monday_open_input: String,
    pub monday_close_input: String,
    pub tuesday_open_input: String,
    pub tuesday_close_input: String,
    pub wednesday_open_input: String,
    pub wednesday_close_input: String,
    pub thursday_open_input: String,
    pub thursday_close_input: String,
    pub friday_open_input: String,
    pub friday_close_input: String,
    pub saturday_open_input: String,
    pub saturday_close_input: String,
    pub tags_input: Vec<String>,
}

impl InsertLocationParams {
    pub fn from_draft(draft: &BusinessListingDraft) -> Self {
        let hours = |day: Weekday| draft.weekly_hours.get(day).submitted_times();
        let (sunday_open_input, sunday_close_input) = hours(Weekday::Sunday);
        let (monday_open_input, monday_close_input) = hours(Weekday::Monday);
        let (tuesday_open_input, tuesday_close_input) = hours(Weekday::Tuesday);
        let (wednesday_open_input, wednesday_close_input) = hours(Weekday::Wednesday);
        let (thursday_open_input, thursday_close_input) = hours(Weekday::Thursday);
        let (friday_open_input, friday_close_input) = hours(Weekday::Friday);
        let (saturday_open_input, saturday_close_input) = hours(Weekday::Saturday);

        let address = &draft.address;
        let street_line_two_input = if address.street_line_two.is_empty() {
            None
        } else {
            Some(address.street_line_two.clone())
        };

        Self {
            name_input: draft.name.clone(),
            street_line_one_input: address.street_line_one.clone(),
            street_line_two_input,
            city_input: address.city.clone(),
            state_input: address.state.clone(),
            zip_code_input: address.zip_code.clone(),
            sunday_open_input,
            sunday_close_input,
            monday_open_input,
            monday_close_input,
            tuesday_open_input,
            tuesday_close_input,
            wednesday_open_input,
            wednesday_close_input,
            thursday_open_input,
            thursday_close_input,
            friday_open_input,
            friday_close_input,
            saturday_open_input,
            saturday_close_input,
            tags_input: draft.tags.iter().map(|tag| tag.label().to_string()).collect(),
        }
    }

    /// Open/close strings sent for `day`.
    pub fn day_times(&self, day: Weekday) -> (&str, &str) {
        match day {
            Weekday::Sunday => (&self.sunday_open_input, &self.sunday_close_input),
            Weekday::Monday => (&self.monday_open_input, &self.monday_close_input),
            Weekday::Tuesday => (&self.tuesday_open_input, &self.tuesday_close_input),
            Weekday::Wednesday => (&self.wednesday_open_input, &self.wednesday_close_input),
            Weekday::Thursday => (&self.thursday_open_input, &self.thursday_close_input),
            Weekday::Friday => (&self.friday_open_input, &self.friday_close_input),
            Weekday::Saturday => (&self.saturday_open_input, &self.saturday_close_input),
        }
    }
}
