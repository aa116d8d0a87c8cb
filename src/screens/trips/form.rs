//! Trip form shared by the create and edit screens

use chrono::{Days, NaiveDate};

use crate::models::{CreateTripRequest, Trip, UpdateTripRequest};
use crate::services::trip::validate_trip_details;
use crate::utils::helpers::format_date;
use crate::utils::validation::{parse_optional_amount, ValidationError};

/// Cover images offered by the picker
pub const SAMPLE_COVER_IMAGES: [&str; 6] = [
    "https://images.unsplash.com/photo-1499856871958-5b9627545d1a",
    "https://images.unsplash.com/photo-1523906834658-6e24ef2386f9",
    "https://images.unsplash.com/photo-1503220317375-aaad61436b1b",
    "https://images.unsplash.com/photo-1581351721010-8cf859cb14a4",
    "https://images.unsplash.com/photo-1519677100203-a0e668c92439",
    "https://images.unsplash.com/photo-1515859005217-8a1f08870f59",
];

/// Length of a new trip before the user picks dates
const DEFAULT_TRIP_DAYS: u64 = 7;

/// Field values as typed; budget stays text until submit
#[derive(Debug, Clone, PartialEq)]
pub struct TripForm {
    pub title: String,
    pub destination: String,
    start_date: NaiveDate,
    end_date: NaiveDate,
    pub budget: String,
    pub transportation: String,
    pub description: String,
    cover_image: Option<String>,
}

/// Validated form contents
#[derive(Debug, Clone, PartialEq)]
struct TripFields {
    title: String,
    destination: String,
    budget: Option<f64>,
    transportation: Option<String>,
    description: Option<String>,
}

fn optional(text: &str) -> Option<String> {
    let trimmed = text.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

impl TripForm {
    /// Empty form for a week-long trip starting `today`
    pub fn new(today: NaiveDate) -> Self {
        Self {
            title: String::new(),
            destination: String::new(),
            start_date: today,
            end_date: today.checked_add_days(Days::new(DEFAULT_TRIP_DAYS)).unwrap_or(today),
            budget: String::new(),
            transportation: String::new(),
            description: String::new(),
            cover_image: None,
        }
    }

    pub fn from_trip(trip: &Trip) -> Self {
        Self {
            title: trip.title.clone(),
            destination: trip.destination_region.clone(),
            start_date: trip.start_date,
            end_date: trip.end_date,
            budget: trip.budget.map(|b| b.to_string()).unwrap_or_default(),
            transportation: trip.general_transportation.clone().unwrap_or_default(),
            description: trip.description.clone().unwrap_or_default(),
            cover_image: trip.cover_image.clone(),
        }
    }

    pub fn start_date(&self) -> NaiveDate {
        self.start_date
    }

    pub fn end_date(&self) -> NaiveDate {
        self.end_date
    }

    /// Moving the start past the end pushes the end to the next day
    pub fn set_start_date(&mut self, date: NaiveDate) {
        self.start_date = date;
        if self.end_date < date {
            self.end_date = date.checked_add_days(Days::new(1)).unwrap_or(date);
        }
    }

    pub fn set_end_date(&mut self, date: NaiveDate) {
        self.end_date = date;
    }

    pub fn start_label(&self) -> String {
        format_date(self.start_date)
    }

    pub fn end_label(&self) -> String {
        format_date(self.end_date)
    }

    /// Inclusive number of days; zero while the range is inverted
    pub fn day_count(&self) -> u32 {
        let days = (self.end_date - self.start_date).num_days();
        u32::try_from(days + 1).unwrap_or(0)
    }

    pub fn duration_label(&self) -> String {
        match self.day_count() {
            1 => "1 day".to_string(),
            n => format!("{} days", n),
        }
    }

    pub fn cover_images(&self) -> &'static [&'static str] {
        &SAMPLE_COVER_IMAGES
    }

    pub fn cover_image(&self) -> Option<&str> {
        self.cover_image.as_deref()
    }

    pub fn select_cover_image(&mut self, url: &str) {
        self.cover_image = Some(url.to_string());
    }

    pub fn clear_cover_image(&mut self) {
        self.cover_image = None;
    }

    /// Rules in the order the form reports them
    fn fields(&self) -> Result<TripFields, ValidationError> {
        validate_trip_details(&self.title, &self.destination, self.start_date, self.end_date, None)?;
        let budget = parse_optional_amount(&self.budget, ValidationError::InvalidBudget)?;
        Ok(TripFields {
            title: self.title.trim().to_string(),
            destination: self.destination.trim().to_string(),
            budget,
            transportation: optional(&self.transportation),
            description: optional(&self.description),
        })
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        self.fields().map(|_| ())
    }

    pub fn to_create_request(&self) -> Result<CreateTripRequest, ValidationError> {
        let fields = self.fields()?;
        Ok(CreateTripRequest {
            title: fields.title,
            destination_region: fields.destination,
            start_date: self.start_date,
            end_date: self.end_date,
            budget: fields.budget,
            description: fields.description,
            cover_image: self.cover_image.clone(),
            general_transportation: fields.transportation,
        })
    }

    pub fn to_update_request(&self) -> Result<UpdateTripRequest, ValidationError> {
        let fields = self.fields()?;
        Ok(UpdateTripRequest {
            title: fields.title,
            destination_region: fields.destination,
            start_date: self.start_date,
            end_date: self.end_date,
            budget: fields.budget,
            description: fields.description,
            cover_image: self.cover_image.clone(),
            general_transportation: fields.transportation,
        })
    }
}
