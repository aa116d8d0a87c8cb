//! Form fields shared by the add activity and add accommodation screens

use chrono::{DateTime, Utc};

use crate::models::{Accommodation, AccommodationRequest, Activity, ActivityRequest, Location};
use crate::services::itinerary::{validate_accommodation, validate_activity};
use crate::utils::validation::{
    parse_optional_amount, parse_optional_url, validate_coordinates, validate_required,
    validate_time_range, ValidationError,
};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ItemForm {
    pub name: String,
    pub latitude: String,
    pub longitude: String,
    pub address: String,
    pub place_name: String,
    pub price: String,
    pub url: String,
    pub photos: Vec<String>,
    /// Activities only
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
}

fn optional(text: &str) -> Option<String> {
    let trimmed = text.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

fn coordinate(text: &str) -> Result<f64, ValidationError> {
    text.trim()
        .parse::<f64>()
        .map_err(|_| ValidationError::InvalidCoordinates)
}

impl ItemForm {
    fn with_location(name: &str, location: &Location, price: Option<f64>, url: Option<&String>) -> Self {
        Self {
            name: name.to_string(),
            latitude: location.latitude.to_string(),
            longitude: location.longitude.to_string(),
            address: location.address.clone().unwrap_or_default(),
            place_name: location.name.clone().unwrap_or_default(),
            price: price.map(|p| p.to_string()).unwrap_or_default(),
            url: url.cloned().unwrap_or_default(),
            ..Self::default()
        }
    }

    pub fn from_activity(activity: &Activity) -> Self {
        Self {
            photos: activity.photos.clone().unwrap_or_default(),
            start_time: activity.start_time,
            end_time: activity.end_time,
            ..Self::with_location(&activity.name, &activity.location, activity.price, activity.url.as_ref())
        }
    }

    pub fn from_accommodation(accommodation: &Accommodation) -> Self {
        Self {
            photos: accommodation.photos.clone().unwrap_or_default(),
            ..Self::with_location(
                &accommodation.name,
                &accommodation.location,
                accommodation.price,
                accommodation.url.as_ref(),
            )
        }
    }

    pub fn set_location(&mut self, latitude: f64, longitude: f64) {
        self.latitude = latitude.to_string();
        self.longitude = longitude.to_string();
    }

    fn location(&self) -> Result<Location, ValidationError> {
        let latitude = coordinate(&self.latitude)?;
        let longitude = coordinate(&self.longitude)?;
        validate_coordinates(latitude, longitude)?;
        Ok(Location {
            latitude,
            longitude,
            address: optional(&self.address),
            name: optional(&self.place_name),
        })
    }

    fn photos(&self) -> Option<Vec<String>> {
        let photos: Vec<String> = self.photos.iter().filter_map(|p| optional(p)).collect();
        (!photos.is_empty()).then_some(photos)
    }

    pub fn to_activity_request(&self) -> Result<ActivityRequest, ValidationError> {
        validate_required(&self.name, ValidationError::MissingItemName)?;
        let location = self.location()?;
        validate_time_range(self.start_time, self.end_time)?;
        let request = ActivityRequest {
            name: self.name.trim().to_string(),
            location,
            start_time: self.start_time,
            end_time: self.end_time,
            price: parse_optional_amount(&self.price, ValidationError::InvalidPrice)?,
            url: parse_optional_url(&self.url)?,
            photos: self.photos(),
        };
        validate_activity(&request)?;
        Ok(request)
    }

    pub fn to_accommodation_request(&self) -> Result<AccommodationRequest, ValidationError> {
        validate_required(&self.name, ValidationError::MissingItemName)?;
        let location = self.location()?;
        let request = AccommodationRequest {
            name: self.name.trim().to_string(),
            location,
            price: parse_optional_amount(&self.price, ValidationError::InvalidPrice)?,
            url: parse_optional_url(&self.url)?,
            photos: self.photos(),
        };
        validate_accommodation(&request)?;
        Ok(request)
    }
}
