use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use mongodb::bson::{self, Document, doc, oid::ObjectId};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::{Validate, ValidationError};

/// Game types offered by the event form. Any non-empty value is accepted.
pub const SUGGESTED_GAME_TYPES: [&str; 5] = [
    "Scrabble",
    "Chess",
    "Battleship",
    "Settlers of Catan",
    "Monopoly",
];

/// Board-game meetup event as returned by the API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    /// 24-character hex ObjectId
    #[serde(rename = "_id")]
    #[schema(example = "65a1b2c3d4e5f6a7b8c9d0e1")]
    pub id: String,
    pub name: String,
    /// Free-text address
    pub location: String,
    /// `[longitude, latitude]`
    #[schema(value_type = Vec<f64>, example = json!([-73.9857, 40.7484]))]
    pub coordinates: [f64; 2],
    #[schema(example = "Chess")]
    pub game_type: String,
    /// ISO-8601 date or date-time, stored as sent
    #[schema(example = "2026-11-02T19:00:00Z")]
    pub date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub participants: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Stored shape of an event in the `events` collection
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventDocument {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub name: String,
    pub location: String,
    pub coordinates: [f64; 2],
    pub game_type: String,
    pub date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub participants: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub created_at: bson::DateTime,
}

impl EventDocument {
    /// New document with a fresh id, stamped now.
    pub fn new(input: CreateEvent) -> Self {
        Self {
            id: ObjectId::new(),
            name: input.name,
            location: input.location,
            coordinates: input.coordinates,
            game_type: input.game_type,
            date: input.date,
            participants: input.participants,
            description: input.description,
            created_at: to_bson_datetime(Utc::now()),
        }
    }

    /// Applies the provided fields in place. `createdAt` is never touched.
    pub fn apply(&mut self, update: UpdateEvent) {
        if let Some(name) = update.name {
            self.name = name;
        }
        if let Some(location) = update.location {
            self.location = location;
        }
        if let Some(coordinates) = update.coordinates {
            self.coordinates = coordinates;
        }
        if let Some(game_type) = update.game_type {
            self.game_type = game_type;
        }
        if let Some(date) = update.date {
            self.date = date;
        }
        if let Some(participants) = update.participants {
            self.participants = Some(participants);
        }
        if let Some(description) = update.description {
            self.description = Some(description);
        }
    }
}

impl From<EventDocument> for Event {
    fn from(doc: EventDocument) -> Self {
        Self {
            id: doc.id.to_hex(),
            name: doc.name,
            location: doc.location,
            coordinates: doc.coordinates,
            game_type: doc.game_type,
            date: doc.date,
            participants: doc.participants,
            description: doc.description,
            created_at: from_bson_datetime(doc.created_at),
        }
    }
}

/// Request body for creating an event
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateEvent {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[validate(length(min = 1))]
    pub location: String,
    #[validate(custom(function = "validate_coordinates"))]
    #[schema(value_type = Vec<f64>)]
    pub coordinates: [f64; 2],
    #[validate(length(min = 1, max = 100))]
    pub game_type: String,
    #[validate(custom(function = "validate_iso_date"))]
    pub date: String,
    #[validate(range(min = 1))]
    pub participants: Option<i32>,
    pub description: Option<String>,
}

/// Partial update. Omitted fields keep their stored value.
///
/// `_id` and `createdAt` are not part of this type, so a client sending them
/// cannot change them.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEvent {
    #[validate(length(min = 1, max = 200))]
    pub name: Option<String>,
    #[validate(length(min = 1))]
    pub location: Option<String>,
    #[validate(custom(function = "validate_coordinates"))]
    #[schema(value_type = Option<Vec<f64>>)]
    pub coordinates: Option<[f64; 2]>,
    #[validate(length(min = 1, max = 100))]
    pub game_type: Option<String>,
    #[validate(custom(function = "validate_iso_date"))]
    pub date: Option<String>,
    #[validate(range(min = 1))]
    pub participants: Option<i32>,
    pub description: Option<String>,
}

impl UpdateEvent {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.location.is_none()
            && self.coordinates.is_none()
            && self.game_type.is_none()
            && self.date.is_none()
            && self.participants.is_none()
            && self.description.is_none()
    }

    /// `$set` body holding only the provided fields.
    pub fn to_set_document(&self) -> Document {
        let mut set = Document::new();
        if let Some(name) = &self.name {
            set.insert("name", name);
        }
        if let Some(location) = &self.location {
            set.insert("location", location);
        }
        if let Some([lng, lat]) = self.coordinates {
            set.insert("coordinates", vec![lng, lat]);
        }
        if let Some(game_type) = &self.game_type {
            set.insert("gameType", game_type);
        }
        if let Some(date) = &self.date {
            set.insert("date", date);
        }
        if let Some(participants) = self.participants {
            set.insert("participants", participants);
        }
        if let Some(description) = &self.description {
            set.insert("description", description);
        }
        set
    }
}

/// Query parameters for listing events
#[derive(Debug, Clone, Default, Deserialize, ToSchema, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query, rename_all = "camelCase")]
pub struct EventFilter {
    /// Exact game type match
    pub game_type: Option<String>,
}

impl EventFilter {
    pub fn matches(&self, event: &Event) -> bool {
        self.game_type
            .as_ref()
            .is_none_or(|game_type| &event.game_type == game_type)
    }

    pub fn to_document(&self) -> Document {
        let mut filter = doc! {};
        if let Some(game_type) = &self.game_type {
            filter.insert("gameType", game_type);
        }
        filter
    }
}

/// Request body for `POST /events/join`
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct JoinEvent {
    #[serde(default)]
    #[validate(
        length(min = 1, message = "Email is required"),
        email(message = "Email is invalid")
    )]
    #[schema(example = "ada@example.com")]
    pub email: String,
    /// Recipient name used in the greeting
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub event_name: String,
    #[serde(default)]
    pub event_date: String,
    #[serde(default)]
    pub event_time: String,
    /// When present, the join is also recorded as a registration
    #[serde(default)]
    pub event_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct JoinResponse {
    #[schema(example = "Email sent successfully!")]
    pub message: String,
}

impl JoinResponse {
    pub fn sent() -> Self {
        Self {
            message: "Email sent successfully!".to_string(),
        }
    }
}

/// A recorded (event, email) join
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Registration {
    pub event_id: String,
    pub email: String,
    pub name: String,
    pub joined_at: DateTime<Utc>,
}

/// Stored shape of a registration in the `registrations` collection
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationDocument {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub event_id: ObjectId,
    pub email: String,
    pub name: String,
    pub joined_at: bson::DateTime,
}

impl From<RegistrationDocument> for Registration {
    fn from(doc: RegistrationDocument) -> Self {
        Self {
            event_id: doc.event_id.to_hex(),
            email: doc.email,
            name: doc.name,
            joined_at: from_bson_datetime(doc.joined_at),
        }
    }
}

/// Millisecond precision, the store's resolution.
pub(crate) fn to_bson_datetime(dt: DateTime<Utc>) -> bson::DateTime {
    bson::DateTime::from_millis(dt.timestamp_millis())
}

pub(crate) fn from_bson_datetime(dt: bson::DateTime) -> DateTime<Utc> {
    DateTime::from_timestamp_millis(dt.timestamp_millis()).unwrap_or_default()
}

fn validate_coordinates(coordinates: &[f64; 2]) -> Result<(), ValidationError> {
    let [lng, lat] = *coordinates;
    if !(-180.0..=180.0).contains(&lng) || !(-90.0..=90.0).contains(&lat) {
        let mut err = ValidationError::new("coordinates");
        err.message = Some("coordinates must be [longitude, latitude]".into());
        return Err(err);
    }
    Ok(())
}

/// Accepts RFC 3339, a naive `YYYY-MM-DDTHH:MM[:SS]` or a bare `YYYY-MM-DD`.
fn validate_iso_date(date: &str) -> Result<(), ValidationError> {
    let valid = DateTime::parse_from_rfc3339(date).is_ok()
        || NaiveDateTime::parse_from_str(date, "%Y-%m-%dT%H:%M:%S%.f").is_ok()
        || NaiveDateTime::parse_from_str(date, "%Y-%m-%dT%H:%M").is_ok()
        || NaiveDate::parse_from_str(date, "%Y-%m-%d").is_ok();

    if valid {
        Ok(())
    } else {
        let mut err = ValidationError::new("iso_date");
        err.message = Some("date must be an ISO-8601 date or date-time".into());
        Err(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_input() -> CreateEvent {
        CreateEvent {
            name: "Friday Chess".to_string(),
            location: "12 Main St".to_string(),
            coordinates: [-73.9857, 40.7484],
            game_type: "Chess".to_string(),
            date: "2026-11-02T19:00:00Z".to_string(),
            participants: Some(8),
            description: None,
        }
    }

    #[test]
    fn test_valid_create_passes() {
        assert!(create_input().validate().is_ok());
    }

    #[test]
    fn test_date_formats() {
        for date in [
            "2026-11-02",
            "2026-11-02T19:00",
            "2026-11-02T19:00:00.000Z",
            "2026-11-02T19:00:00+02:00",
        ] {
            assert!(validate_iso_date(date).is_ok(), "{date}");
        }
        assert!(validate_iso_date("next friday").is_err());
        assert!(validate_iso_date("").is_err());
    }

    #[test]
    fn test_coordinates_out_of_range() {
        let mut input = create_input();
        input.coordinates = [40.7484, -273.9857];
        let errors = input.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("coordinates"));
    }

    #[test]
    fn test_empty_game_type_rejected() {
        let mut input = create_input();
        input.game_type = String::new();
        assert!(input.validate().is_err());
    }

    #[test]
    fn test_any_non_empty_game_type_accepted() {
        let mut input = create_input();
        input.game_type = "Gloomhaven".to_string();
        assert!(input.validate().is_ok());
        assert!(!SUGGESTED_GAME_TYPES.contains(&"Gloomhaven"));
    }

    #[test]
    fn test_update_ignores_created_at_and_id() {
        let update: UpdateEvent = serde_json::from_value(serde_json::json!({
            "name": "Renamed",
            "createdAt": "1999-01-01T00:00:00Z",
            "_id": "65a1b2c3d4e5f6a7b8c9d0e1"
        }))
        .unwrap();

        let set = update.to_set_document();
        assert_eq!(set.len(), 1);
        assert_eq!(set.get_str("name").unwrap(), "Renamed");
    }

    #[test]
    fn test_apply_keeps_other_fields() {
        let mut doc = EventDocument::new(create_input());
        let created_at = doc.created_at;

        doc.apply(UpdateEvent {
            participants: Some(4),
            ..Default::default()
        });

        assert_eq!(doc.participants, Some(4));
        assert_eq!(doc.name, "Friday Chess");
        assert_eq!(doc.created_at, created_at);
    }

    #[test]
    fn test_event_wire_format() {
        let event = Event::from(EventDocument::new(create_input()));
        let json = serde_json::to_value(&event).unwrap();

        assert_eq!(json["_id"].as_str().unwrap().len(), 24);
        assert_eq!(json["gameType"], "Chess");
        assert_eq!(json["coordinates"][0], -73.9857);
        assert!(json.get("createdAt").is_some());
        assert!(json.get("description").is_none());
    }

    #[test]
    fn test_join_without_email_fails_validation() {
        let join: JoinEvent = serde_json::from_value(serde_json::json!({
            "name": "Ada",
            "eventName": "Friday Chess"
        }))
        .unwrap();
        let errors = join.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("email"));
    }

    #[test]
    fn test_filter_matches_game_type() {
        let event = Event::from(EventDocument::new(create_input()));
        assert!(EventFilter::default().matches(&event));
        assert!(
            EventFilter {
                game_type: Some("Chess".into())
            }
            .matches(&event)
        );
        assert!(
            !EventFilter {
                game_type: Some("chess".into())
            }
            .matches(&event)
        );
    }
}
