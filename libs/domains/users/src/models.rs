use chrono::{DateTime, Utc};
use mongodb::bson::{self, Document, oid::ObjectId};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

pub const DEFAULT_ROLE: &str = "user";

/// AirDND user as returned by the API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// 24-character hex ObjectId
    #[serde(rename = "_id")]
    #[schema(example = "65a1b2c3d4e5f6a7b8c9d0e2")]
    pub id: String,
    pub fname: String,
    pub lname: String,
    pub age: i32,
    /// Unique, compared case-sensitively
    #[schema(example = "ada@example.com")]
    pub email: String,
    #[schema(example = "user")]
    pub role: String,
    pub rating: f64,
    pub created_at: DateTime<Utc>,
}

/// Stored shape of a user in the `users` collection
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDocument {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub fname: String,
    pub lname: String,
    pub age: i32,
    pub email: String,
    pub role: String,
    pub rating: f64,
    pub created_at: bson::DateTime,
}

impl UserDocument {
    pub fn new(input: CreateUser) -> Self {
        Self {
            id: ObjectId::new(),
            fname: input.fname,
            lname: input.lname,
            age: input.age,
            email: input.email,
            role: input.role.unwrap_or_else(|| DEFAULT_ROLE.to_string()),
            rating: input.rating.unwrap_or(0.0),
            created_at: bson::DateTime::from_millis(Utc::now().timestamp_millis()),
        }
    }

    pub fn apply(&mut self, update: UpdateUser) {
        if let Some(fname) = update.fname {
            self.fname = fname;
        }
        if let Some(lname) = update.lname {
            self.lname = lname;
        }
        if let Some(age) = update.age {
            self.age = age;
        }
        if let Some(email) = update.email {
            self.email = email;
        }
        if let Some(role) = update.role {
            self.role = role;
        }
        if let Some(rating) = update.rating {
            self.rating = rating;
        }
    }
}

impl From<UserDocument> for User {
    fn from(doc: UserDocument) -> Self {
        Self {
            id: doc.id.to_hex(),
            fname: doc.fname,
            lname: doc.lname,
            age: doc.age,
            email: doc.email,
            role: doc.role,
            rating: doc.rating,
            created_at: DateTime::from_timestamp_millis(doc.created_at.timestamp_millis())
                .unwrap_or_default(),
        }
    }
}

/// Request body for creating a user
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateUser {
    #[validate(length(min = 1, max = 100))]
    pub fname: String,
    #[serde(default)]
    #[validate(length(max = 100))]
    pub lname: String,
    #[serde(default)]
    #[validate(range(min = 0, max = 150))]
    pub age: i32,
    #[validate(email)]
    pub email: String,
    /// Defaults to `"user"`
    #[validate(length(min = 1, max = 50))]
    pub role: Option<String>,
    /// Defaults to 0
    #[validate(range(min = 0.0))]
    pub rating: Option<f64>,
}

impl CreateUser {
    /// Record created on first sign-in: the email doubles as first name.
    pub fn placeholder(email: &str) -> Self {
        Self {
            fname: email.to_string(),
            lname: String::new(),
            age: 0,
            email: email.to_string(),
            role: None,
            rating: None,
        }
    }
}

/// Partial update. Omitted fields keep their stored value.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUser {
    #[validate(length(min = 1, max = 100))]
    pub fname: Option<String>,
    #[validate(length(max = 100))]
    pub lname: Option<String>,
    #[validate(range(min = 0, max = 150))]
    pub age: Option<i32>,
    #[validate(email)]
    pub email: Option<String>,
    #[validate(length(min = 1, max = 50))]
    pub role: Option<String>,
    #[validate(range(min = 0.0))]
    pub rating: Option<f64>,
}

impl UpdateUser {
    pub fn is_empty(&self) -> bool {
        self.fname.is_none()
            && self.lname.is_none()
            && self.age.is_none()
            && self.email.is_none()
            && self.role.is_none()
            && self.rating.is_none()
    }

    pub fn to_set_document(&self) -> Document {
        let mut set = Document::new();
        if let Some(fname) = &self.fname {
            set.insert("fname", fname);
        }
        if let Some(lname) = &self.lname {
            set.insert("lname", lname);
        }
        if let Some(age) = self.age {
            set.insert("age", age);
        }
        if let Some(email) = &self.email {
            set.insert("email", email);
        }
        if let Some(role) = &self.role {
            set.insert("role", role);
        }
        if let Some(rating) = self.rating {
            set.insert("rating", rating);
        }
        set
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_applied_on_create() {
        let input: CreateUser = serde_json::from_value(serde_json::json!({
            "fname": "Ada",
            "lname": "Lovelace",
            "age": 36,
            "email": "ada@example.com"
        }))
        .unwrap();
        assert!(input.validate().is_ok());

        let user = User::from(UserDocument::new(input));
        assert_eq!(user.role, "user");
        assert_eq!(user.rating, 0.0);
    }

    #[test]
    fn test_placeholder_values() {
        let doc = UserDocument::new(CreateUser::placeholder("new@example.com"));
        assert_eq!(doc.fname, "new@example.com");
        assert_eq!(doc.lname, "");
        assert_eq!(doc.age, 0);
        assert_eq!(doc.role, "user");
        assert_eq!(doc.rating, 0.0);
    }

    #[test]
    fn test_invalid_email_rejected() {
        let input = CreateUser {
            email: "nope".to_string(),
            ..CreateUser::placeholder("x@example.com")
        };
        assert!(input.validate().unwrap_err().field_errors().contains_key("email"));
    }

    #[test]
    fn test_update_set_document_only_has_given_fields() {
        let update: UpdateUser = serde_json::from_value(serde_json::json!({
            "rating": 4.5,
            "createdAt": "2000-01-01T00:00:00Z"
        }))
        .unwrap();

        let set = update.to_set_document();
        assert_eq!(set.len(), 1);
        assert_eq!(set.get_f64("rating").unwrap(), 4.5);
    }

    #[test]
    fn test_wire_format_uses_underscore_id() {
        let user = User::from(UserDocument::new(CreateUser::placeholder("a@example.com")));
        let json = serde_json::to_value(&user).unwrap();
        assert_eq!(json["_id"].as_str().unwrap().len(), 24);
        assert!(json.get("createdAt").is_some());
    }
}
