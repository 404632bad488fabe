use super::{BusinessId, MessageResponse};
use crate::macros::setter;
use chrono::{DateTime, Utc};
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use tower_api_client::{Method, Request, RequestData};

// Common

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Business {
    #[serde(rename = "_id")]
    pub id: BusinessId,
    pub name: String,
    pub phone: String,
    pub field_of_work: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub notes: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Business {
    /// Builds a stored record from an already validated submission.
    pub fn from_new(business: NewBusiness, now: DateTime<Utc>) -> Self {
        Self {
            id: BusinessId::new(),
            name: business.name,
            phone: business.phone,
            field_of_work: business.field_of_work,
            city: business.city,
            notes: business.notes,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Newest records first, as the listing endpoint returns them.
impl PartialOrd for Business {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Business {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        other
            .created_at
            .cmp(&self.created_at)
            .then(self.id.cmp(&other.id))
    }
}

/// Distinct, non-empty field-of-work values in sorted order.
pub fn field_of_work_pool(businesses: &[Business]) -> Vec<String> {
    businesses
        .iter()
        .map(|b| b.field_of_work.trim())
        .filter(|f| !f.is_empty())
        .unique()
        .sorted()
        .map(str::to_string)
        .collect()
}

#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewBusiness {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub field_of_work: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub notes: String,
}

impl NewBusiness {
    pub fn new(
        name: impl Into<String>,
        phone: impl Into<String>,
        field_of_work: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            phone: phone.into(),
            field_of_work: field_of_work.into(),
            ..Self::default()
        }
    }

    setter!(city: String);
    setter!(notes: String);

    /// Trims every field and checks that name, phone and field of work survive trimming.
    pub fn validated(self) -> Result<Self, ValidationError> {
        let business = Self {
            name: self.name.trim().to_string(),
            phone: self.phone.trim().to_string(),
            field_of_work: self.field_of_work.trim().to_string(),
            city: self.city.trim().to_string(),
            notes: self.notes.trim().to_string(),
        };

        let missing: Vec<RequiredField> = [
            (RequiredField::Name, &business.name),
            (RequiredField::Phone, &business.phone),
            (RequiredField::FieldOfWork, &business.field_of_work),
        ]
        .into_iter()
        .filter(|(_, value)| value.is_empty())
        .map(|(field, _)| field)
        .collect();

        if missing.is_empty() {
            Ok(business)
        } else {
            Err(ValidationError::MissingRequired(missing))
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequiredField {
    Name,
    Phone,
    FieldOfWork,
}

impl std::fmt::Display for RequiredField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Name => write!(f, "name"),
            Self::Phone => write!(f, "phone"),
            Self::FieldOfWork => write!(f, "field of work"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    MissingRequired(Vec<RequiredField>),
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingRequired(_) => write!(f, "Name, phone, and field of work are required"),
        }
    }
}

impl std::error::Error for ValidationError {}

/// Partial update. Absent or blank required fields keep the stored value;
/// `city` and `notes` overwrite whenever present, even when empty.
#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BusinessUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field_of_work: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl BusinessUpdate {
    pub fn apply_to(&self, business: &mut Business) {
        fn required(target: &mut String, value: &Option<String>) {
            if let Some(value) = value.as_deref().map(str::trim).filter(|v| !v.is_empty()) {
                *target = value.to_string();
            }
        }

        required(&mut business.name, &self.name);
        required(&mut business.phone, &self.phone);
        required(&mut business.field_of_work, &self.field_of_work);

        if let Some(city) = &self.city {
            business.city = city.trim().to_string();
        }
        if let Some(notes) = &self.notes {
            business.notes = notes.trim().to_string();
        }
    }
}

impl From<NewBusiness> for BusinessUpdate {
    fn from(business: NewBusiness) -> Self {
        Self {
            name: Some(business.name),
            phone: Some(business.phone),
            field_of_work: Some(business.field_of_work),
            city: Some(business.city),
            notes: Some(business.notes),
        }
    }
}

// Requests

#[derive(Default, Debug, Clone, Serialize)]
pub struct ListBusinesses;

impl ListBusinesses {
    pub fn new() -> Self {
        Self
    }
}

impl Request for ListBusinesses {
    type Data = ();
    type Response = Vec<Business>;

    fn endpoint(&self) -> Cow<'_, str> {
        "/businesses".into()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct GetBusiness {
    business_id: BusinessId,
}

impl GetBusiness {
    pub fn new(business_id: BusinessId) -> Self {
        Self { business_id }
    }
}

impl Request for GetBusiness {
    type Data = ();
    type Response = Business;

    fn endpoint(&self) -> Cow<'_, str> {
        format!("/businesses/{}", self.business_id).into()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CreateBusiness {
    business: NewBusiness,
}

impl CreateBusiness {
    pub fn new(business: NewBusiness) -> Self {
        Self { business }
    }

    setter!(business.city: String);
    setter!(business.notes: String);
}

impl Request for CreateBusiness {
    type Data = NewBusiness;
    type Response = Business;
    const METHOD: Method = Method::POST;

    fn endpoint(&self) -> Cow<'_, str> {
        "/businesses".into()
    }

    fn data(&self) -> RequestData<&Self::Data> {
        RequestData::Json(&self.business)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct UpdateBusiness {
    #[serde(skip)]
    business_id: BusinessId,
    update: BusinessUpdate,
}

impl UpdateBusiness {
    pub fn new(business_id: BusinessId) -> Self {
        Self {
            business_id,
            update: BusinessUpdate::default(),
        }
    }

    pub fn with_update(business_id: BusinessId, update: BusinessUpdate) -> Self {
        Self {
            business_id,
            update,
        }
    }

    setter!(opt update.name: String);
    setter!(opt update.phone: String);
    setter!(opt update.field_of_work: String);
    setter!(opt update.city: String);
    setter!(opt update.notes: String);
}

impl Request for UpdateBusiness {
    type Data = BusinessUpdate;
    type Response = Business;
    const METHOD: Method = Method::PUT;

    fn endpoint(&self) -> Cow<'_, str> {
        format!("/businesses/{}", self.business_id).into()
    }

    fn data(&self) -> RequestData<&Self::Data> {
        RequestData::Json(&self.update)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DeleteBusiness {
    business_id: BusinessId,
}

impl DeleteBusiness {
    pub fn new(business_id: BusinessId) -> Self {
        Self { business_id }
    }
}

impl Request for DeleteBusiness {
    type Data = ();
    type Response = MessageResponse;
    const METHOD: Method = Method::DELETE;

    fn endpoint(&self) -> Cow<'_, str> {
        format!("/businesses/{}", self.business_id).into()
    }
}
