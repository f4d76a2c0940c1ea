use super::{Result, Status, TrackerError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

/// A dignitary whose arrival is being tracked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackedPerson {
    pub id: Uuid,
    pub name: String,
    pub designation: String,
    pub organization: String,
    pub status: Status,
    #[serde(default)]
    pub remarks: Option<String>,
    #[serde(default)]
    pub car_number: Option<String>,
    #[serde(default, alias = "loName")]
    pub liaison_name: Option<String>,
    #[serde(default, alias = "loNumber")]
    pub liaison_phone: Option<String>,
    #[serde(default, alias = "facilitator")]
    pub facilitator_name: Option<String>,
    #[serde(default, alias = "image")]
    pub portrait_image: Option<String>,
    pub last_updated: DateTime<Utc>,
}

impl TrackedPerson {
    pub fn from_fields(id: Uuid, fields: PersonFields, stamp: DateTime<Utc>) -> Result<Self> {
        let fields = fields.normalized();
        fields.validate()?;
        Ok(Self {
            id,
            name: fields.name,
            designation: fields.designation,
            organization: fields.organization,
            status: fields.status,
            remarks: fields.remarks,
            car_number: fields.car_number,
            liaison_name: fields.liaison_name,
            liaison_phone: fields.liaison_phone,
            facilitator_name: fields.facilitator_name,
            portrait_image: fields.portrait_image,
            last_updated: stamp,
        })
    }

    /// Merges `patch` into a copy of `self`. Fails without touching `self` when the
    /// merge would blank a required field.
    pub fn merged(&self, patch: PersonPatch, stamp: DateTime<Utc>) -> Result<Self> {
        let mut next = self.clone();

        if let Some(name) = patch.name {
            next.name = name.trim().to_string();
        }
        if let Some(designation) = patch.designation {
            next.designation = designation.trim().to_string();
        }
        if let Some(organization) = patch.organization {
            next.organization = organization.trim().to_string();
        }
        if let Some(status) = patch.status {
            next.status = status;
        }
        if let Some(remarks) = patch.remarks {
            next.remarks = remarks.and_then(non_blank);
        }
        if let Some(car_number) = patch.car_number {
            next.car_number = car_number.and_then(non_blank);
        }
        if let Some(liaison_name) = patch.liaison_name {
            next.liaison_name = liaison_name.and_then(non_blank);
        }
        if let Some(liaison_phone) = patch.liaison_phone {
            next.liaison_phone = liaison_phone.and_then(non_blank);
        }
        if let Some(facilitator_name) = patch.facilitator_name {
            next.facilitator_name = facilitator_name.and_then(non_blank);
        }
        if let Some(portrait_image) = patch.portrait_image {
            next.portrait_image = portrait_image.and_then(non_blank);
        }

        ensure_required("name", &next.name)?;
        ensure_required("designation", &next.designation)?;
        ensure_required("organization", &next.organization)?;

        next.last_updated = stamp;
        Ok(next)
    }

    /// Case-insensitive substring match against the searchable fields.
    /// `needle` must already be lower-cased.
    pub fn matches(&self, needle: &str) -> bool {
        if needle.is_empty() {
            return true;
        }
        [
            self.name.as_str(),
            self.designation.as_str(),
            self.organization.as_str(),
            self.status.label(),
        ]
        .iter()
        .any(|field| field.to_lowercase().contains(needle))
    }
}

/// Full form payload, used for create and full edit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonFields {
    pub name: String,
    pub designation: String,
    pub organization: String,
    #[serde(default)]
    pub status: Status,
    #[serde(default)]
    pub remarks: Option<String>,
    #[serde(default)]
    pub car_number: Option<String>,
    #[serde(default, alias = "loName")]
    pub liaison_name: Option<String>,
    #[serde(default, alias = "loNumber")]
    pub liaison_phone: Option<String>,
    #[serde(default, alias = "facilitator")]
    pub facilitator_name: Option<String>,
    #[serde(default, alias = "image")]
    pub portrait_image: Option<String>,
}

impl PersonFields {
    pub fn new(
        name: impl Into<String>,
        designation: impl Into<String>,
        organization: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            designation: designation.into(),
            organization: organization.into(),
            ..Self::default()
        }
    }

    pub fn status(mut self, status: Status) -> Self {
        self.status = status;
        self
    }

    pub fn remarks(mut self, remarks: impl Into<String>) -> Self {
        self.remarks = Some(remarks.into());
        self
    }

    pub fn car_number(mut self, car_number: impl Into<String>) -> Self {
        self.car_number = Some(car_number.into());
        self
    }

    pub fn liaison(mut self, name: impl Into<String>, phone: impl Into<String>) -> Self {
        self.liaison_name = Some(name.into());
        self.liaison_phone = Some(phone.into());
        self
    }

    pub fn facilitator(mut self, facilitator_name: impl Into<String>) -> Self {
        self.facilitator_name = Some(facilitator_name.into());
        self
    }

    pub fn portrait(mut self, reference: impl Into<String>) -> Self {
        self.portrait_image = Some(reference.into());
        self
    }

    pub fn validate(&self) -> Result<()> {
        ensure_required("name", &self.name)?;
        ensure_required("designation", &self.designation)?;
        ensure_required("organization", &self.organization)?;
        Ok(())
    }

    /// Trims required text and turns blank optional text into `None`, the way an
    /// empty form input is meant.
    fn normalized(self) -> Self {
        Self {
            name: self.name.trim().to_string(),
            designation: self.designation.trim().to_string(),
            organization: self.organization.trim().to_string(),
            status: self.status,
            remarks: self.remarks.and_then(non_blank),
            car_number: self.car_number.and_then(non_blank),
            liaison_name: self.liaison_name.and_then(non_blank),
            liaison_phone: self.liaison_phone.and_then(non_blank),
            facilitator_name: self.facilitator_name.and_then(non_blank),
            portrait_image: self.portrait_image.and_then(non_blank),
        }
    }
}

/// Merge payload. Absent fields are kept; for optional text an explicit `null`
/// clears the stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonPatch {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub designation: Option<String>,
    #[serde(default)]
    pub organization: Option<String>,
    #[serde(default)]
    pub status: Option<Status>,
    #[serde(default, deserialize_with = "deserialize_some")]
    pub remarks: Option<Option<String>>,
    #[serde(default, deserialize_with = "deserialize_some")]
    pub car_number: Option<Option<String>>,
    #[serde(default, alias = "loName", deserialize_with = "deserialize_some")]
    pub liaison_name: Option<Option<String>>,
    #[serde(default, alias = "loNumber", deserialize_with = "deserialize_some")]
    pub liaison_phone: Option<Option<String>>,
    #[serde(default, alias = "facilitator", deserialize_with = "deserialize_some")]
    pub facilitator_name: Option<Option<String>>,
    #[serde(default, alias = "image", deserialize_with = "deserialize_some")]
    pub portrait_image: Option<Option<String>>,
}

impl PersonPatch {
    /// Status and remarks only, as committed by an inline edit.
    pub fn inline(status: Status, remarks: Option<String>) -> Self {
        Self {
            status: Some(status),
            remarks: Some(remarks),
            ..Self::default()
        }
    }

    pub fn status(status: Status) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }

    pub fn portrait(reference: Option<String>) -> Self {
        Self {
            portrait_image: Some(reference),
            ..Self::default()
        }
    }

    pub fn has_changes(&self) -> bool {
        self.name.is_some()
            || self.designation.is_some()
            || self.organization.is_some()
            || self.status.is_some()
            || self.remarks.is_some()
            || self.car_number.is_some()
            || self.liaison_name.is_some()
            || self.liaison_phone.is_some()
            || self.facilitator_name.is_some()
            || self.portrait_image.is_some()
    }
}

impl From<PersonFields> for PersonPatch {
    fn from(fields: PersonFields) -> Self {
        Self {
            name: Some(fields.name),
            designation: Some(fields.designation),
            organization: Some(fields.organization),
            status: Some(fields.status),
            remarks: Some(fields.remarks),
            car_number: Some(fields.car_number),
            liaison_name: Some(fields.liaison_name),
            liaison_phone: Some(fields.liaison_phone),
            facilitator_name: Some(fields.facilitator_name),
            portrait_image: Some(fields.portrait_image),
        }
    }
}

pub(crate) fn deserialize_some<'de, D, T>(deserializer: D) -> std::result::Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

fn ensure_required(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(TrackerError::validation(format!("{field} must not be blank")));
    }
    Ok(())
}

fn non_blank(value: String) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value)
    }
}
