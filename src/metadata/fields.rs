use std::collections::BTreeMap;
use std::fmt;

use crate::error::FolderNameError;
use crate::extract::ExtractedMetadata;

/// JSON fields the uploader rewrites, in patch order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum MetadataField {
    DateCreated,
    RecordDate,
    RecordCity,
    Description,
    GroupVehicleNumber,
    VehicleDesignation,
    Vin,
}

impl MetadataField {
    pub const ALL: [MetadataField; 7] = [
        MetadataField::DateCreated,
        MetadataField::RecordDate,
        MetadataField::RecordCity,
        MetadataField::Description,
        MetadataField::GroupVehicleNumber,
        MetadataField::VehicleDesignation,
        MetadataField::Vin,
    ];

    /// Key as it appears in the metadata document.
    pub fn key(self) -> &'static str {
        match self {
            MetadataField::DateCreated => "date_created",
            MetadataField::RecordDate => "record_date",
            MetadataField::RecordCity => "record_city",
            MetadataField::Description => "description",
            MetadataField::GroupVehicleNumber => "group_vehicle_number",
            MetadataField::VehicleDesignation => "vehicle_designation",
            MetadataField::Vin => "vin",
        }
    }
}

impl fmt::Display for MetadataField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// A trace folder name of the form `<identifier>, <description>, <location>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FolderName {
    /// Full base name, untouched
    pub full: String,
    /// AU number, trimmed
    pub identifier: String,
    pub description: String,
    pub location: String,
}

impl FolderName {
    pub fn parse(name: &str) -> Result<Self, FolderNameError> {
        let parts: Vec<&str> = name.split(',').collect();
        let [identifier, description, location] = parts.as_slice() else {
            return Err(FolderNameError::WrongPartCount {
                name: name.to_string(),
                found: parts.len(),
            });
        };

        Ok(FolderName {
            full: name.to_string(),
            identifier: identifier.trim().to_string(),
            description: description.trim().to_string(),
            location: location.trim().to_string(),
        })
    }
}

/// Replacement values keyed by field; fields without an entry are left alone.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldUpdates(BTreeMap<MetadataField, String>);

impl FieldUpdates {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, field: MetadataField, value: impl Into<String>) -> &mut Self {
        self.0.insert(field, value.into());
        self
    }

    pub fn get(&self, field: MetadataField) -> Option<&str> {
        self.0.get(&field).map(String::as_str)
    }

    /// Entries in patch order.
    pub fn iter(&self) -> impl Iterator<Item = (MetadataField, &str)> {
        self.0.iter().map(|(field, value)| (*field, value.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The full update set for one trace folder.
    pub fn derive(extracted: &ExtractedMetadata, name: &FolderName) -> Self {
        let mut updates = FieldUpdates::new();
        updates
            .set(MetadataField::DateCreated, &extracted.timestamp)
            .set(MetadataField::RecordDate, &extracted.timestamp)
            .set(MetadataField::RecordCity, &name.location)
            .set(MetadataField::Description, &name.full)
            .set(MetadataField::GroupVehicleNumber, &name.identifier)
            .set(MetadataField::VehicleDesignation, &name.identifier)
            .set(MetadataField::Vin, &extracted.vin);
        updates
    }
}
