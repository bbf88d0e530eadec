use crate::model::id::LabId;
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, EnumString};

pub mod event;

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, AsRefStr)]
#[strum(serialize_all = "lowercase")]
pub enum LabStatus {
    Available,
    Maintenance,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Equipment {
    pub name: String,
    pub quantity: i32,
}

#[derive(Debug, Clone)]
pub struct Lab {
    pub lab_id: LabId,
    pub name: String,
    pub location: String,
    /// Systems still free to book.
    pub capacity: i32,
    pub equipment: Vec<Equipment>,
    pub description: Option<String>,
    pub status: LabStatus,
}

impl Lab {
    pub fn is_bookable(&self) -> bool {
        self.status == LabStatus::Available && self.capacity > 0
    }
}

#[derive(Debug, Default)]
pub struct LabListOptions {
    pub name_contains: Option<String>,
}

impl LabListOptions {
    /// Pattern for a case-insensitive `ILIKE` match, `%` when no search term is set.
    pub fn name_pattern(&self) -> String {
        match self.name_contains.as_deref().map(str::trim) {
            Some(term) if !term.is_empty() => {
                let escaped = term
                    .replace('\\', "\\\\")
                    .replace('%', "\\%")
                    .replace('_', "\\_");
                format!("%{escaped}%")
            }
            _ => "%".into(),
        }
    }
}
