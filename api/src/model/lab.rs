use chrono::NaiveDate;
use derive_new::new;
use garde::Validate;
use kernel::model::{
    booking::SlotAvailability,
    id::LabId,
    lab::{
        event::{CreateLab, UpdateLab},
        Equipment, Lab, LabListOptions, LabStatus,
    },
};
use serde::{Deserialize, Serialize};

use super::user::not_blank;

fn not_blank_if_present(value: &Option<String>, ctx: &()) -> garde::Result {
    value.as_deref().map_or(Ok(()), |v| not_blank(v, ctx))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LabStatusName {
    #[default]
    Available,
    Maintenance,
}

impl From<LabStatus> for LabStatusName {
    fn from(value: LabStatus) -> Self {
        match value {
            LabStatus::Available => Self::Available,
            LabStatus::Maintenance => Self::Maintenance,
        }
    }
}

impl From<LabStatusName> for LabStatus {
    fn from(value: LabStatusName) -> Self {
        match value {
            LabStatusName::Available => Self::Available,
            LabStatusName::Maintenance => Self::Maintenance,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct EquipmentBody {
    #[garde(custom(not_blank))]
    pub name: String,
    #[garde(range(min = 0))]
    pub quantity: i32,
}

impl From<Equipment> for EquipmentBody {
    fn from(value: Equipment) -> Self {
        let Equipment { name, quantity } = value;
        Self { name, quantity }
    }
}

impl From<EquipmentBody> for Equipment {
    fn from(value: EquipmentBody) -> Self {
        let EquipmentBody { name, quantity } = value;
        Self {
            name: name.trim().to_string(),
            quantity,
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateLabRequest {
    #[garde(custom(not_blank))]
    pub name: String,
    #[garde(custom(not_blank))]
    pub location: String,
    #[garde(range(min = 0))]
    pub capacity: i32,
    #[serde(default)]
    #[garde(dive)]
    pub equipment: Vec<EquipmentBody>,
    #[garde(skip)]
    pub description: Option<String>,
    #[serde(default)]
    #[garde(skip)]
    pub status: LabStatusName,
}

impl From<CreateLabRequest> for CreateLab {
    fn from(value: CreateLabRequest) -> Self {
        let CreateLabRequest {
            name,
            location,
            capacity,
            equipment,
            description,
            status,
        } = value;
        CreateLab {
            name: name.trim().to_string(),
            location: location.trim().to_string(),
            capacity,
            equipment: equipment.into_iter().map(Equipment::from).collect(),
            description: description.filter(|d| !d.trim().is_empty()),
            status: status.into(),
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateLabRequest {
    #[garde(custom(not_blank_if_present))]
    pub name: Option<String>,
    #[garde(custom(not_blank_if_present))]
    pub location: Option<String>,
    #[garde(range(min = 0))]
    pub capacity: Option<i32>,
    #[garde(dive)]
    pub equipment: Option<Vec<EquipmentBody>>,
    #[garde(skip)]
    pub description: Option<String>,
    #[garde(skip)]
    pub status: Option<LabStatusName>,
}

#[derive(new)]
pub struct UpdateLabRequestWithId(LabId, UpdateLabRequest);
impl From<UpdateLabRequestWithId> for UpdateLab {
    fn from(value: UpdateLabRequestWithId) -> Self {
        let UpdateLabRequestWithId(
            lab_id,
            UpdateLabRequest {
                name,
                location,
                capacity,
                equipment,
                description,
                status,
            },
        ) = value;
        UpdateLab {
            lab_id,
            name: name.map(|n| n.trim().to_string()),
            location: location.map(|l| l.trim().to_string()),
            capacity,
            equipment: equipment.map(|e| e.into_iter().map(Equipment::from).collect()),
            description,
            status: status.map(LabStatus::from),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct LabListQuery {
    pub q: Option<String>,
}

impl From<LabListQuery> for LabListOptions {
    fn from(value: LabListQuery) -> Self {
        Self {
            name_contains: value.q,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LabsResponse {
    pub items: Vec<LabResponse>,
}

impl From<Vec<Lab>> for LabsResponse {
    fn from(value: Vec<Lab>) -> Self {
        Self {
            items: value.into_iter().map(LabResponse::from).collect(),
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LabResponse {
    pub lab_id: LabId,
    pub name: String,
    pub location: String,
    pub capacity: i32,
    pub equipment: Vec<EquipmentBody>,
    pub description: Option<String>,
    pub status: LabStatusName,
}

impl From<Lab> for LabResponse {
    fn from(value: Lab) -> Self {
        let Lab {
            lab_id,
            name,
            location,
            capacity,
            equipment,
            description,
            status,
        } = value;
        Self {
            lab_id,
            name,
            location,
            capacity,
            equipment: equipment.into_iter().map(EquipmentBody::from).collect(),
            description,
            status: status.into(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct SlotQuery {
    pub date: NaiveDate,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotsResponse {
    pub lab_id: LabId,
    pub date: NaiveDate,
    pub items: Vec<SlotResponse>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotResponse {
    pub slot: String,
    pub available: bool,
}

impl From<SlotAvailability> for SlotResponse {
    fn from(value: SlotAvailability) -> Self {
        Self {
            slot: value.slot.to_string(),
            available: value.available,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_request_defaults_and_trims() {
        let req: CreateLabRequest = serde_json::from_value(serde_json::json!({
            "name": " Networks Lab ",
            "location": "Block B",
            "capacity": 30,
            "description": "  ",
        }))
        .unwrap();
        req.validate(&()).unwrap();

        let event = CreateLab::from(req);
        assert_eq!(event.name, "Networks Lab");
        assert!(event.equipment.is_empty());
        assert_eq!(event.description, None);
        assert_eq!(event.status, LabStatus::Available);
    }

    #[test]
    fn negative_numbers_are_rejected() {
        let req: CreateLabRequest = serde_json::from_value(serde_json::json!({
            "name": "Networks Lab",
            "location": "Block B",
            "capacity": -1,
        }))
        .unwrap();
        assert!(req.validate(&()).is_err());

        let req: UpdateLabRequest = serde_json::from_value(serde_json::json!({
            "equipment": [{ "name": "Router", "quantity": -2 }],
        }))
        .unwrap();
        assert!(req.validate(&()).is_err());
    }

    #[test]
    fn partial_update_keeps_missing_fields_empty() {
        let req: UpdateLabRequest = serde_json::from_value(serde_json::json!({
            "status": "maintenance",
        }))
        .unwrap();
        req.validate(&()).unwrap();

        let lab_id = LabId::new();
        let event = UpdateLab::from(UpdateLabRequestWithId::new(lab_id, req));
        assert_eq!(event.lab_id, lab_id);
        assert_eq!(event.status, Some(LabStatus::Maintenance));
        assert!(event.name.is_none());
        assert!(event.capacity.is_none());
    }

    #[test]
    fn lab_response_is_camel_case() {
        let lab = Lab {
            lab_id: LabId::new(),
            name: "Networks Lab".into(),
            location: "Block B".into(),
            capacity: 12,
            equipment: vec![Equipment {
                name: "Router".into(),
                quantity: 4,
            }],
            description: None,
            status: LabStatus::Maintenance,
        };
        let json = serde_json::to_value(LabResponse::from(lab)).unwrap();
        assert!(json.get("labId").is_some());
        assert_eq!(json["status"], "maintenance");
        assert_eq!(json["equipment"][0]["quantity"], 4);
    }
}
