use super::{Equipment, LabStatus};
use crate::model::id::LabId;

pub struct CreateLab {
    pub name: String,
    pub location: String,
    pub capacity: i32,
    pub equipment: Vec<Equipment>,
    pub description: Option<String>,
    pub status: LabStatus,
}

#[derive(Debug)]
pub struct UpdateLab {
    pub lab_id: LabId,
    pub name: Option<String>,
    pub location: Option<String>,
    pub capacity: Option<i32>,
    pub equipment: Option<Vec<Equipment>>,
    pub description: Option<String>,
    pub status: Option<LabStatus>,
}

#[derive(Debug)]
pub struct DeleteLab {
    pub lab_id: LabId,
}
