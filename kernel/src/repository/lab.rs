use crate::model::{
    id::LabId,
    lab::{
        event::{CreateLab, DeleteLab, UpdateLab},
        Lab, LabListOptions,
    },
};
use async_trait::async_trait;
use shared::error::AppResult;

#[async_trait]
pub trait LabRepository: Send + Sync {
    async fn create(&self, event: CreateLab) -> AppResult<LabId>;
    async fn find_all(&self, options: LabListOptions) -> AppResult<Vec<Lab>>;
    async fn find_by_id(&self, lab_id: LabId) -> AppResult<Option<Lab>>;
    async fn update(&self, event: UpdateLab) -> AppResult<()>;
    async fn delete(&self, event: DeleteLab) -> AppResult<()>;
}
