use crate::model::{
    id::UtilizationId,
    utilization::{event::CreateUtilization, Utilization, UtilizationQuery, UtilizationSummary},
};
use async_trait::async_trait;
use shared::error::AppResult;

#[async_trait]
pub trait UtilizationRepository: Send + Sync {
    async fn create(&self, event: CreateUtilization) -> AppResult<UtilizationId>;
    async fn find_all(&self, query: UtilizationQuery) -> AppResult<Vec<Utilization>>;
    async fn summary(&self, query: UtilizationQuery) -> AppResult<UtilizationSummary>;
}
