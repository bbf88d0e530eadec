use std::sync::Arc;

use adapter::repository::{
    auth::AuthRepositoryImpl, booking::BookingRepositoryImpl, health::HealthCheckRepositoryImpl,
    lab::LabRepositoryImpl, user::UserRepositoryImpl, utilization::UtilizationRepositoryImpl,
};
use adapter::{database::ConnectionPool, redis::RedisClient};
use kernel::repository::{
    auth::AuthRepository, booking::BookingRepository, health::HealthCheckRepository,
    lab::LabRepository, user::UserRepository, utilization::UtilizationRepository,
};
use shared::config::AppConfig;

#[derive(Clone)]
pub struct AppRegistry {
    health_check_repository: Arc<dyn HealthCheckRepository>,
    auth_repository: Arc<dyn AuthRepository>,
    user_repository: Arc<dyn UserRepository>,
    lab_repository: Arc<dyn LabRepository>,
    booking_repository: Arc<dyn BookingRepository>,
    utilization_repository: Arc<dyn UtilizationRepository>,
}

impl AppRegistry {
    pub fn new(pool: ConnectionPool, redis_client: Arc<RedisClient>, app_config: &AppConfig) -> Self {
        let health_check_repository = Arc::new(HealthCheckRepositoryImpl::new(pool.clone()));
        let auth_repository = Arc::new(AuthRepositoryImpl::new(
            pool.clone(),
            redis_client.clone(),
            app_config.auth.ttl,
        ));
        let user_repository = Arc::new(UserRepositoryImpl::new(pool.clone()));
        let lab_repository = Arc::new(LabRepositoryImpl::new(pool.clone()));
        let booking_repository = Arc::new(BookingRepositoryImpl::new(pool.clone()));
        let utilization_repository = Arc::new(UtilizationRepositoryImpl::new(pool.clone()));
        Self {
            health_check_repository,
            auth_repository,
            user_repository,
            lab_repository,
            booking_repository,
            utilization_repository,
        }
    }

    pub fn health_check_repository(&self) -> Arc<dyn HealthCheckRepository> {
        self.health_check_repository.clone()
    }

    pub fn auth_repository(&self) -> Arc<dyn AuthRepository> {
        self.auth_repository.clone()
    }

    pub fn user_repository(&self) -> Arc<dyn UserRepository> {
        self.user_repository.clone()
    }

    pub fn lab_repository(&self) -> Arc<dyn LabRepository> {
        self.lab_repository.clone()
    }

    pub fn booking_repository(&self) -> Arc<dyn BookingRepository> {
        self.booking_repository.clone()
    }

    pub fn utilization_repository(&self) -> Arc<dyn UtilizationRepository> {
        self.utilization_repository.clone()
    }
}
