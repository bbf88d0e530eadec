pub mod auth;
pub mod booking;
pub mod health;
pub mod lab;
pub mod user;
pub mod utilization;

#[cfg(test)]
mod tests {
    use crate::route::v1::routes;
    use adapter::{database::ConnectionPool, redis::RedisClient};
    use axum::{
        body::Body,
        http::{header, Method, Request, StatusCode},
        Router,
    };
    use chrono::{Datelike, Days, Local, NaiveDate, Weekday};
    use kernel::model::{
        auth::event::CreateToken,
        id::{LabId, UserId},
        lab::{event::CreateLab, LabStatus},
        role::Role,
        user::event::CreateUser,
    };
    use registry::AppRegistry;
    use serde_json::{json, Value};
    use shared::config::{AppConfig, AuthConfig, DatabaseConfig, RedisConfig, ServerConfig};
    use std::{env, sync::Arc};
    use tower::ServiceExt;

    const PASSWORD: &str = "secret1";
    const BOOKING_ID: &str = "3f1c1e0e-8a53-4c1e-9e59-0f1d5a2b7c11";

    fn registry(pool: sqlx::PgPool) -> anyhow::Result<AppRegistry> {
        let config = AppConfig {
            // Only used to open the pool, which sqlx::test hands over already open.
            database: DatabaseConfig {
                host: "localhost".into(),
                port: 5432,
                username: "app".into(),
                password: "passwd".into(),
                database: "app".into(),
            },
            redis: RedisConfig {
                host: env::var("REDIS_HOST").unwrap_or_else(|_| "localhost".into()),
                port: env::var("REDIS_PORT")
                    .ok()
                    .and_then(|port| port.parse().ok())
                    .unwrap_or(6379),
            },
            auth: AuthConfig { ttl: 3600 },
            server: ServerConfig { port: 8080 },
        };
        let kv = Arc::new(RedisClient::new(&config.redis)?);
        Ok(AppRegistry::new(ConnectionPool::new(pool), kv, &config))
    }

    async fn account(
        registry: &AppRegistry,
        role: Role,
        email: &str,
        pending_approval: bool,
    ) -> anyhow::Result<UserId> {
        let user = registry
            .user_repository()
            .create(CreateUser::new(
                "Test Account".into(),
                email.into(),
                PASSWORD.into(),
                role,
                pending_approval,
            ))
            .await?;
        Ok(user.user_id)
    }

    async fn signed_in(
        registry: &AppRegistry,
        role: Role,
        email: &str,
    ) -> anyhow::Result<(UserId, String)> {
        let user_id = account(registry, role, email, false).await?;
        let token = registry
            .auth_repository()
            .create_token(CreateToken::new(user_id))
            .await?;
        Ok((user_id, token.0))
    }

    async fn lab(registry: &AppRegistry) -> anyhow::Result<LabId> {
        let lab_id = registry
            .lab_repository()
            .create(CreateLab {
                name: "Robotics Lab".into(),
                location: "Block B".into(),
                capacity: 10,
                equipment: vec![],
                description: None,
                status: LabStatus::Available,
            })
            .await?;
        Ok(lab_id)
    }

    async fn call(
        registry: &AppRegistry,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> anyhow::Result<(StatusCode, Value)> {
        let mut req = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            req = req.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let req = match body {
            Some(body) => req
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))?,
            None => req.body(Body::empty())?,
        };

        let res = Router::new()
            .merge(routes())
            .with_state(registry.clone())
            .oneshot(req)
            .await?;
        let status = res.status();
        let bytes = axum::body::to_bytes(res.into_body(), usize::MAX).await?;
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes)?
        };
        Ok((status, body))
    }

    fn next_saturday() -> NaiveDate {
        let today = Local::now().date_naive();
        let ahead = (7 + Weekday::Sat.num_days_from_monday()
            - today.weekday().num_days_from_monday())
            % 7;
        today + Days::new(if ahead == 0 { 7 } else { ahead.into() })
    }

    #[ignore = "needs PostgreSQL in DATABASE_URL and Redis at REDIS_HOST"]
    #[sqlx::test(migrations = "../adapter/migrations")]
    async fn test_admin_routes_refuse_staff_and_students(pool: sqlx::PgPool) -> anyhow::Result<()> {
        let registry = registry(pool)?;
        let lab_id = lab(&registry).await?;
        let pending_id = account(&registry, Role::Student, "waiting@example.com", true).await?;

        for (role, email) in [
            (Role::Staff, "staff@example.com"),
            (Role::Student, "student@example.com"),
        ] {
            let (_, token) = signed_in(&registry, role, email).await?;
            let requests = [
                (Method::GET, "/api/v1/users".to_string(), None),
                (Method::PUT, format!("/api/v1/users/{pending_id}/approve"), None),
                (Method::GET, "/api/v1/bookings".to_string(), None),
                (
                    Method::PUT,
                    format!("/api/v1/bookings/{BOOKING_ID}/status"),
                    Some(json!({ "status": "approved" })),
                ),
                (
                    Method::POST,
                    "/api/v1/labs".to_string(),
                    Some(json!({ "name": "Chemistry Lab", "location": "Block A", "capacity": 5 })),
                ),
                (Method::GET, format!("/api/v1/labs/{lab_id}/bookings"), None),
                (Method::GET, "/api/v1/utilization".to_string(), None),
                (Method::GET, "/api/v1/utilization/summary".to_string(), None),
            ];
            for (method, uri, body) in requests {
                let (status, body) =
                    call(&registry, method.clone(), &uri, Some(&token), body).await?;
                assert_eq!(status, StatusCode::FORBIDDEN, "{role:?} {method} {uri}");
                assert!(body["error"].is_string());
            }
        }
        Ok(())
    }

    #[ignore = "needs PostgreSQL in DATABASE_URL and Redis at REDIS_HOST"]
    #[sqlx::test(migrations = "../adapter/migrations")]
    async fn test_admins_do_not_book_labs(pool: sqlx::PgPool) -> anyhow::Result<()> {
        let registry = registry(pool)?;
        let lab_id = lab(&registry).await?;
        let (_, token) = signed_in(&registry, Role::Admin, "admin@example.com").await?;
        let date = next_saturday();

        let (status, _) = call(
            &registry,
            Method::GET,
            &format!("/api/v1/labs/{lab_id}/slots?date={date}"),
            Some(&token),
            None,
        )
        .await?;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (status, _) = call(
            &registry,
            Method::POST,
            "/api/v1/bookings",
            Some(&token),
            Some(json!({ "labId": lab_id, "bookingDate": date, "slot": "08:00-09:00" })),
        )
        .await?;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let lab = registry.lab_repository().find_by_id(lab_id).await?.unwrap();
        assert_eq!(lab.capacity, 10);
        Ok(())
    }

    #[ignore = "needs PostgreSQL in DATABASE_URL and Redis at REDIS_HOST"]
    #[sqlx::test(migrations = "../adapter/migrations")]
    async fn test_students_do_not_record_utilization(pool: sqlx::PgPool) -> anyhow::Result<()> {
        let registry = registry(pool)?;
        let lab_id = lab(&registry).await?;
        let usage = json!({
            "labId": lab_id,
            "date": Local::now().date_naive(),
            "hoursUsed": 2.5,
        });

        let (_, student) = signed_in(&registry, Role::Student, "student@example.com").await?;
        let (status, _) = call(
            &registry,
            Method::POST,
            "/api/v1/utilization",
            Some(&student),
            Some(usage.clone()),
        )
        .await?;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (_, staff) = signed_in(&registry, Role::Staff, "staff@example.com").await?;
        let (status, body) = call(
            &registry,
            Method::POST,
            "/api/v1/utilization",
            Some(&staff),
            Some(usage),
        )
        .await?;
        assert_eq!(status, StatusCode::CREATED);
        assert!(body["utilizationId"].is_string());
        Ok(())
    }

    #[ignore = "needs PostgreSQL in DATABASE_URL and Redis at REDIS_HOST"]
    #[sqlx::test(migrations = "../adapter/migrations")]
    async fn test_admins_cannot_change_their_own_account(pool: sqlx::PgPool) -> anyhow::Result<()> {
        let registry = registry(pool)?;
        let (admin_id, token) = signed_in(&registry, Role::Admin, "admin@example.com").await?;

        let (status, _) = call(
            &registry,
            Method::PUT,
            &format!("/api/v1/users/{admin_id}/role"),
            Some(&token),
            Some(json!({ "role": "student" })),
        )
        .await?;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (status, _) = call(
            &registry,
            Method::DELETE,
            &format!("/api/v1/users/{admin_id}"),
            Some(&token),
            None,
        )
        .await?;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let admin = registry
            .user_repository()
            .find_current_user(admin_id)
            .await?
            .unwrap();
        assert_eq!(admin.role, Role::Admin);

        let staff_id = account(&registry, Role::Staff, "staff@example.com", false).await?;
        let (status, _) = call(
            &registry,
            Method::DELETE,
            &format!("/api/v1/users/{staff_id}"),
            Some(&token),
            None,
        )
        .await?;
        assert_eq!(status, StatusCode::OK);
        Ok(())
    }

    #[ignore = "needs PostgreSQL in DATABASE_URL and Redis at REDIS_HOST"]
    #[sqlx::test(migrations = "../adapter/migrations")]
    async fn test_login_checks_approval_and_role(pool: sqlx::PgPool) -> anyhow::Result<()> {
        let registry = registry(pool)?;
        account(&registry, Role::Student, "waiting@example.com", true).await?;
        account(&registry, Role::Staff, "staff@example.com", false).await?;
        let credentials =
            |email: &str| Some(json!({ "email": email, "password": PASSWORD }));

        let (status, _) = call(
            &registry,
            Method::POST,
            "/api/v1/auth/login",
            None,
            credentials("waiting@example.com"),
        )
        .await?;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (status, _) = call(
            &registry,
            Method::POST,
            "/api/v1/auth/login/student",
            None,
            credentials("staff@example.com"),
        )
        .await?;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (status, body) = call(
            &registry,
            Method::POST,
            "/api/v1/auth/login/staff",
            None,
            credentials("staff@example.com"),
        )
        .await?;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["role"], "staff");
        assert!(body["accessToken"].is_string());
        Ok(())
    }

    #[ignore = "needs PostgreSQL in DATABASE_URL and Redis at REDIS_HOST"]
    #[sqlx::test(migrations = "../adapter/migrations")]
    async fn test_weekend_slots_close_after_a_booking(pool: sqlx::PgPool) -> anyhow::Result<()> {
        let registry = registry(pool)?;
        let lab_id = lab(&registry).await?;
        let (_, token) = signed_in(&registry, Role::Student, "student@example.com").await?;
        let date = next_saturday();
        let slots_uri = format!("/api/v1/labs/{lab_id}/slots?date={date}");

        let (status, body) =
            call(&registry, Method::GET, &slots_uri, Some(&token), None).await?;
        assert_eq!(status, StatusCode::OK);
        let items = body["items"].as_array().unwrap();
        assert_eq!(items.len(), 13);
        assert_eq!(items[0]["slot"], "08:00-09:00");
        assert!(items.iter().all(|slot| slot["available"] == true));

        let (status, body) = call(
            &registry,
            Method::POST,
            "/api/v1/bookings",
            Some(&token),
            Some(json!({
                "labId": lab_id,
                "bookingDate": date,
                "slot": "08:00-09:00",
                "purpose": "Robotics club",
            })),
        )
        .await?;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["status"], "approved");

        let (status, body) =
            call(&registry, Method::GET, &slots_uri, Some(&token), None).await?;
        assert_eq!(status, StatusCode::OK);
        let items = body["items"].as_array().unwrap();
        assert_eq!(items.len(), 13);
        assert!(items.iter().all(|slot| slot["available"] == false));

        let lab = registry.lab_repository().find_by_id(lab_id).await?.unwrap();
        assert_eq!(lab.capacity, 9);
        Ok(())
    }

    #[ignore = "needs PostgreSQL in DATABASE_URL and Redis at REDIS_HOST"]
    #[sqlx::test(migrations = "../adapter/migrations")]
    async fn test_malformed_parameters_are_bad_requests(pool: sqlx::PgPool) -> anyhow::Result<()> {
        let registry = registry(pool)?;
        let lab_id = lab(&registry).await?;
        let (_, token) = signed_in(&registry, Role::Admin, "admin@example.com").await?;

        for uri in [
            "/api/v1/labs/not-a-lab".to_string(),
            "/api/v1/bookings/42".to_string(),
            format!("/api/v1/labs/{lab_id}/slots?date=next-week"),
            "/api/v1/utilization?labId=chemistry".to_string(),
            "/api/v1/utilization/summary?from=yesterday".to_string(),
            "/api/v1/bookings/me?active=maybe".to_string(),
        ] {
            let (status, body) = call(&registry, Method::GET, &uri, Some(&token), None).await?;
            assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
            assert!(body["error"].is_string(), "{uri}");
        }
        Ok(())
    }
}
