//! PostgreSQL integration tests using testcontainers.
//!
//! Run with: cargo test --test db_tests --features db-tests -- --nocapture
//!
//! Each test starts a disposable postgres:16 container, runs the migrations
//! and drives the controllers (or the full router) against it.

use std::time::Duration;

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use sqlx::PgPool;
use testcontainers::{
    core::{IntoContainerPort, WaitFor},
    runners::AsyncRunner,
    ContainerAsync, GenericImage, ImageExt,
};
use tower::ServiceExt;
use uuid::Uuid;

use pitstop::config::EnvironmentConfig;
use pitstop::controllers::booking_controller::BookingController;
use pitstop::controllers::goods_request_controller::GoodsRequestController;
use pitstop::controllers::inventory_controller::InventoryController;
use pitstop::controllers::job_controller::JobController;
use pitstop::controllers::leave_controller::LeaveController;
use pitstop::dto::booking_dto::{BookingResponse, CreateBookingRequest};
use pitstop::dto::goods_request_dto::{CreateGoodsRequest, GoodsRequestFilters, GoodsRequestResponse};
use pitstop::dto::inventory_dto::{CreateItemRequest, InventoryItemResponse, StockAdjustmentRequest};
use pitstop::dto::job_dto::{CreateJobRequest, JobFilters};
use pitstop::dto::leave_dto::CreateLeaveRequest;
use pitstop::dto::{Pagination, StatusRequest};
use pitstop::middleware::auth::AuthenticatedUser;
use pitstop::models::booking::BookingStatus;
use pitstop::models::goods_request::GoodsRequestStatus;
use pitstop::models::job::JobStatus;
use pitstop::models::leave_request::{LeaveStatus, LeaveType};
use pitstop::models::user::User;
use pitstop::models::Role;
use pitstop::repositories::inventory_repository::InventoryRepository;
use pitstop::repositories::user_repository::{UserChanges, UserRepository};
use pitstop::routes::create_router;
use pitstop::utils::errors::AppError;
use pitstop::AppState;

/// Start PostgreSQL container.
async fn start_postgres() -> (ContainerAsync<GenericImage>, String) {
    let image = GenericImage::new("postgres", "16")
        .with_exposed_port(5432.tcp())
        .with_wait_for(WaitFor::message_on_stdout(
            "database system is ready to accept connections",
        ));

    let container = image
        .with_env_var("POSTGRES_USER", "pitstop")
        .with_env_var("POSTGRES_PASSWORD", "pitstop")
        .with_env_var("POSTGRES_DB", "pitstop")
        .with_startup_timeout(Duration::from_secs(60))
        .start()
        .await
        .expect("Failed to start postgres container");

    // postgres logs the ready line once during init and again when it is really up
    tokio::time::sleep(Duration::from_secs(1)).await;

    let host_port = container
        .get_host_port_ipv4(5432)
        .await
        .expect("Failed to get mapped port");
    let host = container.get_host().await.expect("Failed to get container host");

    let connection_string = format!("postgres://pitstop:pitstop@{}:{}/pitstop", host, host_port);
    (container, connection_string)
}

/// Container plus a migrated pool. The container stops when this is dropped.
struct TestDb {
    _container: ContainerAsync<GenericImage>,
    pool: PgPool,
}

async fn setup() -> TestDb {
    let (container, connection_string) = start_postgres().await;
    let pool = PgPool::connect(&connection_string)
        .await
        .expect("Failed to connect to PostgreSQL");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to run migrations");

    TestDb {
        _container: container,
        pool,
    }
}

fn shop_clock() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2031, 3, 10)
        .unwrap()
        .and_hms_opt(7, 30, 0)
        .unwrap()
}

async fn create_user(pool: &PgPool, role: Role) -> User {
    let tag = Uuid::new_v4().simple().to_string();
    UserRepository::new(pool.clone())
        .create(
            "Kamal Jayasinghe",
            &format!("{}@pitstop.test", &tag[..12]),
            None,
            role,
            "not-a-real-hash",
        )
        .await
        .expect("user")
}

fn actor(user: &User) -> AuthenticatedUser {
    AuthenticatedUser {
        user_id: user.id,
        email: user.email.clone(),
        role: user.role,
    }
}

fn draft(vehicle_number: &str, time_slot: &str) -> CreateBookingRequest {
    CreateBookingRequest {
        customer_name: "Nimal Perera".to_string(),
        customer_email: "nimal@example.com".to_string(),
        customer_phone: "0771234567".to_string(),
        vehicle_number: vehicle_number.to_string(),
        vehicle_make: "Toyota".to_string(),
        vehicle_model: "Corolla".to_string(),
        vehicle_year: Some(2018),
        service_type: "oil_change".to_string(),
        booking_date: "2031-03-11".to_string(),
        time_slot: time_slot.to_string(),
        notes: None,
    }
}

async fn create_booking(pool: &PgPool, creator: &User, vehicle_number: &str) -> BookingResponse {
    BookingController::new(pool.clone(), 2)
        .create(creator.id, draft(vehicle_number, "09:00-10:00"), shop_clock())
        .await
        .expect("booking")
}

async fn create_item(pool: &PgPool, quantity: i32) -> InventoryItemResponse {
    let sku = format!("OIL-{}", &Uuid::new_v4().simple().to_string()[..8].to_uppercase());
    InventoryController::new(pool.clone())
        .create(CreateItemRequest {
            name: "Engine oil 5W30".to_string(),
            sku,
            category: "Lubricants".to_string(),
            quantity,
            unit_price: Decimal::new(450000, 2),
            reorder_level: 2,
        })
        .await
        .expect("inventory item")
}

fn job_request(booking_id: Uuid, technicians: Vec<Uuid>) -> CreateJobRequest {
    CreateJobRequest {
        booking_id,
        title: "Full service".to_string(),
        description: None,
        technicians,
    }
}

async fn raise_goods(
    goods: &GoodsRequestController,
    technician: &User,
    job_id: Uuid,
    item_id: Uuid,
) -> Result<GoodsRequestResponse, AppError> {
    let request = CreateGoodsRequest {
        job_id,
        item_id,
        quantity: 1,
        note: None,
    };
    goods.create(&actor(technician), request).await
}

fn status<S>(status: S) -> StatusRequest<S> {
    StatusRequest { status, note: None }
}

fn app(pool: &PgPool) -> (Router, AppState) {
    let config = EnvironmentConfig {
        environment: "test".to_string(),
        jwt_secret: "db-test-secret".to_string(),
        ..EnvironmentConfig::default()
    };
    let state = AppState::new(pool.clone(), config);
    (create_router(state.clone()), state)
}

fn get(uri: &str, token: &str) -> Request<Body> {
    Request::builder()
        .method(Method::GET)
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .body(Body::empty())
        .expect("request")
}

#[tokio::test]
async fn test_stock_never_goes_negative() {
    let db = setup().await;
    let item = create_item(&db.pool, 3).await;
    let inventory = InventoryController::new(db.pool.clone());

    let result = inventory
        .adjust_stock(item.id, StockAdjustmentRequest { delta: -4, reason: None })
        .await;
    assert!(matches!(result, Err(AppError::Conflict(_))));

    // the conditional update refuses on its own, without the pre-check
    let repository = InventoryRepository::new(db.pool.clone());
    assert!(repository.adjust(item.id, -4).await.unwrap().is_none());

    let attempts: Vec<_> = (0..8)
        .map(|_| {
            let repository = InventoryRepository::new(db.pool.clone());
            let id = item.id;
            tokio::spawn(async move { repository.adjust(id, -1).await })
        })
        .collect();
    let mut applied = 0;
    for attempt in attempts {
        if attempt.await.unwrap().unwrap().is_some() {
            applied += 1;
        }
    }
    assert_eq!(applied, 3);
    assert_eq!(inventory.get(item.id).await.unwrap().quantity, 0);
}

#[tokio::test]
async fn test_goods_release_requires_stock() {
    let db = setup().await;
    let manager = create_user(&db.pool, Role::Manager).await;
    let technician = create_user(&db.pool, Role::Technician).await;
    let booking = create_booking(&db.pool, &manager, "CAB-1001").await;
    let job = JobController::new(db.pool.clone())
        .create(job_request(booking.id, vec![technician.id]))
        .await
        .unwrap();
    let item = create_item(&db.pool, 2).await;

    let goods = GoodsRequestController::new(db.pool.clone());
    let request = goods
        .create(
            &actor(&technician),
            CreateGoodsRequest {
                job_id: job.id,
                item_id: item.id,
                quantity: 5,
                note: None,
            },
        )
        .await
        .unwrap();
    goods
        .update_status(&actor(&manager), request.id, status(GoodsRequestStatus::Approved))
        .await
        .unwrap();

    let release = goods
        .update_status(&actor(&manager), request.id, status(GoodsRequestStatus::Released))
        .await;
    assert!(matches!(release, Err(AppError::Conflict(_))));

    // the failed release rolled back as a whole
    let inventory = InventoryController::new(db.pool.clone());
    assert_eq!(inventory.get(item.id).await.unwrap().quantity, 2);
    let reloaded = goods.get(&actor(&manager), request.id).await.unwrap();
    assert_eq!(reloaded.status, GoodsRequestStatus::Approved);

    inventory
        .adjust_stock(item.id, StockAdjustmentRequest { delta: 4, reason: Some("delivery".to_string()) })
        .await
        .unwrap();
    let released = goods
        .update_status(&actor(&manager), request.id, status(GoodsRequestStatus::Released))
        .await
        .unwrap();
    assert_eq!(released.status, GoodsRequestStatus::Released);
    assert_eq!(inventory.get(item.id).await.unwrap().quantity, 1);
}

#[tokio::test]
async fn test_slot_capacity_holds_under_concurrent_bookings() {
    let db = setup().await;
    let cashier = create_user(&db.pool, Role::Cashier).await;
    let bookings = BookingController::new(db.pool.clone(), 1);

    let (first, second) = tokio::join!(
        bookings.create(cashier.id, draft("CAB-2001", "10:00-11:00"), shop_clock()),
        bookings.create(cashier.id, draft("CAB-2002", "10:00-11:00"), shop_clock()),
    );

    let results = [first, second];
    assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
    assert!(results.iter().any(|r| matches!(r, Err(AppError::Conflict(_)))));

    // a cancelled booking frees its place
    let kept = results.iter().find_map(|r| r.as_ref().ok()).unwrap();
    bookings.update_status(kept.id, BookingStatus::Cancelled).await.unwrap();
    assert!(bookings
        .create(cashier.id, draft("CAB-2003", "10:00-11:00"), shop_clock())
        .await
        .is_ok());
}

#[tokio::test]
async fn test_one_live_job_per_booking() {
    let db = setup().await;
    let manager = create_user(&db.pool, Role::Manager).await;
    let booking = create_booking(&db.pool, &manager, "CAB-3001").await;
    let jobs = JobController::new(db.pool.clone());

    let job = jobs.create(job_request(booking.id, vec![])).await.unwrap();
    let duplicate = jobs.create(job_request(booking.id, vec![])).await;
    assert!(matches!(duplicate, Err(AppError::Conflict(_))));

    jobs.update_status(&actor(&manager), job.id, JobStatus::Cancelled)
        .await
        .unwrap();
    assert!(jobs.create(job_request(booking.id, vec![])).await.is_ok());
}

#[tokio::test]
async fn test_jobs_cannot_be_opened_for_closed_bookings() {
    let db = setup().await;
    let manager = create_user(&db.pool, Role::Manager).await;
    let bookings = BookingController::new(db.pool.clone(), 2);
    let jobs = JobController::new(db.pool.clone());

    let cancelled = create_booking(&db.pool, &manager, "CAB-4001").await;
    bookings.update_status(cancelled.id, BookingStatus::Cancelled).await.unwrap();
    assert!(matches!(
        jobs.create(job_request(cancelled.id, vec![])).await,
        Err(AppError::Conflict(_))
    ));

    let completed = create_booking(&db.pool, &manager, "CAB-4002").await;
    for next in [BookingStatus::Confirmed, BookingStatus::InProgress, BookingStatus::Completed] {
        bookings.update_status(completed.id, next).await.unwrap();
    }
    assert!(matches!(
        jobs.create(job_request(completed.id, vec![])).await,
        Err(AppError::Conflict(_))
    ));
}

#[tokio::test]
async fn test_technicians_only_see_their_own_work() {
    let db = setup().await;
    let manager = create_user(&db.pool, Role::Manager).await;
    let assigned = create_user(&db.pool, Role::Technician).await;
    let other = create_user(&db.pool, Role::Technician).await;
    let booking = create_booking(&db.pool, &manager, "CAB-5001").await;

    let jobs = JobController::new(db.pool.clone());
    let job = jobs.create(job_request(booking.id, vec![assigned.id])).await.unwrap();

    let visible = jobs
        .list(&actor(&assigned), JobFilters::default(), Pagination::default())
        .await
        .unwrap();
    assert_eq!(visible.len(), 1);
    let hidden = jobs
        .list(&actor(&other), JobFilters::default(), Pagination::default())
        .await
        .unwrap();
    assert!(hidden.is_empty());
    assert!(matches!(jobs.get(&actor(&other), job.id).await, Err(AppError::Forbidden(_))));
    assert!(matches!(
        jobs.update_status(&actor(&other), job.id, JobStatus::InProgress).await,
        Err(AppError::Forbidden(_))
    ));

    let item = create_item(&db.pool, 10).await;
    let goods = GoodsRequestController::new(db.pool.clone());
    let request = raise_goods(&goods, &assigned, job.id, item.id).await.unwrap();
    assert!(matches!(
        raise_goods(&goods, &other, job.id, item.id).await,
        Err(AppError::Forbidden(_))
    ));

    let listed = goods
        .list(&actor(&other), GoodsRequestFilters::default(), Pagination::default())
        .await
        .unwrap();
    assert!(listed.is_empty());
    assert!(matches!(goods.get(&actor(&other), request.id).await, Err(AppError::Forbidden(_))));
    assert!(goods.get(&actor(&manager), request.id).await.is_ok());
}

#[tokio::test]
async fn test_leave_requests_are_owned() {
    let db = setup().await;
    let owner = create_user(&db.pool, Role::Cashier).await;
    let colleague = create_user(&db.pool, Role::Technician).await;
    let manager = create_user(&db.pool, Role::Manager).await;
    let today = shop_clock().date();
    let leaves = LeaveController::new(db.pool.clone());

    let request = || CreateLeaveRequest {
        leave_type: LeaveType::Annual,
        start_date: today + chrono::Duration::days(7),
        end_date: today + chrono::Duration::days(9),
        reason: "Family function in Kandy".to_string(),
    };

    let pending = leaves.create(&actor(&owner), request(), today).await.unwrap();
    assert!(matches!(
        leaves.delete(&actor(&colleague), pending.id).await,
        Err(AppError::Forbidden(_))
    ));
    assert!(matches!(
        leaves.update_status(&actor(&owner), pending.id, LeaveStatus::Approved).await,
        Err(AppError::Forbidden(_))
    ));

    leaves
        .update_status(&actor(&manager), pending.id, LeaveStatus::Approved)
        .await
        .unwrap();
    assert!(matches!(
        leaves.delete(&actor(&owner), pending.id).await,
        Err(AppError::Conflict(_))
    ));
    assert!(leaves.delete(&actor(&manager), pending.id).await.is_ok());

    let withdrawn = leaves.create(&actor(&owner), request(), today).await.unwrap();
    assert!(leaves.delete(&actor(&owner), withdrawn.id).await.is_ok());
}

#[tokio::test]
async fn test_route_access_follows_stored_role() {
    let db = setup().await;
    let (app, state) = app(&db.pool);
    let users = UserRepository::new(db.pool.clone());

    let technician = create_user(&db.pool, Role::Technician).await;
    let (token, _) = state.jwt.generate_token(&technician).unwrap();
    let response = app.clone().oneshot(get("/users", &token)).await.unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let admin = create_user(&db.pool, Role::Admin).await;
    let (token, _) = state.jwt.generate_token(&admin).unwrap();
    let response = app.clone().oneshot(get("/auth/roles", &token)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // demoted after the token was issued: the old admin claim no longer counts
    users.update_role(admin.id, Role::Cashier).await.unwrap();
    let response = app.clone().oneshot(get("/auth/roles", &token)).await.unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let response = app.clone().oneshot(get("/bookings", &token)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_deactivated_or_deleted_accounts_lose_access() {
    let db = setup().await;
    let (app, state) = app(&db.pool);
    let users = UserRepository::new(db.pool.clone());

    let manager = create_user(&db.pool, Role::Manager).await;
    let (token, _) = state.jwt.generate_token(&manager).unwrap();
    let response = app.clone().oneshot(get("/users", &token)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    users
        .update(
            manager.id,
            UserChanges {
                active: Some(false),
                ..UserChanges::default()
            },
        )
        .await
        .unwrap();
    let response = app.clone().oneshot(get("/users", &token)).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let cashier = create_user(&db.pool, Role::Cashier).await;
    let (token, _) = state.jwt.generate_token(&cashier).unwrap();
    assert!(users.delete(cashier.id).await.unwrap());
    let response = app.oneshot(get("/auth/me", &token)).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
