use std::{
    any::Any,
    collections::HashMap,
    env,
    sync::{Arc, Mutex},
    time::Duration,
};

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use sqlx::{mysql::MySqlPoolOptions, MySql, Pool};

use crate::common::error::{ErrorResponse, ErrorTypes};
use crate::controllers::player::PlayerSession;

mod clients;
mod common;
mod controllers;
mod db;
mod handlers;
mod store;
mod swagger;

#[derive(Clone)]
pub struct AppState {
    pub pool: Pool<MySql>,
    pub redis: r2d2::Pool<redis::Client>,
    pub http: reqwest::Client,
    // Open reading sessions, keyed by (user, course). Single-writer per
    // user by the nature of the UI, so a plain mutex is enough.
    pub players: Arc<Mutex<HashMap<(u32, i32), PlayerSession>>>,
}

fn internal_server_error_handler(err: Box<dyn Any + Send + 'static>) -> Response {
    let details = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "Unknown panic message".to_string()
    };
    tracing::error!("panic caught in handler: {}", details);
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        axum::Json(ErrorResponse::new(ErrorTypes::InternalError, &details)),
    )
        .into_response()
}

async fn get_db_pool() -> anyhow::Result<Pool<MySql>> {
    let connect_str = env::var("DATABASE_URL")?;
    let mysql_pool = MySqlPoolOptions::new()
        .max_connections(5)
        .acquire_timeout(Duration::from_secs(10))
        .connect(&connect_str)
        .await?;
    sqlx::migrate!().run(&mysql_pool).await?;
    Ok(mysql_pool)
}

fn get_redis_pool() -> anyhow::Result<r2d2::Pool<redis::Client>> {
    let client = redis::Client::open(env::var("REDIS_URL")?)?;
    let pool = r2d2::Pool::builder().build(client)?;
    Ok(pool)
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt().init();

    dotenv::dotenv().ok();

    let app_state = AppState {
        pool: get_db_pool()
            .await
            .expect("Could not connect to the database"),
        redis: get_redis_pool().expect("Could not connect to redis"),
        http: reqwest::Client::new(),
        players: Arc::new(Mutex::new(HashMap::new())),
    };
    let router = common::router::get_router(app_state);

    let port = env::var("PORT").unwrap_or_else(|_| "8080".to_string());
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port))
        .await
        .unwrap();
    tracing::info!("Started on port {}", port);
    axum::serve(listener, router).await.unwrap();
}
