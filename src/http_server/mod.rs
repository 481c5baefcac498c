//! # HTTP Server Module
//!
//! Axum server exposing the student API.
//!
//! # Endpoints
//!
//! - `/health` - Health check
//! - `POST /api/students/insert` - Create a student
//! - `GET /api/students/fetch` - List all students
//! - `GET /api/students/search?name=` - Case-insensitive name search
//! - `PUT /api/students/:id` - Partial update
//! - `DELETE /api/students/:id` - Delete

pub mod config;
pub mod errors;
pub mod health_routes;
pub mod server;
pub mod student_routes;

pub use config::HttpServerConfig;
pub use errors::{ApiError, ApiResult, ErrorResponse};
pub use server::{build_router, HttpServer};
