//! # Account Server
//!
//! HTTP surface of the account service, built on axum.
//!
//! Authorization lives entirely in `account-auth`; this crate maps routes
//! to its operations, turns guard requirements into typed extractors and
//! renders errors as JSON.
//!
//! ## Routes
//!
//! | method | path                             | guard                |
//! |--------|----------------------------------|----------------------|
//! | POST   | `/register`                      | none                 |
//! | POST   | `/login`                         | none                 |
//! | GET    | `/me`                            | authenticated        |
//! | GET    | `/users`                         | `read`               |
//! | GET    | `/users/{id}`                    | `read`               |
//! | PUT    | `/users/{id}`                    | `write`              |
//! | DELETE | `/users/{id}`                    | `delete`             |
//! | GET    | `/admin-only`                    | role Admin           |
//! | GET    | `/moderator-or-admin`            | role Admin/Moderator |
//! | GET    | `/check-permission/{permission}` | `read`               |
//! | GET    | `/health`                        | none                 |

pub mod config;
pub mod error;
pub mod extract;
pub mod routes;
pub mod state;

pub use config::ServerConfig;
pub use error::{ApiError, ApiResult};
pub use routes::router;
pub use state::AppState;
