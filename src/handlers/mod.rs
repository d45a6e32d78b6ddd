// Handlers grouped by who may call them:
// public pages (health, sign-in) → session pages (dashboard) → session API (/api/*)
pub mod auth;
pub mod dashboard;
pub mod health;
pub mod posts;
