pub mod response;
pub mod session;

pub use response::{ApiResponse, ApiResult};
pub use session::{api_session_guard, clear_session_cookie, resolve_user, session_cookie, session_guard};
