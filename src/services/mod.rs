pub mod message_service;
pub mod payment_service;
pub mod session_service;
pub mod stripe_service;
pub mod user_service;
pub mod work_sheet_service;
