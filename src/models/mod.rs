pub mod payment;
pub mod user;
pub mod work_sheet;

// Messages are stored as free-form `bson::Document`s and have no typed model.

pub use payment::*;
pub use user::*;
pub use work_sheet::*;
