pub mod model;
pub mod router;
pub mod store;
