pub mod admin;
pub mod customer;
pub mod feedback;
pub mod lead;

pub use admin::*;
pub use customer::*;
pub use feedback::*;
pub use lead::*;
