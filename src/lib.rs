#[macro_use]
extern crate lazy_static;

pub mod api;
pub mod model;
pub mod number;
pub mod service;

pub use api::Error;
pub use number::extract_number;
pub use service::ReadingService;
