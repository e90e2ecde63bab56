pub mod distance;
pub mod geo;
pub mod jwt;
pub mod pricing;
pub mod validate;
