pub mod index;
pub mod model;
pub mod predict;
