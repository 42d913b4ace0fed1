pub mod as_the_crow_flies;
pub mod blocks;
pub mod cost_matrix;
pub mod cost_matrix_builder;
pub mod distance_backend;
pub mod error;
pub mod google_distance_matrix_api;
pub mod travel_mode;
