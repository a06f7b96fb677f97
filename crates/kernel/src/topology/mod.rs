pub mod graph;
pub mod audit;
pub mod sphere;
