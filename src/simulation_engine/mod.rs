// simulation_engine/mod.rs
pub mod intake;
pub mod junction;
pub mod lanes;
pub mod queue;
pub mod roads;
pub mod route_generation;
pub mod scheduler;
pub mod simulation;
pub mod vehicles;
