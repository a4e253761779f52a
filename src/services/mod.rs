pub mod aggregate_sampler;
pub mod distribution_factory;
pub mod engine;
pub mod engine_config;
pub mod factors_yaml;
pub mod histogram;
pub mod market_simulation;
pub mod memory_store;
pub mod percentiles;
pub mod random_source;
pub mod revenue_simulation;
pub mod scheduler;
pub mod simulation;
pub mod simulation_types;
pub mod store;
pub mod summary_statistics;
pub mod yaml_store;
