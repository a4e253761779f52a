pub mod factor;
pub mod model_variables;
pub mod project;
pub mod simulation;
