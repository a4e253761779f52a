pub mod aggregate_cmd;
pub mod base_commands;
pub mod report_cmd;
pub mod report_format;
pub mod run_cmd;
pub mod submit_cmd;
