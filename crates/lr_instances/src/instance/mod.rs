pub mod create;
pub mod launch;
pub mod list_versions;
pub mod read_log;
