pub mod db;
pub mod migration_runner;

#[cfg(test)]
pub mod fixtures;
