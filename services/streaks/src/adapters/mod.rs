pub mod db;

pub use db::PgHabitStore;
