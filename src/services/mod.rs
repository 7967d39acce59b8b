pub mod campus_api;
