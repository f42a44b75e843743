pub mod consistency;
pub mod options;
pub mod person_service;
pub mod runtime;
