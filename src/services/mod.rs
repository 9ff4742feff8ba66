pub mod advisor_service;
pub mod form_service;
pub mod history_service;
pub mod presentation;
pub mod ratio;
