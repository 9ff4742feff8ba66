pub mod app;
pub mod domain;
pub mod errors;
pub mod external;
pub mod logging;
pub mod routes;
pub mod services;
pub mod state;
pub mod store;
pub mod utils;
