pub(crate) mod analysis;
pub(crate) mod dashboard;
pub(crate) mod form;
pub(crate) mod health;
pub(crate) mod history;
