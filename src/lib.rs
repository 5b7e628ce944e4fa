pub mod activity;
pub mod book;
pub mod catalog;
pub mod client;
pub mod form;
pub mod logging;
pub mod order;
pub mod plan;
pub mod routes;
pub mod state;
pub mod submit;
pub mod trades;
pub mod wizard;
