mod authn;
mod authz;
mod db;
mod gate;
mod handlers;
mod request;
mod response;

pub mod config;
pub mod factory;
pub mod restful;
