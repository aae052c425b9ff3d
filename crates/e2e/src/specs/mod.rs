pub mod auth;
pub mod dial;
pub mod health;
pub mod journeys;
pub mod objectives;
pub mod projects;
pub mod rrgt;
pub mod tasks;
pub mod teams;
pub mod touchbases;
