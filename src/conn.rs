mod am_conn_core;
mod authentication;
mod connect_params;
mod connection_configuration;
mod connection_core;
mod initial_request;
mod logging_reader;
mod logging_writer;
mod session_state;
mod tcp_client;

pub use self::{
    connect_params::ConnectParams, connection_configuration::ConnectionConfiguration,
};
pub(crate) use self::{
    am_conn_core::{AmConnCore, WeakAmConnCore},
    connection_core::ConnectionCore,
    session_state::SessionState,
};
