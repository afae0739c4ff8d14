#[macro_use]
mod common;

mod arithmetic;
mod containers;
mod control_flow;
mod errors;
mod functions;
mod map;
mod scenarios;
