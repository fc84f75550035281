//! Workspaces: membership and project ownership.
//!
//! A workspace is the authorization boundary for project boards. It keeps
//! the member list (user, role, activation) and the references to the
//! projects created inside it. The creator always joins as the first
//! `Admin`.

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
