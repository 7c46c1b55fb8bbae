//! Core storefront domain: data models and the session store

pub mod models;
pub mod session;
