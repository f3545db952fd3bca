//! ERP Service - Invoicing, customer directory and operations reporting for a stone crusher.

pub mod config;
pub mod directory;
pub mod documents;
pub mod handlers;
pub mod invoicing;
pub mod models;
pub mod reports;
pub mod services;
pub mod startup;
