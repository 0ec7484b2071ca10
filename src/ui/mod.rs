//! UI module - contains UI rendering components
//!
//! This module organizes UI-related code for the application.

pub mod components;
