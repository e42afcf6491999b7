//! Core library for the courier delivery-fee service.
//!
//! A delivery fee is a fixed regional base fee plus weather-triggered
//! surcharges. The latest observation recorded for a city's weather station
//! is classified into discrete codes by configurable condition rules; the
//! codes drive surcharges and, under severe weather, outright vehicle
//! prohibitions.

pub mod config;
pub mod error;
pub mod pricing;
pub mod telemetry;
pub mod weather;
