//! Tools the agent can call for real-world data.
//!
//! Only one tool exists today: current weather over Open-Meteo.

pub mod weather;

pub use weather::WeatherTool;
