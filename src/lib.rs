//! Register decoder for Renogy Rover 20/40A MPPT solar charge controllers.
//!
//! The Rover exposes its measurements as fixed spans of 16-bit holding
//! registers over a Modbus-style link. This crate owns the semantic half of
//! that exchange: which span backs which record, and how the raw words turn
//! into voltages, currents, temperatures, counters and mode flags. Moving
//! the words themselves (serial port, framing, CRC, timeouts) is the job of
//! whatever implements [`transport::Transport`].
//!
//! ```no_run
//! # async fn demo(port: impl renogy_rover::Transport) -> Result<(), renogy_rover::Error> {
//! let mut rover = renogy_rover::Rover::new(port);
//! let battery = rover.read_battery_state().await?;
//! println!("{}% at {}V", battery.state_of_charge, battery.battery_voltage);
//! # Ok(())
//! # }
//! ```

pub mod records;
pub mod registers;
pub mod rover;
pub mod transport;

pub use records::{
    BatteryState, ChargingMode, ChargingState, DayStatistics, FaultMask, HistStatistics,
    PanelState,
};
pub use rover::{Error, Rover};
pub use transport::{ErrorKind, Transport};
