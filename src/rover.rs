//! The decoder client: one [`Rover`] per controller on the bus.

use tracing::{debug, trace};

use crate::records::{
    BatteryState, ChargingState, DayStatistics, FaultMask, HistStatistics, PanelState,
    decode_product_model,
};
use crate::registers::{self, Span};
use crate::transport::{ErrorKind, Transport};

#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    #[error("modbus exchange with the controller failed")]
    Transport(#[source] ErrorKind),
    #[error("{0} is not a valid street light state (want 0 or 1)")]
    InvalidArgument(u16),
}

/// A Renogy Rover reached through some [`Transport`].
///
/// The handle is owned and explicitly passed in, so several controllers on
/// one bus (distinct slave IDs, or distinct buses altogether) can each get
/// their own independent `Rover`. Every read maps to a single atomic
/// register-span request; the lifetime statistics need two. Nothing is
/// cached and nothing is retried — a failed exchange surfaces as
/// [`Error::Transport`] and yields no record at all.
pub struct Rover<T> {
    transport: T,
}

impl<T: Transport> Rover<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    /// Give the transport handle back, e.g. to reconfigure the link.
    pub fn into_transport(self) -> T {
        self.transport
    }

    async fn read_span<const N: usize>(&mut self, span: Span) -> Result<[u16; N], Error> {
        trace!(address = span.address, count = span.count, "reading span");
        let words = self
            .transport
            .read_words(span.address, span.count)
            .await
            .map_err(Error::Transport)?;
        trace!(address = span.address, words = ?words, "span read");
        // The transport contract promises exactly `count` words; a short or
        // long response means the link layer is broken.
        words
            .try_into()
            .map_err(|_| Error::Transport(ErrorKind::Unknown))
    }

    /// Read the product model string, e.g. `RNG-CTRL-RVR40`.
    pub async fn read_product_model(&mut self) -> Result<String, Error> {
        let words = self.read_span(registers::PRODUCT_MODEL).await?;
        Ok(decode_product_model(&words))
    }

    /// Read the current solar panel voltage, current and charging power.
    pub async fn read_panel_state(&mut self) -> Result<PanelState, Error> {
        let words = self.read_span(registers::PANEL_STATE).await?;
        Ok(PanelState::decode(&words))
    }

    /// Read the battery state of charge, voltage, charging current and the
    /// battery/controller temperatures.
    pub async fn read_battery_state(&mut self) -> Result<BatteryState, Error> {
        let words = self.read_span(registers::BATTERY_STATE).await?;
        Ok(BatteryState::decode(&words))
    }

    /// Read the statistics the controller tracks for the current day.
    pub async fn read_day_statistics(&mut self) -> Result<DayStatistics, Error> {
        let words = self.read_span(registers::DAY_STATISTICS).await?;
        Ok(DayStatistics::decode(&words))
    }

    /// Read the lifetime statistics. This is the one operation backed by
    /// two register spans; both reads must succeed before anything is
    /// decoded.
    pub async fn read_historical_statistics(&mut self) -> Result<HistStatistics, Error> {
        let counters = self.read_span(registers::HIST_COUNTERS).await?;
        let accumulators = self.read_span(registers::HIST_ACCUMULATORS).await?;
        Ok(HistStatistics::decode(&counters, &accumulators))
    }

    /// Read the street light state and the active charging mode.
    pub async fn read_charging_state(&mut self) -> Result<ChargingState, Error> {
        let words = self.read_span(registers::CHARGING_STATE).await?;
        Ok(ChargingState::decode(&words))
    }

    /// Read the currently raised fault flags.
    pub async fn read_fault_mask(&mut self) -> Result<FaultMask, Error> {
        let words = self.read_span(registers::FAULT_BITS).await?;
        Ok(FaultMask::decode(&words))
    }

    /// Switch the street light output off (0) or on (1).
    ///
    /// The register only accepts those two values; anything else is
    /// rejected here before a request is made.
    pub async fn write_street_light(&mut self, state: u16) -> Result<(), Error> {
        if state > 1 {
            return Err(Error::InvalidArgument(state));
        }
        let span = registers::STREET_LIGHT_SWITCH;
        debug!(address = span.address, state, "switching street light");
        self.transport
            .write_word(span.address, state)
            .await
            .map_err(Error::Transport)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;

    use super::{Error, Rover};
    use crate::records::ChargingMode;
    use crate::transport::{ErrorKind, Transport};

    /// A transport that hands out canned responses and records every
    /// request it sees.
    #[derive(Default)]
    struct ScriptedPort {
        reads: VecDeque<Result<Vec<u16>, ErrorKind>>,
        read_log: Vec<(u16, u16)>,
        write_result: Option<Result<(), ErrorKind>>,
        write_log: Vec<(u16, u16)>,
    }

    impl ScriptedPort {
        fn reading(words: Vec<u16>) -> Self {
            let mut port = Self::default();
            port.reads.push_back(Ok(words));
            port
        }

        fn failing(kind: ErrorKind) -> Self {
            let mut port = Self::default();
            port.reads.push_back(Err(kind));
            port
        }
    }

    #[async_trait::async_trait]
    impl Transport for ScriptedPort {
        async fn read_words(&mut self, address: u16, count: u16) -> Result<Vec<u16>, ErrorKind> {
            self.read_log.push((address, count));
            self.reads.pop_front().unwrap_or(Err(ErrorKind::Unknown))
        }

        async fn write_word(&mut self, address: u16, value: u16) -> Result<(), ErrorKind> {
            self.write_log.push((address, value));
            self.write_result.take().unwrap_or(Ok(()))
        }
    }

    #[tokio::test]
    async fn panel_state_reads_one_span() {
        let mut rover = Rover::new(ScriptedPort::reading(vec![1200, 150, 300]));
        let state = rover.read_panel_state().await.unwrap();
        assert_eq!(state.voltage, 120.0);
        assert_eq!(state.current, 1.5);
        assert_eq!(state.charging_power, 300.0);
        assert_eq!(rover.into_transport().read_log, vec![(0x0107, 3)]);
    }

    #[tokio::test]
    async fn battery_state_reads_one_span() {
        let mut rover = Rover::new(ScriptedPort::reading(vec![85, 252, 120, 0x0A14]));
        let state = rover.read_battery_state().await.unwrap();
        assert_eq!(state.state_of_charge, 85);
        assert_eq!(rover.into_transport().read_log, vec![(0x0100, 4)]);
    }

    #[tokio::test]
    async fn product_model_reads_eight_words() {
        let words = vec![0x2020, 0x524E, 0x472D, 0x4354, 0x524C, 0x2D52, 0x5652, 0x3430];
        let mut rover = Rover::new(ScriptedPort::reading(words));
        let model = rover.read_product_model().await.unwrap();
        assert_eq!(model, "RNG-CTRL-RVR40");
        assert_eq!(rover.into_transport().read_log, vec![(0x000C, 8)]);
    }

    #[tokio::test]
    async fn charging_state_reads_one_word() {
        let mut rover = Rover::new(ScriptedPort::reading(vec![0x0102]));
        let state = rover.read_charging_state().await.unwrap();
        assert_eq!(state.street_light_brightness, 1);
        assert_eq!(state.charging_mode, ChargingMode::Mppt);
        assert_eq!(rover.into_transport().read_log, vec![(0x0120, 1)]);
    }

    #[tokio::test]
    async fn historical_statistics_reads_both_spans() {
        let mut port = ScriptedPort::reading(vec![800, 3, 25]);
        port.reads.push_back(Ok(vec![1, 2, 0, 0x0500, 2, 0x1000, 1, 0]));
        let mut rover = Rover::new(port);
        let stats = rover.read_historical_statistics().await.unwrap();
        assert_eq!(stats.operating_days, 800);
        assert_eq!(stats.bat_charging_amp_hours, 0x102);
        assert_eq!(
            rover.into_transport().read_log,
            vec![(0x0115, 3), (0x0118, 8)]
        );
    }

    #[tokio::test]
    async fn historical_statistics_is_all_or_nothing() {
        let mut port = ScriptedPort::reading(vec![800, 3, 25]);
        port.reads.push_back(Err(ErrorKind::ResponseTimedOut));
        let mut rover = Rover::new(port);
        let result = rover.read_historical_statistics().await;
        assert_eq!(result, Err(Error::Transport(ErrorKind::ResponseTimedOut)));
    }

    #[tokio::test]
    async fn transport_failures_propagate() {
        let mut rover = Rover::new(ScriptedPort::failing(ErrorKind::SlaveDeviceFailure));
        let result = rover.read_fault_mask().await;
        assert_eq!(result, Err(Error::Transport(ErrorKind::SlaveDeviceFailure)));
    }

    #[tokio::test]
    async fn short_responses_are_rejected() {
        let mut rover = Rover::new(ScriptedPort::reading(vec![1200, 150]));
        let result = rover.read_panel_state().await;
        assert_eq!(result, Err(Error::Transport(ErrorKind::Unknown)));
    }

    #[tokio::test]
    async fn street_light_writes_valid_states() {
        let mut rover = Rover::new(ScriptedPort::default());
        rover.write_street_light(0).await.unwrap();
        rover.write_street_light(1).await.unwrap();
        assert_eq!(
            rover.into_transport().write_log,
            vec![(0x010A, 0), (0x010A, 1)]
        );
    }

    #[tokio::test]
    async fn street_light_rejects_out_of_range_before_writing() {
        let mut rover = Rover::new(ScriptedPort::default());
        let result = rover.write_street_light(2).await;
        assert_eq!(result, Err(Error::InvalidArgument(2)));
        assert!(rover.into_transport().write_log.is_empty());
    }

    #[tokio::test]
    async fn street_light_write_failures_propagate() {
        let mut port = ScriptedPort::default();
        port.write_result = Some(Err(ErrorKind::IllegalDataValue));
        let mut rover = Rover::new(port);
        let result = rover.write_street_light(1).await;
        assert_eq!(result, Err(Error::Transport(ErrorKind::IllegalDataValue)));
    }
}
