//! Protocol constants and transmission parameters.
//!
//! The codec itself does not use the timing parameters; they are carried
//! here for the transport layers built on top of it.

use std::time::Duration;

/// Default port for unsecured transport.
pub const DEFAULT_PORT: u16 = 5683;

/// Default port for secured transport.
pub const SECURE_PORT: u16 = 5684;

/// Largest message a sender should produce.
pub const MAX_PACKET_SIZE: usize = 1500;

/// Retransmission and congestion-control parameters.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TransmissionParams {
    /// Initial acknowledgement timeout.
    pub ack_timeout: Duration,
    /// Upper bound multiplier for the randomized initial timeout.
    pub ack_random_factor: f64,
    /// Maximum number of retransmissions of a confirmable message.
    pub max_retransmit: u32,
    /// Maximum number of simultaneous outstanding interactions.
    pub nstart: u32,
    /// Leisure period for multicast responses.
    pub default_leisure: Duration,
    /// Average data rate towards an unresponsive peer, bytes per second.
    pub probing_rate: u32,
}

impl Default for TransmissionParams {
    fn default() -> Self {
        Self {
            ack_timeout: Duration::from_secs(2),
            ack_random_factor: 1.5,
            max_retransmit: 4,
            nstart: 1,
            default_leisure: Duration::from_secs(5),
            probing_rate: 1,
        }
    }
}

impl TransmissionParams {
    /// Largest initial timeout after randomization.
    ///
    /// Like the other derived timings, this is `None` when the result is not
    /// a representable [`Duration`], such as for a negative or non-finite
    /// `ack_random_factor`.
    #[must_use]
    pub fn max_ack_timeout(&self) -> Option<Duration> {
        self.scaled_ack_timeout(1.0)
    }

    /// Time from the first to the last retransmission of a confirmable message.
    #[must_use]
    pub fn max_transmit_span(&self) -> Option<Duration> {
        self.scaled_ack_timeout(pow2_minus_one(self.max_retransmit)?)
    }

    /// Time from the first transmission until the sender gives up waiting.
    #[must_use]
    pub fn max_transmit_wait(&self) -> Option<Duration> {
        self.scaled_ack_timeout(pow2_minus_one(self.max_retransmit.checked_add(1)?)?)
    }

    fn scaled_ack_timeout(&self, factor: f64) -> Option<Duration> {
        let secs = self.ack_timeout.as_secs_f64() * factor * self.ack_random_factor;
        Duration::try_from_secs_f64(secs).ok()
    }
}

/// `2^exp - 1`, infinite once it leaves the `f64` range.
fn pow2_minus_one(exp: u32) -> Option<f64> {
    i32::try_from(exp).ok().map(|exp| 2f64.powi(exp) - 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_params() {
        let params = TransmissionParams::default();
        assert_eq!(params.ack_timeout, Duration::from_secs(2));
        assert_eq!(params.max_retransmit, 4);
        assert_eq!(params.nstart, 1);
        assert_eq!(params.probing_rate, 1);
    }

    #[test]
    fn derived_timings() {
        let params = TransmissionParams::default();
        assert_eq!(params.max_ack_timeout(), Some(Duration::from_secs(3)));
        assert_eq!(params.max_transmit_span(), Some(Duration::from_secs(45)));
        assert_eq!(params.max_transmit_wait(), Some(Duration::from_secs(93)));
    }

    #[test]
    fn large_retransmit_counts() {
        let params = TransmissionParams {
            max_retransmit: 31,
            ..TransmissionParams::default()
        };
        assert_eq!(
            params.max_transmit_span(),
            Some(Duration::from_secs(3 * ((1 << 31) - 1)))
        );
        assert_eq!(
            params.max_transmit_wait(),
            Some(Duration::from_secs(3 * ((1 << 32) - 1)))
        );

        let params = TransmissionParams {
            max_retransmit: u32::MAX,
            ..TransmissionParams::default()
        };
        assert_eq!(params.max_transmit_span(), None);
        assert_eq!(params.max_transmit_wait(), None);
    }

    #[test]
    fn unusable_random_factor() {
        for factor in [-1.5, f64::NAN, f64::INFINITY] {
            let params = TransmissionParams {
                ack_random_factor: factor,
                ..TransmissionParams::default()
            };
            assert_eq!(params.max_ack_timeout(), None);
            assert_eq!(params.max_transmit_span(), None);
            assert_eq!(params.max_transmit_wait(), None);
        }
    }

    #[test]
    fn ports() {
        assert_eq!(DEFAULT_PORT, 5683);
        assert_eq!(SECURE_PORT, 5684);
    }
}
