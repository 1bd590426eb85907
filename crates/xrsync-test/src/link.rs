//! Lossy link simulation
//!
//! Frame-stepped rather than wall-clock: latency is counted in frames so
//! runs are deterministic for a given seed.

use std::collections::VecDeque;

use bytes::Bytes;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Link configuration
#[derive(Clone, Debug)]
pub struct LinkConfig {
    /// Independent loss probability (0.0 - 1.0)
    pub loss_rate: f64,
    /// Probability that a loss starts a burst
    pub burst_loss_prob: f64,
    /// Burst length range (packets)
    pub burst_length: (u32, u32),
    /// Delivery delay in frames
    pub latency_frames: u32,
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self::good()
    }
}

impl LinkConfig {
    /// No loss, one frame of latency
    pub fn perfect() -> Self {
        LinkConfig {
            loss_rate: 0.0,
            burst_loss_prob: 0.0,
            burst_length: (1, 1),
            latency_frames: 1,
        }
    }

    pub fn good() -> Self {
        LinkConfig {
            loss_rate: 0.01,
            burst_loss_prob: 0.05,
            burst_length: (1, 3),
            latency_frames: 3,
        }
    }

    pub fn poor() -> Self {
        LinkConfig {
            loss_rate: 0.1,
            burst_loss_prob: 0.3,
            burst_length: (5, 20),
            latency_frames: 12,
        }
    }
}

/// Link statistics
#[derive(Clone, Debug, Default)]
pub struct LinkStats {
    pub packets_sent: u64,
    pub packets_delivered: u64,
    pub packets_lost: u64,
    pub bytes_delivered: u64,
}

impl LinkStats {
    pub fn loss_rate(&self) -> f64 {
        if self.packets_sent == 0 {
            0.0
        } else {
            self.packets_lost as f64 / self.packets_sent as f64
        }
    }
}

/// One-way lossy link
pub struct LossyLink {
    config: LinkConfig,
    rng: StdRng,
    in_flight: VecDeque<(u64, Bytes)>,
    frame: u64,
    burst_remaining: u32,
    stats: LinkStats,
}

impl LossyLink {
    pub fn new(config: LinkConfig) -> Self {
        Self::with_seed(config, 0x5EED)
    }

    pub fn with_seed(config: LinkConfig, seed: u64) -> Self {
        LossyLink {
            config,
            rng: StdRng::seed_from_u64(seed),
            in_flight: VecDeque::new(),
            frame: 0,
            burst_remaining: 0,
            stats: LinkStats::default(),
        }
    }

    pub fn stats(&self) -> &LinkStats {
        &self.stats
    }

    fn should_drop(&mut self) -> bool {
        if self.burst_remaining > 0 {
            self.burst_remaining -= 1;
            return true;
        }
        if self.config.loss_rate > 0.0 && self.rng.gen_bool(self.config.loss_rate.min(1.0)) {
            if self.config.burst_loss_prob > 0.0
                && self.rng.gen_bool(self.config.burst_loss_prob.min(1.0))
            {
                let (min, max) = self.config.burst_length;
                self.burst_remaining = self.rng.gen_range(min..=max.max(min)).saturating_sub(1);
            }
            return true;
        }
        false
    }

    /// Queue a packet for delivery
    pub fn send(&mut self, packet: Bytes) {
        self.stats.packets_sent += 1;
        if self.should_drop() {
            self.stats.packets_lost += 1;
            return;
        }
        let due = self.frame + self.config.latency_frames as u64;
        self.in_flight.push_back((due, packet));
    }

    /// Advance one frame and return what arrives
    pub fn tick(&mut self) -> Vec<Bytes> {
        self.frame += 1;
        let mut delivered = Vec::new();
        while let Some((due, _)) = self.in_flight.front() {
            if *due > self.frame {
                break;
            }
            if let Some((_, packet)) = self.in_flight.pop_front() {
                self.stats.packets_delivered += 1;
                self.stats.bytes_delivered += packet.len() as u64;
                delivered.push(packet);
            }
        }
        delivered
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight.len()
    }
}
