// First order radio model: fixed electronics cost per bit plus a free space
// amplifier term growing with distance squared.

use crate::simulation::SimConfig;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnergyModel {
    pub e_elec: f64,
    pub e_amp: f64,
    pub e_da: f64,
    pub packet_size: f64,
}

impl EnergyModel {
    pub fn from_config(config: &SimConfig) -> Self {
        Self {
            e_elec: config.e_elec,
            e_amp: config.e_amp,
            e_da: config.e_da,
            packet_size: config.packet_size,
        }
    }

    /// Energy to send one packet over `distance` metres.
    pub fn transmit_cost(&self, distance: f64) -> f64 {
        self.e_elec * self.packet_size + self.e_amp * self.packet_size * distance * distance
    }

    /// Energy for a gateway to fuse `packets` incoming packets.
    pub fn aggregate_cost(&self, packets: usize) -> f64 {
        packets as f64 * self.e_da * self.packet_size
    }
}

impl Default for EnergyModel {
    fn default() -> Self {
        Self::from_config(&SimConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn zero_distance_costs_only_electronics() {
        let model = EnergyModel::default();
        assert_eq!(model.transmit_cost(0.0), model.e_elec * model.packet_size);
    }

    #[test]
    fn aggregating_nothing_is_free() {
        assert_eq!(EnergyModel::default().aggregate_cost(0), 0.0);
    }

    #[test]
    fn reference_costs() {
        let model = EnergyModel::default();
        // 50nJ * 4000 + 100pJ * 4000 * 100
        assert!((model.transmit_cost(10.0) - 2.4e-4).abs() < 1e-15);
        assert!((model.aggregate_cost(20) - 4e-4).abs() < 1e-15);
    }

    proptest! {
        #[test]
        fn transmit_cost_grows_with_distance(a in 0.0f64..500.0, b in 0.0f64..500.0) {
            let model = EnergyModel::default();
            let (near, far) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(model.transmit_cost(near) <= model.transmit_cost(far));
        }

        #[test]
        fn aggregate_cost_is_linear(n in 0usize..10_000) {
            let model = EnergyModel::default();
            let expected = model.aggregate_cost(1) * n as f64;
            prop_assert!((model.aggregate_cost(n) - expected).abs() <= 1e-12 * expected.max(1.0));
        }
    }
}
