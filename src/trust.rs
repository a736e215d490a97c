use crate::simulation::SimConfig;

const MALICIOUS_DAMPING: f64 = 0.8;
const HONEST_BONUS: f64 = 0.02;
const HONEST_CAP: f64 = 0.99;

/// What a protocol knows about a sensor when it rescores it.
#[derive(Debug, Clone, Copy)]
pub struct TrustSample {
    pub malicious: bool,
    pub has_energy: bool,
    pub reputation: f64,
    pub prior: f64,
    pub round: usize,
}

/// Trust with a time decaying history weight.
///
/// Early rounds lean on accumulated trust, later rounds on the latest
/// reputation signal. Malicious nodes are damped multiplicatively whatever
/// they scored; honest nodes with energy left ratchet toward `HONEST_CAP`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrustModel {
    pub alpha_start: f64,
    pub alpha_end: f64,
    pub max_rounds: usize,
}

impl TrustModel {
    pub fn from_config(config: &SimConfig) -> Self {
        Self {
            alpha_start: config.alpha_start,
            alpha_end: config.alpha_end,
            max_rounds: config.max_rounds,
        }
    }

    pub fn alpha(&self, round: usize) -> f64 {
        let progress = if self.max_rounds == 0 {
            0.0
        } else {
            round as f64 / self.max_rounds as f64
        };
        self.alpha_start - (self.alpha_start - self.alpha_end) * progress
    }

    pub fn update(&self, sample: TrustSample) -> f64 {
        let alpha = self.alpha(sample.round);
        let mut trust = alpha * sample.prior + (1.0 - alpha) * sample.reputation;

        if sample.malicious {
            trust *= MALICIOUS_DAMPING;
        } else if sample.has_energy {
            trust = HONEST_CAP.min(trust + HONEST_BONUS);
        }

        trust.clamp(0.0, 1.0)
    }
}

/// Constant weight blend with no policy adjustment, the naive scheme the
/// LEACH baseline runs.
pub fn fixed_blend(prior: f64, reputation: f64, history_weight: f64) -> f64 {
    (history_weight * prior + (1.0 - history_weight) * reputation).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn model() -> TrustModel {
        TrustModel::from_config(&SimConfig::default())
    }

    fn sample(malicious: bool, reputation: f64, prior: f64, round: usize) -> TrustSample {
        TrustSample {
            malicious,
            has_energy: true,
            reputation,
            prior,
            round,
        }
    }

    #[test]
    fn alpha_decays_linearly() {
        let model = model();
        assert_eq!(model.alpha(0), 0.8);
        assert!((model.alpha(50) - 0.6).abs() < 1e-12);
        assert!((model.alpha(100) - 0.4).abs() < 1e-12);
    }

    #[test]
    fn malicious_node_is_damped() {
        let trust = model().update(sample(true, 0.1, 0.5, 0));
        assert!((trust - 0.336).abs() < 1e-12);
    }

    #[test]
    fn malicious_node_is_damped_even_with_good_reputation() {
        let trust = model().update(sample(true, 0.9, 0.5, 0));
        // (0.4 + 0.18) * 0.8
        assert!((trust - 0.464).abs() < 1e-12);
    }

    #[test]
    fn honest_node_gets_bonus() {
        let trust = model().update(sample(false, 0.9, 0.5, 0));
        assert!((trust - 0.6).abs() < 1e-12);
    }

    #[test]
    fn honest_bonus_is_capped() {
        let trust = model().update(sample(false, 1.0, 0.99, 0));
        assert_eq!(trust, 0.99);
    }

    #[test]
    fn depleted_honest_node_gets_no_bonus() {
        let mut s = sample(false, 0.9, 0.5, 0);
        s.has_energy = false;
        assert!((model().update(s) - 0.58).abs() < 1e-12);
    }

    #[test]
    fn fixed_blend_weights_history() {
        assert!((fixed_blend(0.5, 0.2, 0.7) - 0.41).abs() < 1e-12);
        assert!((fixed_blend(0.5, 0.8, 0.7) - 0.59).abs() < 1e-12);
    }

    proptest! {
        #[test]
        fn trust_stays_in_unit_interval(
            malicious in any::<bool>(),
            has_energy in any::<bool>(),
            reputation in 0.0f64..=1.0,
            prior in 0.0f64..=1.0,
            round in 0usize..=100,
        ) {
            let trust = model().update(TrustSample { malicious, has_energy, reputation, prior, round });
            prop_assert!((0.0..=1.0).contains(&trust));
        }

        #[test]
        fn damping_never_raises_malicious_trust_above_blend(
            reputation in 0.0f64..=1.0,
            prior in 0.0f64..=1.0,
            round in 0usize..=100,
        ) {
            let model = model();
            let alpha = model.alpha(round);
            let blended = alpha * prior + (1.0 - alpha) * reputation;
            let trust = model.update(sample(true, reputation, prior, round));
            prop_assert!(trust <= blended + 1e-12);
        }
    }
}
