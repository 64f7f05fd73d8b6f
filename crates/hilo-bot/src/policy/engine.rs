use super::{Policy, PolicyContext};
use crate::bot::{DecisionEngine, DecisionInputs, Recommendation};
use rand::SeedableRng;
use rand::rngs::SmallRng;

/// Full decision pipeline with its own seeded generator.
pub struct EnginePolicy {
    name: String,
    engine: DecisionEngine,
    rng: SmallRng,
}

impl EnginePolicy {
    pub fn new(name: impl Into<String>, seed: u64) -> Self {
        Self {
            name: name.into(),
            engine: DecisionEngine::new(),
            rng: SmallRng::seed_from_u64(seed),
        }
    }
}

impl Policy for EnginePolicy {
    fn name(&self) -> &str {
        &self.name
    }

    fn recommend(&mut self, ctx: &PolicyContext) -> Recommendation {
        let counts = ctx.tracker.counts();
        self.engine.decide(
            DecisionInputs {
                counts: &counts,
                round: ctx.round,
                settings: ctx.settings,
                tie_is_push: ctx.tie_is_push,
                modifier: ctx.modifier,
            },
            &mut self.rng,
        )
    }
}
