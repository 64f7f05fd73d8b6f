pub mod bot;
pub mod policy;
pub mod session;

pub use bot::{
    ActionScores, Advisory, DecisionEngine, DecisionInputs, Method, MonteCarloSimulator,
    Recommendation, RolloutConfig,
};
pub use policy::{EnginePolicy, MidpointPolicy, Policy, PolicyContext};
pub use session::{RoundOutcome, Session, StepReport, TableReadout};
