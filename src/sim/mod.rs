pub mod event;
pub mod history;
pub mod integrator;
pub mod predictor;
pub mod session;

pub use event::{EventKind, SimEvent};
pub use history::StateHistory;
pub use integrator::euler_step;
pub use predictor::{predict, Forecast};
pub use session::{AdvanceReport, Phase, Session};
