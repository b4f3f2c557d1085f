mod clock;
mod pattern;
mod session;
mod timer;

pub use clock::{Clock, ManualClock, SystemClock};
pub use pattern::{BreathingPattern, Phase};
pub use session::{BreathingSession, SessionState};
pub use timer::BreathingTimer;
