pub mod ovp;
pub mod state;
pub mod timing;
pub mod token;

pub use ovp::{calculate_anchor_position, WordSegments};
pub use state::ReadingState;
pub use timing::{wpm_to_period, PlaybackTimer};
pub use token::{tokenize_text, StripClass, StripOptions};
