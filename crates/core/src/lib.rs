#![forbid(unsafe_code)]

pub mod countdown;
pub mod model;
pub mod round;
pub mod scoring;
pub mod site;
pub mod text;
pub mod time;

pub use countdown::{Countdown, CountdownState, CountdownTick};
pub use round::{Advance, AnswerOutcome, Resolution, RoundController, RoundError, RoundState};
pub use site::SiteBase;
pub use time::Clock;
