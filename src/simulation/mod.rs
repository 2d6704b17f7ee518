//! Simulation systems and the world they run in

pub mod action;
pub mod alert;
pub mod events;
pub mod notify;
pub mod observation;
pub mod runner;
pub mod score;
pub mod world;

pub use action::{Action, ActionOutcome, ACTION_COUNT};
pub use alert::BaseAlertSystem;
pub use events::{TimedEvent, WorldEvent};
pub use notify::{Notification, NotificationChannel, NotificationKind};
pub use observation::{Observation, VisibleItem, VisibleSoldier};
pub use runner::{Match, MatchStats, MatchSummary, TeamSummary};
pub use score::{RoundSeries, ScoreBoard, ScoreEvent};
pub use world::{FlagLocation, WorldSnapshot, WorldState};
