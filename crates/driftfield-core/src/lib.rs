//! Driftfield core: floating-ball background simulation, independent of any host.
//!
//! A [`BallGroupPool`] owns one [`BallGroup`] per rendering surface. The host
//! calls [`BallGroupPool::frame`] once per display frame and
//! [`BallGroupPool::transfer_tick`] on every transfer-timer firing.

pub mod ball;
pub mod config;
pub mod error;
pub mod group;
pub mod palette;
pub mod pool;
pub mod schedule;

pub use ball::{Ball, BallId, BallInstance, MAX_SPEED};
pub use config::{BackgroundOptions, BallOptions, Length, LengthUnit};
pub use error::{Error, Result};
pub use group::{BallGroup, Rejected};
pub use palette::{Color, PALETTE};
pub use pool::{BallGroupPool, TransferOutcome};
pub use schedule::{FrameLoop, RepeatingTimer};
