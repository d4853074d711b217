//! # Events Module
//!
//! Progress reporting for the scan pipeline.
//!
//! The core never prints. It emits events through a channel and the front
//! end decides how to render them.
//!
//! ## Example
//! ```rust,ignore
//! let (sender, receiver) = EventChannel::new();
//!
//! std::thread::spawn(move || {
//!     for event in receiver.iter() {
//!         if let Event::Scan(ScanEvent::FileDiscovered { path, .. }) = event {
//!             println!("found {}", path.display());
//!         }
//!     }
//! });
//!
//! pipeline.run_with_events(&sender)?;
//! ```

mod channel;
mod types;

pub use channel::{null_sender, EventChannel, EventReceiver, EventSender};
pub use types::*;
