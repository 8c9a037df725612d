//! Delivery of friendship events: the service pushes onto a channel, the
//! relay drains it in the background and hands each event to a publisher.

mod channel_notifier;
mod event_publisher_impl;
mod event_relay;
mod port;

pub use channel_notifier::*;
pub use event_publisher_impl::*;
pub use event_relay::*;
pub use port::*;
