mod friendship_service_impl;

pub use friendship_service_impl::*;
