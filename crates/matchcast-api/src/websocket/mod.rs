//! WebSocket interface module.
//!
//! One handler task and one sender task per connection. The handler
//! owns the connection's lifecycle in the registry; the sender task
//! drains the connection's FIFO queue onto the socket so broadcast
//! dispatch never waits on a slow client.

mod handler;

pub use handler::ws_handler;
