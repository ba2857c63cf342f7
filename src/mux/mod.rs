//! Multiplexer Module
//!
//! Request/response correlation over one connection.
//!
//! ## Request Lifecycle
//! ```text
//!            dispatch()                    on_frame_received()
//!   caller ─────────────► Issued ──┬──► Resolved   (status "success")
//!                                  ├──► Rejected   (any other status,
//!                                  │                disconnect, failed send)
//!                                  └──► Abandoned  (cancel)
//! ```
//!
//! Replies are matched by identifier only, so they may arrive in any order.

mod id;
mod handle;
mod multiplexer;

pub use id::{IdGenerator, RequestId};
pub use handle::ReplyHandle;
pub use multiplexer::{FrameOutcome, Multiplexer};
