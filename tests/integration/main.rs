//! Integration tests: full session flows and the card feed wired into a
//! session through the command channel.

mod mock_feed;
mod session_flow;
