//! Protocol Module
//!
//! Primitive commands understood by the store and the replies it sends back.
//!
//! ## Protocol Format (RESP2)
//!
//! ### Request Format
//! Every request is an array of bulk strings: the command name followed by
//! its arguments.
//! ```text
//! *3\r\n $4\r\nHGET\r\n $3\r\nkey\r\n $5\r\nfield\r\n
//! ```
//!
//! ### Reply Types
//! - `+` status line
//! - `-` error line
//! - `:` integer
//! - `$` bulk string (`$-1` is nil)
//! - `*` array (`*-1` is nil)

mod command;
mod reply;
mod codec;

pub use command::{Command, CommandType};
pub use reply::Reply;
pub use codec::{decode_reply, encode_command, encode_reply, MAX_BULK_SIZE, MAX_ELEMENTS};
pub(crate) use codec::encode_command_into;
