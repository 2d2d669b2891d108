//! kiota-emitter-transport - stream adapters and JSON-RPC message channel
//!
//! This crate provides:
//! - [`ReadableStream`]/[`WritableStream`] event adapters over Tokio I/O
//! - [`FrameDecoder`] and [`encode_frame`] for `Content-Length` framing
//! - JSON-RPC [`Message`] types
//! - [`StreamMessageReader`], [`StreamMessageWriter`] and the
//!   [`MessageConnection`] built on them

mod codec;
mod connection;
mod message;
mod reader;
mod stream;
mod writer;

pub use codec::{CodecError, FrameDecoder, encode_frame, frame_header};
pub use connection::{
    ConnectionError, ConnectionState, MessageConnection, create_message_connection,
};
pub use message::{
    JSONRPC_VERSION, Message, NotificationMessage, RequestId, RequestMessage, ResponseError,
    ResponseMessage, error_codes,
};
pub use reader::{ReaderCallback, ReaderEvent, StreamMessageReader};
pub use stream::{
    DataListener, Disposable, Encoding, ErrorListener, EventListener, ReadableStream,
    ReadableStreamWrapper, WritableStream, WritableStreamWrapper, WriteData,
};
pub use writer::{StreamMessageWriter, WriteError};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        ConnectionError, Message, MessageConnection, ReadableStream, ReadableStreamWrapper,
        StreamMessageReader, StreamMessageWriter, WritableStream, WritableStreamWrapper,
        create_message_connection,
    };
}
