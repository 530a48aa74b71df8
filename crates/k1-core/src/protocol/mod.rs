//! Protocol module containing K1 frame constants, the checksum, and the codec.

pub mod checksum;
pub mod codec;
pub mod dump;
pub mod frame;

pub use checksum::checksum;
pub use codec::{
    decode_broadcast_response, decode_response, encode_request, EncodeError, ProtocolError,
};
pub use frame::*;
