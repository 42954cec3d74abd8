use core::fmt::Display;
use core::marker::PhantomData;

use ibc_middleware_primitives::prelude::*;

/// A trait that defines how types are decoded/encoded.
pub trait Codec {
    type Type;
    type Error: Display;

    fn encode(value: &Self::Type) -> Vec<u8>;

    fn decode(bytes: &[u8]) -> Result<Self::Type, Self::Error>;
}

/// A Null codec that can be used for paths that are only meant to be set/reset and do not hold any
/// typed value.
#[derive(Clone, Debug)]
pub struct NullCodec;

impl Codec for NullCodec {
    type Type = ();
    type Error = &'static str;

    fn encode(_value: &Self::Type) -> Vec<u8> {
        // using [0x00] to represent null
        vec![0x00]
    }

    fn decode(bytes: &[u8]) -> Result<Self::Type, Self::Error> {
        match bytes {
            [0x00] => Ok(()),
            _ => Err("null value must be encoded as [0x00]"),
        }
    }
}

/// Encodes a `u64` as 8 big-endian bytes.
#[derive(Clone, Debug)]
pub struct U64Codec;

impl Codec for U64Codec {
    type Type = u64;
    type Error = &'static str;

    fn encode(value: &Self::Type) -> Vec<u8> {
        value.to_be_bytes().to_vec()
    }

    fn decode(bytes: &[u8]) -> Result<Self::Type, Self::Error> {
        <[u8; 8]>::try_from(bytes)
            .map(u64::from_be_bytes)
            .map_err(|_| "u64 value must be 8 bytes long")
    }
}

/// A Protobuf codec that uses `prost` to encode/decode the raw type `R` of
/// the domain type `T`.
#[derive(Clone, Debug)]
pub struct ProtobufCodec<T, R> {
    domain_type: PhantomData<T>,
    raw_type: PhantomData<R>,
}

impl<T, R> Codec for ProtobufCodec<T, R>
where
    T: Into<R> + Clone,
    R: TryInto<T> + Default + prost::Message,
    <R as TryInto<T>>::Error: Display,
{
    type Type = T;
    type Error = String;

    fn encode(value: &Self::Type) -> Vec<u8> {
        let raw: R = value.clone().into();
        raw.encode_to_vec()
    }

    fn decode(bytes: &[u8]) -> Result<Self::Type, Self::Error> {
        let raw = R::decode(bytes).map_err(|e| e.to_string())?;
        raw.try_into().map_err(|e| e.to_string())
    }
}
