//! Uniform `{code, msg, data}` response envelope
//!
//! Handlers hand any outcome to [`json_base_response`] or
//! [`xml_base_response`]; the outcome is classified into a [`BaseResponse`]
//! and written with `200 OK`. The business result travels in `code`, not in
//! the HTTP status.
//!
//! Classification, most specific first:
//! 1. [`CodeMsg`]: its code and message;
//! 2. [`tonic::Status`]: its numeric code and message;
//! 3. any other error: [`BUSINESS_CODE_ERROR`] and the error text;
//! 4. a payload: [`BUSINESS_CODE_OK`], [`BUSINESS_MSG_OK`] and the payload as `data`.
//!
//! A payload that encodes as null (`()`, `None`, a unit struct) leaves `data`
//! out, so `Payload(None::<T>)` and `Ok(None)` answer `{"code":0,"msg":"ok"}`.
//!
//! Concrete error types outside the list above (`std::io::Error`, a crate's
//! own error enum) do not implement [`IntoBaseResponse`]; box them into a
//! [`BoxError`] first. They then take the generic `-1` path unless they wrap
//! a [`CodeMsg`] or [`tonic::Status`] at the top.
//!
//! ```
//! use xkit_http::{wrap_base_response, Payload};
//!
//! let resp = wrap_base_response(Payload("anyone"));
//! assert_eq!(resp.code, 0);
//! assert_eq!(resp.data, Some("anyone"));
//!
//! let resp = wrap_base_response(xkit_errors::CodeMsg::new(1, "dummy error"));
//! assert_eq!((resp.code, resp.msg.as_str()), (1, "dummy error"));
//! ```

use serde::ser::{self, Impossible};
use serde::{Deserialize, Serialize, Serializer};
use std::error::Error as StdError;
use std::fmt::Display;
use thiserror::Error;
use tonic::Status;
use xkit_errors::CodeMsg;

use crate::context::ErrorReporter;
use crate::responses::{ok_json, ok_json_ctx, ok_xml, ok_xml_ctx};
use crate::sink::ResponseWriter;

/// Business code of a successful response.
pub const BUSINESS_CODE_OK: i32 = 0;
/// Business message of a successful response.
pub const BUSINESS_MSG_OK: &str = "ok";
/// Business code of an error that carries no code of its own.
pub const BUSINESS_CODE_ERROR: i32 = -1;

const XML_VERSION: &str = "1.0";
const XML_ENCODING: &str = "UTF-8";

/// Boxed error accepted by the envelope.
pub type BoxError = Box<dyn StdError + Send + Sync + 'static>;

/// The base response envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[must_use]
pub struct BaseResponse<T> {
    /// Business code, not the HTTP status code.
    pub code: i32,
    /// Business message; `"ok"` for successful responses.
    pub msg: String,
    /// Payload of a successful response; omitted from the encoding when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T: Serialize> BaseResponse<T> {
    /// Successful envelope around `data`; `data` is left out when it encodes as null.
    pub fn ok(data: T) -> Self {
        let data = if encodes_as_null(&data) {
            None
        } else {
            Some(data)
        };
        Self {
            code: BUSINESS_CODE_OK,
            msg: BUSINESS_MSG_OK.to_owned(),
            data,
        }
    }
}

impl<T> BaseResponse<T> {
    /// Envelope without data.
    pub fn error(code: i32, msg: impl Into<String>) -> Self {
        Self {
            code,
            msg: msg.into(),
            data: None,
        }
    }

    fn without_data<U>(self) -> BaseResponse<U> {
        BaseResponse {
            code: self.code,
            msg: self.msg,
            data: None,
        }
    }
}

/// XML form of [`BaseResponse`]: `<xml version="1.0" encoding="UTF-8">...</xml>`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename = "xml")]
#[must_use]
pub struct XmlBaseResponse<T> {
    #[serde(rename = "@version")]
    pub version: &'static str,
    #[serde(rename = "@encoding")]
    pub encoding: &'static str,
    pub code: i32,
    pub msg: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> From<BaseResponse<T>> for XmlBaseResponse<T> {
    fn from(base: BaseResponse<T>) -> Self {
        Self {
            version: XML_VERSION,
            encoding: XML_ENCODING,
            code: base.code,
            msg: base.msg,
            data: base.data,
        }
    }
}

/// Marks a value as a successful payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Payload<T>(pub T);

/// Anything that can be classified into a [`BaseResponse`].
pub trait IntoBaseResponse {
    type Data: Serialize;

    fn into_base_response(self) -> BaseResponse<Self::Data>;
}

impl<T: Serialize> IntoBaseResponse for Payload<T> {
    type Data = T;

    fn into_base_response(self) -> BaseResponse<T> {
        BaseResponse::ok(self.0)
    }
}

impl IntoBaseResponse for CodeMsg {
    type Data = ();

    fn into_base_response(self) -> BaseResponse<()> {
        BaseResponse::error(self.code, self.msg)
    }
}

impl IntoBaseResponse for &CodeMsg {
    type Data = ();

    fn into_base_response(self) -> BaseResponse<()> {
        BaseResponse::error(self.code, self.msg.clone())
    }
}

impl IntoBaseResponse for Status {
    type Data = ();

    fn into_base_response(self) -> BaseResponse<()> {
        (&self).into_base_response()
    }
}

impl IntoBaseResponse for &Status {
    type Data = ();

    fn into_base_response(self) -> BaseResponse<()> {
        BaseResponse::error(self.code() as i32, self.message())
    }
}

impl IntoBaseResponse for BoxError {
    type Data = ();

    fn into_base_response(self) -> BaseResponse<()> {
        classify_error(&*self)
    }
}

impl IntoBaseResponse for anyhow::Error {
    type Data = ();

    fn into_base_response(self) -> BaseResponse<()> {
        if let Some(cm) = self.downcast_ref::<CodeMsg>() {
            return cm.into_base_response();
        }
        if let Some(status) = self.downcast_ref::<Status>() {
            return status.into_base_response();
        }
        BaseResponse::error(BUSINESS_CODE_ERROR, self.to_string())
    }
}

impl<T, E> IntoBaseResponse for Result<T, E>
where
    T: Serialize,
    E: IntoBaseResponse,
{
    type Data = T;

    fn into_base_response(self) -> BaseResponse<T> {
        match self {
            Ok(data) => BaseResponse::ok(data),
            Err(err) => err.into_base_response().without_data(),
        }
    }
}

/// Classify a type-erased error: known error types first, then its text.
pub fn classify_error(err: &(dyn StdError + 'static)) -> BaseResponse<()> {
    if let Some(cm) = err.downcast_ref::<CodeMsg>() {
        return cm.into_base_response();
    }
    if let Some(status) = err.downcast_ref::<Status>() {
        return status.into_base_response();
    }
    BaseResponse::error(BUSINESS_CODE_ERROR, err.to_string())
}

/// Whether `v` serializes as a bare null: unit, `None`, a unit struct, or
/// newtypes and `Some`s around those.
fn encodes_as_null<T: Serialize + ?Sized>(v: &T) -> bool {
    v.serialize(NullCheck).is_ok()
}

#[derive(Debug, Error)]
#[error("value is not null")]
struct NotNull;

impl ser::Error for NotNull {
    fn custom<M: Display>(_msg: M) -> Self {
        Self
    }
}

/// Serializer that succeeds only on null-like values and bails out on the
/// first token of anything else.
struct NullCheck;

macro_rules! not_null {
    ($($method:ident($ty:ty)),* $(,)?) => {
        $(
            fn $method(self, _v: $ty) -> Result<(), NotNull> {
                Err(NotNull)
            }
        )*
    };
}

impl Serializer for NullCheck {
    type Ok = ();
    type Error = NotNull;
    type SerializeSeq = Impossible<(), NotNull>;
    type SerializeTuple = Impossible<(), NotNull>;
    type SerializeTupleStruct = Impossible<(), NotNull>;
    type SerializeTupleVariant = Impossible<(), NotNull>;
    type SerializeMap = Impossible<(), NotNull>;
    type SerializeStruct = Impossible<(), NotNull>;
    type SerializeStructVariant = Impossible<(), NotNull>;

    not_null! {
        serialize_bool(bool),
        serialize_i8(i8),
        serialize_i16(i16),
        serialize_i32(i32),
        serialize_i64(i64),
        serialize_u8(u8),
        serialize_u16(u16),
        serialize_u32(u32),
        serialize_u64(u64),
        serialize_f32(f32),
        serialize_f64(f64),
        serialize_char(char),
        serialize_str(&str),
        serialize_bytes(&[u8]),
    }

    fn serialize_none(self) -> Result<(), NotNull> {
        Ok(())
    }

    fn serialize_some<V: Serialize + ?Sized>(self, value: &V) -> Result<(), NotNull> {
        value.serialize(self)
    }

    fn serialize_unit(self) -> Result<(), NotNull> {
        Ok(())
    }

    fn serialize_unit_struct(self, _name: &'static str) -> Result<(), NotNull> {
        Ok(())
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _index: u32,
        _variant: &'static str,
    ) -> Result<(), NotNull> {
        Err(NotNull)
    }

    fn serialize_newtype_struct<V: Serialize + ?Sized>(
        self,
        _name: &'static str,
        value: &V,
    ) -> Result<(), NotNull> {
        value.serialize(self)
    }

    fn serialize_newtype_variant<V: Serialize + ?Sized>(
        self,
        _name: &'static str,
        _index: u32,
        _variant: &'static str,
        _value: &V,
    ) -> Result<(), NotNull> {
        Err(NotNull)
    }

    fn serialize_seq(self, _len: Option<usize>) -> Result<Self::SerializeSeq, NotNull> {
        Err(NotNull)
    }

    fn serialize_tuple(self, _len: usize) -> Result<Self::SerializeTuple, NotNull> {
        Err(NotNull)
    }

    fn serialize_tuple_struct(
        self,
        _name: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleStruct, NotNull> {
        Err(NotNull)
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleVariant, NotNull> {
        Err(NotNull)
    }

    fn serialize_map(self, _len: Option<usize>) -> Result<Self::SerializeMap, NotNull> {
        Err(NotNull)
    }

    fn serialize_struct(
        self,
        _name: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeStruct, NotNull> {
        Err(NotNull)
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeStructVariant, NotNull> {
        Err(NotNull)
    }
}

/// Classify `v` into a [`BaseResponse`].
pub fn wrap_base_response<V: IntoBaseResponse>(v: V) -> BaseResponse<V::Data> {
    v.into_base_response()
}

/// Classify `v` into an [`XmlBaseResponse`].
pub fn wrap_xml_base_response<V: IntoBaseResponse>(v: V) -> XmlBaseResponse<V::Data> {
    XmlBaseResponse::from(v.into_base_response())
}

/// Write `v` as a JSON base response with `200 OK`.
pub fn json_base_response<W, V>(w: &mut W, v: V)
where
    W: ResponseWriter + ?Sized,
    V: IntoBaseResponse,
{
    ok_json(w, &wrap_base_response(v));
}

/// Write `v` as a JSON base response with `200 OK`, reporting failures through `reporter`.
pub fn json_base_response_ctx<R, W, V>(reporter: &R, w: &mut W, v: V)
where
    R: ErrorReporter + ?Sized,
    W: ResponseWriter + ?Sized,
    V: IntoBaseResponse,
{
    ok_json_ctx(reporter, w, &wrap_base_response(v));
}

/// Write `v` as an XML base response with `200 OK`.
pub fn xml_base_response<W, V>(w: &mut W, v: V)
where
    W: ResponseWriter + ?Sized,
    V: IntoBaseResponse,
{
    ok_xml(w, &wrap_xml_base_response(v));
}

/// Write `v` as an XML base response with `200 OK`, reporting failures through `reporter`.
pub fn xml_base_response_ctx<R, W, V>(reporter: &R, w: &mut W, v: V)
where
    R: ErrorReporter + ?Sized,
    W: ResponseWriter + ?Sized,
    V: IntoBaseResponse,
{
    ok_xml_ctx(reporter, w, &wrap_xml_base_response(v));
}
