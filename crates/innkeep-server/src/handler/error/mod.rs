//! [`Error`], [`ErrorKind`] and [`Result`].

mod http_error;
mod pg_error;
mod pg_hotel_platform;
mod pg_user;

pub use http_error::{Error, ErrorKind, Result};
