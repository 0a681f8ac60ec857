//! Device identity and test accounts (`[PRINTER]`, `[USER]`, `[USER2]`).
//!
//! Values are opaque to the registry. Loading only requires them to be
//! non-empty; template placeholders such as `<Printer Model>` are reported
//! by [`validate`](crate::registry::ConfigRegistry::validate) as warnings.

use crate::config::{RawPrinter, RawUser, RawUser2};
use crate::error::SchemaError;

/// Identity of the printer under test.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrinterProfile {
    pub cert_id: String,
    pub firmware: String,
    pub ip: String,
    pub manufacturer: String,
    pub model: String,
    pub name: String,
    /// Port of the device web service.
    pub port: String,
    pub serial: String,
    /// Released, Internal, ProtoType or Unknown.
    pub status: String,
}

impl PrinterProfile {
    pub fn from_raw(raw: &RawPrinter) -> Result<Self, SchemaError> {
        Ok(Self {
            cert_id: required("PRINTER", "CERTID", &raw.certid)?,
            firmware: required("PRINTER", "FIRMWARE", &raw.firmware)?,
            ip: required("PRINTER", "IP", &raw.ip)?,
            manufacturer: required("PRINTER", "MANUFACTURER", &raw.manufacturer)?,
            model: required("PRINTER", "MODEL", &raw.model)?,
            name: required("PRINTER", "NAME", &raw.name)?,
            port: required("PRINTER", "PORT", &raw.port)?,
            serial: required("PRINTER", "SERIAL", &raw.serial)?,
            status: required("PRINTER", "STATUS", &raw.status)?,
        })
    }

    /// `(key, value)` pairs in source order.
    pub fn fields(&self) -> [(&'static str, &str); 9] {
        [
            ("CERTID", self.cert_id.as_str()),
            ("FIRMWARE", self.firmware.as_str()),
            ("IP", self.ip.as_str()),
            ("MANUFACTURER", self.manufacturer.as_str()),
            ("MODEL", self.model.as_str()),
            ("NAME", self.name.as_str()),
            ("PORT", self.port.as_str()),
            ("SERIAL", self.serial.as_str()),
            ("STATUS", self.status.as_str()),
        ]
    }

    pub(crate) fn to_raw(&self) -> RawPrinter {
        RawPrinter {
            certid: self.cert_id.clone(),
            firmware: self.firmware.clone(),
            ip: self.ip.clone(),
            manufacturer: self.manufacturer.clone(),
            model: self.model.clone(),
            name: self.name.clone(),
            port: self.port.clone(),
            serial: self.serial.clone(),
            status: self.status.clone(),
        }
    }
}

/// Primary test account, the OAuth principal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserCredentials {
    pub client_id: String,
    pub client_secret: String,
    pub email: String,
}

impl UserCredentials {
    pub fn from_raw(raw: &RawUser) -> Result<Self, SchemaError> {
        Ok(Self {
            client_id: required("USER", "CLIENT_ID", &raw.client_id)?,
            client_secret: required("USER", "CLIENT_SECRET", &raw.client_secret)?,
            email: required("USER", "EMAIL", &raw.email)?,
        })
    }

    pub fn fields(&self) -> [(&'static str, &str); 3] {
        [
            ("CLIENT_ID", self.client_id.as_str()),
            ("CLIENT_SECRET", self.client_secret.as_str()),
            ("EMAIL", self.email.as_str()),
        ]
    }

    pub(crate) fn to_raw(&self) -> RawUser {
        RawUser {
            client_id: self.client_id.clone(),
            client_secret: self.client_secret.clone(),
            email: self.email.clone(),
        }
    }
}

/// Secondary account. Only receives shared jobs, so it has no OAuth client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecondaryUser {
    pub email: String,
}

impl SecondaryUser {
    pub fn from_raw(raw: &RawUser2) -> Result<Self, SchemaError> {
        Ok(Self {
            email: required("USER2", "EMAIL", &raw.email)?,
        })
    }

    pub(crate) fn to_raw(&self) -> RawUser2 {
        RawUser2 {
            email: self.email.clone(),
        }
    }
}

/// Whether `value` is an untouched `<...>` template value.
pub fn is_placeholder(value: &str) -> bool {
    let value = value.trim();
    value.len() >= 2 && value.starts_with('<') && value.ends_with('>')
}

pub(crate) fn required(group: &'static str, key: &str, value: &str) -> Result<String, SchemaError> {
    if value.trim().is_empty() {
        return Err(SchemaError::EmptyValue {
            group,
            key: key.to_string(),
        });
    }
    Ok(value.to_string())
}
