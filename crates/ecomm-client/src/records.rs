//! Fixed-layout records stored in the per-user derived accounts.
//!
//! Layout rules (shared with the on-chain programs, byte for byte):
//! - fields are concatenated in declaration order, no padding between them
//! - text fields are exactly [`TEXT_FIELD_LEN`] bytes, zero-filled on the right
//! - integers are 4-byte little-endian two's complement
//!
//! There is no length prefix and no version byte. Changing a layout breaks every
//! deployed program reading it.

use std::fmt;

use crate::constants::{SEED_ADDRESS, SEED_PROFILE, TEXT_FIELD_LEN};
use crate::errors::DecodeError;

/// The two record kinds exchanged with the programs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordKind {
    Address,
    Profile,
}

impl RecordKind {
    pub const ALL: [RecordKind; 2] = [RecordKind::Address, RecordKind::Profile];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Address => "address",
            Self::Profile => "profile",
        }
    }

    /// PDA domain tag for accounts holding this record.
    pub fn seed(&self) -> &'static [u8] {
        match self {
            Self::Address => SEED_ADDRESS,
            Self::Profile => SEED_PROFILE,
        }
    }

    pub const fn layout(&self) -> &'static [FieldSpec] {
        match self {
            Self::Address => ADDRESS_LAYOUT,
            Self::Profile => PROFILE_LAYOUT,
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Primitive field shapes the layouts are built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    Bytes(usize),
    I32,
}

impl FieldType {
    pub const fn width(&self) -> usize {
        match self {
            Self::Bytes(n) => *n,
            Self::I32 => 4,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub ty: FieldType,
}

impl FieldSpec {
    pub const fn bytes(name: &'static str, len: usize) -> Self {
        Self { name, ty: FieldType::Bytes(len) }
    }

    pub const fn i32(name: &'static str) -> Self {
        Self { name, ty: FieldType::I32 }
    }
}

pub const ADDRESS_LAYOUT: &[FieldSpec] = &[FieldSpec::bytes("address", TEXT_FIELD_LEN)];

pub const PROFILE_LAYOUT: &[FieldSpec] = &[
    FieldSpec::bytes("name", TEXT_FIELD_LEN),
    FieldSpec::i32("date"),
    FieldSpec::i32("month"),
    FieldSpec::i32("year"),
];

/// Encoded byte length of a record kind.
///
/// Also the account space the funding layer has to pay rent for.
pub const fn encoded_size(kind: RecordKind) -> usize {
    let layout = kind.layout();
    let mut total = 0;
    let mut i = 0;
    while i < layout.len() {
        total += layout[i].ty.width();
        i += 1;
    }
    total
}

/// A record with a fixed binary layout.
pub trait Record: Sized {
    const KIND: RecordKind;

    fn write_fields(&self, out: &mut Vec<u8>);

    fn read_fields(r: &mut FieldReader<'_>) -> Result<Self, DecodeError>;

    fn encode(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(encoded_size(Self::KIND));
        self.write_fields(&mut out);
        debug_assert_eq!(out.len(), encoded_size(Self::KIND));
        out
    }

    /// Decode from the prefix of `bytes`. Trailing bytes are ignored.
    fn decode(bytes: &[u8]) -> Result<Self, DecodeError> {
        let expected = encoded_size(Self::KIND);
        if bytes.len() < expected {
            return Err(DecodeError::TruncatedInput {
                kind: Self::KIND,
                expected,
                actual: bytes.len(),
            });
        }
        let mut r = FieldReader::new(Self::KIND, &bytes[..expected]);
        Self::read_fields(&mut r)
    }
}

/// Bounds-checked sequential reader over one record's bytes.
pub struct FieldReader<'a> {
    kind: RecordKind,
    data: &'a [u8],
    pos: usize,
}

impl<'a> FieldReader<'a> {
    fn new(kind: RecordKind, data: &'a [u8]) -> Self {
        Self { kind, data, pos: 0 }
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8], DecodeError> {
        let end = self.pos + n;
        if end > self.data.len() {
            return Err(DecodeError::TruncatedInput {
                kind: self.kind,
                expected: encoded_size(self.kind),
                actual: self.data.len(),
            });
        }
        let out = &self.data[self.pos..end];
        self.pos = end;
        Ok(out)
    }

    pub fn read_array<const N: usize>(&mut self) -> Result<[u8; N], DecodeError> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.take(N)?);
        Ok(out)
    }

    pub fn read_i32(&mut self) -> Result<i32, DecodeError> {
        Ok(i32::from_le_bytes(self.read_array::<4>()?))
    }
}

/// Fixed-width text field.
pub type TextField = [u8; TEXT_FIELD_LEN];

/// Zero-fill `s` into a text field.
///
/// Input longer than the field is cut at the last whole UTF-8 character that
/// fits.
pub fn text_field(s: &str) -> TextField {
    let mut end = s.len().min(TEXT_FIELD_LEN);
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    bytes_field(&s.as_bytes()[..end])
}

/// Zero-fill raw bytes into a text field, truncating at exactly the field width.
pub fn bytes_field(bytes: &[u8]) -> TextField {
    let mut out = [0u8; TEXT_FIELD_LEN];
    let n = bytes.len().min(TEXT_FIELD_LEN);
    out[..n].copy_from_slice(&bytes[..n]);
    out
}

/// The field content with trailing zero fill removed.
pub fn trim_fill(field: &[u8]) -> &[u8] {
    let end = field.iter().rposition(|b| *b != 0).map_or(0, |i| i + 1);
    &field[..end]
}

#[derive(Clone, PartialEq, Eq)]
pub struct AddressRecord {
    pub address: TextField,
}

impl AddressRecord {
    pub fn new(address: &str) -> Self {
        Self { address: text_field(address) }
    }

    pub fn from_bytes(address: &[u8]) -> Self {
        Self { address: bytes_field(address) }
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(trim_fill(&self.address)).into_owned()
    }
}

impl Default for AddressRecord {
    fn default() -> Self {
        Self { address: [0u8; TEXT_FIELD_LEN] }
    }
}

impl fmt::Debug for AddressRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AddressRecord").field("address", &self.text()).finish()
    }
}

impl Record for AddressRecord {
    const KIND: RecordKind = RecordKind::Address;

    fn write_fields(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&self.address);
    }

    fn read_fields(r: &mut FieldReader<'_>) -> Result<Self, DecodeError> {
        Ok(Self { address: r.read_array()? })
    }
}

#[derive(Clone, PartialEq, Eq)]
pub struct ProfileRecord {
    pub name: TextField,
    pub date: i32,
    pub month: i32,
    pub year: i32,
}

impl ProfileRecord {
    /// No calendar validation happens here; the programs store whatever they get.
    pub fn new(name: &str, date: i32, month: i32, year: i32) -> Self {
        Self { name: text_field(name), date, month, year }
    }

    pub fn name_text(&self) -> String {
        String::from_utf8_lossy(trim_fill(&self.name)).into_owned()
    }
}

impl Default for ProfileRecord {
    fn default() -> Self {
        Self { name: [0u8; TEXT_FIELD_LEN], date: 0, month: 0, year: 0 }
    }
}

impl fmt::Debug for ProfileRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProfileRecord")
            .field("name", &self.name_text())
            .field("date", &self.date)
            .field("month", &self.month)
            .field("year", &self.year)
            .finish()
    }
}

impl Record for ProfileRecord {
    const KIND: RecordKind = RecordKind::Profile;

    fn write_fields(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&self.name);
        out.extend_from_slice(&self.date.to_le_bytes());
        out.extend_from_slice(&self.month.to_le_bytes());
        out.extend_from_slice(&self.year.to_le_bytes());
    }

    fn read_fields(r: &mut FieldReader<'_>) -> Result<Self, DecodeError> {
        Ok(Self {
            name: r.read_array()?,
            date: r.read_i32()?,
            month: r.read_i32()?,
            year: r.read_i32()?,
        })
    }
}
