use anyhow::Result;
use ecomm_client::{AddressRecord, ProfileRecord, RecordKind};
use serde::Serialize;

use crate::io::config::Settings;
use crate::output;
use crate::solana::client::SolanaClient;

#[derive(Debug, Serialize)]
pub struct AddressOut {
    pub pda: String,
    pub address: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw_hex: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ProfileOut {
    pub pda: String,
    pub name: String,
    pub date: i32,
    pub month: i32,
    pub year: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw_hex: Option<String>,
}

fn raw_hex(bytes: Vec<u8>, raw: bool) -> Option<String> {
    raw.then(|| hex::encode(bytes))
}

pub async fn address(settings: &Settings, raw: bool) -> Result<()> {
    let client = SolanaClient::open(settings)?;
    let mut session = client.session();
    let pda = session.resolve()?.get(RecordKind::Address).0;

    let (record, bytes) = session.read_record::<AddressRecord>()?;
    output::print(&AddressOut {
        pda: pda.to_string(),
        address: record.text(),
        raw_hex: raw_hex(bytes, raw),
    })
}

pub async fn profile(settings: &Settings, raw: bool) -> Result<()> {
    let client = SolanaClient::open(settings)?;
    let mut session = client.session();
    let pda = session.resolve()?.get(RecordKind::Profile).0;

    let (record, bytes) = session.read_record::<ProfileRecord>()?;
    output::print(&ProfileOut {
        pda: pda.to_string(),
        name: record.name_text(),
        date: record.date,
        month: record.month,
        year: record.year,
        raw_hex: raw_hex(bytes, raw),
    })
}
