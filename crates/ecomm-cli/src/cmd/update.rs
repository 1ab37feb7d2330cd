use anyhow::Result;
use ecomm_client::constants::TEXT_FIELD_LEN;
use ecomm_client::{AddressRecord, ProfileRecord, Receipt};
use serde::Serialize;

use crate::io::config::Settings;
use crate::output;
use crate::solana::client::SolanaClient;

#[derive(Debug, Serialize)]
pub struct UpdateOut {
    pub signature: String,
    pub record: String,
    pub truncated: bool,
}

fn warn_if_truncated(field: &str, value: &str) -> bool {
    let truncated = value.len() > TEXT_FIELD_LEN;
    if truncated && !output::is_json() {
        output::eprintln_line(&format!("warning: {field} is longer than {TEXT_FIELD_LEN} bytes and will be truncated"));
    }
    truncated
}

fn report(record: &str, truncated: bool, receipt: Receipt) -> Result<()> {
    output::print(&UpdateOut { signature: receipt.signature.to_string(), record: record.to_string(), truncated })
}

pub async fn set_address(settings: &Settings, address: &str) -> Result<()> {
    let truncated = warn_if_truncated("address", address);
    let client = SolanaClient::open(settings)?;
    let mut session = client.session();

    let pb = output::spinner("updating address");
    let receipt = session.update_address(AddressRecord::new(address));
    pb.finish_and_clear();
    report("address", truncated, receipt?)
}

pub async fn set_profile(settings: &Settings, name: &str, date: i32, month: i32, year: i32) -> Result<()> {
    let truncated = warn_if_truncated("name", name);
    let client = SolanaClient::open(settings)?;
    let mut session = client.session();

    let pb = output::spinner("updating profile");
    let receipt = session.update_profile(ProfileRecord::new(name, date, month, year));
    pb.finish_and_clear();
    report("profile", truncated, receipt?)
}

pub async fn write_address(settings: &Settings, address: &str) -> Result<()> {
    let truncated = warn_if_truncated("address", address);
    let client = SolanaClient::open(settings)?;
    let mut session = client.session();

    let pb = output::spinner("writing address record");
    let receipt = session.write_address_direct(&AddressRecord::new(address));
    pb.finish_and_clear();
    report("address", truncated, receipt?)
}
