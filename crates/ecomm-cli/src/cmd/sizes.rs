use anyhow::Result;
use ecomm_client::{encoded_size, Opcode, RecordKind};
use serde::Serialize;

use crate::output;

/// Byte sizes the funding layer sizes rent from.
#[derive(Debug, Serialize)]
pub struct SizesOut {
    pub address_record: usize,
    pub profile_record: usize,
    pub initialize_payload: usize,
    pub update_address_payload: usize,
    pub update_profile_payload: usize,
}

pub async fn run() -> Result<()> {
    output::print(&SizesOut {
        address_record: encoded_size(RecordKind::Address),
        profile_record: encoded_size(RecordKind::Profile),
        initialize_payload: Opcode::Initialize.payload_len(),
        update_address_payload: Opcode::UpdateAddress.payload_len(),
        update_profile_payload: Opcode::UpdateProfile.payload_len(),
    })
}
