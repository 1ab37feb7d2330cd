use anyhow::Result;
use ecomm_client::{Connection, RpcConnection};
use serde::Serialize;
use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::Signer;

use crate::io::config::Settings;
use crate::output;

#[derive(Debug, Serialize)]
pub struct Check {
    pub name: String,
    pub ok: bool,
    pub detail: String,
}

impl Check {
    fn new(name: &str, ok: bool, detail: impl Into<String>) -> Self {
        Self { name: name.to_string(), ok, detail: detail.into() }
    }
}

#[derive(Debug, Serialize)]
pub struct DoctorOut {
    pub ok: bool,
    pub checks: Vec<Check>,
}

pub async fn run(settings: &Settings) -> Result<()> {
    let mut checks = Vec::new();

    match settings.keypair() {
        Ok(kp) => checks.push(Check::new("keypair", true, kp.pubkey().to_string())),
        Err(e) => checks.push(Check::new("keypair", false, e.to_string())),
    }

    let cfg = match settings.client_config() {
        Ok(cfg) => {
            checks.push(Check::new("config", true, format!("{} ({})", cfg.rpc_url, cfg.commitment)));
            Some(cfg)
        }
        Err(e) => {
            checks.push(Check::new("config", false, e.to_string()));
            None
        }
    };

    if let Some(cfg) = cfg {
        let pb = output::spinner("contacting cluster");
        let conn = RpcConnection::from_config(&cfg)?;
        match conn.cluster_version() {
            Ok(v) => {
                checks.push(Check::new("cluster", true, format!("{} solana-core {v}", conn.url())));
                let p = cfg.programs;
                checks.push(program_check(&conn, "program", &p.program_id));
                checks.push(program_check(&conn, "address_program", &p.address_program_id));
                checks.push(program_check(&conn, "profile_program", &p.profile_program_id));
            }
            Err(e) => checks.push(Check::new("cluster", false, e.to_string())),
        }
        pb.finish_and_clear();
    }

    let ok = checks.iter().all(|c| c.ok);
    if output::is_json() {
        output::print(&DoctorOut { ok, checks })?;
    } else {
        for c in &checks {
            output::status_line(c.ok, &c.name, &c.detail)?;
        }
    }
    Ok(())
}

fn program_check(conn: &RpcConnection, name: &str, id: &Pubkey) -> Check {
    match conn.get_account(id) {
        Ok(Some(acc)) if acc.executable => Check::new(name, true, id.to_string()),
        Ok(Some(_)) => Check::new(name, false, format!("{id} is not executable")),
        Ok(None) => Check::new(name, false, format!("{id} not found")),
        Err(e) => Check::new(name, false, e.to_string()),
    }
}
