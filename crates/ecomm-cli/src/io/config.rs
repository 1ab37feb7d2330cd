//! Settings resolution: defaults, then the TOML file, then flags/env.
//!
//! ```toml
//! rpc_url = "http://localhost:8899"
//! commitment = "confirmed"
//! keypair = "~/.config/solana/id.json"
//!
//! [programs]
//! program = "./ecomm_contract/target/deploy/ecomm_contract-keypair.json"
//! address_program = "<base58>"
//! profile_program = "<base58>"
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::{anyhow, Context, Result};
use ecomm_client::constants::{DEFAULT_COMMITMENT, DEFAULT_RPC_URL};
use ecomm_client::{validate_config, ClientConfig, ProgramIds};
use serde::Deserialize;
use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::{read_keypair_file, Keypair, Signer};
use url::Url;

use crate::args::ConnArgs;

pub const DEFAULT_KEYPAIR: &str = "~/.config/solana/id.json";

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub rpc_url: Option<String>,
    pub commitment: Option<String>,
    pub keypair: Option<String>,
    #[serde(default)]
    pub programs: ProgramsSection,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProgramsSection {
    pub program: Option<String>,
    pub address_program: Option<String>,
    pub profile_program: Option<String>,
}

pub fn load_file<P: AsRef<Path>>(path: P) -> Result<FileConfig> {
    let path = path.as_ref();
    let raw = fs::read_to_string(path).with_context(|| format!("reading config {}", path.display()))?;
    parse_file(&raw).with_context(|| format!("parsing config {}", path.display()))
}

pub fn parse_file(raw: &str) -> Result<FileConfig> {
    toml::from_str(raw).map_err(|e| anyhow!("invalid toml: {e}"))
}

/// Fully layered settings. Program ids stay unresolved until a command needs them.
#[derive(Debug, Clone)]
pub struct Settings {
    pub rpc_url: String,
    pub commitment: String,
    pub keypair_path: PathBuf,
    pub program: Option<String>,
    pub address_program: Option<String>,
    pub profile_program: Option<String>,
}

impl Settings {
    pub fn resolve(args: &ConnArgs) -> Result<Self> {
        let file = match &args.config {
            Some(path) => load_file(expand_home(path))?,
            None => FileConfig::default(),
        };
        Ok(Self::layer(args, file))
    }

    fn layer(args: &ConnArgs, file: FileConfig) -> Self {
        let pick = |flag: &Option<String>, from_file: Option<String>| flag.clone().or(from_file);
        Self {
            rpc_url: pick(&args.rpc_url, file.rpc_url).unwrap_or_else(|| DEFAULT_RPC_URL.to_string()),
            commitment: pick(&args.commitment, file.commitment).unwrap_or_else(|| DEFAULT_COMMITMENT.to_string()),
            keypair_path: expand_home(&pick(&args.keypair, file.keypair).unwrap_or_else(|| DEFAULT_KEYPAIR.to_string())),
            program: pick(&args.program_id, file.programs.program),
            address_program: pick(&args.address_program, file.programs.address_program),
            profile_program: pick(&args.profile_program, file.programs.profile_program),
        }
    }

    pub fn program_id(&self) -> Result<Pubkey> {
        let s = self
            .program
            .as_deref()
            .ok_or_else(|| anyhow!("program id not configured (--program-id or [programs].program)"))?;
        parse_program_ref(s)
    }

    pub fn programs(&self) -> Result<ProgramIds> {
        let address = self
            .address_program
            .as_deref()
            .ok_or_else(|| anyhow!("address program not configured (--address-program or [programs].address_program)"))?;
        let profile = self
            .profile_program
            .as_deref()
            .ok_or_else(|| anyhow!("profile program not configured (--profile-program or [programs].profile_program)"))?;
        Ok(ProgramIds {
            program_id: self.program_id()?,
            address_program_id: parse_program_ref(address)?,
            profile_program_id: parse_program_ref(profile)?,
        })
    }

    pub fn client_config(&self) -> Result<ClientConfig> {
        Url::parse(&self.rpc_url).map_err(|e| anyhow!("invalid rpc url {}: {e}", self.rpc_url))?;
        let cfg = ClientConfig {
            rpc_url: self.rpc_url.clone(),
            commitment: self.commitment.clone(),
            programs: self.programs()?,
        };
        validate_config(&cfg)?;
        Ok(cfg)
    }

    pub fn keypair(&self) -> Result<Keypair> {
        read_keypair_file(&self.keypair_path)
            .map_err(|e| anyhow!("reading keypair {}: {e}", self.keypair_path.display()))
    }
}

/// A program given as base58, or as the path of its deploy keypair.
pub fn parse_program_ref(s: &str) -> Result<Pubkey> {
    if let Ok(pk) = Pubkey::from_str(s.trim()) {
        return Ok(pk);
    }
    let path = expand_home(s);
    if path.exists() {
        let kp = read_keypair_file(&path).map_err(|e| anyhow!("reading program keypair {}: {e}", path.display()))?;
        return Ok(kp.pubkey());
    }
    Err(anyhow!("not a pubkey or keypair file: {s}"))
}

pub fn expand_home(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = std::env::var_os("HOME") {
            return PathBuf::from(home).join(rest);
        }
    }
    PathBuf::from(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use solana_sdk::signature::write_keypair_file;

    #[test]
    fn defaults_apply_without_file_or_flags() {
        let s = Settings::layer(&ConnArgs::default(), FileConfig::default());
        assert_eq!(s.rpc_url, DEFAULT_RPC_URL);
        assert_eq!(s.commitment, "confirmed");
        assert!(s.keypair_path.ends_with(".config/solana/id.json"));
        assert!(s.program_id().is_err());
    }

    #[test]
    fn flags_override_file() {
        let file = parse_file(
            r#"
            rpc_url = "http://file:8899"
            commitment = "finalized"

            [programs]
            program = "11111111111111111111111111111111"
            "#,
        )
        .unwrap();
        let args = ConnArgs { rpc_url: Some("http://flag:8899".into()), ..ConnArgs::default() };
        let s = Settings::layer(&args, file);
        assert_eq!(s.rpc_url, "http://flag:8899");
        assert_eq!(s.commitment, "finalized");
        assert_eq!(s.program_id().unwrap(), Pubkey::default());
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(parse_file("rpc = \"x\"").is_err());
    }

    #[test]
    fn program_from_keypair_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("program-keypair.json");
        let kp = Keypair::new();
        write_keypair_file(&kp, &path).unwrap();
        assert_eq!(parse_program_ref(path.to_str().unwrap()).unwrap(), kp.pubkey());
        assert!(parse_program_ref("nope").is_err());
    }

    #[test]
    fn full_client_config_validates() {
        let args = ConnArgs {
            program_id: Some(Pubkey::new_unique().to_string()),
            address_program: Some(Pubkey::new_unique().to_string()),
            profile_program: Some(Pubkey::new_unique().to_string()),
            ..ConnArgs::default()
        };
        let s = Settings::layer(&args, FileConfig::default());
        let cfg = s.client_config().unwrap();
        assert_eq!(cfg.rpc_url, DEFAULT_RPC_URL);

        let bad = Settings { rpc_url: "not a url".into(), ..s };
        assert!(bad.client_config().is_err());
    }

    #[test]
    fn config_file_loads_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ecomm.toml");
        fs::write(&path, "keypair = \"/tmp/payer.json\"\n").unwrap();
        let file = load_file(&path).unwrap();
        assert_eq!(file.keypair.as_deref(), Some("/tmp/payer.json"));
    }
}
