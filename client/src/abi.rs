//! Mint call construction against a deployed flash token.
//!
//! Two generations of the contract are in the field. The older one exposes
//! `mint(address,uint256)` and knows nothing about expiry; the current one
//! exposes `mint(address,uint256,uint256)` and enforces the expiry on-chain.
//! The form is detected from the contract ABI at call time. With the legacy
//! form any expiry the operator picked is advisory only.

use flash_types::{AccountId, Timestamp};
use serde::Deserialize;
use sha3::{Digest, Keccak256};

use crate::error::ClientError;

/// Which `mint` entry point the deployed contract exposes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MintSignature {
    /// `mint(recipient, amount)`, expiry not enforced.
    Legacy,
    /// `mint(recipient, amount, expiresAt)`, expiry enforced.
    Expiring,
}

impl MintSignature {
    pub fn canonical(&self) -> &'static str {
        match self {
            Self::Legacy => "mint(address,uint256)",
            Self::Expiring => "mint(address,uint256,uint256)",
        }
    }

    pub fn selector(&self) -> [u8; 4] {
        function_selector(self.canonical())
    }

    pub fn enforces_expiry(&self) -> bool {
        matches!(self, Self::Expiring)
    }

    fn input_types(&self) -> &'static [&'static str] {
        match self {
            Self::Legacy => &["address", "uint256"],
            Self::Expiring => &["address", "uint256", "uint256"],
        }
    }
}

/// First four bytes of the Keccak-256 hash of a canonical function signature.
pub fn function_selector(signature: &str) -> [u8; 4] {
    let digest = Keccak256::digest(signature.as_bytes());
    let mut selector = [0u8; 4];
    selector.copy_from_slice(&digest[..4]);
    selector
}

#[derive(Deserialize)]
struct AbiEntry {
    #[serde(rename = "type", default)]
    kind: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    inputs: Vec<AbiParam>,
}

#[derive(Deserialize)]
struct AbiParam {
    #[serde(rename = "type")]
    kind: String,
}

impl AbiEntry {
    fn matches(&self, signature: MintSignature) -> bool {
        self.kind == "function"
            && self.name == "mint"
            && self
                .inputs
                .iter()
                .map(|p| p.kind.as_str())
                .eq(signature.input_types().iter().copied())
    }
}

/// Inspect a JSON contract ABI and pick the mint form to call.
/// The expiring form wins when both are present.
pub fn detect_mint_signature(abi_json: &str) -> Result<MintSignature, ClientError> {
    let entries: Vec<AbiEntry> =
        serde_json::from_str(abi_json).map_err(|e| ClientError::InvalidAbi(e.to_string()))?;

    let has = |sig| entries.iter().any(|e| e.matches(sig));
    let detected = if has(MintSignature::Expiring) {
        MintSignature::Expiring
    } else if has(MintSignature::Legacy) {
        MintSignature::Legacy
    } else {
        return Err(ClientError::MintNotFound);
    };
    tracing::debug!(signature = detected.canonical(), "mint signature detected");
    Ok(detected)
}

/// A mint call ready to be signed and broadcast.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MintCall {
    pub signature: MintSignature,
    pub to: AccountId,
    pub amount: u128,
    /// The expiry the operator asked for.
    pub expires_at: Timestamp,
    /// False when the contract only has the legacy form.
    pub expiry_enforced: bool,
}

/// Build the mint call for whichever form the contract exposes.
pub fn build_mint_call(
    signature: MintSignature,
    to: AccountId,
    amount: u128,
    expires_at: Timestamp,
) -> MintCall {
    if !signature.enforces_expiry() {
        tracing::warn!(%to, %expires_at, "legacy mint: expiry is advisory only");
    }
    MintCall {
        signature,
        to,
        amount,
        expires_at,
        expiry_enforced: signature.enforces_expiry(),
    }
}

impl MintCall {
    /// Arguments as they appear in the call, in order.
    pub fn args(&self) -> Vec<String> {
        let mut args = vec![self.to.to_string(), self.amount.to_string()];
        if self.expiry_enforced {
            args.push(self.expires_at.as_secs().to_string());
        }
        args
    }

    /// ABI-encoded calldata: selector followed by one 32-byte word per argument.
    pub fn calldata(&self) -> Vec<u8> {
        let mut data = Vec::with_capacity(4 + 32 * 3);
        data.extend_from_slice(&self.signature.selector());

        let mut word = [0u8; 32];
        word[12..].copy_from_slice(self.to.as_bytes());
        data.extend_from_slice(&word);

        let mut word = [0u8; 32];
        word[16..].copy_from_slice(&self.amount.to_be_bytes());
        data.extend_from_slice(&word);

        if self.expiry_enforced {
            let mut word = [0u8; 32];
            word[24..].copy_from_slice(&self.expires_at.as_secs().to_be_bytes());
            data.extend_from_slice(&word);
        }
        data
    }

    pub fn calldata_hex(&self) -> String {
        format!("0x{}", hex::encode(self.calldata()))
    }
}
