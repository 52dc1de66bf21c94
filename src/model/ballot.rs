use std::fmt::{Display, Formatter};
use std::str::FromStr;

use chrono::{DateTime, Utc};
use data_encoding::HEXLOWER;
use hmac::{digest::Output, Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;

use crate::error::Error;
use crate::model::access::Principal;
use crate::model::election::{CandidateId, ElectionId};

pub type HmacSha256 = Hmac<Sha256>;

/// A vote receipt: a one-way digest proving that a voter cast a ballot in
/// an election, without revealing the candidate chosen. Serializes to a
/// lowercase hex string so it can travel through any API response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct Receipt(Output<HmacSha256>);

impl Receipt {
    /// Derive the receipt for a vote. Deterministic in its inputs, keyed by
    /// the engine secret so receipts cannot be forged offline.
    pub fn for_vote(
        secret: &[u8],
        election: ElectionId,
        voter: &Principal,
        candidate: CandidateId,
        cast_at: DateTime<Utc>,
    ) -> Self {
        let mut mac = HmacSha256::new_from_slice(secret).expect("HMAC can take a key of any size");
        mac.update(&election.to_le_bytes());
        mac.update(voter.as_bytes());
        mac.update(&candidate.to_le_bytes());
        mac.update(&cast_at.timestamp_millis().to_le_bytes());
        Self(mac.finalize().into_bytes())
    }

    /// Render as lowercase hex.
    pub fn to_hex(&self) -> String {
        HEXLOWER.encode(&self.0)
    }
}

impl Display for Receipt {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl From<Receipt> for String {
    fn from(receipt: Receipt) -> Self {
        receipt.to_hex()
    }
}

impl FromStr for Receipt {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = HEXLOWER
            .decode(s.as_bytes())
            .map_err(|err| Error::InvalidInput(format!("malformed receipt: {err}")))?;
        if bytes.len() != 32 {
            return Err(Error::InvalidInput(
                "malformed receipt: wrong length".to_string(),
            ));
        }
        Ok(Self(Output::<HmacSha256>::clone_from_slice(&bytes)))
    }
}

impl TryFrom<String> for Receipt {
    type Error = Error;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

/// A cast ballot record. Stores only the receipt, never the choice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ballot {
    /// The receipt issued to the voter at cast time.
    pub receipt: Receipt,
    /// When the ballot was cast (logical time).
    pub cast_at: DateTime<Utc>,
}
