//! # Rules Blocks
//!
//! Every vLEI credential is issued under a rules section: a SAID-bearing
//! object of named disclaimers, each holding its legal text under `l`.
//!
//! ```json
//! {"d": "E...", "usageDisclaimer": {"l": "..."}, "issuanceDisclaimer": {"l": "..."}}
//! ```
//!
//! The texts are fixed by the vLEI Ecosystem Governance Framework. They are
//! digested as-is, so a single changed character yields a different rule
//! SAID than the one verifiers expect.

use serde::{Deserialize, Serialize};

use qvi_core::{Said, SaidError, SelfAddressing};

const USAGE_DISCLAIMER: &str = "Usage of a valid, unexpired, and non-revoked vLEI Credential, as defined in the associated Ecosystem Governance Framework, does not assert that the Legal Entity is trustworthy, honest, reputable in its business dealings, safe to do business with, or compliant with any laws or that an implied or expressly intended purpose will be fulfilled.";

const ISSUANCE_DISCLAIMER: &str = "All information in a valid, unexpired, and non-revoked vLEI Credential, as defined in the associated Ecosystem Governance Framework, is accurate as of the date the validation process was complete. The vLEI Credential has been issued to the legal entity or person named in the vLEI Credential as the subject; and the qualified vLEI Issuer exercised reasonable care to perform the validation process set forth in the vLEI Ecosystem Governance Framework.";

const PRIVACY_DISCLAIMER: &str = "It is the sole responsibility of Holders as Issuees of an ECR vLEI Credential to present that Credential in a privacy-preserving manner using the mechanisms provided in the Issuance and Presentation Exchange (IPEX) protocol specification and the Authentic Chained Data Container (ACDC) specification. https://github.com/WebOfTrust/IETF-IPEX and https://github.com/trustoverip/tswg-acdc-specification.";

/// One disclaimer of a rules block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Disclaimer {
    /// Legal text.
    #[serde(rename = "l")]
    pub text: String,
}

impl Disclaimer {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

/// A rules block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Rule {
    /// SAID of this block. `null` until sealed.
    #[serde(rename = "d")]
    pub said: Option<Said>,
    pub usage_disclaimer: Disclaimer,
    pub issuance_disclaimer: Disclaimer,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub privacy_disclaimer: Option<Disclaimer>,
}

impl SelfAddressing for Rule {
    fn said(&self) -> Option<&Said> {
        self.said.as_ref()
    }

    fn set_said(&mut self, said: Said) {
        self.said = Some(said);
    }
}

/// The rules variants used by vLEI schemas.
///
/// ECR credentials add a privacy disclaimer; every other type carries the
/// usage and issuance disclaimers only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RuleSet {
    /// Usage and issuance disclaimers.
    Standard,
    /// Usage, issuance and privacy disclaimers.
    WithPrivacy,
}

impl RuleSet {
    /// The unsealed rules block.
    pub fn block(&self) -> Rule {
        Rule {
            said: None,
            usage_disclaimer: Disclaimer::new(USAGE_DISCLAIMER),
            issuance_disclaimer: Disclaimer::new(ISSUANCE_DISCLAIMER),
            privacy_disclaimer: match self {
                Self::Standard => None,
                Self::WithPrivacy => Some(Disclaimer::new(PRIVACY_DISCLAIMER)),
            },
        }
    }

    /// The rules block with its SAID computed.
    pub fn sealed(&self) -> Result<Rule, SaidError> {
        self.block().seal()
    }
}
