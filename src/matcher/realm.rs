//! NAI realm matching of a credential against an NAI Realm element.

use crate::element::cellular::ThreeGppNetworkElement;
use crate::element::nai_realm::{NaiRealmData, NaiRealmElement};
use crate::profile::Credential;
use crate::types::AuthMatch;

use super::domain::{split_domain, DomainMatch, DomainMatcher};

/// Relationship of a realm record to the Home-SP domains or the
/// credential's own realm
fn realm_relationship(
    domains: &DomainMatcher,
    credential_realm: &[String],
    data: &NaiRealmData,
) -> DomainMatch {
    for realm in data.realms() {
        let labels = split_domain(realm);
        let relation = domains.is_sub_domain(&labels);
        if relation != DomainMatch::None {
            return relation;
        }
        if !credential_realm.is_empty() && labels == credential_realm {
            return DomainMatch::Secondary;
        }
    }
    DomainMatch::None
}

/// Match a credential against the realm records advertised by a network.
///
/// The first record that yields a non-`None` result decides. A SIM-based
/// credential additionally needs a 3GPP Cellular Network element with a
/// PLMN matching its IMSI.
pub fn match_realms(
    domains: &DomainMatcher,
    credential: &Credential,
    realms: &NaiRealmElement,
    three_gpp: Option<&ThreeGppNetworkElement>,
) -> AuthMatch {
    let credential_realm = split_domain(credential.realm());

    for data in realms.realm_data() {
        if realm_relationship(domains, &credential_realm, data) == DomainMatch::None {
            continue;
        }

        let auth = match credential.imsi() {
            Some(imsi) => {
                let Some(three_gpp) = three_gpp else {
                    continue;
                };
                three_gpp
                    .networks()
                    .iter()
                    .filter(|network| network.match_imsi(imsi))
                    .map(|_| data.match_eap_methods(credential.eap_method()))
                    .find(|auth| *auth != AuthMatch::None)
                    .unwrap_or(AuthMatch::None)
            }
            None => data.match_eap_methods(credential.eap_method()),
        };

        if auth != AuthMatch::None {
            return auth;
        }
    }
    AuthMatch::None
}
