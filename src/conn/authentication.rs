mod auth_requests;
mod authenticator;
mod crypto_util;
mod scram_sha256;

use self::{
    auth_requests::{first_auth_request, second_auth_request, FirstAuthResponse},
    authenticator::Authenticator,
    scram_sha256::ScramSha256,
};
use crate::conn::{AmConnCore, ConnectionCore};
use crate::{HdbError, HdbResult};

// Performs the two-round authentication handshake.
//
// Currently only SCRAM-SHA256 is implemented; the structure allows
// proposing several methods with the first round trip and continuing with
// the one the server selects.
pub(crate) fn authenticate(
    conn_core: &mut ConnectionCore,
    am_conn_core: &AmConnCore,
) -> HdbResult<()> {
    trace!("authenticate()");
    // Propose the supported authenticators with the first request...
    let authenticators: [Box<dyn Authenticator + Send + Sync>; 1] =
        [ScramSha256::boxed_authenticator()];

    match first_auth_request(conn_core, am_conn_core, &authenticators)? {
        FirstAuthResponse::AuthenticatorAndChallenge(selected, server_challenge) => {
            // ...find the selected authenticator...
            let mut authenticator: Box<dyn Authenticator + Send + Sync> = authenticators
                .into_iter()
                .find(|authenticator| authenticator.name() == selected)
                .ok_or_else(|| HdbError::Authentication {
                    source: Box::new(crate::hdb_error::impl_err!(
                        "None of the proposed authenticators was accepted"
                    )),
                })?;
            // ...and use it for the second request
            second_auth_request(conn_core, am_conn_core, &mut *authenticator, &server_challenge)
        }
    }
}
