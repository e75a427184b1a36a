use super::{authenticator::Authenticator, crypto_util};
use crate::{
    hdb_error::impl_err,
    protocol::parts::AuthFields,
    HdbResult,
};
use rand::{thread_rng, RngCore};
use secstr::SecUtf8;

const CLIENT_NONCE_LENGTH: usize = 16;

// Salted-challenge-response authentication; the server challenge of the
// first round trip carries (salt, server_nonce) as an auth-field list.
pub(crate) struct ScramSha256 {
    client_nonce: Vec<u8>,
}

impl ScramSha256 {
    pub fn boxed_authenticator() -> Box<dyn Authenticator + Send + Sync> {
        let mut client_nonce = vec![0_u8; CLIENT_NONCE_LENGTH];
        thread_rng().fill_bytes(&mut client_nonce);
        Box::new(Self { client_nonce })
    }
}

impl Authenticator for ScramSha256 {
    fn name(&self) -> &str {
        "SCRAMSHA256"
    }

    fn name_as_bytes(&self) -> Vec<u8> {
        self.name().as_bytes().to_vec()
    }

    fn client_challenge(&self) -> &[u8] {
        &self.client_nonce
    }

    fn client_proof(
        &mut self,
        server_challenge_data: &[u8],
        password: &SecUtf8,
    ) -> HdbResult<Vec<u8>> {
        let mut challenge_fields =
            AuthFields::parse(&mut std::io::Cursor::new(server_challenge_data.to_vec()))?;
        let (server_nonce, salt) = match (challenge_fields.pop(), challenge_fields.pop()) {
            (Some(server_nonce), Some(salt)) => (server_nonce, salt),
            (_, _) => {
                return Err(impl_err!(
                    "expected salt and server nonce in the server challenge"
                ));
            }
        };

        crypto_util::scram_sha256(&salt, &server_nonce, &self.client_nonce, password)
            .map_err(|_| impl_err!("crypto parameters of invalid length"))
    }
}

impl std::fmt::Debug for ScramSha256 {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "ScramSha256 {{ client_nonce: <hidden> }}")
    }
}
