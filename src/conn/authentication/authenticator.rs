use crate::HdbResult;
use secstr::SecUtf8;

pub(crate) trait Authenticator {
    fn name(&self) -> &str;

    fn name_as_bytes(&self) -> Vec<u8>;

    fn client_challenge(&self) -> &[u8];

    fn client_proof(
        &mut self,
        server_challenge_data: &[u8],
        password: &SecUtf8,
    ) -> HdbResult<Vec<u8>>;
}
